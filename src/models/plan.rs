//! The daily plan store
//!
//! A `PeriodPlan` holds every day x category cell for one period, plus
//! the allocation set the cells were populated from. It is the engine's
//! primary working data structure; persistence wraps it as a unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::allocation::AllocationSet;
use super::cell::{CellStatus, DailyPlanCell};
use super::money::Money;
use super::period::{Period, PeriodValidationError};

/// All planning state for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodPlan {
    /// The period this plan covers
    pub period: Period,

    /// Category allocations the cells were populated from
    pub allocations: AllocationSet,

    /// One cell per day per category, sorted by (date, category)
    cells: Vec<DailyPlanCell>,
}

impl PeriodPlan {
    /// Populate a fresh plan: each category's amount is split evenly
    /// across the whole period, residual cents on the final day.
    ///
    /// The unallocated remainder gets cells like any real category so
    /// it can serve as a redistribution source.
    pub fn initialize(
        period: Period,
        allocations: AllocationSet,
    ) -> Result<Self, PeriodValidationError> {
        let total_days = period.total_days();
        if total_days == 0 {
            return Err(PeriodValidationError::EmptyRange {
                start: period.start,
                end: period.end,
            });
        }

        let dates: Vec<NaiveDate> = period.dates().collect();
        let mut cells = Vec::with_capacity(total_days * allocations.allocations.len());

        for allocation in &allocations.allocations {
            let daily = allocation.amount.split_evenly(total_days);
            for (date, planned) in dates.iter().zip(daily) {
                cells.push(DailyPlanCell::new(*date, &allocation.category, planned));
            }
        }

        cells.sort_by(|a, b| (a.date, &a.category).cmp(&(b.date, &b.category)));

        Ok(Self {
            period,
            allocations,
            cells,
        })
    }

    /// Look up a cell
    pub fn cell(&self, date: NaiveDate, category: &str) -> Option<&DailyPlanCell> {
        self.cells
            .binary_search_by(|c| (c.date, c.category.as_str()).cmp(&(date, category)))
            .ok()
            .map(|i| &self.cells[i])
    }

    /// Mutable cell lookup
    pub fn cell_mut(&mut self, date: NaiveDate, category: &str) -> Option<&mut DailyPlanCell> {
        self.cells
            .binary_search_by(|c| (c.date, c.category.as_str()).cmp(&(date, category)))
            .ok()
            .map(move |i| &mut self.cells[i])
    }

    /// Get a cell, creating an unbudgeted one if missing (a category
    /// added mid-period has spend tracked against planned 0)
    pub fn ensure_cell(&mut self, date: NaiveDate, category: &str) -> &mut DailyPlanCell {
        let idx = match self
            .cells
            .binary_search_by(|c| (c.date, c.category.as_str()).cmp(&(date, category)))
        {
            Ok(i) => i,
            Err(i) => {
                self.cells.insert(i, DailyPlanCell::unbudgeted(date, category));
                i
            }
        };
        &mut self.cells[idx]
    }

    /// All cells, in (date, category) order
    pub fn cells(&self) -> &[DailyPlanCell] {
        &self.cells
    }

    /// Cells for one day
    pub fn cells_for_day(&self, date: NaiveDate) -> impl Iterator<Item = &DailyPlanCell> {
        self.cells.iter().filter(move |c| c.date == date)
    }

    /// Cells for one category, in date order
    pub fn cells_for_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a DailyPlanCell> {
        self.cells.iter().filter(move |c| c.category == category)
    }

    /// A day's aggregate status: the worst status among its cells
    pub fn day_status(&self, date: NaiveDate) -> CellStatus {
        self.cells_for_day(date)
            .map(|c| c.status)
            .fold(CellStatus::OnTrack, CellStatus::worst)
    }

    /// Cumulative planned for a category through `date` (inclusive)
    pub fn cumulative_planned(&self, category: &str, through: NaiveDate) -> Money {
        self.cells_for_category(category)
            .filter(|c| c.date <= through)
            .map(|c| c.planned)
            .sum()
    }

    /// Cumulative spent for a category through `date` (inclusive)
    pub fn cumulative_spent(&self, category: &str, through: NaiveDate) -> Money {
        self.cells_for_category(category)
            .filter(|c| c.date <= through)
            .map(|c| c.spent)
            .sum()
    }

    /// Planned total for a category over the whole period
    pub fn planned_total(&self, category: &str) -> Money {
        self.cells_for_category(category).map(|c| c.planned).sum()
    }

    /// Spent total for a category over the whole period
    pub fn spent_total(&self, category: &str) -> Money {
        self.cells_for_category(category).map(|c| c.spent).sum()
    }

    /// Planned total across every cell in the plan
    pub fn grand_planned_total(&self) -> Money {
        self.cells.iter().map(|c| c.planned).sum()
    }

    /// Days strictly after `after` that have a cell for this category
    /// with positive planned budget — the only cells redistribution may
    /// reduce
    pub fn reducible_future_dates(&self, category: &str, after: NaiveDate) -> Vec<NaiveDate> {
        self.cells_for_category(category)
            .filter(|c| c.date > after && c.planned.is_positive())
            .map(|c| c.date)
            .collect()
    }

    /// Days strictly after `after` that have any cell for this category
    pub fn future_dates(&self, category: &str, after: NaiveDate) -> Vec<NaiveDate> {
        self.cells_for_category(category)
            .filter(|c| c.date > after)
            .map(|c| c.date)
            .collect()
    }

    /// Remaining planned budget for a category strictly after `after`
    pub fn future_planned(&self, category: &str, after: NaiveDate) -> Money {
        self.cells_for_category(category)
            .filter(|c| c.date > after)
            .map(|c| c.planned)
            .sum()
    }
}
