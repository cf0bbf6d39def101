//! Read-side queries
//!
//! Assembles the calendar view (per-day cells and aggregate statuses)
//! and the redistribution history for a period. Everything here is
//! read-only; queries tolerate running concurrently with writers and
//! may observe the plan as of their read.

use chrono::NaiveDate;

use crate::error::BudgetResult;
use crate::models::{
    CellStatus, DailyPlanCell, Money, PeriodId, PeriodPlan, RedistributionEvent,
};
use crate::storage::Storage;

/// One day of the calendar view
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// Worst status among the day's cells
    pub status: CellStatus,
    pub planned: Money,
    pub spent: Money,
    pub cells: Vec<DailyPlanCell>,
}

/// Per-category rollup over the whole period
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: String,
    pub planned: Money,
    pub spent: Money,
    pub remaining: Money,
    /// Net redistribution adjustment applied to this category
    pub adjusted: Money,
}

/// The full calendar for one period
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarView {
    pub plan: PeriodPlan,
    pub days: Vec<DaySummary>,
    pub categories: Vec<CategorySummary>,
}

/// Read-only query service over plans and the event ledger
pub struct CalendarService<'a> {
    storage: &'a Storage,
}

impl<'a> CalendarService<'a> {
    /// Create a new calendar service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// The calendar view for a period: every day with its cells and
    /// aggregate status, plus per-category rollups
    pub fn calendar(&self, period_id: PeriodId) -> BudgetResult<CalendarView> {
        let plan = self.storage.plans.load_period(period_id)?;

        let days = plan
            .period
            .dates()
            .map(|date| {
                let cells: Vec<DailyPlanCell> = plan.cells_for_day(date).cloned().collect();
                DaySummary {
                    date,
                    status: plan.day_status(date),
                    planned: cells.iter().map(|c| c.planned).sum(),
                    spent: cells.iter().map(|c| c.spent).sum(),
                    cells,
                }
            })
            .collect();

        let mut categories: Vec<String> = plan.cells().iter().map(|c| c.category.clone()).collect();
        categories.sort();
        categories.dedup();

        let categories = categories
            .into_iter()
            .map(|category| {
                let planned = plan.planned_total(&category);
                let spent = plan.spent_total(&category);
                CategorySummary {
                    remaining: planned - spent,
                    adjusted: plan
                        .cells_for_category(&category)
                        .map(|c| c.carried_adjustment)
                        .sum(),
                    category,
                    planned,
                    spent,
                }
            })
            .collect();

        Ok(CalendarView {
            plan,
            days,
            categories,
        })
    }

    /// The redistribution history for a period, oldest first
    pub fn history(&self, period_id: PeriodId) -> BudgetResult<Vec<RedistributionEvent>> {
        // Verify the period exists so a typo'd id is a clear error
        // rather than an empty history
        self.storage.plans.load_period(period_id)?;
        self.storage.events.for_period(period_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::DaybudgetPaths;
    use crate::config::Settings;
    use crate::error::BudgetError;
    use crate::models::{CategoryConfig, Currency, UserId, UNALLOCATED};
    use crate::services::allocation::AllocationService;
    use crate::services::notify::NullSink;
    use crate::services::redistribution::RedistributionService;
    use crate::services::spend::SpendService;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = DaybudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn setup(storage: &Storage) -> PeriodId {
        AllocationService::new(storage)
            .create_period(
                UserId::new(),
                2025,
                6,
                Money::from_cents(100_000),
                &[
                    CategoryConfig::new("Food", 0.3, 2),
                    CategoryConfig::new("Transport", 0.2, 1),
                ],
                Currency::new("USD"),
            )
            .unwrap()
            .period
            .id
    }

    #[test]
    fn test_calendar_shape() {
        let (_t, storage) = create_test_storage();
        let service = CalendarService::new(&storage);
        let period_id = setup(&storage);

        let view = service.calendar(period_id).unwrap();
        assert_eq!(view.days.len(), 30);
        // Food + Transport + Unallocated
        assert_eq!(view.days[0].cells.len(), 3);
        assert_eq!(view.categories.len(), 3);
        assert_eq!(view.days[0].status, CellStatus::OnTrack);

        let total: Money = view.categories.iter().map(|c| c.planned).sum();
        assert_eq!(total.cents(), 100_000);
    }

    #[test]
    fn test_calendar_reflects_spend_and_redistribution() {
        let (_t, storage) = create_test_storage();
        let settings = Settings::default();
        let period_id = setup(&storage);
        let usd = Currency::new("USD");

        SpendService::new(&storage, &settings)
            .record(period_id, date(10), "Food", Money::from_cents(15_000), &usd, &NullSink)
            .unwrap();
        RedistributionService::new(&storage, &settings)
            .close_day(period_id, date(10), &NullSink)
            .unwrap();

        let view = CalendarService::new(&storage).calendar(period_id).unwrap();

        let day10 = view.days.iter().find(|d| d.date == date(10)).unwrap();
        assert_eq!(day10.spent.cents(), 15_000);

        let food = view
            .categories
            .iter()
            .find(|c| c.category == "Food")
            .unwrap();
        assert_eq!(food.spent.cents(), 15_000);
        // Absorption net to zero within the category: the triggering
        // day's credit offsets the future-day reductions
        assert!(food.adjusted.is_zero());

        let unallocated = view
            .categories
            .iter()
            .find(|c| c.category == UNALLOCATED)
            .unwrap();
        assert!(unallocated.adjusted.is_zero());
    }

    #[test]
    fn test_history_returns_events_in_order() {
        let (_t, storage) = create_test_storage();
        let settings = Settings::default();
        let period_id = setup(&storage);
        let usd = Currency::new("USD");

        let spend = SpendService::new(&storage, &settings);
        let engine = RedistributionService::new(&storage, &settings);

        spend
            .record(period_id, date(5), "Food", Money::from_cents(9_000), &usd, &NullSink)
            .unwrap();
        engine.close_day(period_id, date(5), &NullSink).unwrap();
        spend
            .record(period_id, date(12), "Food", Money::from_cents(9_000), &usd, &NullSink)
            .unwrap();
        engine.close_day(period_id, date(12), &NullSink).unwrap();

        let history = CalendarService::new(&storage).history(period_id).unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].timestamp <= history[1].timestamp);
    }

    #[test]
    fn test_unknown_period_is_not_found() {
        let (_t, storage) = create_test_storage();
        let service = CalendarService::new(&storage);

        let result = service.history(PeriodId::new());
        assert!(matches!(result, Err(BudgetError::NotFound { .. })));
    }
}
