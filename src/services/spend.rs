//! Spend aggregation
//!
//! Records expenses against daily cells and reclassifies them on every
//! update. Spend against a category with no plan lands in an unbudgeted
//! cell (planned zero) so the overage is still tracked and redistributed.

use chrono::NaiveDate;

use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{CellStatus, Currency, Money, PeriodId};
use crate::services::notify::{StatusChange, StatusSink};
use crate::storage::Storage;

/// Service that records spend against the daily plan
pub struct SpendService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> SpendService<'a> {
    /// Create a new spend service
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Record one expense against a (date, category) cell.
    ///
    /// The cell's status is reclassified immediately and the change
    /// emitted to the sink. Returns the cell's status after the update.
    ///
    /// Callers are responsible for submitting each expense exactly once;
    /// the engine applies whatever it is given and does not deduplicate.
    pub fn record(
        &self,
        period_id: PeriodId,
        date: NaiveDate,
        category: &str,
        amount: Money,
        currency: &Currency,
        sink: &dyn StatusSink,
    ) -> BudgetResult<CellStatus> {
        if !amount.is_positive() {
            return Err(BudgetError::InvalidSpend(format!(
                "amount must be positive, got {}",
                amount
            )));
        }
        if category.trim().is_empty() {
            return Err(BudgetError::InvalidSpend(
                "category cannot be empty".to_string(),
            ));
        }

        let lock = self.storage.period_lock(period_id)?;
        let _guard = lock
            .lock()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire period lock: {}", e)))?;

        let mut plan = self.storage.plans.load_period(period_id)?;

        if *currency != plan.period.currency {
            return Err(BudgetError::CurrencyMismatch {
                expected: plan.period.currency.clone(),
                actual: currency.clone(),
            });
        }
        if !plan.period.contains(date) {
            return Err(BudgetError::InvalidSpend(format!(
                "{} is outside period {}",
                date, plan.period
            )));
        }

        let cell = plan.ensure_cell(date, category);
        let before = cell.status;
        cell.spent += amount;
        cell.reclassify(self.settings.warning_ratio);
        let after = cell.status;

        self.storage.plans.upsert(plan)?;
        self.storage.plans.save()?;

        if after != before {
            sink.notify(StatusChange::new(date, category, after, amount));
        }

        Ok(after)
    }

    /// Whether any category is over its cumulative plan as of `date`.
    ///
    /// Cheap read-only check callers can use to prompt for (or schedule)
    /// a redistribution run without waiting for day close.
    pub fn over_plan(&self, period_id: PeriodId, date: NaiveDate) -> BudgetResult<Vec<String>> {
        let plan = self.storage.plans.load_period(period_id)?;
        let engine =
            crate::services::redistribution::RedistributionService::new(self.storage, self.settings);
        Ok(engine.triggered_categories(&plan, date))
    }
}
