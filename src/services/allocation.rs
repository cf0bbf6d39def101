//! Allocation service
//!
//! Creates periods: builds the category allocation set from income and
//! weights, populates the daily plan, and handles period-start carryover
//! of prior-period leftovers.

use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    AllocationSet, CategoryConfig, CellDelta, Currency, Money, Period, PeriodId, PeriodPlan,
    RedistributionEvent, TriggerReason, UserId, UNALLOCATED,
};
use crate::storage::Storage;

/// Service for period creation and allocation
pub struct AllocationService<'a> {
    storage: &'a Storage,
}

impl<'a> AllocationService<'a> {
    /// Create a new allocation service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a monthly period and populate its daily plan.
    ///
    /// Each category's absolute amount is its weight applied to the
    /// income, split evenly across every day of the month.
    pub fn create_period(
        &self,
        user_id: UserId,
        year: i32,
        month: u32,
        income: Money,
        configs: &[CategoryConfig],
        currency: Currency,
    ) -> BudgetResult<PeriodPlan> {
        let period = Period::monthly(user_id, year, month, income, currency)
            .map_err(|e| BudgetError::InvalidPeriod(e.to_string()))?;

        let allocations = AllocationSet::from_weights(income, configs)
            .map_err(|e| BudgetError::InvalidAllocation(e.to_string()))?;

        let plan = PeriodPlan::initialize(period, allocations)
            .map_err(|e| BudgetError::InvalidPeriod(e.to_string()))?;

        self.storage.plans.upsert(plan.clone())?;
        self.storage.plans.save()?;

        Ok(plan)
    }

    /// Create a period carrying the prior period's leftovers forward.
    ///
    /// Per category, leftover = planned total - spent total of the prior
    /// period; it is added to the new period's monthly amount before the
    /// daily split. A deficit larger than the new amount clamps the
    /// amount at zero and reports the shortfall as unresolved. Leftover
    /// from categories absent in the new configuration flows into the
    /// unallocated remainder.
    pub fn create_period_with_carryover(
        &self,
        prev_period_id: PeriodId,
        user_id: UserId,
        year: i32,
        month: u32,
        income: Money,
        configs: &[CategoryConfig],
        currency: Currency,
    ) -> BudgetResult<PeriodPlan> {
        let prev = self.storage.plans.load_period(prev_period_id)?;

        let period = Period::monthly(user_id, year, month, income, currency)
            .map_err(|e| BudgetError::InvalidPeriod(e.to_string()))?;

        let mut allocations = AllocationSet::from_weights(income, configs)
            .map_err(|e| BudgetError::InvalidAllocation(e.to_string()))?;

        let mut deltas = Vec::new();
        let mut total_deficit = Money::zero();
        let mut unresolved = Money::zero();
        let mut orphaned = Money::zero();

        // Leftover from prior categories that no longer exist flows into
        // the unallocated remainder rather than disappearing.
        for prior in &prev.allocations.allocations {
            if allocations.get(&prior.category).is_none() {
                let leftover =
                    prev.planned_total(&prior.category) - prev.spent_total(&prior.category);
                orphaned += leftover;
            }
        }

        let start = period.start;
        for allocation in &mut allocations.allocations {
            let mut leftover =
                prev.planned_total(&allocation.category) - prev.spent_total(&allocation.category);
            if allocation.category == UNALLOCATED {
                leftover += orphaned;
            }
            if leftover.is_zero() {
                continue;
            }

            if leftover.is_negative() {
                total_deficit += leftover.abs();
            }

            let adjusted = allocation.amount + leftover;
            let applied = if adjusted.is_negative() {
                unresolved += adjusted.abs();
                -allocation.amount
            } else {
                leftover
            };

            allocation.amount += applied;
            deltas.push(CellDelta::new(start, &allocation.category, applied));
        }

        let plan = PeriodPlan::initialize(period, allocations)
            .map_err(|e| BudgetError::InvalidPeriod(e.to_string()))?;

        let event = RedistributionEvent::new(
            plan.period.id,
            TriggerReason::PeriodStart,
            None,
            total_deficit,
            deltas,
            unresolved,
        );

        self.storage.plans.upsert(plan.clone())?;
        self.storage.events.append(event)?;
        self.storage.save_all()?;

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::DaybudgetPaths;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = DaybudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn configs() -> Vec<CategoryConfig> {
        vec![
            CategoryConfig::new("Food", 0.3, 2),
            CategoryConfig::new("Transport", 0.2, 1),
        ]
    }

    #[test]
    fn test_create_period() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AllocationService::new(&storage);

        let plan = service
            .create_period(
                UserId::new(),
                2025,
                6,
                Money::from_cents(100_000),
                &configs(),
                Currency::new("USD"),
            )
            .unwrap();

        assert_eq!(plan.period.total_days(), 30);
        assert_eq!(plan.planned_total("Food").cents(), 30_000);
        assert_eq!(plan.grand_planned_total().cents(), 100_000);
        assert_eq!(storage.plans.count().unwrap(), 1);
    }

    #[test]
    fn test_create_period_bad_weights() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AllocationService::new(&storage);

        let bad = vec![CategoryConfig::new("Food", 1.2, 1)];
        let result = service.create_period(
            UserId::new(),
            2025,
            6,
            Money::from_cents(100_000),
            &bad,
            Currency::new("USD"),
        );

        assert!(matches!(result, Err(BudgetError::InvalidAllocation(_))));
    }

    #[test]
    fn test_create_period_bad_month() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AllocationService::new(&storage);

        let result = service.create_period(
            UserId::new(),
            2025,
            13,
            Money::from_cents(100_000),
            &configs(),
            Currency::new("USD"),
        );

        assert!(matches!(result, Err(BudgetError::InvalidPeriod(_))));
    }

    #[test]
    fn test_carryover_surplus_added() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AllocationService::new(&storage);
        let user = UserId::new();

        // June: Food gets $300, nothing spent -> $300 surplus carries over
        let june = service
            .create_period(
                user,
                2025,
                6,
                Money::from_cents(100_000),
                &configs(),
                Currency::new("USD"),
            )
            .unwrap();

        let july = service
            .create_period_with_carryover(
                june.period.id,
                user,
                2025,
                7,
                Money::from_cents(100_000),
                &configs(),
                Currency::new("USD"),
            )
            .unwrap();

        // July Food = 30_000 (new) + 30_000 (carryover)
        assert_eq!(july.planned_total("Food").cents(), 60_000);

        let events = storage.events.for_period(july.period.id).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].trigger, TriggerReason::PeriodStart);
        assert!(events[0].is_fully_resolved());
    }

    #[test]
    fn test_carryover_deficit_clamped() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AllocationService::new(&storage);
        let user = UserId::new();

        let june = service
            .create_period(
                user,
                2025,
                6,
                Money::from_cents(100_000),
                &configs(),
                Currency::new("USD"),
            )
            .unwrap();

        // Overspend Food massively: $700 spent vs $300 planned
        {
            let mut plan = storage.plans.load_period(june.period.id).unwrap();
            let d = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
            plan.cell_mut(d, "Food").unwrap().spent = Money::from_cents(70_000);
            storage.plans.upsert(plan).unwrap();
        }

        let july = service
            .create_period_with_carryover(
                june.period.id,
                user,
                2025,
                7,
                Money::from_cents(100_000),
                &configs(),
                Currency::new("USD"),
            )
            .unwrap();

        // -$400 carryover against a $300 allocation clamps at zero with
        // $100 unresolved
        assert!(july.planned_total("Food").is_zero());

        let events = storage.events.for_period(july.period.id).unwrap();
        assert_eq!(events[0].unresolved_deficit.cents(), 10_000);
    }

    #[test]
    fn test_carryover_orphaned_category_flows_to_unallocated() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AllocationService::new(&storage);
        let user = UserId::new();

        let june = service
            .create_period(
                user,
                2025,
                6,
                Money::from_cents(100_000),
                &configs(),
                Currency::new("USD"),
            )
            .unwrap();

        // July drops Transport; its $200 leftover lands in Unallocated
        let july = service
            .create_period_with_carryover(
                june.period.id,
                user,
                2025,
                7,
                Money::from_cents(100_000),
                &[CategoryConfig::new("Food", 0.3, 2)],
                Currency::new("USD"),
            )
            .unwrap();

        // Unallocated: 70_000 (new) + 50_000 (own leftover) + 20_000 (orphaned)
        assert_eq!(july.planned_total(UNALLOCATED).cents(), 140_000);
    }
}
