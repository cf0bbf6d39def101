//! Period plan repository for JSON storage
//!
//! Manages loading and saving period plans. The whole plan (period,
//! allocations, cells) is the write unit, so a redistribution run either
//! lands completely or not at all.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{PeriodId, PeriodPlan, UserId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable plan file contents
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct PlanData {
    #[serde(default)]
    plans: Vec<PeriodPlan>,
}

/// Repository for period plan persistence
pub struct PlanRepository {
    path: PathBuf,
    plans: RwLock<HashMap<PeriodId, PeriodPlan>>,
}

impl PlanRepository {
    /// Create a new plan repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            plans: RwLock::new(HashMap::new()),
        }
    }

    /// Load plans from disk
    pub fn load(&self) -> BudgetResult<()> {
        let file_data: PlanData = read_json(&self.path)?;

        let mut plans = self
            .plans
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        plans.clear();
        for plan in file_data.plans {
            plans.insert(plan.period.id, plan);
        }

        Ok(())
    }

    /// Save plans to disk
    pub fn save(&self) -> BudgetResult<()> {
        let plans = self
            .plans
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut plan_list: Vec<_> = plans.values().cloned().collect();
        plan_list.sort_by_key(|p| p.period.start);

        write_json_atomic(&self.path, &PlanData { plans: plan_list })
    }

    /// Load one period's plan
    pub fn load_period(&self, period_id: PeriodId) -> BudgetResult<PeriodPlan> {
        let plans = self
            .plans
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        plans
            .get(&period_id)
            .cloned()
            .ok_or_else(|| BudgetError::period_not_found(period_id.to_string()))
    }

    /// Get a plan if it exists
    pub fn get(&self, period_id: PeriodId) -> BudgetResult<Option<PeriodPlan>> {
        let plans = self
            .plans
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(plans.get(&period_id).cloned())
    }

    /// Insert or replace a plan
    pub fn upsert(&self, plan: PeriodPlan) -> BudgetResult<()> {
        let mut plans = self
            .plans
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        plans.insert(plan.period.id, plan);
        Ok(())
    }

    /// All plans for one user, ordered by period start
    pub fn for_user(&self, user_id: UserId) -> BudgetResult<Vec<PeriodPlan>> {
        let plans = self
            .plans
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = plans
            .values()
            .filter(|p| p.period.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by_key(|p| p.period.start);
        Ok(list)
    }

    /// The most recently started plan for a user, if any
    pub fn latest_for_user(&self, user_id: UserId) -> BudgetResult<Option<PeriodPlan>> {
        Ok(self.for_user(user_id)?.into_iter().last())
    }

    /// The most recently started plan across all users, if any
    pub fn latest(&self) -> BudgetResult<Option<PeriodPlan>> {
        let plans = self
            .plans
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(plans
            .values()
            .max_by_key(|p| p.period.start)
            .cloned())
    }

    /// Find the plan whose period covers the given calendar month
    pub fn find_by_month(&self, year: i32, month: u32) -> BudgetResult<Option<PeriodPlan>> {
        use chrono::Datelike;

        let plans = self
            .plans
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(plans
            .values()
            .find(|p| p.period.start.year() == year && p.period.start.month() == month)
            .cloned())
    }

    /// Count stored plans
    pub fn count(&self) -> BudgetResult<usize> {
        let plans = self
            .plans
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(plans.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AllocationSet, CategoryConfig, Currency, Money, Period};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, PlanRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plans.json");
        let repo = PlanRepository::new(path);
        (temp_dir, repo)
    }

    fn test_plan(user_id: UserId, month: u32) -> PeriodPlan {
        let period = Period::monthly(
            user_id,
            2025,
            month,
            Money::from_cents(100_000),
            Currency::new("USD"),
        )
        .unwrap();
        let allocations = AllocationSet::from_weights(
            period.income,
            &[CategoryConfig::new("Food", 0.3, 1)],
        )
        .unwrap();
        PeriodPlan::initialize(period, allocations).unwrap()
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_and_load_period() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let plan = test_plan(UserId::new(), 6);
        let period_id = plan.period.id;

        repo.upsert(plan).unwrap();

        let retrieved = repo.load_period(period_id).unwrap();
        assert_eq!(retrieved.period.id, period_id);
    }

    #[test]
    fn test_load_period_not_found() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let result = repo.load_period(PeriodId::new());
        assert!(matches!(result, Err(BudgetError::NotFound { .. })));
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let plan = test_plan(UserId::new(), 6);
        let period_id = plan.period.id;

        repo.upsert(plan).unwrap();
        repo.save().unwrap();

        let repo2 = PlanRepository::new(temp_dir.path().join("plans.json"));
        repo2.load().unwrap();

        let retrieved = repo2.load_period(period_id).unwrap();
        assert_eq!(retrieved.period.id, period_id);
        assert!(!retrieved.cells().is_empty());
    }

    #[test]
    fn test_for_user_ordered() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let user = UserId::new();
        let other = UserId::new();

        repo.upsert(test_plan(user, 7)).unwrap();
        repo.upsert(test_plan(user, 6)).unwrap();
        repo.upsert(test_plan(other, 6)).unwrap();

        let plans = repo.for_user(user).unwrap();
        assert_eq!(plans.len(), 2);
        assert!(plans[0].period.start < plans[1].period.start);

        let latest = repo.latest_for_user(user).unwrap().unwrap();
        assert_eq!(latest.period.start.format("%m").to_string(), "07");
    }

    #[test]
    fn test_latest_and_find_by_month() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let june = test_plan(UserId::new(), 6);
        let july = test_plan(UserId::new(), 7);
        let july_id = july.period.id;

        repo.upsert(june).unwrap();
        repo.upsert(july).unwrap();

        assert_eq!(repo.latest().unwrap().unwrap().period.id, july_id);
        assert!(repo.find_by_month(2025, 6).unwrap().is_some());
        assert!(repo.find_by_month(2025, 8).unwrap().is_none());
    }
}
