//! Behavioral weight recalibration
//!
//! Compares each category's actual spend share against its configured
//! weight over past periods and proposes adjusted weights for the next
//! period. Adjustments are bounded per period so one unusual month
//! cannot swing the plan; past periods are never rewritten.

use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{CategoryConfig, PeriodPlan, UserId, UNALLOCATED};
use crate::storage::Storage;

/// Service that derives next-period weights from spending history
pub struct BehaviorService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> BehaviorService<'a> {
    /// Create a new behavior service
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Propose weights for the user's next period.
    ///
    /// The latest period's configuration is the baseline. Each weight
    /// moves toward the category's mean spend share across all of the
    /// user's periods, by at most `behavior_step`, floored at zero. If
    /// the adjusted weights sum past 1 they are rescaled proportionally.
    /// With fewer than `behavior_min_history` periods the baseline is
    /// returned unchanged.
    pub fn recalibrate(&self, user_id: UserId) -> BudgetResult<Vec<CategoryConfig>> {
        let history = self.storage.plans.for_user(user_id)?;

        let latest = history.last().ok_or_else(|| {
            BudgetError::period_not_found(format!("no periods for user {}", user_id))
        })?;

        let mut configs: Vec<CategoryConfig> = latest
            .allocations
            .allocations
            .iter()
            .filter(|a| a.category != UNALLOCATED)
            .map(|a| CategoryConfig::new(&a.category, a.weight, a.priority))
            .collect();

        if history.len() < self.settings.behavior_min_history {
            return Ok(configs);
        }

        for config in &mut configs {
            let target = mean_spend_share(&history, &config.name);
            config.weight = step_toward(config.weight, target, self.settings.behavior_step);
        }

        let sum: f64 = configs.iter().map(|c| c.weight).sum();
        if sum > 1.0 {
            for config in &mut configs {
                config.weight /= sum;
            }
        }

        Ok(configs)
    }
}

/// Mean of spent/income across periods; periods with zero income
/// contribute a zero share
fn mean_spend_share(history: &[PeriodPlan], category: &str) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    let total: f64 = history
        .iter()
        .map(|plan| {
            let income = plan.period.income.cents();
            if income <= 0 {
                0.0
            } else {
                plan.spent_total(category).cents() as f64 / income as f64
            }
        })
        .sum();
    total / history.len() as f64
}

/// Move `current` toward `target` by at most `step`, never below zero
fn step_toward(current: f64, target: f64, step: f64) -> f64 {
    let delta = (target - current).clamp(-step, step);
    (current + delta).max(0.0)
}
