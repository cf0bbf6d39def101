//! Storage layer for daybudget
//!
//! Provides JSON file storage with atomic writes, plus the per-period
//! writer locks that serialize all mutations to one period's plan.

pub mod events;
pub mod file_io;
pub mod plans;

pub use events::EventRepository;
pub use file_io::{read_json, write_json_atomic};
pub use plans::PlanRepository;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config::paths::DaybudgetPaths;
use crate::error::{BudgetError, BudgetResult};
use crate::models::PeriodId;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: DaybudgetPaths,
    pub plans: PlanRepository,
    pub events: EventRepository,
    period_locks: Mutex<HashMap<PeriodId, Arc<Mutex<()>>>>,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: DaybudgetPaths) -> BudgetResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            plans: PlanRepository::new(paths.plans_file()),
            events: EventRepository::new(paths.events_file()),
            period_locks: Mutex::new(HashMap::new()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &DaybudgetPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> BudgetResult<()> {
        self.plans.load()?;
        self.events.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> BudgetResult<()> {
        self.plans.save()?;
        self.events.save()?;
        Ok(())
    }

    /// The writer lock for one period.
    ///
    /// All mutations to a period's plan (spend batches, redistribution
    /// runs) must hold this for their duration; reads may proceed
    /// against the repositories concurrently and tolerate staleness.
    /// Periods are fully independent of each other.
    pub fn period_lock(&self, period_id: PeriodId) -> BudgetResult<Arc<Mutex<()>>> {
        let mut locks = self
            .period_locks
            .lock()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire lock table: {}", e)))?;

        Ok(locks
            .entry(period_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }
}
