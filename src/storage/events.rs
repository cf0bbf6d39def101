//! Redistribution event repository
//!
//! An append-only ledger: events are never mutated or deleted once
//! recorded.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{PeriodId, RedistributionEvent};

use super::file_io::{read_json, write_json_atomic};

/// Serializable event file contents
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct EventData {
    #[serde(default)]
    events: Vec<RedistributionEvent>,
}

/// Repository for the redistribution event ledger
pub struct EventRepository {
    path: PathBuf,
    events: RwLock<Vec<RedistributionEvent>>,
}

impl EventRepository {
    /// Create a new event repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            events: RwLock::new(Vec::new()),
        }
    }

    /// Load events from disk
    pub fn load(&self) -> BudgetResult<()> {
        let file_data: EventData = read_json(&self.path)?;

        let mut events = self
            .events
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *events = file_data.events;
        Ok(())
    }

    /// Save events to disk
    pub fn save(&self) -> BudgetResult<()> {
        let events = self
            .events
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        write_json_atomic(
            &self.path,
            &EventData {
                events: events.clone(),
            },
        )
    }

    /// Append an event to the ledger
    pub fn append(&self, event: RedistributionEvent) -> BudgetResult<()> {
        let mut events = self
            .events
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        events.push(event);
        Ok(())
    }

    /// All events for a period, in append order
    pub fn for_period(&self, period_id: PeriodId) -> BudgetResult<Vec<RedistributionEvent>> {
        let events = self
            .events
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(events
            .iter()
            .filter(|e| e.period_id == period_id)
            .cloned()
            .collect())
    }

    /// Count recorded events
    pub fn count(&self) -> BudgetResult<usize> {
        let events = self
            .events
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(events.len())
    }
}
