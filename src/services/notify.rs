//! Status change notification boundary
//!
//! The engine emits a change event whenever a cell's classification or
//! planned amount moves. Delivery policy (push, in-app, nothing) belongs
//! to the consumer behind the `StatusSink` trait.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::models::{CellStatus, Money};

/// One cell-level change worth telling the user about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub date: NaiveDate,
    pub category: String,
    pub status: CellStatus,
    /// Signed amount behind the change: spend recorded or planned delta applied
    pub delta: Money,
}

impl StatusChange {
    pub fn new(
        date: NaiveDate,
        category: impl Into<String>,
        status: CellStatus,
        delta: Money,
    ) -> Self {
        Self {
            date,
            category: category.into(),
            status,
            delta,
        }
    }
}

/// Consumer of status change events
pub trait StatusSink {
    fn notify(&self, change: StatusChange);
}

/// Sink that discards everything
#[derive(Debug, Default)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn notify(&self, _change: StatusChange) {}
}

/// Sink that collects changes in memory, for tests and CLI output
#[derive(Debug, Default)]
pub struct CollectingSink {
    changes: Mutex<Vec<StatusChange>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all collected changes, leaving the sink empty
    pub fn drain(&self) -> Vec<StatusChange> {
        match self.changes.lock() {
            Ok(mut changes) => std::mem::take(&mut *changes),
            Err(_) => Vec::new(),
        }
    }
}

impl StatusSink for CollectingSink {
    fn notify(&self, change: StatusChange) {
        if let Ok(mut changes) = self.changes.lock() {
            changes.push(change);
        }
    }
}
