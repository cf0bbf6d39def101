//! daybudget - Calendar-based daily budget allocation and redistribution
//!
//! This library splits periodic income into per-category daily budget
//! cells, tracks spend against each cell, classifies every cell as
//! on-track, warning, or exceeded, and automatically redistributes
//! overspend across the remaining days of the period. Redistribution
//! conserves money: every run's cell deltas sum to zero and are recorded
//! in an append-only event ledger.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Settings and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, periods, allocations, cells, events)
//! - `storage`: JSON file storage layer with per-period writer locks
//! - `services`: Business logic (allocation, spend, redistribution, queries)
//! - `display`: Terminal formatting for the calendar and event history
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use daybudget::config::{paths::DaybudgetPaths, settings::Settings};
//! use daybudget::storage::Storage;
//!
//! let paths = DaybudgetPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
