//! Configuration module for daybudget
//!
//! This module provides configuration management including:
//! - Platform path resolution
//! - Engine settings persistence

pub mod paths;
pub mod settings;

pub use paths::DaybudgetPaths;
pub use settings::Settings;
