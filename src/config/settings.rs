//! Engine settings
//!
//! Tunables for the classifier, the redistribution trigger, and the
//! behavioral allocator, persisted as JSON alongside the data files.

use serde::{Deserialize, Serialize};

use super::paths::DaybudgetPaths;
use crate::error::BudgetError;
use crate::storage::file_io::{read_json, write_json_atomic};

/// User settings for the budget engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Fraction of cumulative planned budget a category may exceed
    /// before day-close fires a redistribution (0.0 = any overage)
    #[serde(default)]
    pub overspend_slack: f64,

    /// Spent/planned ratio at which a cell is classified as warning
    #[serde(default = "default_warning_ratio")]
    pub warning_ratio: f64,

    /// Whether idle surplus in other categories is drawn on proactively
    /// during redistribution (opt-in; the conservative default leaves
    /// surplus untouched until within-category absorption falls short)
    #[serde(default)]
    pub proactive_smoothing: bool,

    /// Maximum weight change the behavioral allocator may apply to one
    /// category between periods (fraction of income, e.g. 0.05 = 5pp)
    #[serde(default = "default_behavior_step")]
    pub behavior_step: f64,

    /// Minimum number of historical periods before the behavioral
    /// allocator adjusts weights at all
    #[serde(default = "default_behavior_min_history")]
    pub behavior_min_history: usize,

    /// Default currency code for new periods
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_warning_ratio() -> f64 {
    crate::models::DEFAULT_WARNING_RATIO
}

fn default_behavior_step() -> f64 {
    0.05
}

fn default_behavior_min_history() -> usize {
    2
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            overspend_slack: 0.0,
            warning_ratio: default_warning_ratio(),
            proactive_smoothing: false,
            behavior_step: default_behavior_step(),
            behavior_min_history: default_behavior_min_history(),
            currency: default_currency(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, creating the file with defaults if it
    /// does not exist yet
    pub fn load_or_create(paths: &DaybudgetPaths) -> Result<Self, BudgetError> {
        let path = paths.settings_file();
        if path.exists() {
            read_json(&path)
        } else {
            let settings = Self::default();
            settings.save(paths)?;
            Ok(settings)
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &DaybudgetPaths) -> Result<(), BudgetError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), BudgetError> {
        if self.overspend_slack < 0.0 {
            return Err(BudgetError::Config(
                "overspend_slack must be non-negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.warning_ratio) {
            return Err(BudgetError::Config(
                "warning_ratio must be between 0 and 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.behavior_step) {
            return Err(BudgetError::Config(
                "behavior_step must be between 0 and 1".into(),
            ));
        }
        Ok(())
    }
}
