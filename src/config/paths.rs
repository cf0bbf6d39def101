//! Path management for daybudget
//!
//! Provides platform-appropriate path resolution for configuration and
//! data files.
//!
//! ## Path Resolution Order
//!
//! 1. `DAYBUDGET_DATA_DIR` environment variable (if set)
//! 2. Platform config dir via `directories` (e.g. `~/.config/daybudget`)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::BudgetError;

/// Manages all paths used by daybudget
#[derive(Debug, Clone)]
pub struct DaybudgetPaths {
    /// Base directory for all daybudget data
    base_dir: PathBuf,
}

impl DaybudgetPaths {
    /// Create a new DaybudgetPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, BudgetError> {
        let base_dir = if let Ok(custom) = std::env::var("DAYBUDGET_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            ProjectDirs::from("", "", "daybudget")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    BudgetError::Config("Could not determine home directory".into())
                })?
        };

        Ok(Self { base_dir })
    }

    /// Create DaybudgetPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to plans.json (period plans: allocations + cells)
    pub fn plans_file(&self) -> PathBuf {
        self.data_dir().join("plans.json")
    }

    /// Get the path to events.json (redistribution ledger)
    pub fn events_file(&self) -> PathBuf {
        self.data_dir().join("events.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), BudgetError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BudgetError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| BudgetError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if daybudget has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DaybudgetPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.plans_file(), temp_dir.path().join("data").join("plans.json"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().to_str().unwrap();

        env::set_var("DAYBUDGET_DATA_DIR", custom_path);

        let paths = DaybudgetPaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());

        env::remove_var("DAYBUDGET_DATA_DIR");
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DaybudgetPaths::with_base_dir(temp_dir.path().to_path_buf());

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(!paths.is_initialized());
    }
}
