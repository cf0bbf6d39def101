//! Custom error types for daybudget
//!
//! This module defines the error hierarchy for the engine using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::models::Currency;

/// The main error type for daybudget operations
#[derive(Error, Debug)]
pub enum BudgetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Bad category weight or priority configuration
    #[error("Invalid allocation: {0}")]
    InvalidAllocation(String),

    /// Degenerate or malformed budgeting period
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// Malformed spend record (non-positive amount, bad date)
    #[error("Invalid spend: {0}")]
    InvalidSpend(String),

    /// Transaction currency does not match the period currency
    #[error("Currency mismatch: period uses {expected}, transaction uses {actual}")]
    CurrencyMismatch { expected: Currency, actual: Currency },

    /// Internal conservation invariant violated during redistribution.
    ///
    /// This indicates a defect, not bad user input. The run is aborted
    /// with no partial writes.
    #[error("Redistribution consistency violation: {0}")]
    RedistributionConsistency(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BudgetError {
    /// Create a "not found" error for periods
    pub fn period_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Period",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error indicates an engine defect rather than bad input
    pub fn is_consistency(&self) -> bool {
        matches!(self, Self::RedistributionConsistency(_))
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for daybudget operations
pub type BudgetResult<T> = Result<T, BudgetError>;
