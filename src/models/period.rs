//! Budgeting period representation
//!
//! A period is one budgeting cycle (typically a calendar month) for one
//! user, carrying the total income and currency everything else in the
//! engine is denominated in.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{PeriodId, UserId};
use super::money::Money;

/// ISO-4217 style currency code (e.g. "USD")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Create a currency from a code, normalized to uppercase
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    /// Get the currency code
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One budgeting cycle for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// Unique identifier
    pub id: PeriodId,

    /// The user this period belongs to
    pub user_id: UserId,

    /// First day of the period (inclusive)
    pub start: NaiveDate,

    /// Last day of the period (inclusive)
    pub end: NaiveDate,

    /// Total income for the period
    pub income: Money,

    /// Currency all amounts in the period are denominated in
    pub currency: Currency,
}

impl Period {
    /// Create a monthly period covering the given calendar month
    pub fn monthly(
        user_id: UserId,
        year: i32,
        month: u32,
        income: Money,
        currency: Currency,
    ) -> Result<Self, PeriodValidationError> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(PeriodValidationError::InvalidMonth { year, month })?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or(PeriodValidationError::InvalidMonth { year, month })?
            - Duration::days(1);

        let period = Self {
            id: PeriodId::new(),
            user_id,
            start,
            end,
            income,
            currency,
        };
        period.validate()?;
        Ok(period)
    }

    /// Create a period over an explicit date range (inclusive)
    pub fn custom(
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
        income: Money,
        currency: Currency,
    ) -> Result<Self, PeriodValidationError> {
        let period = Self {
            id: PeriodId::new(),
            user_id,
            start,
            end,
            income,
            currency,
        };
        period.validate()?;
        Ok(period)
    }

    /// Number of days in the period
    pub fn total_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1).max(0) as usize
    }

    /// Check if a date falls within this period
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Iterate over every date in the period, in order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take(self.total_days())
    }

    /// Dates strictly after `after`, still within the period.
    ///
    /// These are the only cells redistribution is allowed to touch.
    pub fn future_dates(&self, after: NaiveDate) -> Vec<NaiveDate> {
        self.dates().filter(|d| *d > after).collect()
    }

    /// Validate the period
    pub fn validate(&self) -> Result<(), PeriodValidationError> {
        if self.end < self.start {
            return Err(PeriodValidationError::EmptyRange {
                start: self.start,
                end: self.end,
            });
        }
        if self.income.is_negative() {
            return Err(PeriodValidationError::NegativeIncome);
        }
        Ok(())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{} ({} {})",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d"),
            self.income,
            self.currency
        )
    }
}

/// Validation errors for periods
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodValidationError {
    EmptyRange { start: NaiveDate, end: NaiveDate },
    InvalidMonth { year: i32, month: u32 },
    NegativeIncome,
}

impl fmt::Display for PeriodValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRange { start, end } => {
                write!(f, "Period has no days: {} .. {}", start, end)
            }
            Self::InvalidMonth { year, month } => {
                write!(f, "Invalid calendar month: {:04}-{:02}", year, month)
            }
            Self::NegativeIncome => write!(f, "Period income cannot be negative"),
        }
    }
}

impl std::error::Error for PeriodValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd() -> Currency {
        Currency::new("usd")
    }

    #[test]
    fn test_currency_normalized() {
        assert_eq!(usd().code(), "USD");
    }

    #[test]
    fn test_monthly_period() {
        let period =
            Period::monthly(UserId::new(), 2025, 1, Money::from_cents(300_000), usd()).unwrap();
        assert_eq!(period.start, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(period.end, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        assert_eq!(period.total_days(), 31);
    }

    #[test]
    fn test_december_rollover() {
        let period =
            Period::monthly(UserId::new(), 2024, 12, Money::from_cents(100), usd()).unwrap();
        assert_eq!(period.end, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_invalid_month() {
        let result = Period::monthly(UserId::new(), 2025, 13, Money::zero(), usd());
        assert!(matches!(
            result,
            Err(PeriodValidationError::InvalidMonth { .. })
        ));
    }

    #[test]
    fn test_empty_range_rejected() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        let result = Period::custom(UserId::new(), start, end, Money::zero(), usd());
        assert!(matches!(
            result,
            Err(PeriodValidationError::EmptyRange { .. })
        ));
    }

    #[test]
    fn test_contains() {
        let period =
            Period::monthly(UserId::new(), 2025, 1, Money::from_cents(100), usd()).unwrap();
        assert!(period.contains(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()));
    }

    #[test]
    fn test_dates_iteration() {
        let period =
            Period::monthly(UserId::new(), 2025, 2, Money::from_cents(100), usd()).unwrap();
        let dates: Vec<_> = period.dates().collect();
        assert_eq!(dates.len(), 28);
        assert_eq!(dates[0], period.start);
        assert_eq!(dates[27], period.end);
    }

    #[test]
    fn test_future_dates() {
        let period =
            Period::monthly(UserId::new(), 2025, 1, Money::from_cents(100), usd()).unwrap();
        let after = NaiveDate::from_ymd_opt(2025, 1, 29).unwrap();
        let future = period.future_dates(after);
        assert_eq!(future.len(), 2);
        assert_eq!(future[0], NaiveDate::from_ymd_opt(2025, 1, 30).unwrap());
    }

    #[test]
    fn test_serialization() {
        let period =
            Period::monthly(UserId::new(), 2025, 1, Money::from_cents(100), usd()).unwrap();
        let json = serde_json::to_string(&period).unwrap();
        let deserialized: Period = serde_json::from_str(&json).unwrap();
        assert_eq!(period, deserialized);
    }
}
