//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Each handler
//! resolves human-friendly arguments (month strings, dollar amounts)
//! into the types the services work with.

pub mod period;
pub mod spend;
pub mod view;

pub use period::{handle_init, handle_recalibrate, InitArgs, RecalibrateArgs};
pub use spend::{handle_close_day, handle_redistribute, handle_spend, DayArgs, SpendArgs};
pub use view::{handle_calendar, handle_history, CalendarArgs, HistoryArgs};

use chrono::NaiveDate;

use crate::error::{BudgetError, BudgetResult};
use crate::models::PeriodPlan;
use crate::storage::Storage;

/// Resolve a `--month YYYY-MM` argument to a stored plan, defaulting to
/// the most recently started period
pub(crate) fn resolve_plan(storage: &Storage, month: Option<&str>) -> BudgetResult<PeriodPlan> {
    match month {
        Some(spec) => {
            let (year, month) = parse_month(spec)?;
            storage
                .plans
                .find_by_month(year, month)?
                .ok_or_else(|| BudgetError::period_not_found(spec.to_string()))
        }
        None => storage
            .plans
            .latest()?
            .ok_or_else(|| BudgetError::period_not_found("no periods exist yet".to_string())),
    }
}

/// Parse "YYYY-MM" into a (year, month) pair
pub(crate) fn parse_month(spec: &str) -> BudgetResult<(i32, u32)> {
    let mut parts = spec.splitn(2, '-');
    let year = parts
        .next()
        .and_then(|s| s.parse::<i32>().ok())
        .ok_or_else(|| BudgetError::InvalidPeriod(format!("expected YYYY-MM, got '{}'", spec)))?;
    let month = parts
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| BudgetError::InvalidPeriod(format!("expected YYYY-MM, got '{}'", spec)))?;
    Ok((year, month))
}

/// Parse a `--date YYYY-MM-DD` argument, defaulting to today
pub(crate) fn parse_date(spec: Option<&str>) -> BudgetResult<NaiveDate> {
    match spec {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| BudgetError::InvalidSpend(format!("expected YYYY-MM-DD, got '{}'", s))),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2025-06").unwrap(), (2025, 6));
        assert!(parse_month("2025").is_err());
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("June").is_err());
    }

    #[test]
    fn test_parse_date() {
        let d = parse_date(Some("2025-06-10")).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 6, 10).unwrap());
        assert!(parse_date(Some("10/06/2025")).is_err());
        // None falls back to today
        assert!(parse_date(None).is_ok());
    }
}
