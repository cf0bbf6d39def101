//! Daily plan cells and the status classifier
//!
//! A cell is the (date, category) unit of planning and tracking. The
//! classifier is a pure function of a cell's planned and spent amounts;
//! it is recomputed on every read and never fails.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Default spent/planned ratio at which a cell moves from on-track
/// to warning
pub const DEFAULT_WARNING_RATIO: f64 = 0.8;

/// Three-state status of a cell or day
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum CellStatus {
    /// Spend is comfortably within plan
    #[default]
    OnTrack,
    /// Spend is approaching the planned amount
    Warning,
    /// Spend has met or exceeded the planned amount
    Exceeded,
}

impl CellStatus {
    /// Classify spent against planned.
    ///
    /// `ratio < warning_ratio` is on-track, `warning_ratio <= ratio < 1`
    /// is warning, `ratio >= 1` is exceeded. A cell with nothing planned
    /// and anything spent is treated as infinitely over plan.
    pub fn classify(planned: Money, spent: Money, warning_ratio: f64) -> Self {
        if planned.is_zero() || planned.is_negative() {
            return if spent.is_positive() {
                Self::Exceeded
            } else {
                Self::OnTrack
            };
        }

        let ratio = spent.cents() as f64 / planned.cents() as f64;
        if ratio >= 1.0 {
            Self::Exceeded
        } else if ratio >= warning_ratio {
            Self::Warning
        } else {
            Self::OnTrack
        }
    }

    /// The higher-severity of two statuses; a day's aggregate status is
    /// the worst among its cells
    pub fn worst(self, other: Self) -> Self {
        self.max(other)
    }
}

impl fmt::Display for CellStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnTrack => write!(f, "on_track"),
            Self::Warning => write!(f, "warning"),
            Self::Exceeded => write!(f, "exceeded"),
        }
    }
}

/// One day x category planning cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlanCell {
    /// The day this cell covers
    pub date: NaiveDate,

    /// Category name
    pub category: String,

    /// Budget planned for this day, after any redistribution
    pub planned: Money,

    /// Actual spend recorded against this day; non-decreasing within a day
    pub spent: Money,

    /// Net signed delta redistribution has applied to this cell, for audit
    #[serde(default)]
    pub carried_adjustment: Money,

    /// Status as of the last classification
    #[serde(default)]
    pub status: CellStatus,
}

impl DailyPlanCell {
    /// Create a cell with a planned amount and no spend
    pub fn new(date: NaiveDate, category: impl Into<String>, planned: Money) -> Self {
        Self {
            date,
            category: category.into(),
            planned,
            spent: Money::zero(),
            carried_adjustment: Money::zero(),
            status: CellStatus::OnTrack,
        }
    }

    /// Create an unbudgeted cell, used when spend arrives for a category
    /// that has no plan for that day
    pub fn unbudgeted(date: NaiveDate, category: impl Into<String>) -> Self {
        Self::new(date, category, Money::zero())
    }

    /// Recompute this cell's status
    pub fn reclassify(&mut self, warning_ratio: f64) {
        self.status = CellStatus::classify(self.planned, self.spent, warning_ratio);
    }

    /// Apply a redistribution delta to the planned amount, recording it
    /// in the audit trail
    pub fn apply_adjustment(&mut self, delta: Money, warning_ratio: f64) {
        self.planned += delta;
        self.carried_adjustment += delta;
        self.reclassify(warning_ratio);
    }
}

impl fmt::Display for DailyPlanCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: planned {}, spent {} [{}]",
            self.date, self.category, self.planned, self.spent, self.status
        )
    }
}
