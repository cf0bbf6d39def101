//! Redistribution audit events
//!
//! Every redistribution run appends one immutable event capturing what
//! triggered it and the exact per-cell deltas applied, so any rewrite of
//! the plan can be explained or reversed after the fact.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{EventId, PeriodId};
use super::money::Money;

/// What caused a redistribution run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerReason {
    /// Day-close evaluation found a category over its cumulative plan
    DayClose,
    /// Explicit user-initiated "redistribute now" request
    Manual,
    /// Scheduled rebalancing of prior-period leftovers at period start
    PeriodStart,
}

impl fmt::Display for TriggerReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DayClose => write!(f, "day_close"),
            Self::Manual => write!(f, "manual"),
            Self::PeriodStart => write!(f, "period_start"),
        }
    }
}

/// One signed planned-amount change applied to one cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellDelta {
    pub date: NaiveDate,
    pub category: String,
    pub delta: Money,
}

impl CellDelta {
    pub fn new(date: NaiveDate, category: impl Into<String>, delta: Money) -> Self {
        Self {
            date,
            category: category.into(),
            delta,
        }
    }
}

/// Immutable record of one redistribution run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedistributionEvent {
    /// Unique identifier
    pub id: EventId,

    /// The period the run operated on
    pub period_id: PeriodId,

    /// What fired the run
    pub trigger: TriggerReason,

    /// The category whose deficit triggered the run; absent for
    /// period-start carryover runs that touch every category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Deficit (or carryover magnitude) the run set out to absorb
    pub deficit: Money,

    /// Every cell delta applied, in application order
    pub deltas: Vec<CellDelta>,

    /// Deficit that no category could absorb; zero when fully resolved.
    /// This is a reportable outcome, not an error.
    pub unresolved_deficit: Money,

    /// When the run executed (UTC)
    pub timestamp: DateTime<Utc>,
}

impl RedistributionEvent {
    /// Create an event record for a completed run
    pub fn new(
        period_id: PeriodId,
        trigger: TriggerReason,
        category: Option<String>,
        deficit: Money,
        deltas: Vec<CellDelta>,
        unresolved_deficit: Money,
    ) -> Self {
        Self {
            id: EventId::new(),
            period_id,
            trigger,
            category,
            deficit,
            deltas,
            unresolved_deficit,
            timestamp: Utc::now(),
        }
    }

    /// Sum of all deltas; zero for every committed run
    pub fn net_delta(&self) -> Money {
        self.deltas.iter().map(|d| d.delta).sum()
    }

    /// Whether the run left any deficit uncovered
    pub fn is_fully_resolved(&self) -> bool {
        self.unresolved_deficit.is_zero()
    }
}

impl fmt::Display for RedistributionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}: deficit {}, {} deltas, unresolved {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.trigger,
            self.category.as_deref().unwrap_or("(all)"),
            self.deficit,
            self.deltas.len(),
            self.unresolved_deficit
        )
    }
}
