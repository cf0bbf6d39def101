//! Core data models for the daily budget engine
//!
//! This module contains the data structures that represent the planning
//! domain: periods, category allocations, daily plan cells, and the
//! redistribution audit ledger.

pub mod allocation;
pub mod cell;
pub mod event;
pub mod ids;
pub mod money;
pub mod period;
pub mod plan;

pub use allocation::{AllocationSet, CategoryAllocation, CategoryConfig, UNALLOCATED};
pub use cell::{CellStatus, DailyPlanCell, DEFAULT_WARNING_RATIO};
pub use event::{CellDelta, RedistributionEvent, TriggerReason};
pub use ids::{EventId, PeriodId, UserId};
pub use money::Money;
pub use period::{Currency, Period};
pub use plan::PeriodPlan;
