//! Service layer
//!
//! Services own the engine's operations. Each borrows the shared
//! `Storage`; writers take the per-period lock for their whole
//! load-mutate-commit cycle, readers go straight to the repositories.

pub mod allocation;
pub mod behavior;
pub mod calendar;
pub mod notify;
pub mod redistribution;
pub mod spend;

pub use allocation::AllocationService;
pub use behavior::BehaviorService;
pub use calendar::{CalendarService, CalendarView, CategorySummary, DaySummary};
pub use notify::{CollectingSink, NullSink, StatusChange, StatusSink};
pub use redistribution::RedistributionService;
pub use spend::SpendService;
