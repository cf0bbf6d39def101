//! Display formatting for terminal output
//!
//! Formats the calendar view and the redistribution history for the
//! terminal. Services return plain data; everything presentation-shaped
//! lives here.

pub mod calendar;
pub mod history;

pub use calendar::{format_calendar, format_categories, format_day, status_marker};
pub use history::{format_event_details, format_history};
