//! # availability-engine
//!
//! Deterministic resolution of a worker's bookable time windows from a
//! declarative schedule: recurring weekly rules, date-specific overrides and
//! break periods, turned into concrete, non-overlapping, timezone-correct
//! UTC slots.
//!
//! The crate is pure — no I/O, no persistence, no clocks. Callers feed it a
//! hydrated [`schedule::Schedule`] and get candidate slots back; coupling
//! those slots to bookings lives in the companion `booking-engine` crate.
//!
//! ## Modules
//!
//! - [`schedule`] — the schedule aggregate and its child records
//! - [`resolver`] — calendar date → effective day plan (override wins)
//! - [`segments`] — break subtraction over a working window
//! - [`slicer`] — fixed-duration candidate slicing
//! - [`localtime`] — wall-clock → UTC conversion with DST policy
//! - [`collision`] — overlap filtering against fixed slots
//! - [`pipeline`] — date-range composition of the above
//! - [`error`] — error types
//! - [`ids`] — typed identifiers

pub mod collision;
pub mod error;
pub mod ids;
pub mod localtime;
pub mod pipeline;
pub mod resolver;
pub mod schedule;
pub mod segments;
pub mod slicer;

pub use collision::retain_non_overlapping;
pub use error::EngineError;
pub use localtime::{DstPolicy, LocalTimeConverter};
pub use pipeline::{resolve_range, CandidateSlot, DateRange};
pub use resolver::{resolve_day, DayPlan};
pub use schedule::{BreakRule, LocalWindow, Override, RuleItem, Schedule};
pub use segments::subtract_breaks;
pub use slicer::slice_segment;
