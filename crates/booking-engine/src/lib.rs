//! # booking-engine
//!
//! Couples the pure availability pipeline to a booking lifecycle: the
//! [`slot`] and [`booking`] state machines, the storage ports that give
//! multi-record operations a transaction boundary, and the two coordinators
//! — [`regenerate`] (schedule → persisted slot set) and [`coordinator`]
//! (create / cancel / reschedule bookings against slots).
//!
//! Every mutating operation touches its records inside one unit of work:
//! either all writes commit or none do. Slot writes are compare-and-set on a
//! version counter, so a concurrent writer that already moved a slot away
//! from Available surfaces as a [`error::BookingError::Conflict`] instead of
//! being silently overwritten.
//!
//! ## Modules
//!
//! - [`slot`] — `AvailabilitySlot` and its closed state machine
//! - [`booking`] — `Booking`, its status set and transitions
//! - [`store`] — storage ports: schedule directory, unit of work
//! - [`memory`] — mutex-guarded reference store with snapshot transactions
//! - [`regenerate`] — the regeneration coordinator
//! - [`coordinator`] — the booking coordinator
//! - [`error`] — error types
//! - [`ids`] — typed identifiers

pub mod booking;
pub mod coordinator;
pub mod error;
pub mod ids;
pub mod memory;
pub mod regenerate;
pub mod slot;
pub mod store;

pub use booking::{Booking, BookingStatus, ServiceSnapshot};
pub use coordinator::BookingCoordinator;
pub use error::BookingError;
pub use memory::MemoryStore;
pub use regenerate::{RegenerateParams, RegenerationConfig, RegenerationCoordinator};
pub use slot::{AvailabilitySlot, SlotState};
pub use store::{ScheduleDirectory, Store, StoreTxn};
