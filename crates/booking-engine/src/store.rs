//! Storage ports for the coordinators.
//!
//! The engine's algorithms are pure; atomicity lives at this boundary. Every
//! coordinator operation runs inside one [`Store::with_txn`] unit of work:
//! the closure stages reads and writes against a transaction view, and the
//! store commits them all on `Ok` or discards them all on `Err`.

use availability_engine::ids::{ScheduleId, WorkerId};
use availability_engine::Schedule;
use chrono::{DateTime, Utc};

use crate::booking::Booking;
use crate::error::Result;
use crate::ids::{BookingId, SlotId};
use crate::slot::AvailabilitySlot;

/// Read access to schedule aggregates, fully hydrated with rule items,
/// breaks and overrides.
pub trait ScheduleDirectory {
    fn find(&self, id: ScheduleId) -> Result<Option<Schedule>>;

    /// The worker's default schedule, when one is designated.
    fn default_for_worker(&self, worker_id: WorkerId) -> Result<Option<Schedule>>;
}

/// A transaction view over slots and bookings.
///
/// Writes are staged; nothing is visible outside the transaction until the
/// enclosing [`Store::with_txn`] commits. `update_slot` is compare-and-set
/// on the slot's version counter: a stale write means another writer got
/// there first and must surface as [`crate::error::BookingError::Conflict`].
pub trait StoreTxn {
    fn slot(&self, id: SlotId) -> Result<Option<AvailabilitySlot>>;

    fn booking(&self, id: BookingId) -> Result<Option<Booking>>;

    /// All slots for `worker_id` intersecting `[from, to)`, any state.
    fn slots_in_range(
        &self,
        worker_id: WorkerId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AvailabilitySlot>>;

    /// Batch insert of freshly generated or manually created slots.
    fn insert_slots(&mut self, slots: Vec<AvailabilitySlot>) -> Result<()>;

    /// Batch delete. Ids that no longer exist are ignored.
    fn delete_slots(&mut self, ids: &[SlotId]) -> Result<()>;

    /// Compare-and-set write: fails with `Conflict` when the stored version
    /// differs from the one this transaction read.
    fn update_slot(&mut self, slot: AvailabilitySlot) -> Result<()>;

    /// Insert a booking, enforcing the one-active-booking-per-slot link.
    fn insert_booking(&mut self, booking: Booking) -> Result<()>;

    fn update_booking(&mut self, booking: Booking) -> Result<()>;
}

/// A unit-of-work factory. `with_txn` commits the staged writes when the
/// closure returns `Ok` and discards them when it returns `Err`.
pub trait Store {
    type Txn: StoreTxn;

    fn with_txn<T>(&self, f: impl FnOnce(&mut Self::Txn) -> Result<T>) -> Result<T>;
}

impl<S: Store> Store for &S {
    type Txn = S::Txn;

    fn with_txn<T>(&self, f: impl FnOnce(&mut Self::Txn) -> Result<T>) -> Result<T> {
        (**self).with_txn(f)
    }
}

impl<S: Store> Store for std::sync::Arc<S> {
    type Txn = S::Txn;

    fn with_txn<T>(&self, f: impl FnOnce(&mut Self::Txn) -> Result<T>) -> Result<T> {
        (**self).with_txn(f)
    }
}

impl<D: ScheduleDirectory> ScheduleDirectory for &D {
    fn find(&self, id: ScheduleId) -> Result<Option<Schedule>> {
        (**self).find(id)
    }

    fn default_for_worker(&self, worker_id: WorkerId) -> Result<Option<Schedule>> {
        (**self).default_for_worker(worker_id)
    }
}

impl<D: ScheduleDirectory> ScheduleDirectory for std::sync::Arc<D> {
    fn find(&self, id: ScheduleId) -> Result<Option<Schedule>> {
        (**self).find(id)
    }

    fn default_for_worker(&self, worker_id: WorkerId) -> Result<Option<Schedule>> {
        (**self).default_for_worker(worker_id)
    }
}
