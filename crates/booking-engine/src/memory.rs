//! Mutex-guarded in-memory store with snapshot transactions.
//!
//! The reference [`Store`] implementation: a transaction clones the current
//! state, the closure works against the clone, and a successful return swaps
//! the clone back in. The mutex serializes writers, so a transaction is
//! atomic and isolated; the version counter on slots still guards against
//! lost updates from stale reads carried across transactions.

use std::collections::HashMap;
use std::sync::Mutex;

use availability_engine::ids::{ScheduleId, WorkerId};
use availability_engine::Schedule;
use chrono::{DateTime, Utc};

use crate::booking::Booking;
use crate::error::{BookingError, Result};
use crate::ids::{BookingId, SlotId};
use crate::slot::AvailabilitySlot;
use crate::store::{ScheduleDirectory, Store, StoreTxn};

#[derive(Debug, Default, Clone)]
struct State {
    slots: HashMap<SlotId, AvailabilitySlot>,
    bookings: HashMap<BookingId, Booking>,
}

/// In-memory store over slots and bookings, plus a schedule directory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    schedules: Mutex<HashMap<ScheduleId, Schedule>>,
    defaults: Mutex<HashMap<WorkerId, ScheduleId>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schedule; optionally designate it the worker's default.
    pub fn add_schedule(&self, schedule: Schedule, default: bool) {
        if default {
            lock(&self.defaults).insert(schedule.worker_id, schedule.id);
        }
        lock(&self.schedules).insert(schedule.id, schedule);
    }

    /// Test/seeding convenience: insert slots outside any coordinator flow.
    pub fn seed_slots(&self, slots: Vec<AvailabilitySlot>) {
        let mut state = lock(&self.state);
        for slot in slots {
            state.slots.insert(slot.id, slot);
        }
    }

    pub fn slot_count(&self) -> usize {
        lock(&self.state).slots.len()
    }

    pub fn all_slots(&self) -> Vec<AvailabilitySlot> {
        lock(&self.state).slots.values().cloned().collect()
    }

    pub fn get_slot(&self, id: SlotId) -> Option<AvailabilitySlot> {
        lock(&self.state).slots.get(&id).cloned()
    }

    pub fn get_booking(&self, id: BookingId) -> Option<Booking> {
        lock(&self.state).bookings.get(&id).cloned()
    }
}

/// Recover the guard even if a previous holder panicked; the snapshot
/// discipline keeps the state consistent regardless.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Snapshot transaction over a cloned [`State`].
pub struct MemoryTxn {
    view: State,
}

impl StoreTxn for MemoryTxn {
    fn slot(&self, id: SlotId) -> Result<Option<AvailabilitySlot>> {
        Ok(self.view.slots.get(&id).cloned())
    }

    fn booking(&self, id: BookingId) -> Result<Option<Booking>> {
        Ok(self.view.bookings.get(&id).cloned())
    }

    fn slots_in_range(
        &self,
        worker_id: WorkerId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AvailabilitySlot>> {
        let mut slots: Vec<AvailabilitySlot> = self
            .view
            .slots
            .values()
            .filter(|s| s.worker_id == worker_id && s.start < to && s.end > from)
            .cloned()
            .collect();
        slots.sort_by_key(|s| s.start);
        Ok(slots)
    }

    fn insert_slots(&mut self, slots: Vec<AvailabilitySlot>) -> Result<()> {
        for slot in slots {
            if self.view.slots.contains_key(&slot.id) {
                return Err(BookingError::Conflict(format!(
                    "slot {} already exists",
                    slot.id
                )));
            }
            self.view.slots.insert(slot.id, slot);
        }
        Ok(())
    }

    fn delete_slots(&mut self, ids: &[SlotId]) -> Result<()> {
        for id in ids {
            self.view.slots.remove(id);
        }
        Ok(())
    }

    fn update_slot(&mut self, mut slot: AvailabilitySlot) -> Result<()> {
        let stored = self
            .view
            .slots
            .get(&slot.id)
            .ok_or_else(|| BookingError::not_found("slot", slot.id))?;
        if stored.version != slot.version {
            return Err(BookingError::Conflict(format!(
                "slot {} was modified concurrently (stored v{}, read v{})",
                slot.id, stored.version, slot.version
            )));
        }
        slot.version += 1;
        self.view.slots.insert(slot.id, slot);
        Ok(())
    }

    fn insert_booking(&mut self, booking: Booking) -> Result<()> {
        if self.view.bookings.contains_key(&booking.id) {
            return Err(BookingError::Conflict(format!(
                "booking {} already exists",
                booking.id
            )));
        }
        self.assert_slot_link_free(&booking)?;
        self.view.bookings.insert(booking.id, booking);
        Ok(())
    }

    fn update_booking(&mut self, booking: Booking) -> Result<()> {
        if !self.view.bookings.contains_key(&booking.id) {
            return Err(BookingError::not_found("booking", booking.id));
        }
        self.assert_slot_link_free(&booking)?;
        self.view.bookings.insert(booking.id, booking);
        Ok(())
    }
}

impl MemoryTxn {
    /// The booking↔slot uniqueness backstop: among non-terminal bookings,
    /// a slot may be referenced at most once.
    fn assert_slot_link_free(&self, booking: &Booking) -> Result<()> {
        if booking.is_terminal() {
            return Ok(());
        }
        let taken = self
            .view
            .bookings
            .values()
            .any(|b| b.id != booking.id && !b.is_terminal() && b.slot_id == booking.slot_id);
        if taken {
            return Err(BookingError::Conflict(format!(
                "slot {} is already linked to an active booking",
                booking.slot_id
            )));
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    type Txn = MemoryTxn;

    fn with_txn<T>(&self, f: impl FnOnce(&mut Self::Txn) -> Result<T>) -> Result<T> {
        let mut guard = lock(&self.state);
        let mut txn = MemoryTxn {
            view: guard.clone(),
        };
        let out = f(&mut txn)?;
        *guard = txn.view;
        Ok(out)
    }
}

impl ScheduleDirectory for MemoryStore {
    fn find(&self, id: ScheduleId) -> Result<Option<Schedule>> {
        Ok(lock(&self.schedules).get(&id).cloned())
    }

    fn default_for_worker(&self, worker_id: WorkerId) -> Result<Option<Schedule>> {
        let defaults = lock(&self.defaults);
        let Some(schedule_id) = defaults.get(&worker_id) else {
            return Ok(None);
        };
        Ok(lock(&self.schedules).get(schedule_id).cloned())
    }
}
