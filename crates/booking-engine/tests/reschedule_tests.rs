//! Reschedule: three-record atomicity and its preconditions.

use availability_engine::ids::{BusinessId, ScheduleId, WorkerId};
use booking_engine::ids::{CustomerId, ServiceId, SlotId};
use booking_engine::{
    AvailabilitySlot, BookingCoordinator, BookingError, BookingStatus, MemoryStore,
    ServiceSnapshot, SlotState,
};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

fn at(h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, h, 0, 0).unwrap()
}

fn slot_for(worker: WorkerId, start_hour: u32) -> AvailabilitySlot {
    AvailabilitySlot::new_generated(
        worker,
        BusinessId::new(),
        at(start_hour),
        at(start_hour) + chrono::TimeDelta::minutes(30),
        ScheduleId::new(),
    )
}

fn service() -> ServiceSnapshot {
    ServiceSnapshot {
        id: ServiceId::new(),
        duration_minutes: 30,
        price_minor: 2000,
    }
}

struct Fixture {
    store: Arc<MemoryStore>,
    coordinator: BookingCoordinator<Arc<MemoryStore>>,
    worker: WorkerId,
    old_slot: AvailabilitySlot,
    new_slot: AvailabilitySlot,
}

fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let worker = WorkerId::new();
    let old_slot = slot_for(worker, 9);
    let new_slot = slot_for(worker, 14);
    store.seed_slots(vec![old_slot.clone(), new_slot.clone()]);
    Fixture {
        coordinator: BookingCoordinator::new(Arc::clone(&store)),
        store,
        worker,
        old_slot,
        new_slot,
    }
}

#[test]
fn reschedule_moves_booking_and_swaps_both_slots() {
    let f = fixture();
    let booking = f
        .coordinator
        .create(f.old_slot.id, &service(), CustomerId::new())
        .unwrap();

    let moved = f.coordinator.reschedule(booking.id, f.new_slot.id).unwrap();

    assert_eq!(moved.status, BookingStatus::Rescheduled);
    assert_eq!(moved.slot_id, f.new_slot.id);
    assert_eq!(moved.start, f.new_slot.start);
    assert_eq!(moved.end, f.new_slot.end);

    let old = f.store.get_slot(f.old_slot.id).unwrap();
    let new = f.store.get_slot(f.new_slot.id).unwrap();
    assert_eq!(old.state, SlotState::Available);
    assert_eq!(new.state.booking_id(), Some(booking.id));
}

#[test]
fn reschedule_to_unavailable_slot_changes_nothing() {
    let f = fixture();
    let booking = f
        .coordinator
        .create(f.old_slot.id, &service(), CustomerId::new())
        .unwrap();

    // Block the target slot first.
    let blocked = {
        use booking_engine::{Store, StoreTxn};
        f.store
            .with_txn(|txn| {
                let mut slot = txn.slot(f.new_slot.id)?.unwrap();
                slot.mark_unavailable()?;
                txn.update_slot(slot)?;
                Ok(())
            })
            .unwrap();
        f.store.get_slot(f.new_slot.id).unwrap()
    };
    assert_eq!(blocked.state, SlotState::Unavailable);

    let err = f
        .coordinator
        .reschedule(booking.id, f.new_slot.id)
        .unwrap_err();
    assert!(matches!(err, BookingError::InvalidState(_)));

    // None of the three records changed.
    let old = f.store.get_slot(f.old_slot.id).unwrap();
    let new = f.store.get_slot(f.new_slot.id).unwrap();
    let stored = f.store.get_booking(booking.id).unwrap();
    assert_eq!(old.state.booking_id(), Some(booking.id));
    assert_eq!(new.state, SlotState::Unavailable);
    assert_eq!(stored.slot_id, f.old_slot.id);
    assert_eq!(stored.status, BookingStatus::PendingConfirmation);
}

#[test]
fn reschedule_to_same_slot_is_rejected() {
    let f = fixture();
    let booking = f
        .coordinator
        .create(f.old_slot.id, &service(), CustomerId::new())
        .unwrap();

    let err = f
        .coordinator
        .reschedule(booking.id, f.old_slot.id)
        .unwrap_err();
    assert!(matches!(err, BookingError::InvalidState(_)));
}

#[test]
fn cross_worker_reschedule_is_rejected() {
    let f = fixture();
    let booking = f
        .coordinator
        .create(f.old_slot.id, &service(), CustomerId::new())
        .unwrap();

    let other_worker_slot = slot_for(WorkerId::new(), 11);
    f.store.seed_slots(vec![other_worker_slot.clone()]);

    let err = f
        .coordinator
        .reschedule(booking.id, other_worker_slot.id)
        .unwrap_err();
    assert!(matches!(err, BookingError::InvalidState(_)));

    // The booking still occupies its original slot.
    assert_eq!(
        f.store.get_booking(booking.id).unwrap().slot_id,
        f.old_slot.id
    );
}

#[test]
fn reschedule_of_terminal_booking_is_rejected() {
    let f = fixture();
    let booking = f
        .coordinator
        .create(f.old_slot.id, &service(), CustomerId::new())
        .unwrap();
    f.coordinator
        .cancel_by_customer(booking.id, "changed plans")
        .unwrap();

    let err = f
        .coordinator
        .reschedule(booking.id, f.new_slot.id)
        .unwrap_err();
    assert!(matches!(err, BookingError::InvalidState(_)));
}

#[test]
fn reschedule_to_unknown_slot_is_not_found() {
    let f = fixture();
    let booking = f
        .coordinator
        .create(f.old_slot.id, &service(), CustomerId::new())
        .unwrap();

    let err = f.coordinator.reschedule(booking.id, SlotId::new()).unwrap_err();
    assert!(matches!(err, BookingError::NotFound { .. }));
}

#[test]
fn rescheduled_booking_can_be_rescheduled_again_and_completed() {
    let f = fixture();
    let third_slot = slot_for(f.worker, 16);
    f.store.seed_slots(vec![third_slot.clone()]);

    let booking = f
        .coordinator
        .create(f.old_slot.id, &service(), CustomerId::new())
        .unwrap();
    f.coordinator.reschedule(booking.id, f.new_slot.id).unwrap();
    let moved = f.coordinator.reschedule(booking.id, third_slot.id).unwrap();
    assert_eq!(moved.slot_id, third_slot.id);

    // Both earlier slots are free again.
    assert_eq!(
        f.store.get_slot(f.old_slot.id).unwrap().state,
        SlotState::Available
    );
    assert_eq!(
        f.store.get_slot(f.new_slot.id).unwrap().state,
        SlotState::Available
    );

    // Rescheduled bookings can close out.
    let done = f.coordinator.complete(booking.id).unwrap();
    assert_eq!(done.status, BookingStatus::Completed);
}
