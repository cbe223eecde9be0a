//! The booking coordinator: couples booking transitions to slot transitions.
//!
//! Each operation touches two records (reschedule: three) that must commit
//! together or not at all, so every public method runs inside exactly one
//! unit of work. Slot release happens only here, through the coordinated
//! cancel/reschedule paths — a booked slot is never freed while its booking
//! stays open.

use tracing::info;

use crate::booking::{Booking, BookingStatus, ServiceSnapshot};
use crate::error::{BookingError, Result};
use crate::ids::{BookingId, CustomerId, SlotId};
use crate::slot::AvailabilitySlot;
use crate::store::{Store, StoreTxn};

pub struct BookingCoordinator<S> {
    store: S,
}

impl<S: Store> BookingCoordinator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Book an Available slot for a customer. The slot's duration must match
    /// the service duration exactly — no partial-slot booking.
    pub fn create(
        &self,
        slot_id: SlotId,
        service: &ServiceSnapshot,
        customer_id: CustomerId,
    ) -> Result<Booking> {
        let booking = self.store.with_txn(|txn| {
            let mut slot = txn
                .slot(slot_id)?
                .ok_or_else(|| BookingError::not_found("slot", slot_id))?;

            if slot.duration_minutes() != i64::from(service.duration_minutes) {
                return Err(BookingError::InvalidState(format!(
                    "slot {} is {} minutes, service requires {}",
                    slot.id,
                    slot.duration_minutes(),
                    service.duration_minutes
                )));
            }

            let booking = Booking::new(service, customer_id, &slot);
            slot.book(booking.id)?;
            txn.update_slot(slot)?;
            txn.insert_booking(booking.clone())?;
            Ok(booking)
        })?;

        info!(booking = %booking.id, slot = %booking.slot_id, "booking created");
        Ok(booking)
    }

    /// PendingConfirmation → Confirmed.
    pub fn confirm(&self, booking_id: BookingId) -> Result<Booking> {
        self.store.with_txn(|txn| {
            let mut booking = require_booking(txn, booking_id)?;
            booking.confirm()?;
            txn.update_booking(booking.clone())?;
            Ok(booking)
        })
    }

    pub fn cancel_by_vendor(&self, booking_id: BookingId, reason: &str) -> Result<Booking> {
        self.cancel(booking_id, reason, BookingStatus::CancelledByVendor)
    }

    pub fn cancel_by_customer(&self, booking_id: BookingId, reason: &str) -> Result<Booking> {
        self.cancel(booking_id, reason, BookingStatus::CancelledByCustomer)
    }

    fn cancel(&self, booking_id: BookingId, reason: &str, status: BookingStatus) -> Result<Booking> {
        let booking = self.store.with_txn(|txn| {
            let mut booking = require_booking(txn, booking_id)?;
            match status {
                BookingStatus::CancelledByVendor => booking.cancel_by_vendor(reason)?,
                _ => booking.cancel_by_customer(reason)?,
            }

            let mut slot = linked_slot(txn, &booking)?;
            slot.release()?;
            txn.update_slot(slot)?;
            txn.update_booking(booking.clone())?;
            Ok(booking)
        })?;

        info!(
            booking = %booking.id,
            status = booking.status.label(),
            "booking cancelled, slot released"
        );
        Ok(booking)
    }

    /// Confirmed | Rescheduled → Completed. The slot stays booked as a
    /// historical record of the appointment.
    pub fn complete(&self, booking_id: BookingId) -> Result<Booking> {
        self.store.with_txn(|txn| {
            let mut booking = require_booking(txn, booking_id)?;
            booking.complete()?;
            txn.update_booking(booking.clone())?;
            Ok(booking)
        })
    }

    /// Confirmed | Rescheduled → NoShow. The slot stays booked.
    pub fn mark_no_show(&self, booking_id: BookingId) -> Result<Booking> {
        self.store.with_txn(|txn| {
            let mut booking = require_booking(txn, booking_id)?;
            booking.mark_no_show()?;
            txn.update_booking(booking.clone())?;
            Ok(booking)
        })
    }

    /// Move a booking to a different Available slot of the same worker.
    /// Releases the old slot, books the new one and rewrites the booking's
    /// slot link and copied times as one atomic unit.
    pub fn reschedule(&self, booking_id: BookingId, new_slot_id: SlotId) -> Result<Booking> {
        let booking = self.store.with_txn(|txn| {
            let mut booking = require_booking(txn, booking_id)?;
            if booking.is_terminal() {
                return Err(BookingError::InvalidState(format!(
                    "booking {} is already {}",
                    booking.id,
                    booking.status.label()
                )));
            }
            if booking.slot_id == new_slot_id {
                return Err(BookingError::InvalidState(format!(
                    "booking {} already occupies slot {new_slot_id}",
                    booking.id
                )));
            }

            let mut new_slot = txn
                .slot(new_slot_id)?
                .ok_or_else(|| BookingError::not_found("slot", new_slot_id))?;
            if new_slot.worker_id != booking.worker_id {
                return Err(BookingError::InvalidState(format!(
                    "slot {new_slot_id} belongs to a different worker"
                )));
            }

            let mut old_slot = linked_slot(txn, &booking)?;
            old_slot.release()?;
            new_slot.book(booking.id)?;
            booking.reschedule_to(&new_slot)?;

            txn.update_slot(old_slot)?;
            txn.update_slot(new_slot)?;
            txn.update_booking(booking.clone())?;
            Ok(booking)
        })?;

        info!(
            booking = %booking.id,
            slot = %booking.slot_id,
            "booking rescheduled"
        );
        Ok(booking)
    }
}

fn require_booking(txn: &impl StoreTxn, id: BookingId) -> Result<Booking> {
    txn.booking(id)?
        .ok_or_else(|| BookingError::not_found("booking", id))
}

/// The slot a live booking occupies. A missing slot, or one that is not
/// booked by exactly this booking, is a stored-data invariant violation.
fn linked_slot(txn: &impl StoreTxn, booking: &Booking) -> Result<AvailabilitySlot> {
    let slot = txn.slot(booking.slot_id)?.ok_or_else(|| {
        BookingError::DataIntegrity(format!(
            "booking {} references missing slot {}",
            booking.id, booking.slot_id
        ))
    })?;
    match slot.state.booking_id() {
        Some(id) if id == booking.id => Ok(slot),
        _ => Err(BookingError::DataIntegrity(format!(
            "slot {} is not booked by booking {}",
            slot.id, booking.id
        ))),
    }
}
