//! The booking entity and its status transitions.
//!
//! Terminal states (Completed, NoShow, CancelledBy*) are final: no further
//! status change or slot-link mutation is permitted once reached.

use availability_engine::ids::WorkerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};
use crate::ids::{BookingId, CustomerId, ServiceId, SlotId};
use crate::slot::AvailabilitySlot;

const MAX_REASON_LEN: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    PendingConfirmation,
    Confirmed,
    Rescheduled,
    Completed,
    NoShow,
    CancelledByCustomer,
    CancelledByVendor,
}

impl BookingStatus {
    /// Terminal statuses admit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Completed
                | BookingStatus::NoShow
                | BookingStatus::CancelledByCustomer
                | BookingStatus::CancelledByVendor
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::PendingConfirmation => "pending_confirmation",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Rescheduled => "rescheduled",
            BookingStatus::Completed => "completed",
            BookingStatus::NoShow => "no_show",
            BookingStatus::CancelledByCustomer => "cancelled_by_customer",
            BookingStatus::CancelledByVendor => "cancelled_by_vendor",
        }
    }
}

/// The caller-supplied view of the booked service. The service catalog is
/// external; the engine only needs the duration to match against the slot
/// and the price to snapshot onto the booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSnapshot {
    pub id: ServiceId,
    pub duration_minutes: u32,
    /// Price in minor currency units at booking time.
    pub price_minor: i64,
}

/// A customer's claim on exactly one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub worker_id: WorkerId,
    pub service_id: ServiceId,
    pub customer_id: CustomerId,
    pub slot_id: SlotId,
    /// Copied from the slot at booking time; rewritten on reschedule.
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    /// Price snapshot in minor currency units.
    pub price_minor: i64,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// A fresh booking against `slot`, in PendingConfirmation.
    pub fn new(service: &ServiceSnapshot, customer_id: CustomerId, slot: &AvailabilitySlot) -> Self {
        let now = Utc::now();
        Self {
            id: BookingId::new(),
            worker_id: slot.worker_id,
            service_id: service.id,
            customer_id,
            slot_id: slot.id,
            start: slot.start,
            end: slot.end,
            status: BookingStatus::PendingConfirmation,
            price_minor: service.price_minor,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_terminal() {
            return Err(BookingError::InvalidState(format!(
                "booking {} is already {}",
                self.id,
                self.status.label()
            )));
        }
        Ok(())
    }

    /// PendingConfirmation → Confirmed.
    pub fn confirm(&mut self) -> Result<()> {
        if self.status != BookingStatus::PendingConfirmation {
            return Err(BookingError::InvalidState(format!(
                "booking {} is {}, expected pending_confirmation",
                self.id,
                self.status.label()
            )));
        }
        self.status = BookingStatus::Confirmed;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn cancel_by_vendor(&mut self, reason: &str) -> Result<()> {
        self.cancel_with(BookingStatus::CancelledByVendor, reason)
    }

    pub fn cancel_by_customer(&mut self, reason: &str) -> Result<()> {
        self.cancel_with(BookingStatus::CancelledByCustomer, reason)
    }

    fn cancel_with(&mut self, status: BookingStatus, reason: &str) -> Result<()> {
        self.ensure_open()?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(BookingError::InvalidArgument(
                "cancellation reason must not be empty".to_string(),
            ));
        }
        if reason.len() > MAX_REASON_LEN {
            return Err(BookingError::InvalidArgument(format!(
                "cancellation reason exceeds {MAX_REASON_LEN} characters"
            )));
        }
        self.status = status;
        self.cancellation_reason = Some(reason.to_string());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Point the booking at a different slot, copying the new times.
    /// The coordinator has already verified the slot is bookable.
    pub fn reschedule_to(&mut self, slot: &AvailabilitySlot) -> Result<()> {
        self.ensure_open()?;
        if slot.id == self.slot_id {
            return Err(BookingError::InvalidState(format!(
                "booking {} already occupies slot {}",
                self.id, slot.id
            )));
        }
        self.slot_id = slot.id;
        self.start = slot.start;
        self.end = slot.end;
        self.status = BookingStatus::Rescheduled;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Confirmed | Rescheduled → Completed.
    pub fn complete(&mut self) -> Result<()> {
        self.close_out(BookingStatus::Completed)
    }

    /// Confirmed | Rescheduled → NoShow.
    pub fn mark_no_show(&mut self) -> Result<()> {
        self.close_out(BookingStatus::NoShow)
    }

    fn close_out(&mut self, status: BookingStatus) -> Result<()> {
        match self.status {
            BookingStatus::Confirmed | BookingStatus::Rescheduled => {
                self.status = status;
                self.updated_at = Utc::now();
                Ok(())
            }
            _ => Err(BookingError::InvalidState(format!(
                "booking {} is {}, cannot close out as {}",
                self.id,
                self.status.label(),
                status.label()
            ))),
        }
    }
}
