//! The availability slot and its state machine.
//!
//! The state is a closed tagged variant: the booking link only exists inside
//! [`SlotState::Booked`], so "`booking_id` is set iff the slot is booked"
//! holds structurally instead of by convention at every call site.

use availability_engine::ids::{BusinessId, ScheduleId, WorkerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};
use crate::ids::{BookingId, SlotId};

/// Lifecycle state of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum SlotState {
    Available,
    /// Reserved mid-flow by an operator; not yet linked to a booking.
    Pending,
    Booked { booking_id: BookingId },
    Unavailable,
    Break,
}

impl SlotState {
    pub fn is_booked(&self) -> bool {
        matches!(self, SlotState::Booked { .. })
    }

    /// The linked booking, present iff the slot is booked.
    pub fn booking_id(&self) -> Option<BookingId> {
        match self {
            SlotState::Booked { booking_id } => Some(*booking_id),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SlotState::Available => "available",
            SlotState::Pending => "pending",
            SlotState::Booked { .. } => "booked",
            SlotState::Unavailable => "unavailable",
            SlotState::Break => "break",
        }
    }
}

/// A concrete bookable (or blocked) UTC time window for one worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub id: SlotId,
    pub worker_id: WorkerId,
    pub business_id: BusinessId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub state: SlotState,
    /// Provenance: the schedule that generated this slot, or `None` for
    /// slots created manually by an operator.
    pub generated_by: Option<ScheduleId>,
    /// Bumped by the store on every committed write; stale writes are
    /// rejected as conflicts.
    pub version: u64,
    pub created_at: DateTime<Utc>,
}

impl AvailabilitySlot {
    /// A slot produced by regeneration, tagged with its originating schedule.
    pub fn new_generated(
        worker_id: WorkerId,
        business_id: BusinessId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        schedule_id: ScheduleId,
    ) -> Self {
        Self {
            id: SlotId::new(),
            worker_id,
            business_id,
            start,
            end,
            state: SlotState::Available,
            generated_by: Some(schedule_id),
            version: 0,
            created_at: Utc::now(),
        }
    }

    /// A slot created by manual operator action. Rejects an initial Booked
    /// state — booking goes through the booking coordinator only — and a
    /// non-positive time window.
    pub fn new_manual(
        worker_id: WorkerId,
        business_id: BusinessId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        state: SlotState,
    ) -> Result<Self> {
        if state.is_booked() {
            return Err(BookingError::InvalidState(
                "a slot cannot be created already booked".to_string(),
            ));
        }
        if end <= start {
            return Err(BookingError::InvalidArgument(format!(
                "slot end {end} must be after start {start}"
            )));
        }
        Ok(Self {
            id: SlotId::new(),
            worker_id,
            business_id,
            start,
            end,
            state,
            generated_by: None,
            version: 0,
            created_at: Utc::now(),
        })
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// A fixed slot must not be deleted or overwritten by regeneration:
    /// manually created, booked, or moved out of Available by an operator.
    pub fn is_fixed(&self) -> bool {
        self.generated_by.is_none() || !matches!(self.state, SlotState::Available)
    }

    /// Regeneration may purge exactly the generated-and-still-available slots.
    pub fn is_purgeable(&self) -> bool {
        !self.is_fixed()
    }

    /// Available → Booked, linking the booking.
    pub fn book(&mut self, booking_id: BookingId) -> Result<()> {
        match self.state {
            SlotState::Available => {
                self.state = SlotState::Booked { booking_id };
                Ok(())
            }
            _ => Err(BookingError::InvalidState(format!(
                "cannot book slot {} in state {}",
                self.id,
                self.state.label()
            ))),
        }
    }

    /// Booked | Pending → Available, clearing any booking link.
    pub fn release(&mut self) -> Result<()> {
        match self.state {
            SlotState::Booked { .. } | SlotState::Pending => {
                self.state = SlotState::Available;
                Ok(())
            }
            _ => Err(BookingError::InvalidState(format!(
                "cannot release slot {} in state {}",
                self.id,
                self.state.label()
            ))),
        }
    }

    /// Any non-Booked state → Unavailable.
    pub fn mark_unavailable(&mut self) -> Result<()> {
        self.mark_blocked(SlotState::Unavailable)
    }

    /// Any non-Booked state → Break.
    pub fn mark_break(&mut self) -> Result<()> {
        self.mark_blocked(SlotState::Break)
    }

    fn mark_blocked(&mut self, target: SlotState) -> Result<()> {
        if self.state.is_booked() {
            return Err(BookingError::InvalidState(format!(
                "slot {} is booked; cancel the booking instead of marking it {}",
                self.id,
                target.label()
            )));
        }
        self.state = target;
        Ok(())
    }

    /// Move the slot's window. Disallowed while booked: time changes on a
    /// booked slot go through a reschedule, which moves the booking to a
    /// different slot rather than mutating this one.
    pub fn update_time(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
        if self.state.is_booked() {
            return Err(BookingError::InvalidState(format!(
                "cannot move booked slot {}",
                self.id
            )));
        }
        if end <= start {
            return Err(BookingError::InvalidArgument(format!(
                "slot end {end} must be after start {start}"
            )));
        }
        self.start = start;
        self.end = end;
        Ok(())
    }
}
