//! Compose the resolution pipeline across a date range.
//!
//! For each date: resolve the day plan, subtract breaks, slice the segments,
//! convert both boundaries of each candidate to UTC. Candidates whose
//! boundaries fall in a DST gap are dropped under [`DstPolicy::Skip`].
//!
//! [`DstPolicy::Skip`]: crate::localtime::DstPolicy::Skip

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::localtime::LocalTimeConverter;
use crate::resolver::resolve_day;
use crate::schedule::Schedule;
use crate::segments::subtract_breaks;
use crate::slicer::slice_segment;

/// An inclusive calendar date range in the schedule's local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Number of days covered, inclusive of both ends.
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    /// Reject inverted ranges and ranges longer than `max_days`.
    pub fn validate(&self, max_days: i64) -> Result<()> {
        if self.to < self.from {
            return Err(EngineError::InvalidRange {
                from: self.from,
                to: self.to,
                reason: "end date precedes start date".to_string(),
            });
        }
        if self.days() > max_days {
            return Err(EngineError::InvalidRange {
                from: self.from,
                to: self.to,
                reason: format!("range spans {} days, maximum is {max_days}", self.days()),
            });
        }
        Ok(())
    }

    /// Iterate the dates in order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let from = self.from;
        (0..self.days()).filter_map(move |offset| from.checked_add_signed(TimeDelta::days(offset)))
    }
}

/// A candidate slot in absolute UTC time, before collision filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Resolve a schedule over `range` into UTC candidate slots.
///
/// Validates the duration and the range (against `max_days`) before any
/// resolution work. The result is in chronological order: dates ascend, and
/// within a date segments and slots ascend by construction.
///
/// # Errors
/// [`EngineError::InvalidDuration`] for a zero duration and
/// [`EngineError::InvalidRange`] for malformed or oversized ranges.
pub fn resolve_range(
    schedule: &Schedule,
    converter: &LocalTimeConverter,
    range: DateRange,
    duration_minutes: u32,
    max_days: i64,
) -> Result<Vec<CandidateSlot>> {
    if duration_minutes == 0 {
        return Err(EngineError::InvalidDuration(0));
    }
    range.validate(max_days)?;

    let mut candidates = Vec::new();

    for date in range.iter() {
        let plan = resolve_day(schedule, date);
        let Some(window) = plan.working else {
            continue;
        };

        for segment in subtract_breaks(window, &plan.breaks) {
            for slot in slice_segment(segment, duration_minutes) {
                let Some(start) = converter.to_utc(date, slot.start()) else {
                    continue;
                };
                let Some(end) = converter.to_utc(date, slot.end()) else {
                    continue;
                };
                // A shifted gap boundary can collapse the slot; drop those.
                if end > start {
                    candidates.push(CandidateSlot { start, end });
                }
            }
        }
    }

    Ok(candidates)
}
