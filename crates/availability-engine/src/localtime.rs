//! Wall-clock to UTC conversion with DST-aware handling.
//!
//! Schedule rules are expressed in the worker's local time; slots are
//! persisted as absolute UTC instants. Conversion must be applied to each
//! slot boundary — never to pre-sliced UTC values — so DST transitions land
//! on the correct side of the offset change.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{EngineError, Result};

/// Policy for local times that fall inside a DST gap (spring forward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DstPolicy {
    /// Drop the affected boundary; the candidate slot is skipped.
    #[default]
    Skip,
    /// Move to the first valid instant after the gap.
    ShiftForward,
}

/// Resolves a named IANA timezone once, then converts local wall-clock
/// datetimes to UTC instants.
#[derive(Debug, Clone, Copy)]
pub struct LocalTimeConverter {
    tz: Tz,
    policy: DstPolicy,
}

impl LocalTimeConverter {
    /// Fails with [`EngineError::InvalidTimezone`] when `zone` is not a
    /// recognized IANA identifier.
    pub fn new(zone: &str, policy: DstPolicy) -> Result<Self> {
        let tz: Tz = zone
            .parse()
            .map_err(|_| EngineError::InvalidTimezone(zone.to_string()))?;
        Ok(Self { tz, policy })
    }

    /// Build from an already-resolved zone, e.g. to derive a converter with
    /// a different gap policy.
    pub fn from_parts(tz: Tz, policy: DstPolicy) -> Self {
        Self { tz, policy }
    }

    pub fn zone(&self) -> Tz {
        self.tz
    }

    /// Convert one local boundary to UTC.
    ///
    /// Ambiguous local times (fall back, the hour occurs twice) resolve to
    /// the earlier instant. Nonexistent local times (spring forward) follow
    /// the gap policy: `None` under [`DstPolicy::Skip`], the first valid
    /// instant under [`DstPolicy::ShiftForward`].
    pub fn to_utc(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
        let local = date.and_time(time);
        match self.tz.from_local_datetime(&local) {
            chrono::LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
            chrono::LocalResult::Ambiguous(earlier, _) => Some(earlier.with_timezone(&Utc)),
            chrono::LocalResult::None => match self.policy {
                DstPolicy::Skip => None,
                DstPolicy::ShiftForward => self.first_valid_after(local),
            },
        }
    }

    /// Probe forward in 15-minute steps until the local time exists again.
    /// DST gaps are at most a few hours, so the scan is bounded.
    fn first_valid_after(&self, local: chrono::NaiveDateTime) -> Option<DateTime<Utc>> {
        let step = TimeDelta::minutes(15);
        let mut probe = local;
        for _ in 0..(4 * 4) {
            probe = probe.checked_add_signed(step)?;
            match self.tz.from_local_datetime(&probe) {
                chrono::LocalResult::Single(dt) => return Some(dt.with_timezone(&Utc)),
                chrono::LocalResult::Ambiguous(earlier, _) => {
                    return Some(earlier.with_timezone(&Utc))
                }
                chrono::LocalResult::None => continue,
            }
        }
        None
    }
}
