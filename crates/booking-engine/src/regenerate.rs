//! The regeneration coordinator: schedule definition → persisted slot set.
//!
//! Orchestrates the pure pipeline across a date range and keeps the result
//! consistent with operator intent: fixed slots are never overwritten, stale
//! generated-but-unbooked slots are purged first (when asked to), and the
//! survivors are persisted as one batch. Re-running with `overwrite = true`
//! and unchanged inputs yields the same final slot set.

use availability_engine::ids::{BusinessId, ScheduleId, WorkerId};
use availability_engine::{
    resolve_range, retain_non_overlapping, DateRange, DstPolicy, EngineError, LocalTimeConverter,
    Schedule,
};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use tracing::{debug, info};

use crate::error::{BookingError, Result};
use crate::slot::AvailabilitySlot;
use crate::store::{ScheduleDirectory, Store, StoreTxn};

/// Behavior knobs for regeneration.
#[derive(Debug, Clone, Copy)]
pub struct RegenerationConfig {
    /// Upper bound on the requested range, in days.
    pub max_range_days: i64,
    /// Widening applied to the fixed-slot lookup so boundary overlaps just
    /// outside the range are still caught.
    pub fixed_lookup_buffer: TimeDelta,
}

impl Default for RegenerationConfig {
    fn default() -> Self {
        Self {
            max_range_days: 366,
            fixed_lookup_buffer: TimeDelta::hours(1),
        }
    }
}

/// Inputs for one regeneration run.
#[derive(Debug, Clone, Copy)]
pub struct RegenerateParams {
    pub worker_id: WorkerId,
    pub business_id: BusinessId,
    /// Explicit schedule, or `None` for the worker's default.
    pub schedule_id: Option<ScheduleId>,
    pub range: DateRange,
    pub slot_duration_minutes: u32,
    /// Purge stale generated-and-unbooked slots in range before generating.
    pub overwrite: bool,
}

/// Drives the resolution pipeline and persists the outcome.
pub struct RegenerationCoordinator<S, D> {
    store: S,
    schedules: D,
    config: RegenerationConfig,
}

impl<S: Store, D: ScheduleDirectory> RegenerationCoordinator<S, D> {
    pub fn new(store: S, schedules: D) -> Self {
        Self::with_config(store, schedules, RegenerationConfig::default())
    }

    pub fn with_config(store: S, schedules: D, config: RegenerationConfig) -> Self {
        Self {
            store,
            schedules,
            config,
        }
    }

    /// Regenerate the worker's slot set over the range. Returns the number
    /// of slots persisted.
    pub fn regenerate(&self, params: &RegenerateParams) -> Result<usize> {
        let schedule = self.resolve_schedule(params)?;

        // Fail fast on inputs before touching any stored slot.
        let converter = LocalTimeConverter::new(&schedule.timezone, DstPolicy::Skip)
            .map_err(BookingError::Engine)?;
        params
            .range
            .validate(self.config.max_range_days)
            .map_err(BookingError::Engine)?;
        if params.slot_duration_minutes == 0 {
            return Err(BookingError::Engine(EngineError::InvalidDuration(0)));
        }

        let (range_start, range_end) = utc_bounds(&converter, params.range);

        if params.overwrite {
            let purged = self.purge_stale(params.worker_id, range_start, range_end)?;
            debug!(
                worker = %params.worker_id,
                purged,
                "purged stale generated slots before regeneration"
            );
        }

        let fixed = self.fixed_windows(params.worker_id, range_start, range_end)?;

        let candidates = resolve_range(
            &schedule,
            &converter,
            params.range,
            params.slot_duration_minutes,
            self.config.max_range_days,
        )?;
        let survivors = retain_non_overlapping(candidates, &fixed);

        let slots: Vec<AvailabilitySlot> = survivors
            .iter()
            .map(|c| {
                AvailabilitySlot::new_generated(
                    params.worker_id,
                    params.business_id,
                    c.start,
                    c.end,
                    schedule.id,
                )
            })
            .collect();
        let count = slots.len();

        self.store.with_txn(|txn| txn.insert_slots(slots))?;

        info!(
            worker = %params.worker_id,
            schedule = %schedule.id,
            from = %params.range.from,
            to = %params.range.to,
            count,
            "regenerated availability slots"
        );
        Ok(count)
    }

    fn resolve_schedule(&self, params: &RegenerateParams) -> Result<Schedule> {
        let schedule = match params.schedule_id {
            Some(id) => self.schedules.find(id)?,
            None => self.schedules.default_for_worker(params.worker_id)?,
        };
        let schedule = schedule.ok_or_else(|| {
            BookingError::not_found(
                "schedule",
                params
                    .schedule_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| format!("default for worker {}", params.worker_id)),
            )
        })?;
        if schedule.worker_id != params.worker_id {
            // Belongs to someone else; indistinguishable from absent.
            return Err(BookingError::not_found("schedule", schedule.id));
        }
        Ok(schedule)
    }

    /// Delete generated-and-still-available slots in range, committed as one
    /// batch before any candidate is produced.
    fn purge_stale(
        &self,
        worker_id: WorkerId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<usize> {
        self.store.with_txn(|txn| {
            let stale: Vec<_> = txn
                .slots_in_range(worker_id, from, to)?
                .into_iter()
                .filter(|s| s.is_purgeable())
                .map(|s| s.id)
                .collect();
            let count = stale.len();
            txn.delete_slots(&stale)?;
            Ok(count)
        })
    }

    /// Fixed `[start, end)` windows in the widened range.
    fn fixed_windows(
        &self,
        worker_id: WorkerId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<(DateTime<Utc>, DateTime<Utc>)>> {
        let buffer = self.config.fixed_lookup_buffer;
        self.store.with_txn(|txn| {
            Ok(txn
                .slots_in_range(worker_id, from - buffer, to + buffer)?
                .into_iter()
                .filter(|s| s.is_fixed())
                .map(|s| (s.start, s.end))
                .collect())
        })
    }
}

/// UTC query bounds for a local date range: local midnight of the first day
/// up to local midnight after the last day. Midnights that fall in a DST gap
/// shift forward to the first valid instant of the day.
fn utc_bounds(converter: &LocalTimeConverter, range: DateRange) -> (DateTime<Utc>, DateTime<Utc>) {
    let midnight = NaiveTime::MIN;
    let day_after = range
        .to
        .checked_add_signed(TimeDelta::days(1))
        .unwrap_or(range.to);
    (bound(converter, range.from, midnight), bound(converter, day_after, midnight))
}

fn bound(converter: &LocalTimeConverter, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let shifting = LocalTimeConverter::from_parts(converter.zone(), DstPolicy::ShiftForward);
    shifting
        .to_utc(date, time)
        .unwrap_or_else(|| Utc.from_utc_datetime(&date.and_time(time)))
}
