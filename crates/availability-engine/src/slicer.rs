//! Slice a working segment into fixed-duration candidate slots.
//!
//! Produces consecutive `[start, start+duration)` windows entirely contained
//! in the segment. The trailing remainder shorter than the duration is
//! discarded, never rounded up or padded.

use chrono::{NaiveTime, Timelike};

use crate::schedule::LocalWindow;

/// Lazy iterator over the candidate slots of one segment.
///
/// Works in seconds-from-midnight space: `NaiveTime` arithmetic wraps at
/// midnight, which would corrupt the end-of-segment comparison.
#[derive(Debug, Clone)]
pub struct SliceIter {
    cursor_secs: u32,
    end_secs: u32,
    step_secs: u32,
}

impl Iterator for SliceIter {
    type Item = LocalWindow;

    fn next(&mut self) -> Option<LocalWindow> {
        let slot_end = self.cursor_secs.checked_add(self.step_secs)?;
        if slot_end > self.end_secs {
            return None;
        }
        let start = NaiveTime::from_num_seconds_from_midnight_opt(self.cursor_secs, 0)?;
        let end = NaiveTime::from_num_seconds_from_midnight_opt(slot_end, 0)?;
        self.cursor_secs = slot_end;
        // Start < end by construction since step_secs > 0.
        LocalWindow::new(start, end).ok()
    }
}

/// Slice `segment` into `duration_minutes`-long candidates.
///
/// `duration_minutes` must be validated as strictly positive by the caller;
/// a zero duration yields an empty iterator rather than looping forever.
pub fn slice_segment(segment: LocalWindow, duration_minutes: u32) -> SliceIter {
    let step_secs = duration_minutes * 60;
    SliceIter {
        cursor_secs: if step_secs == 0 {
            // Degenerate guard: exhaust immediately.
            segment.end().num_seconds_from_midnight()
        } else {
            segment.start().num_seconds_from_midnight()
        },
        end_secs: segment.end().num_seconds_from_midnight(),
        step_secs: step_secs.max(1),
    }
}
