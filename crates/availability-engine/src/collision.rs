//! Filter candidate slots against pre-existing fixed slots.
//!
//! A fixed slot is anything regeneration must not overwrite: manually
//! created, already booked, or operator-marked unavailable/break. This
//! filter is the sole guard against regeneration destroying operator intent
//! or double-allocating a worker.

use chrono::{DateTime, Utc};

use crate::pipeline::CandidateSlot;

/// Strict interval overlap. Adjacent intervals (one ends exactly when the
/// other starts) do not overlap.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Drop every candidate that overlaps any fixed `[start, end)` interval.
/// Candidates adjacent to a fixed boundary are retained.
pub fn retain_non_overlapping(
    candidates: Vec<CandidateSlot>,
    fixed: &[(DateTime<Utc>, DateTime<Utc>)],
) -> Vec<CandidateSlot> {
    candidates
        .into_iter()
        .filter(|cand| {
            !fixed
                .iter()
                .any(|&(fs, fe)| overlaps(cand.start, cand.end, fs, fe))
        })
        .collect()
}
