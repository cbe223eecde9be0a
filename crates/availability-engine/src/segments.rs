//! Subtract break windows from a working window.
//!
//! Clips each break to the window, sorts by start time so the result is
//! stable regardless of input order, then sweeps a cursor across the window
//! emitting the uncovered gaps. Empty remainders are dropped. Breaks are
//! validated upstream to be pairwise non-overlapping, so no point in the
//! window is subtracted twice.

use crate::schedule::LocalWindow;

/// Split `window` into the maximal sub-windows not covered by any break.
///
/// Returns disjoint segments ordered by start time. Breaks wholly outside
/// the window leave it untouched; a break covering the whole window yields
/// an empty result.
pub fn subtract_breaks(window: LocalWindow, breaks: &[LocalWindow]) -> Vec<LocalWindow> {
    // Clip breaks to the window, discarding those entirely outside.
    let mut clipped: Vec<(chrono::NaiveTime, chrono::NaiveTime)> = breaks
        .iter()
        .filter(|b| b.overlaps(&window))
        .map(|b| (b.start().max(window.start()), b.end().min(window.end())))
        .collect();

    if clipped.is_empty() {
        return vec![window];
    }

    clipped.sort_by_key(|&(start, _)| start);

    let mut segments = Vec::new();
    let mut cursor = window.start();

    for (break_start, break_end) in clipped {
        if cursor < break_start {
            // Validated construction: cursor < break_start <= window end.
            if let Ok(seg) = LocalWindow::new(cursor, break_start) {
                segments.push(seg);
            }
        }
        cursor = cursor.max(break_end);
    }

    if cursor < window.end() {
        if let Ok(seg) = LocalWindow::new(cursor, window.end()) {
            segments.push(seg);
        }
    }

    segments
}
