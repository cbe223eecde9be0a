//! Break subtraction over a working window.

use availability_engine::{subtract_breaks, LocalWindow};
use chrono::NaiveTime;

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn w(sh: u32, sm: u32, eh: u32, em: u32) -> LocalWindow {
    LocalWindow::new(t(sh, sm), t(eh, em)).unwrap()
}

#[test]
fn single_break_splits_window_in_two() {
    let segments = subtract_breaks(w(9, 0, 17, 0), &[w(12, 0, 13, 0)]);
    assert_eq!(segments, vec![w(9, 0, 12, 0), w(13, 0, 17, 0)]);
}

#[test]
fn no_breaks_returns_whole_window() {
    let segments = subtract_breaks(w(9, 0, 17, 0), &[]);
    assert_eq!(segments, vec![w(9, 0, 17, 0)]);
}

#[test]
fn break_at_window_start_trims_leading_edge() {
    let segments = subtract_breaks(w(9, 0, 17, 0), &[w(9, 0, 10, 0)]);
    assert_eq!(segments, vec![w(10, 0, 17, 0)]);
}

#[test]
fn break_at_window_end_trims_trailing_edge() {
    let segments = subtract_breaks(w(9, 0, 17, 0), &[w(16, 0, 17, 0)]);
    assert_eq!(segments, vec![w(9, 0, 16, 0)]);
}

#[test]
fn break_covering_whole_window_leaves_nothing() {
    let segments = subtract_breaks(w(9, 0, 17, 0), &[w(8, 0, 18, 0)]);
    assert!(segments.is_empty());
}

#[test]
fn break_wholly_outside_window_leaves_it_untouched() {
    let segments = subtract_breaks(w(9, 0, 17, 0), &[w(18, 0, 19, 0)]);
    assert_eq!(segments, vec![w(9, 0, 17, 0)]);

    let segments = subtract_breaks(w(9, 0, 17, 0), &[w(7, 0, 8, 30)]);
    assert_eq!(segments, vec![w(9, 0, 17, 0)]);
}

#[test]
fn break_overhanging_window_start_is_clipped() {
    let segments = subtract_breaks(w(9, 0, 17, 0), &[w(8, 0, 9, 30)]);
    assert_eq!(segments, vec![w(9, 30, 17, 0)]);
}

#[test]
fn multiple_breaks_produce_multiple_segments() {
    let segments = subtract_breaks(
        w(9, 0, 17, 0),
        &[w(10, 30, 10, 45), w(12, 0, 13, 0), w(15, 0, 15, 15)],
    );
    assert_eq!(
        segments,
        vec![
            w(9, 0, 10, 30),
            w(10, 45, 12, 0),
            w(13, 0, 15, 0),
            w(15, 15, 17, 0),
        ]
    );
}

#[test]
fn result_is_stable_regardless_of_break_input_order() {
    let ordered = subtract_breaks(w(9, 0, 17, 0), &[w(10, 0, 10, 30), w(14, 0, 14, 30)]);
    let reversed = subtract_breaks(w(9, 0, 17, 0), &[w(14, 0, 14, 30), w(10, 0, 10, 30)]);
    assert_eq!(ordered, reversed);
}

#[test]
fn adjacent_breaks_leave_no_sliver_between_them() {
    let segments = subtract_breaks(w(9, 0, 17, 0), &[w(12, 0, 12, 30), w(12, 30, 13, 0)]);
    assert_eq!(segments, vec![w(9, 0, 12, 0), w(13, 0, 17, 0)]);
}

#[test]
fn total_segment_duration_accounts_for_breaks() {
    let window = w(9, 0, 17, 0);
    let breaks = [w(12, 0, 13, 0), w(15, 0, 15, 30)];
    let segments = subtract_breaks(window, &breaks);

    let total: i64 = segments.iter().map(|s| s.duration_minutes()).sum();
    assert_eq!(total, 8 * 60 - 60 - 30);
}
