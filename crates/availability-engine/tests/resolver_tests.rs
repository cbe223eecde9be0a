//! Day-plan resolution: override precedence, weekday fallback, totality.

use availability_engine::ids::WorkerId;
use availability_engine::{resolve_day, BreakRule, LocalWindow, Override, RuleItem, Schedule};
use chrono::{NaiveDate, NaiveTime, Weekday};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn w(sh: u32, sm: u32, eh: u32, em: u32) -> LocalWindow {
    LocalWindow::new(t(sh, sm), t(eh, em)).unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Mon-Fri 09:00-17:00 with a lunch break, weekends off.
fn weekday_schedule() -> Schedule {
    let mut schedule = Schedule::new(WorkerId::new(), "default", "UTC", d(2026, 1, 1), None);
    for weekday in [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ] {
        let lunch = BreakRule::new("lunch", w(12, 0, 13, 0)).unwrap();
        schedule
            .upsert_rule(RuleItem::working(weekday, w(9, 0, 17, 0), vec![lunch]).unwrap())
            .unwrap();
    }
    schedule
}

// ── Weekday rule fallback ───────────────────────────────────────────────────

#[test]
fn weekday_rule_applies_when_no_override() {
    let schedule = weekday_schedule();
    // 2026-03-16 is a Monday.
    let plan = resolve_day(&schedule, d(2026, 3, 16));

    assert!(plan.is_working_day());
    assert_eq!(plan.working, Some(w(9, 0, 17, 0)));
    assert_eq!(plan.breaks, vec![w(12, 0, 13, 0)]);
}

#[test]
fn missing_weekday_rule_means_non_working() {
    let schedule = weekday_schedule();
    // 2026-03-21 is a Saturday; no rule was defined for it.
    let plan = resolve_day(&schedule, d(2026, 3, 21));

    assert!(!plan.is_working_day());
    assert!(plan.breaks.is_empty());
}

#[test]
fn explicit_day_off_rule_means_non_working() {
    let mut schedule = weekday_schedule();
    schedule
        .upsert_rule(RuleItem::day_off(Weekday::Wed))
        .unwrap();
    let plan = resolve_day(&schedule, d(2026, 3, 18));
    assert!(!plan.is_working_day());
}

// ── Override precedence ─────────────────────────────────────────────────────

#[test]
fn override_takes_precedence_over_weekday_rule() {
    let mut schedule = weekday_schedule();
    schedule
        .upsert_override(
            Override::working(d(2026, 3, 16), "short day", w(10, 0, 14, 0), vec![]).unwrap(),
        )
        .unwrap();

    let plan = resolve_day(&schedule, d(2026, 3, 16));
    assert_eq!(plan.working, Some(w(10, 0, 14, 0)));
    // The override defines the complete plan — the weekday rule's lunch
    // break does not leak through.
    assert!(plan.breaks.is_empty());
}

#[test]
fn override_carries_its_own_breaks() {
    let mut schedule = weekday_schedule();
    let pause = BreakRule::new("pause", w(11, 0, 11, 30)).unwrap();
    schedule
        .upsert_override(
            Override::working(d(2026, 3, 17), "altered", w(10, 0, 14, 0), vec![pause]).unwrap(),
        )
        .unwrap();

    let plan = resolve_day(&schedule, d(2026, 3, 17));
    assert_eq!(plan.breaks, vec![w(11, 0, 11, 30)]);
}

#[test]
fn non_working_override_closes_a_working_weekday() {
    let mut schedule = weekday_schedule();
    schedule
        .upsert_override(Override::day_off(d(2026, 3, 16), "public holiday"))
        .unwrap();

    let plan = resolve_day(&schedule, d(2026, 3, 16));
    assert!(!plan.is_working_day());
}

#[test]
fn working_override_opens_a_non_working_weekday() {
    let mut schedule = weekday_schedule();
    // 2026-03-22 is a Sunday with no rule.
    schedule
        .upsert_override(
            Override::working(d(2026, 3, 22), "covering a shift", w(12, 0, 16, 0), vec![]).unwrap(),
        )
        .unwrap();

    let plan = resolve_day(&schedule, d(2026, 3, 22));
    assert_eq!(plan.working, Some(w(12, 0, 16, 0)));
}

// ── Effective range ─────────────────────────────────────────────────────────

#[test]
fn dates_outside_effective_range_resolve_non_working() {
    let mut schedule = Schedule::new(
        WorkerId::new(),
        "spring",
        "UTC",
        d(2026, 3, 1),
        Some(d(2026, 4, 1)),
    );
    schedule
        .upsert_rule(RuleItem::working(Weekday::Mon, w(9, 0, 17, 0), vec![]).unwrap())
        .unwrap();

    // Mondays inside and outside the effective range.
    assert!(resolve_day(&schedule, d(2026, 3, 16)).is_working_day());
    assert!(!resolve_day(&schedule, d(2026, 4, 6)).is_working_day());
    assert!(!resolve_day(&schedule, d(2026, 2, 23)).is_working_day());
}

#[test]
fn resolution_is_total_for_arbitrary_dates() {
    let schedule = weekday_schedule();
    // Far past and far future still produce a plan.
    let past = resolve_day(&schedule, d(1990, 1, 1));
    let future = resolve_day(&schedule, d(2099, 12, 31));
    assert!(!past.is_working_day());
    assert_eq!(future.date, d(2099, 12, 31));
}
