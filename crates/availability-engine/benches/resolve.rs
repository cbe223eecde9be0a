//! Benchmark a full-quarter resolution: 90 days of weekday rules with
//! breaks, sliced at 30 minutes, in a DST-observing zone.

use availability_engine::ids::WorkerId;
use availability_engine::{
    resolve_range, BreakRule, DateRange, DstPolicy, LocalTimeConverter, LocalWindow, RuleItem,
    Schedule,
};
use chrono::{NaiveDate, NaiveTime, Weekday};
use criterion::{criterion_group, criterion_main, Criterion};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn schedule() -> Schedule {
    let mut schedule = Schedule::new(
        WorkerId::new(),
        "bench",
        "America/New_York",
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        None,
    );
    for weekday in [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ] {
        let window = LocalWindow::new(t(8, 0), t(18, 0)).unwrap();
        let lunch = BreakRule::new("lunch", LocalWindow::new(t(12, 0), t(13, 0)).unwrap()).unwrap();
        let coffee =
            BreakRule::new("coffee", LocalWindow::new(t(15, 30), t(15, 45)).unwrap()).unwrap();
        schedule
            .upsert_rule(RuleItem::working(weekday, window, vec![lunch, coffee]).unwrap())
            .unwrap();
    }
    schedule
}

fn bench_resolve_quarter(c: &mut Criterion) {
    let schedule = schedule();
    let converter = LocalTimeConverter::new("America/New_York", DstPolicy::Skip).unwrap();
    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
    );

    c.bench_function("resolve_quarter_30min", |b| {
        b.iter(|| resolve_range(&schedule, &converter, range, 30, 366).unwrap())
    });
}

criterion_group!(benches, bench_resolve_quarter);
criterion_main!(benches);
