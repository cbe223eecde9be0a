//! Resolve a calendar date to its effective day plan.
//!
//! A date-specific override fully determines the plan when present — it never
//! inherits breaks from the weekday rule. Otherwise the weekday's recurring
//! rule applies; a missing rule means a non-working day. The resolution is
//! total: every date yields a [`DayPlan`].

use chrono::{Datelike, NaiveDate};

use crate::schedule::{LocalWindow, Schedule};

/// The effective plan for one calendar date, in the schedule's local time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayPlan {
    pub date: NaiveDate,
    /// `None` means the worker is off that day.
    pub working: Option<LocalWindow>,
    /// Break windows ordered by start time. Empty on non-working days.
    pub breaks: Vec<LocalWindow>,
}

impl DayPlan {
    pub fn is_working_day(&self) -> bool {
        self.working.is_some()
    }

    fn off(date: NaiveDate) -> Self {
        Self {
            date,
            working: None,
            breaks: Vec::new(),
        }
    }
}

/// Determine the effective day plan for `date`. Pure; no side effects.
pub fn resolve_day(schedule: &Schedule, date: NaiveDate) -> DayPlan {
    if !schedule.covers(date) {
        return DayPlan::off(date);
    }

    if let Some(ov) = schedule.override_for(date) {
        return DayPlan {
            date,
            working: ov.working_window(),
            breaks: ov.breaks().iter().map(|b| b.window()).collect(),
        };
    }

    match schedule.rule_for(date.weekday()) {
        Some(rule) => DayPlan {
            date,
            working: rule.working_window(),
            breaks: rule.breaks().iter().map(|b| b.window()).collect(),
        },
        None => DayPlan::off(date),
    }
}
