//! The schedule aggregate: recurring weekly rules, date-specific overrides
//! and break periods.
//!
//! Child records (rule items, breaks, overrides) are owned by the aggregate
//! and mutated only through its operations, which re-validate the structural
//! invariants on every change: at most one rule per weekday, at most one
//! override per date, breaks contained in their working window and pairwise
//! non-overlapping.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::ids::{ScheduleId, WorkerId};

/// A half-open `[start, end)` wall-clock window within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl LocalWindow {
    /// Build a window, rejecting `start >= end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if start >= end {
            return Err(EngineError::InvalidSchedule(format!(
                "window start {start} must precede end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Strict interval overlap; adjacency does not count.
    pub fn overlaps(&self, other: &LocalWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True when `other` lies entirely within this window.
    pub fn contains(&self, other: &LocalWindow) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// A named break period inside a working window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakRule {
    name: String,
    window: LocalWindow,
}

impl BreakRule {
    pub fn new(name: impl Into<String>, window: LocalWindow) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EngineError::InvalidSchedule(
                "break name must not be empty".to_string(),
            ));
        }
        Ok(Self { name, window })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn window(&self) -> LocalWindow {
        self.window
    }
}

/// The recurring rule for one weekday. `working == None` means a day off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleItem {
    weekday: Weekday,
    working: Option<LocalWindow>,
    breaks: Vec<BreakRule>,
}

impl RuleItem {
    /// A working-day rule with optional breaks.
    pub fn working(weekday: Weekday, window: LocalWindow, breaks: Vec<BreakRule>) -> Result<Self> {
        validate_breaks(&window, &breaks)?;
        let mut breaks = breaks;
        breaks.sort_by_key(|b| b.window().start());
        Ok(Self {
            weekday,
            working: Some(window),
            breaks,
        })
    }

    /// A non-working weekday. Carries no window and no breaks.
    pub fn day_off(weekday: Weekday) -> Self {
        Self {
            weekday,
            working: None,
            breaks: Vec::new(),
        }
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn working_window(&self) -> Option<LocalWindow> {
        self.working
    }

    pub fn is_working_day(&self) -> bool {
        self.working.is_some()
    }

    /// Breaks ordered by start time.
    pub fn breaks(&self) -> &[BreakRule] {
        &self.breaks
    }

    fn validate(&self) -> Result<()> {
        match self.working {
            Some(window) => validate_breaks(&window, &self.breaks),
            None if self.breaks.is_empty() => Ok(()),
            None => Err(EngineError::InvalidSchedule(format!(
                "non-working {} rule must not carry breaks",
                self.weekday
            ))),
        }
    }
}

/// A date-specific override. Takes full precedence over the weekday rule:
/// it defines the complete day plan (window and breaks), or none at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Override {
    date: NaiveDate,
    reason: String,
    working: Option<LocalWindow>,
    breaks: Vec<BreakRule>,
}

impl Override {
    /// An override that keeps the date bookable under its own window.
    pub fn working(
        date: NaiveDate,
        reason: impl Into<String>,
        window: LocalWindow,
        breaks: Vec<BreakRule>,
    ) -> Result<Self> {
        validate_breaks(&window, &breaks)?;
        let mut breaks = breaks;
        breaks.sort_by_key(|b| b.window().start());
        Ok(Self {
            date,
            reason: reason.into(),
            working: Some(window),
            breaks,
        })
    }

    /// An override that closes the date entirely (holiday, sick day).
    pub fn day_off(date: NaiveDate, reason: impl Into<String>) -> Self {
        Self {
            date,
            reason: reason.into(),
            working: None,
            breaks: Vec::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn working_window(&self) -> Option<LocalWindow> {
        self.working
    }

    pub fn breaks(&self) -> &[BreakRule] {
        &self.breaks
    }

    fn validate(&self) -> Result<()> {
        match self.working {
            Some(window) => validate_breaks(&window, &self.breaks),
            None if self.breaks.is_empty() => Ok(()),
            None => Err(EngineError::InvalidSchedule(format!(
                "non-working override on {} must not carry breaks",
                self.date
            ))),
        }
    }
}

/// The schedule aggregate: owns rule items and overrides, carries the
/// worker's timezone and the date range the schedule is in effect for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub worker_id: WorkerId,
    pub name: String,
    /// IANA zone name, e.g. "Europe/Berlin". Resolved by the conversion layer.
    pub timezone: String,
    pub effective_from: NaiveDate,
    /// `None` means open-ended.
    pub effective_until: Option<NaiveDate>,
    rules: Vec<RuleItem>,
    overrides: Vec<Override>,
}

impl Schedule {
    pub fn new(
        worker_id: WorkerId,
        name: impl Into<String>,
        timezone: impl Into<String>,
        effective_from: NaiveDate,
        effective_until: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: ScheduleId::new(),
            worker_id,
            name: name.into(),
            timezone: timezone.into(),
            effective_from,
            effective_until,
            rules: Vec::new(),
            overrides: Vec::new(),
        }
    }

    /// Insert or replace the rule for its weekday.
    pub fn upsert_rule(&mut self, rule: RuleItem) -> Result<()> {
        rule.validate()?;
        self.rules.retain(|r| r.weekday() != rule.weekday());
        self.rules.push(rule);
        Ok(())
    }

    pub fn remove_rule(&mut self, weekday: Weekday) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.weekday() != weekday);
        self.rules.len() != before
    }

    /// Add a break to the weekday's rule, re-validating containment and
    /// disjointness against the breaks already present.
    pub fn add_break(&mut self, weekday: Weekday, brk: BreakRule) -> Result<()> {
        let rule = self
            .rules
            .iter_mut()
            .find(|r| r.weekday() == weekday)
            .ok_or_else(|| {
                EngineError::InvalidSchedule(format!("no rule for weekday {weekday}"))
            })?;
        let window = rule.working.ok_or_else(|| {
            EngineError::InvalidSchedule(format!("cannot add a break to non-working {weekday}"))
        })?;
        let mut breaks = rule.breaks.clone();
        breaks.push(brk);
        validate_breaks(&window, &breaks)?;
        breaks.sort_by_key(|b| b.window().start());
        rule.breaks = breaks;
        Ok(())
    }

    pub fn remove_break(&mut self, weekday: Weekday, name: &str) -> bool {
        let Some(rule) = self.rules.iter_mut().find(|r| r.weekday() == weekday) else {
            return false;
        };
        let before = rule.breaks.len();
        rule.breaks.retain(|b| b.name() != name);
        rule.breaks.len() != before
    }

    /// Insert or replace the override for its date.
    pub fn upsert_override(&mut self, ov: Override) -> Result<()> {
        ov.validate()?;
        self.overrides.retain(|o| o.date() != ov.date());
        self.overrides.push(ov);
        Ok(())
    }

    pub fn remove_override(&mut self, date: NaiveDate) -> bool {
        let before = self.overrides.len();
        self.overrides.retain(|o| o.date() != date);
        self.overrides.len() != before
    }

    pub fn rules(&self) -> &[RuleItem] {
        &self.rules
    }

    pub fn overrides(&self) -> &[Override] {
        &self.overrides
    }

    pub fn rule_for(&self, weekday: Weekday) -> Option<&RuleItem> {
        self.rules.iter().find(|r| r.weekday() == weekday)
    }

    pub fn override_for(&self, date: NaiveDate) -> Option<&Override> {
        self.overrides.iter().find(|o| o.date() == date)
    }

    /// True when the date falls inside the schedule's effective range.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.effective_from && self.effective_until.is_none_or(|until| date < until)
    }

    /// Re-check every aggregate invariant. Used after deserializing a
    /// schedule from an untrusted source, where construction bypassed the
    /// validating operations.
    pub fn validate(&self) -> Result<()> {
        for rule in &self.rules {
            rule.validate()?;
            if self.rules.iter().filter(|r| r.weekday() == rule.weekday()).count() > 1 {
                return Err(EngineError::InvalidSchedule(format!(
                    "duplicate rule for weekday {}",
                    rule.weekday()
                )));
            }
        }
        for ov in &self.overrides {
            ov.validate()?;
            if self.overrides.iter().filter(|o| o.date() == ov.date()).count() > 1 {
                return Err(EngineError::InvalidSchedule(format!(
                    "duplicate override for {}",
                    ov.date()
                )));
            }
        }
        if let Some(until) = self.effective_until {
            if until <= self.effective_from {
                return Err(EngineError::InvalidSchedule(format!(
                    "effective range {}..{} is empty",
                    self.effective_from, until
                )));
            }
        }
        Ok(())
    }
}

/// Breaks must lie within the working window and must not mutually overlap.
fn validate_breaks(window: &LocalWindow, breaks: &[BreakRule]) -> Result<()> {
    for brk in breaks {
        if !window.contains(&brk.window()) {
            return Err(EngineError::InvalidSchedule(format!(
                "break '{}' ({}-{}) lies outside the working window {}-{}",
                brk.name(),
                brk.window().start(),
                brk.window().end(),
                window.start(),
                window.end(),
            )));
        }
    }
    for (i, a) in breaks.iter().enumerate() {
        for b in &breaks[i + 1..] {
            if a.window().overlaps(&b.window()) {
                return Err(EngineError::InvalidSchedule(format!(
                    "breaks '{}' and '{}' overlap",
                    a.name(),
                    b.name()
                )));
            }
        }
    }
    Ok(())
}
