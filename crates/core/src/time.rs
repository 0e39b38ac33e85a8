use chrono::{Local, NaiveDate, Utc};

/// Source of the learner's calendar day.
///
/// Every operation asks for "today" exactly once, so a session that straddles
/// midnight is attributed to the day it was started on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    /// Calendar date in the machine's local timezone.
    #[default]
    Local,
    /// Calendar date in UTC.
    Utc,
    Fixed(NaiveDate),
}

impl Clock {
    /// Returns a clock pinned to the given date.
    #[must_use]
    pub fn fixed(on: NaiveDate) -> Self {
        Self::Fixed(on)
    }

    /// Returns the current calendar date according to the clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::Local => Local::now().date_naive(),
            Clock::Utc => Utc::now().date_naive(),
            Clock::Fixed(day) => *day,
        }
    }

    /// If this is a fixed clock, move it forward by `days` calendar days.
    ///
    /// Has no effect on wall-clock variants.
    pub fn advance_days(&mut self, days: u32) {
        if let Clock::Fixed(day) = self {
            *day = add_days(*day, days);
        }
    }

    /// Returns true if this clock is fixed.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Clock::Fixed(_))
    }
}

/// Adds whole days to a date, saturating at the calendar's upper bound.
#[must_use]
pub fn add_days(day: NaiveDate, days: u32) -> NaiveDate {
    day.checked_add_days(chrono::Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Signed number of calendar days from `earlier` to `later`.
#[must_use]
pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    later.signed_duration_since(earlier).num_days()
}

/// Deterministic date for tests and doc examples (2024-03-15).
///
/// # Panics
///
/// Panics if the fixed date cannot be represented.
#[must_use]
pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).expect("fixed date should be valid")
}

/// Returns a `Clock` fixed at the deterministic test date.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_today())
}
