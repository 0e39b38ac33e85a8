//! Daily quota and streak bookkeeping over [`Statistics`].
//!
//! Days are compared as calendar dates, so DST shifts and the time of day
//! never affect a transition.

use chrono::NaiveDate;

use crate::model::{LearningGoals, Statistics};
use crate::time::days_between;

/// Relationship between the last recorded study day and today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayTransition {
    /// Nothing recorded yet.
    FirstDay,
    SameDay,
    /// Exactly one calendar day since the last study day.
    NextDay,
    /// Any other gap, including a clock that moved backwards.
    StreakBroken { gap_days: i64 },
}

impl DayTransition {
    #[must_use]
    pub fn classify(last_study_date: Option<NaiveDate>, today: NaiveDate) -> Self {
        let Some(last) = last_study_date else {
            return Self::FirstDay;
        };
        match days_between(last, today) {
            0 => Self::SameDay,
            1 => Self::NextDay,
            gap_days => Self::StreakBroken { gap_days },
        }
    }
}

/// Remaining daily allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemainingQuota {
    pub new_cards: u32,
    pub reviews: u32,
}

/// Stateless tracker applying day rollovers and outcome counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuotaTracker;

impl QuotaTracker {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Applies the streak transition for `today` if the day changed.
    ///
    /// Returns the transition that was observed.
    pub fn begin_day(&self, stats: &mut Statistics, today: NaiveDate) -> DayTransition {
        let transition = DayTransition::classify(stats.last_study_date, today);
        match transition {
            DayTransition::SameDay => return transition,
            DayTransition::FirstDay => stats.streak_days = 1,
            DayTransition::NextDay => stats.streak_days = stats.streak_days.saturating_add(1),
            DayTransition::StreakBroken { gap_days } => {
                tracing::debug!(gap_days, previous = stats.streak_days, "streak reset");
                stats.streak_days = 1;
            }
        }
        stats.today_new_learned = 0;
        stats.today_reviewed = 0;
        stats.last_study_date = Some(today);
        transition
    }

    /// Counts one committed outcome.
    ///
    /// `was_new` selects which of today's counters is incremented.
    pub fn record(&self, stats: &mut Statistics, was_new: bool, correct: bool, today: NaiveDate) {
        self.begin_day(stats, today);
        stats.total_reviews = stats.total_reviews.saturating_add(1);
        if correct {
            stats.correct_reviews = stats.correct_reviews.saturating_add(1);
        }
        if was_new {
            stats.today_new_learned = stats.today_new_learned.saturating_add(1);
        } else {
            stats.today_reviewed = stats.today_reviewed.saturating_add(1);
        }
        stats.last_study_date = Some(today);
    }

    /// Today's counters as `(new learned, reviewed)`, zero when the ledger belongs to another day.
    #[must_use]
    pub fn today_counts(&self, stats: &Statistics, today: NaiveDate) -> (u32, u32) {
        if stats.last_study_date == Some(today) {
            (stats.today_new_learned, stats.today_reviewed)
        } else {
            (0, 0)
        }
    }

    /// Allowance left for today under `goals`; never negative.
    #[must_use]
    pub fn remaining(
        &self,
        goals: &LearningGoals,
        stats: &Statistics,
        today: NaiveDate,
    ) -> RemainingQuota {
        let (new_learned, reviewed) = self.today_counts(stats, today);
        RemainingQuota {
            new_cards: goals.daily_new_cards().saturating_sub(new_learned),
            reviews: goals.daily_review_limit().saturating_sub(reviewed),
        }
    }

    /// Streak as it should be displayed today: a streak whose last day is
    /// older than yesterday is already broken.
    #[must_use]
    pub fn current_streak(&self, stats: &Statistics, today: NaiveDate) -> u32 {
        match DayTransition::classify(stats.last_study_date, today) {
            DayTransition::SameDay | DayTransition::NextDay => stats.streak_days,
            DayTransition::FirstDay | DayTransition::StreakBroken { .. } => 0,
        }
    }
}
