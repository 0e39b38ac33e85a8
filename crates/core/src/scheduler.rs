use chrono::NaiveDate;

use crate::model::{CharacterId, MIN_EASE_FACTOR, Quality, ReviewState};
use crate::time::add_days;

/// Interval after the first passing recall.
pub const FIRST_INTERVAL_DAYS: u32 = 1;

/// Interval after the second consecutive passing recall.
pub const SECOND_INTERVAL_DAYS: u32 = 6;

/// Interval assigned after a lapse.
pub const LAPSE_INTERVAL_DAYS: u32 = 1;

//
// ─── SM-2 ──────────────────────────────────────────────────────────────────────
//

/// Change applied to the ease factor for a given quality.
///
/// `0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)`: +0.10 at 5, 0.00 at 4,
/// -0.14 at 3, down to -0.80 at 0.
#[must_use]
pub fn ease_delta(quality: Quality) -> f64 {
    let miss = f64::from(Quality::MAX - quality.value());
    0.1 - miss * (0.08 + miss * 0.02)
}

/// Computes the record that follows `state` after a review graded `quality` on `today`.
///
/// Interval growth uses the interval and ease factor from *before* this review.
///
/// # Examples
///
/// ```
/// # use kana_core::model::{CharacterId, Quality, ReviewState};
/// # use kana_core::scheduler::next_state;
/// # use kana_core::time::fixed_today;
/// let today = fixed_today();
/// let fresh = ReviewState::initial(CharacterId::new("hiragana-a"), today);
/// let next = next_state(&fresh, Quality::new(4)?, today);
/// assert_eq!(next.interval, 1);
/// assert_eq!(next.repetitions, 1);
/// # Ok::<(), kana_core::model::ReviewError>(())
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn next_state(state: &ReviewState, quality: Quality, today: NaiveDate) -> ReviewState {
    let (interval, repetitions) = if quality.is_passing() {
        let repetitions = state.repetitions.saturating_add(1);
        let interval = match repetitions {
            1 => FIRST_INTERVAL_DAYS,
            2 => SECOND_INTERVAL_DAYS,
            _ => {
                let grown = (f64::from(state.interval) * state.ease_factor).round();
                // Saturates at u32::MAX.
                grown.clamp(0.0, f64::from(u32::MAX)) as u32
            }
        };
        (interval, repetitions)
    } else {
        (LAPSE_INTERVAL_DAYS, 0)
    };

    let ease_factor = (state.ease_factor + ease_delta(quality)).max(MIN_EASE_FACTOR);

    ReviewState {
        character_id: state.character_id.clone(),
        ease_factor,
        interval,
        repetitions,
        next_review_date: add_days(today, interval),
        last_review_date: today,
    }
}

//
// ─── SCHEDULER ─────────────────────────────────────────────────────────────────
//

/// Result of scheduling one review.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedReview {
    pub state: ReviewState,
    /// True when no record existed before this review.
    pub first_exposure: bool,
    pub lapsed: bool,
}

/// Stateless SM-2 scheduler.
///
/// Creates records lazily on first exposure and delegates to [`next_state`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Scheduler;

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Apply a review to an existing record, or to a fresh one when `previous` is `None`.
    #[must_use]
    pub fn apply_review(
        &self,
        character_id: &CharacterId,
        previous: Option<&ReviewState>,
        quality: Quality,
        today: NaiveDate,
    ) -> AppliedReview {
        let first_exposure = previous.is_none();
        let state = match previous {
            Some(state) => next_state(state, quality, today),
            None => next_state(
                &ReviewState::initial(character_id.clone(), today),
                quality,
                today,
            ),
        };

        tracing::debug!(
            character = %character_id,
            quality = quality.value(),
            interval = state.interval,
            repetitions = state.repetitions,
            ease = state.ease_factor,
            "scheduled review"
        );

        AppliedReview {
            state,
            first_exposure,
            lapsed: !quality.is_passing(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
