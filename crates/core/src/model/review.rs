use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::model::ids::CharacterId;

/// Ease factor assigned to a character on first exposure.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Hard floor for the ease factor.
pub const MIN_EASE_FACTOR: f64 = 1.3;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors that can occur while building review inputs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReviewError {
    #[error("invalid quality score: {0} (expected 0-5)")]
    InvalidQuality(u8),
}

//
// ─── QUALITY ──────────────────────────────────────────────────────────────────
//

/// Recall quality for one review event, validated to the range 0-5.
///
/// - `0`: complete blackout
/// - `1`: incorrect, remembered upon seeing the answer
/// - `2`: incorrect, but the answer felt easy
/// - `3`: correct with difficulty
/// - `4`: correct with hesitation
/// - `5`: perfect response
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MAX: u8 = 5;
    /// Lowest score counted as remembered.
    pub const PASSING: u8 = 3;
    /// Lowest score counted as mastered in single-pass drills.
    pub const MASTERED: u8 = 4;

    /// Validates a raw score.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::InvalidQuality` if the value is greater than 5.
    pub fn new(value: u8) -> Result<Self, ReviewError> {
        if value > Self::MAX {
            return Err(ReviewError::InvalidQuality(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// True when the score counts as remembered (no lapse).
    #[must_use]
    pub fn is_passing(self) -> bool {
        self.0 >= Self::PASSING
    }

    #[must_use]
    pub fn is_mastered(self) -> bool {
        self.0 >= Self::MASTERED
    }

    /// Maps a drill's correctness flag and the learner's confidence in `[0, 1]`
    /// to a quality score.
    #[must_use]
    pub fn from_correctness(correct: bool, confidence: f64) -> Self {
        let value = match (correct, confidence) {
            (false, c) if c < 0.5 => 0,
            (false, _) => 2,
            (true, c) if c >= 0.9 => 5,
            (true, c) if c >= 0.7 => 4,
            (true, _) => 3,
        };
        Self(value)
    }
}

impl TryFrom<u8> for Quality {
    type Error = ReviewError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(value: Quality) -> Self {
        value.0
    }
}

//
// ─── REVIEW STATE ─────────────────────────────────────────────────────────────
//

/// Per-character memory record driven by the SM-2 scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    #[serde(alias = "kanaId")]
    pub character_id: CharacterId,
    #[serde(default = "default_ease_factor", deserialize_with = "floored_ease_factor")]
    pub ease_factor: f64,
    /// Days between `last_review_date` and `next_review_date`.
    #[serde(default)]
    pub interval: u32,
    /// Consecutive passing recalls since the last lapse.
    #[serde(default)]
    pub repetitions: u32,
    pub next_review_date: NaiveDate,
    pub last_review_date: NaiveDate,
}

fn default_ease_factor() -> f64 {
    DEFAULT_EASE_FACTOR
}

/// Stored ease factors below the floor are raised to it; non-finite values reset to the default.
fn floored_ease_factor<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let ease = f64::deserialize(deserializer)?;
    Ok(if ease.is_finite() {
        ease.max(MIN_EASE_FACTOR)
    } else {
        DEFAULT_EASE_FACTOR
    })
}

impl ReviewState {
    /// Record for a character seen for the first time today.
    #[must_use]
    pub fn initial(character_id: CharacterId, today: NaiveDate) -> Self {
        Self {
            character_id,
            ease_factor: DEFAULT_EASE_FACTOR,
            interval: 0,
            repetitions: 0,
            next_review_date: today,
            last_review_date: today,
        }
    }

    /// Due once the scheduled date has arrived or passed.
    #[must_use]
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_review_date <= today
    }

    /// Strictly past the scheduled date.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.next_review_date < today
    }
}

//
// ─── OUTCOME ──────────────────────────────────────────────────────────────────
//

/// One drill result reported for a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub character_id: CharacterId,
    pub quality: Quality,
    pub correct: bool,
}

impl Outcome {
    #[must_use]
    pub fn new(character_id: CharacterId, quality: Quality, correct: bool) -> Self {
        Self {
            character_id,
            quality,
            correct,
        }
    }

    /// Outcome whose correctness follows the passing threshold.
    #[must_use]
    pub fn graded(character_id: CharacterId, quality: Quality) -> Self {
        let correct = quality.is_passing();
        Self::new(character_id, quality, correct)
    }

    /// Builds an outcome from raw drill input.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::InvalidQuality` if `quality` is outside 0-5.
    pub fn from_raw(
        character_id: impl Into<CharacterId>,
        quality: u8,
        correct: Option<bool>,
    ) -> Result<Self, ReviewError> {
        let quality = Quality::new(quality)?;
        let correct = correct.unwrap_or_else(|| quality.is_passing());
        Ok(Self::new(character_id.into(), quality, correct))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
