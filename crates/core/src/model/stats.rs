use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Running study ledger: lifetime counters, streak, and today's counters.
///
/// Only the quota & streak tracker mutates this record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistics {
    pub total_reviews: u32,
    pub correct_reviews: u32,
    pub streak_days: u32,
    /// `None` until the first outcome is recorded.
    #[serde(with = "optional_date")]
    pub last_study_date: Option<NaiveDate>,
    pub today_new_learned: u32,
    pub today_reviewed: u32,
}

impl Statistics {
    /// Lifetime share of correct reviews, rounded to a whole percent.
    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        percent(self.correct_reviews, self.total_reviews)
    }
}

/// `part / whole` as a rounded percentage, `0` when `whole` is zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (f64::from(part) * 100.0 / f64::from(whole)).round() as u32
}

/// Serializes an optional date as `YYYY-MM-DD`, with the empty string for `None`.
mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(day) => serializer.collect_str(&day.format(FORMAT)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(trimmed, FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}
