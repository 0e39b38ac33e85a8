//! JSON encoding of the persisted snapshot.
//!
//! Decoding never fails: unreadable content falls back to defaults, and each
//! top-level section is recovered independently so one damaged section does
//! not discard the others. Review records are recovered individually.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use kana_core::model::{CharacterId, ReviewState, Snapshot};

use crate::repository::StorageError;

/// Fixed key under which the snapshot blob is stored.
pub const SNAPSHOT_KEY: &str = "kana-learning-app";

/// Serialize a snapshot into its persisted JSON form.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the snapshot cannot be encoded.
pub fn encode(snapshot: &Snapshot) -> Result<String, StorageError> {
    serde_json::to_string(snapshot).map_err(|err| StorageError::Serialization(err.to_string()))
}

/// Decode a persisted blob, substituting defaults for anything unreadable.
#[must_use]
pub fn decode_lenient(raw: Option<&str>) -> Snapshot {
    let Some(raw) = raw else {
        return Snapshot::default();
    };

    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(error = %err, "stored snapshot is not valid JSON; using defaults");
            return Snapshot::default();
        }
    };

    let Value::Object(mut fields) = value else {
        tracing::warn!("stored snapshot is not an object; using defaults");
        return Snapshot::default();
    };

    let defaults = Snapshot::default();
    Snapshot {
        goals: section(&mut fields, &["goals"], defaults.goals),
        review_states: review_states(&mut fields),
        statistics: section(&mut fields, &["statistics"], defaults.statistics),
        learned_ids: section(
            &mut fields,
            &["learnedIds", "learnedKanaIds"],
            defaults.learned_ids,
        ),
    }
}

/// Removes the first of `keys` present in `fields`.
fn take<'k>(fields: &mut Map<String, Value>, keys: &[&'k str]) -> Option<(&'k str, Value)> {
    keys.iter()
        .find_map(|key| fields.remove(*key).map(|value| (*key, value)))
}

/// Review records are recovered one by one; an unreadable record is dropped alone.
fn review_states(fields: &mut Map<String, Value>) -> BTreeMap<CharacterId, ReviewState> {
    let Some((key, value)) = take(fields, &["reviewStates", "cardStates"]) else {
        return BTreeMap::new();
    };
    let Value::Object(records) = value else {
        tracing::warn!(section = key, "stored section unreadable; using defaults");
        return BTreeMap::new();
    };

    records
        .into_iter()
        .filter_map(|(id, mut record)| {
            if let Value::Object(record) = &mut record {
                if !record.contains_key("characterId") && !record.contains_key("kanaId") {
                    record.insert("characterId".to_owned(), Value::String(id.clone()));
                }
            }
            match serde_json::from_value::<ReviewState>(record) {
                Ok(state) => Some((CharacterId::new(id), state)),
                Err(err) => {
                    tracing::warn!(section = key, character = %id, error = %err, "skipping unreadable review record");
                    None
                }
            }
        })
        .collect()
}

fn section<T: DeserializeOwned>(
    fields: &mut Map<String, Value>,
    keys: &[&str],
    fallback: T,
) -> T {
    let Some((key, value)) = take(fields, keys) else {
        return fallback;
    };

    match serde_json::from_value(value) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(section = key, error = %err, "stored section unreadable; using defaults");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kana_core::model::{CharacterId, ReviewState};
    use kana_core::time::fixed_today;

    #[test]
    fn missing_blob_yields_defaults() {
        assert_eq!(decode_lenient(None), Snapshot::default());
    }

    #[test]
    fn garbage_yields_defaults() {
        assert_eq!(decode_lenient(Some("{not json")), Snapshot::default());
        assert_eq!(decode_lenient(Some("[1, 2, 3]")), Snapshot::default());
        assert_eq!(decode_lenient(Some("null")), Snapshot::default());
    }

    #[test]
    fn encoded_snapshot_decodes_back() {
        let mut snapshot = Snapshot::default();
        let id = CharacterId::new("hiragana-ka");
        snapshot
            .review_states
            .insert(id.clone(), ReviewState::initial(id.clone(), fixed_today()));
        snapshot.learned_ids.insert(id);
        snapshot.statistics.total_reviews = 3;

        let blob = encode(&snapshot).unwrap();
        assert_eq!(decode_lenient(Some(&blob)), snapshot);
    }

    #[test]
    fn damaged_section_keeps_the_rest() {
        let blob = r#"{
            "goals": "not an object",
            "statistics": { "totalReviews": 12, "streakDays": 3 },
            "learnedIds": ["hiragana-a"]
        }"#;
        let snapshot = decode_lenient(Some(blob));
        assert_eq!(snapshot.goals, Snapshot::default().goals);
        assert_eq!(snapshot.statistics.total_reviews, 12);
        assert_eq!(snapshot.statistics.streak_days, 3);
        assert_eq!(snapshot.learned_ids.len(), 1);
    }

    #[test]
    fn unreadable_review_record_is_dropped_alone() {
        let blob = r#"{
            "reviewStates": {
                "hiragana-a": {
                    "characterId": "hiragana-a",
                    "easeFactor": 2.6,
                    "interval": 6,
                    "repetitions": 2,
                    "nextReviewDate": "2024-03-21",
                    "lastReviewDate": "2024-03-15"
                },
                "hiragana-i": {
                    "characterId": "hiragana-i",
                    "interval": 1,
                    "repetitions": 1,
                    "nextReviewDate": "2024-03-16",
                    "lastReviewDate": "2024-03-15"
                },
                "hiragana-u": { "characterId": "hiragana-u", "interval": "soon" },
                "hiragana-e": 42
            }
        }"#;
        let snapshot = decode_lenient(Some(blob));

        assert_eq!(snapshot.review_states.len(), 2);
        let a = snapshot.review_state(&CharacterId::new("hiragana-a")).unwrap();
        assert_eq!(a.interval, 6);
        let i = snapshot.review_state(&CharacterId::new("hiragana-i")).unwrap();
        assert!((i.ease_factor - 2.5).abs() < f64::EPSILON);
        assert_eq!(i.repetitions, 1);
    }

    #[test]
    fn review_record_without_id_takes_its_key() {
        let blob = r#"{
            "cardStates": {
                "katakana-ka": { "nextReviewDate": "2024-03-15", "lastReviewDate": "2024-03-15" }
            }
        }"#;
        let snapshot = decode_lenient(Some(blob));
        let id = CharacterId::new("katakana-ka");
        assert_eq!(snapshot.review_state(&id).unwrap().character_id, id);
    }

    #[test]
    fn legacy_keys_are_read() {
        let blob = r#"{ "learnedKanaIds": ["katakana-a", "katakana-i"] }"#;
        let snapshot = decode_lenient(Some(blob));
        assert_eq!(snapshot.learned_ids.len(), 2);
    }
}
