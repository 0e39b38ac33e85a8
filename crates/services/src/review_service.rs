use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use kana_core::{
    Catalog,
    model::{CharacterId, Outcome, Snapshot, percent},
    scheduler::Scheduler,
    tracker::QuotaTracker,
};

use crate::sessions::SessionKind;

//
// ─── DEDUPLICATION ─────────────────────────────────────────────────────────────
//

/// Collapses repeated outcomes for the same character.
///
/// The last recorded outcome wins; characters keep the position of their
/// first appearance.
///
/// ```
/// # use kana_core::model::{CharacterId, Outcome, Quality};
/// # use services::review_service::dedup_outcomes;
/// let ka = CharacterId::new("hiragana-ka");
/// let outcomes = vec![
///     Outcome::graded(ka.clone(), Quality::new(1).unwrap()),
///     Outcome::graded(ka.clone(), Quality::new(5).unwrap()),
/// ];
/// let deduped = dedup_outcomes(outcomes);
/// assert_eq!(deduped.len(), 1);
/// assert_eq!(deduped[0].quality.value(), 5);
/// ```
#[must_use]
pub fn dedup_outcomes(outcomes: impl IntoIterator<Item = Outcome>) -> Vec<Outcome> {
    let mut ordered: Vec<Outcome> = Vec::new();
    let mut positions: HashMap<CharacterId, usize> = HashMap::new();
    for outcome in outcomes {
        match positions.get(&outcome.character_id) {
            Some(&position) => ordered[position] = outcome,
            None => {
                positions.insert(outcome.character_id.clone(), ordered.len());
                ordered.push(outcome);
            }
        }
    }
    ordered
}

//
// ─── COMMIT SUMMARY ────────────────────────────────────────────────────────────
//

/// What a committed batch of outcomes amounted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitSummary {
    pub kind: SessionKind,
    /// Distinct known characters in the batch.
    pub studied: u32,
    pub correct: u32,
    /// Characters that entered the learned set with this batch.
    pub newly_learned: u32,
    pub lapses: u32,
    /// Outcomes naming characters absent from the catalog.
    pub skipped: u32,
}

impl CommitSummary {
    fn empty(kind: SessionKind) -> Self {
        Self {
            kind,
            studied: 0,
            correct: 0,
            newly_learned: 0,
            lapses: 0,
            skipped: 0,
        }
    }

    /// Share of correct answers in this batch, rounded to a whole percent.
    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        percent(self.correct, self.studied)
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Applies session outcomes to the learner snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewService {
    scheduler: Scheduler,
    tracker: QuotaTracker,
}

impl ReviewService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit `outcomes` of a `kind` session into `snapshot`.
    ///
    /// - Outcomes are deduplicated first, so committing the same batch twice
    ///   within a session counts each character once.
    /// - Practice sessions only produce a summary; the snapshot is untouched.
    /// - Characters unknown to `catalog` are skipped and logged.
    /// - A passing score moves the character into the learned set; the
    ///   outcome counts as new when the character was not learned before.
    pub fn apply_outcomes(
        &self,
        snapshot: &mut Snapshot,
        kind: SessionKind,
        outcomes: impl IntoIterator<Item = Outcome>,
        catalog: &dyn Catalog,
        today: NaiveDate,
    ) -> CommitSummary {
        let mut summary = CommitSummary::empty(kind);

        for outcome in dedup_outcomes(outcomes) {
            let Outcome {
                character_id,
                quality,
                correct,
            } = outcome;

            if !catalog.contains(&character_id) {
                tracing::warn!(character = %character_id, "skipping outcome for unknown character");
                summary.skipped += 1;
                continue;
            }

            summary.studied += 1;
            if correct {
                summary.correct += 1;
            }
            if !kind.counts_toward_schedule() {
                continue;
            }

            let was_new = !snapshot.learned_ids.contains(&character_id);
            let applied = self.scheduler.apply_review(
                &character_id,
                snapshot.review_states.get(&character_id),
                quality,
                today,
            );
            if applied.lapsed {
                summary.lapses += 1;
            }
            snapshot
                .review_states
                .insert(character_id.clone(), applied.state);

            if quality.is_passing() && snapshot.learned_ids.insert(character_id) {
                summary.newly_learned += 1;
            }
            self.tracker
                .record(&mut snapshot.statistics, was_new, correct, today);
        }

        tracing::info!(
            ?kind,
            studied = summary.studied,
            correct = summary.correct,
            newly_learned = summary.newly_learned,
            skipped = summary.skipped,
            "committed outcomes"
        );
        summary
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use kana_core::KanaCatalog;
    use kana_core::model::{LearningGoalsDraft, Quality, ReviewState};
    use kana_core::time::{add_days, fixed_today};

    fn outcome(id: &str, quality: u8) -> Outcome {
        Outcome::from_raw(id, quality, None).unwrap()
    }

    fn ids(outcomes: &[Outcome]) -> Vec<&str> {
        outcomes.iter().map(|o| o.character_id.as_str()).collect()
    }

    #[test]
    fn dedup_keeps_last_outcome_at_first_position() {
        let deduped = dedup_outcomes(vec![
            outcome("hiragana-a", 1),
            outcome("hiragana-i", 4),
            outcome("hiragana-a", 5),
        ]);
        assert_eq!(ids(&deduped), ["hiragana-a", "hiragana-i"]);
        assert_eq!(deduped[0].quality, Quality::new(5).unwrap());
    }

    #[test]
    fn first_pass_creates_state_and_learns() {
        let catalog = KanaCatalog::builtin();
        let today = fixed_today();
        let mut snapshot = Snapshot::default();

        let summary = ReviewService::new().apply_outcomes(
            &mut snapshot,
            SessionKind::Regular,
            vec![outcome("hiragana-ka", 4)],
            &catalog,
            today,
        );

        let state = snapshot
            .review_state(&CharacterId::new("hiragana-ka"))
            .unwrap();
        assert_eq!(state.repetitions, 1);
        assert_eq!(state.interval, 1);
        assert!((state.ease_factor - 2.5).abs() < 1e-9);
        assert_eq!(state.next_review_date, add_days(today, 1));
        assert!(snapshot.learned_ids.contains(&CharacterId::new("hiragana-ka")));
        assert_eq!(snapshot.statistics.today_new_learned, 1);
        assert_eq!(snapshot.statistics.today_reviewed, 0);
        assert_eq!(snapshot.statistics.streak_days, 1);
        assert_eq!(summary.newly_learned, 1);
        assert_eq!(summary.accuracy_percent(), 100);
    }

    #[test]
    fn failed_first_exposure_is_tracked_but_not_learned() {
        let catalog = KanaCatalog::builtin();
        let mut snapshot = Snapshot::default();

        let summary = ReviewService::new().apply_outcomes(
            &mut snapshot,
            SessionKind::Regular,
            vec![outcome("hiragana-ki", 1)],
            &catalog,
            fixed_today(),
        );

        let id = CharacterId::new("hiragana-ki");
        assert!(snapshot.review_state(&id).is_some());
        assert!(!snapshot.learned_ids.contains(&id));
        assert_eq!(snapshot.statistics.today_new_learned, 1);
        assert_eq!(snapshot.statistics.correct_reviews, 0);
        assert_eq!(summary.lapses, 1);
        assert_eq!(summary.newly_learned, 0);
    }

    #[test]
    fn known_character_counts_as_review() {
        let catalog = KanaCatalog::builtin();
        let today = fixed_today();
        let id = CharacterId::new("hiragana-a");
        let mut snapshot = Snapshot::default();
        let mut state = ReviewState::initial(id.clone(), today);
        state.ease_factor = 2.3;
        state.interval = 6;
        state.repetitions = 2;
        snapshot.review_states.insert(id.clone(), state);
        snapshot.learned_ids.insert(id.clone());

        ReviewService::new().apply_outcomes(
            &mut snapshot,
            SessionKind::Regular,
            vec![outcome("hiragana-a", 1)],
            &catalog,
            today,
        );

        let state = snapshot.review_state(&id).unwrap();
        assert_eq!(state.repetitions, 0);
        assert_eq!(state.interval, 1);
        assert!((state.ease_factor - 1.76).abs() < 1e-9);
        assert!(snapshot.learned_ids.contains(&id));
        assert_eq!(snapshot.statistics.today_reviewed, 1);
        assert_eq!(snapshot.statistics.today_new_learned, 0);
    }

    #[test]
    fn practice_leaves_snapshot_untouched() {
        let catalog = KanaCatalog::builtin();
        let mut snapshot = Snapshot::default();
        snapshot.learned_ids.insert(CharacterId::new("hiragana-a"));
        let before = snapshot.clone();

        let summary = ReviewService::new().apply_outcomes(
            &mut snapshot,
            SessionKind::Practice,
            vec![outcome("hiragana-a", 0), outcome("hiragana-i", 5)],
            &catalog,
            fixed_today(),
        );

        assert_eq!(snapshot, before);
        assert_eq!(summary.studied, 2);
        assert_eq!(summary.correct, 1);
        assert_eq!(summary.accuracy_percent(), 50);
    }

    #[test]
    fn unknown_characters_are_skipped() {
        let catalog = KanaCatalog::builtin();
        let mut snapshot = Snapshot::default();

        let summary = ReviewService::new().apply_outcomes(
            &mut snapshot,
            SessionKind::Regular,
            vec![outcome("klingon-qa", 5), outcome("hiragana-a", 5)],
            &catalog,
            fixed_today(),
        );

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.studied, 1);
        assert_eq!(snapshot.review_states.len(), 1);
        assert_eq!(snapshot.statistics.total_reviews, 1);
    }

    #[test]
    fn duplicate_outcomes_commit_once() {
        let catalog = KanaCatalog::builtin();
        let mut snapshot = Snapshot::default();

        ReviewService::new().apply_outcomes(
            &mut snapshot,
            SessionKind::Regular,
            vec![outcome("hiragana-u", 2), outcome("hiragana-u", 4)],
            &catalog,
            fixed_today(),
        );

        let id = CharacterId::new("hiragana-u");
        assert_eq!(snapshot.review_state(&id).unwrap().repetitions, 1);
        assert!(snapshot.learned_ids.contains(&id));
        assert_eq!(snapshot.statistics.total_reviews, 1);
    }

    #[test]
    fn extra_sessions_exceed_quota_counters() {
        let catalog = KanaCatalog::builtin();
        let today = fixed_today();
        let mut draft = LearningGoalsDraft::new();
        draft.daily_new_cards = 5;
        let mut snapshot = Snapshot::with_goals(draft.validate().unwrap());
        snapshot.statistics.last_study_date = Some(today);
        snapshot.statistics.today_new_learned = 5;
        snapshot.statistics.streak_days = 1;

        let outcomes = ["hiragana-ka", "hiragana-ki", "hiragana-ku"]
            .into_iter()
            .map(|id| outcome(id, 5));
        ReviewService::new().apply_outcomes(
            &mut snapshot,
            SessionKind::ExtraNew,
            outcomes,
            &catalog,
            today,
        );

        assert_eq!(snapshot.statistics.today_new_learned, 8);
        assert_eq!(snapshot.statistics.streak_days, 1);
    }
}
