//! Partitioning of the catalog into due, new, and learned characters.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use kana_core::Catalog;
use kana_core::model::{
    CharacterEntry, CharacterId, LearnedSet, LearningGoals, ReviewState, Snapshot, percent,
};
use kana_core::tracker::{QuotaTracker, RemainingQuota};

/// Characters eligible for today's study, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DueAndNew {
    /// Allowed characters whose review date has arrived.
    pub due: Vec<CharacterEntry>,
    /// Allowed characters not yet in the learned set.
    pub new: Vec<CharacterEntry>,
}

/// Splits the allowed part of the catalog into due and new characters.
///
/// A character that was exposed but never passed can appear in both lists;
/// the session composer takes it once.
#[must_use]
pub fn due_and_new(
    catalog: &dyn Catalog,
    goals: &LearningGoals,
    review_states: &BTreeMap<CharacterId, ReviewState>,
    learned_ids: &LearnedSet,
    today: NaiveDate,
) -> DueAndNew {
    let mut selection = DueAndNew::default();
    for entry in catalog.entries().iter().filter(|entry| goals.allows(entry)) {
        if review_states
            .get(&entry.id)
            .is_some_and(|state| state.is_due(today))
        {
            selection.due.push(entry.clone());
        }
        if !learned_ids.contains(&entry.id) {
            selection.new.push(entry.clone());
        }
    }
    tracing::debug!(
        due = selection.due.len(),
        new = selection.new.len(),
        %today,
        "selected due and new characters"
    );
    selection
}

/// Learned characters within the enabled script types, in the order they were learned.
///
/// Ids missing from the catalog are skipped.
#[must_use]
pub fn learned_cards(
    catalog: &dyn Catalog,
    goals: &LearningGoals,
    learned_ids: &LearnedSet,
) -> Vec<CharacterEntry> {
    learned_ids
        .iter()
        .filter_map(|id| catalog.get(id))
        .filter(|entry| goals.allows_script(entry.script_type))
        .cloned()
        .collect()
}

/// Records strictly past their review date, most overdue first.
#[must_use]
pub fn overdue<'a>(
    review_states: &'a BTreeMap<CharacterId, ReviewState>,
    today: NaiveDate,
) -> Vec<&'a ReviewState> {
    let mut states: Vec<_> = review_states
        .values()
        .filter(|state| state.is_overdue(today))
        .collect();
    states.sort_by(|a, b| {
        a.next_review_date
            .cmp(&b.next_review_date)
            .then_with(|| a.character_id.cmp(&b.character_id))
    });
    states
}

/// Dashboard figures for the home screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyOverview {
    pub due_count: usize,
    pub new_count: usize,
    pub remaining_new: u32,
    pub remaining_review: u32,
    /// Size of a regular session started now.
    pub planned_today: usize,
    pub total_learned: usize,
    pub total_characters: usize,
    pub progress_percent: u32,
    pub accuracy_percent: u32,
    pub streak_days: u32,
}

impl StudyOverview {
    #[must_use]
    pub fn compute(catalog: &dyn Catalog, snapshot: &Snapshot, today: NaiveDate) -> Self {
        let tracker = QuotaTracker::new();
        let goals = &snapshot.goals;
        let selection = due_and_new(
            catalog,
            goals,
            &snapshot.review_states,
            &snapshot.learned_ids,
            today,
        );
        let RemainingQuota { new_cards, reviews } =
            tracker.remaining(goals, &snapshot.statistics, today);

        let total_characters = catalog
            .entries()
            .iter()
            .filter(|entry| goals.allows_script(entry.script_type))
            .count();
        let total_learned = learned_cards(catalog, goals, &snapshot.learned_ids).len();

        Self {
            due_count: selection.due.len(),
            new_count: selection.new.len(),
            remaining_new: new_cards,
            remaining_review: reviews,
            planned_today: selection.due.len().min(to_usize(reviews))
                + selection.new.len().min(to_usize(new_cards)),
            total_learned,
            total_characters,
            progress_percent: percent(to_u32(total_learned), to_u32(total_characters)),
            accuracy_percent: snapshot.statistics.accuracy_percent(),
            streak_days: tracker.current_streak(&snapshot.statistics, today),
        }
    }
}

pub(crate) fn to_usize(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kana_core::KanaCatalog;
    use kana_core::model::{Category, LearningGoalsDraft, ScriptType};
    use kana_core::time::{add_days, fixed_today};

    fn id(raw: &str) -> CharacterId {
        CharacterId::new(raw)
    }

    fn state_due_on(raw: &str, day: NaiveDate) -> (CharacterId, ReviewState) {
        let mut state = ReviewState::initial(id(raw), fixed_today());
        state.next_review_date = day;
        (id(raw), state)
    }

    fn vowels_only() -> LearningGoals {
        let mut draft = LearningGoalsDraft::new();
        draft.categories = vec![Category::Vowel];
        draft.validate().unwrap()
    }

    #[test]
    fn due_includes_today_and_past_only() {
        let catalog = KanaCatalog::builtin();
        let today = fixed_today();
        let states: BTreeMap<_, _> = [
            state_due_on("hiragana-a", today),
            state_due_on("hiragana-i", today - chrono::Days::new(4)),
            state_due_on("hiragana-u", add_days(today, 1)),
        ]
        .into_iter()
        .collect();
        let learned: LearnedSet = ["hiragana-a", "hiragana-i", "hiragana-u"]
            .into_iter()
            .map(id)
            .collect();

        let selection = due_and_new(&catalog, &vowels_only(), &states, &learned, today);

        let due: Vec<_> = selection.due.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(due, ["hiragana-a", "hiragana-i"]);
        let new: Vec<_> = selection.new.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(new, ["hiragana-e", "hiragana-o"]);
    }

    #[test]
    fn filters_apply_to_due_cards_too() {
        let catalog = KanaCatalog::builtin();
        let today = fixed_today();
        let states: BTreeMap<_, _> = [
            state_due_on("katakana-a", today),
            state_due_on("hiragana-ka", today),
        ]
        .into_iter()
        .collect();

        let selection = due_and_new(
            &catalog,
            &vowels_only(),
            &states,
            &LearnedSet::new(),
            today,
        );
        assert!(selection.due.is_empty());
        assert_eq!(selection.new.len(), 5);
    }

    #[test]
    fn empty_category_set_means_all_categories() {
        let catalog = KanaCatalog::builtin();
        let mut draft = LearningGoalsDraft::new();
        draft.categories.clear();
        let goals = draft.validate().unwrap();

        let selection = due_and_new(
            &catalog,
            &goals,
            &BTreeMap::new(),
            &LearnedSet::new(),
            fixed_today(),
        );
        assert_eq!(selection.new.len(), 104);
    }

    #[test]
    fn learned_cards_follow_script_filter_and_learn_order() {
        let catalog = KanaCatalog::builtin();
        let learned: LearnedSet = ["hiragana-o", "katakana-a", "hiragana-a", "bogus-id"]
            .into_iter()
            .map(id)
            .collect();
        let cards = learned_cards(&catalog, &LearningGoals::default(), &learned);
        let ids: Vec<_> = cards.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["hiragana-o", "hiragana-a"]);
        assert!(cards.iter().all(|e| e.script_type == ScriptType::Hiragana));
    }

    #[test]
    fn overdue_sorted_oldest_first() {
        let today = fixed_today();
        let states: BTreeMap<_, _> = [
            state_due_on("hiragana-a", today - chrono::Days::new(1)),
            state_due_on("hiragana-i", today - chrono::Days::new(5)),
            state_due_on("hiragana-u", today),
        ]
        .into_iter()
        .collect();
        let ids: Vec<_> = overdue(&states, today)
            .iter()
            .map(|s| s.character_id.as_str())
            .collect();
        assert_eq!(ids, ["hiragana-i", "hiragana-a"]);
    }

    #[test]
    fn overview_reports_quota_limited_plan() {
        let catalog = KanaCatalog::builtin();
        let today = fixed_today();
        let mut snapshot = Snapshot::default();
        snapshot.statistics.last_study_date = Some(today);
        snapshot.statistics.today_new_learned = 10;
        snapshot.statistics.total_reviews = 4;
        snapshot.statistics.correct_reviews = 3;
        snapshot.statistics.streak_days = 2;

        let overview = StudyOverview::compute(&catalog, &snapshot, today);

        assert_eq!(overview.remaining_new, 0);
        assert_eq!(overview.remaining_review, 50);
        assert_eq!(overview.new_count, 46);
        assert_eq!(overview.planned_today, 0);
        assert_eq!(overview.total_characters, 104);
        assert_eq!(overview.progress_percent, 0);
        assert_eq!(overview.accuracy_percent, 75);
        assert_eq!(overview.streak_days, 2);
    }
}
