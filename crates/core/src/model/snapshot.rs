use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::goals::LearningGoals;
use crate::model::ids::CharacterId;
use crate::model::review::ReviewState;
use crate::model::stats::Statistics;

/// Characters the learner has passed at least once, in the order they were learned.
///
/// Grows monotonically; only a full reset empties it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CharacterId>", into = "Vec<CharacterId>")]
pub struct LearnedSet {
    ids: Vec<CharacterId>,
}

impl LearnedSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: &CharacterId) -> bool {
        self.ids.contains(id)
    }

    /// Adds `id` if absent; returns true when it was newly inserted.
    pub fn insert(&mut self, id: CharacterId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &CharacterId> {
        self.ids.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl From<Vec<CharacterId>> for LearnedSet {
    fn from(ids: Vec<CharacterId>) -> Self {
        let mut set = Self::new();
        for id in ids {
            set.insert(id);
        }
        set
    }
}

impl From<LearnedSet> for Vec<CharacterId> {
    fn from(set: LearnedSet) -> Self {
        set.ids
    }
}

impl FromIterator<CharacterId> for LearnedSet {
    fn from_iter<T: IntoIterator<Item = CharacterId>>(iter: T) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

/// The complete persisted learner state.
///
/// Missing fields fall back to their defaults on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub goals: LearningGoals,
    #[serde(alias = "cardStates")]
    pub review_states: BTreeMap<CharacterId, ReviewState>,
    pub statistics: Statistics,
    #[serde(alias = "learnedKanaIds")]
    pub learned_ids: LearnedSet,
}

impl Snapshot {
    /// Snapshot carrying custom goals and otherwise empty progress.
    #[must_use]
    pub fn with_goals(goals: LearningGoals) -> Self {
        Self {
            goals,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn review_state(&self, id: &CharacterId) -> Option<&ReviewState> {
        self.review_states.get(id)
    }
}
