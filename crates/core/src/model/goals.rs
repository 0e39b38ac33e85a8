use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::character::{Category, CharacterEntry, ScriptType};

/// Daily new-card quotas offered to the learner.
pub const NEW_CARD_OPTIONS: [u32; 5] = [5, 10, 15, 20, 30];

/// Daily review limits offered to the learner.
pub const REVIEW_LIMIT_OPTIONS: [u32; 4] = [20, 50, 100, 200];

const DEFAULT_DAILY_NEW_CARDS: u32 = 10;
const DEFAULT_DAILY_REVIEW_LIMIT: u32 = 50;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GoalsError {
    #[error("daily new cards must be > 0")]
    InvalidDailyNewCards,

    #[error("daily review limit must be > 0")]
    InvalidDailyReviewLimit,

    #[error("at least one script type must be enabled")]
    NoScriptTypes,
}

//
// ─── GOALS ─────────────────────────────────────────────────────────────────────
//

/// The learner's study configuration.
///
/// An empty `categories` set means every category is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LearningGoals {
    daily_new_cards: u32,
    daily_review_limit: u32,
    #[serde(alias = "kanaTypes")]
    script_types: BTreeSet<ScriptType>,
    #[serde(alias = "priorityGroups")]
    categories: BTreeSet<Category>,
}

impl Default for LearningGoals {
    fn default() -> Self {
        Self {
            daily_new_cards: DEFAULT_DAILY_NEW_CARDS,
            daily_review_limit: DEFAULT_DAILY_REVIEW_LIMIT,
            script_types: BTreeSet::from([ScriptType::Hiragana]),
            categories: Category::BASIC.into_iter().collect(),
        }
    }
}

impl LearningGoals {
    #[must_use]
    pub fn daily_new_cards(&self) -> u32 {
        self.daily_new_cards
    }

    #[must_use]
    pub fn daily_review_limit(&self) -> u32 {
        self.daily_review_limit
    }

    #[must_use]
    pub fn script_types(&self) -> &BTreeSet<ScriptType> {
        &self.script_types
    }

    #[must_use]
    pub fn categories(&self) -> &BTreeSet<Category> {
        &self.categories
    }

    #[must_use]
    pub fn allows_script(&self, script_type: ScriptType) -> bool {
        self.script_types.contains(&script_type)
    }

    /// True when the entry passes both the script-type and the category filter.
    #[must_use]
    pub fn allows(&self, entry: &CharacterEntry) -> bool {
        self.allows_script(entry.script_type)
            && (self.categories.is_empty() || self.categories.contains(&entry.category))
    }

    /// Returns an editable draft seeded with the current values.
    #[must_use]
    pub fn to_draft(&self) -> LearningGoalsDraft {
        LearningGoalsDraft {
            daily_new_cards: self.daily_new_cards,
            daily_review_limit: self.daily_review_limit,
            script_types: self.script_types.iter().copied().collect(),
            categories: self.categories.iter().copied().collect(),
        }
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated goals as edited in a settings form.
#[derive(Debug, Clone, Default)]
pub struct LearningGoalsDraft {
    pub daily_new_cards: u32,
    pub daily_review_limit: u32,
    pub script_types: Vec<ScriptType>,
    pub categories: Vec<Category>,
}

impl LearningGoalsDraft {
    #[must_use]
    pub fn new() -> Self {
        LearningGoals::default().to_draft()
    }

    /// Validate and normalize the draft into goals.
    ///
    /// # Errors
    ///
    /// Returns `GoalsError` if a quota is zero or no script type is enabled.
    pub fn validate(self) -> Result<LearningGoals, GoalsError> {
        if self.daily_new_cards == 0 {
            return Err(GoalsError::InvalidDailyNewCards);
        }
        if self.daily_review_limit == 0 {
            return Err(GoalsError::InvalidDailyReviewLimit);
        }
        let script_types: BTreeSet<_> = self.script_types.into_iter().collect();
        if script_types.is_empty() {
            return Err(GoalsError::NoScriptTypes);
        }

        Ok(LearningGoals {
            daily_new_cards: self.daily_new_cards,
            daily_review_limit: self.daily_review_limit,
            script_types,
            categories: self.categories.into_iter().collect(),
        })
    }
}
