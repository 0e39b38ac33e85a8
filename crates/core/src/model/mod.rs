mod character;
mod goals;
mod ids;
mod review;
mod snapshot;
mod stats;

pub use character::{Category, CharacterEntry, ScriptType};
pub use goals::{
    GoalsError, LearningGoals, LearningGoalsDraft, NEW_CARD_OPTIONS, REVIEW_LIMIT_OPTIONS,
};
pub use ids::{CharacterId, ParseIdError};
pub use review::{
    DEFAULT_EASE_FACTOR, MIN_EASE_FACTOR, Outcome, Quality, ReviewError, ReviewState,
};
pub use snapshot::{LearnedSet, Snapshot};
pub use stats::{Statistics, percent};
