use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use kana_core::model::CharacterEntry;

use crate::selection::to_usize;

/// Number of characters in an extra-new or extra-review session.
pub const EXTRA_SESSION_SIZE: usize = 5;

/// What a practice session is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionKind {
    /// Due reviews and new characters within today's quotas.
    Regular,
    /// Up to five more new characters after the quota is spent.
    ExtraNew,
    /// Up to five more due characters after the quota is spent.
    ExtraReview,
    /// Every learned character, without scheduling effect.
    Practice,
}

impl SessionKind {
    /// False for practice sessions, whose outcomes never touch review state or counters.
    #[must_use]
    pub fn counts_toward_schedule(self) -> bool {
        !matches!(self, SessionKind::Practice)
    }
}

/// Candidate lists and allowances a session is composed from.
#[derive(Debug, Clone, Default)]
pub struct SessionPool {
    pub due: Vec<CharacterEntry>,
    pub new: Vec<CharacterEntry>,
    pub learned: Vec<CharacterEntry>,
    pub remaining_review: u32,
    pub remaining_new: u32,
}

/// Selection result for a session build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub kind: SessionKind,
    pub cards: Vec<CharacterEntry>,
    pub due_selected: usize,
    pub new_selected: usize,
}

impl SessionPlan {
    /// Total number of cards in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.cards.len()
    }

    /// Returns true when nothing is available to study.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Picks and orders the characters for a session of `kind`.
///
/// The result is fully shuffled with `rng`; pass a seeded generator for a
/// reproducible order.
pub fn compose_session<R: Rng + ?Sized>(
    kind: SessionKind,
    pool: SessionPool,
    rng: &mut R,
) -> SessionPlan {
    let SessionPool {
        due,
        new,
        learned,
        remaining_review,
        remaining_new,
    } = pool;

    let (due_take, new_take) = match kind {
        SessionKind::Regular => (to_usize(remaining_review), to_usize(remaining_new)),
        SessionKind::ExtraNew => (0, EXTRA_SESSION_SIZE),
        SessionKind::ExtraReview => (EXTRA_SESSION_SIZE, 0),
        SessionKind::Practice => (0, 0),
    };

    let mut cards: Vec<_> = due.into_iter().take(due_take).collect();
    let due_selected = cards.len();

    let mut selected: HashSet<_> = cards.iter().map(|entry| entry.id.clone()).collect();
    let fresh: Vec<_> = new
        .into_iter()
        .filter(|entry| selected.insert(entry.id.clone()))
        .take(new_take)
        .collect();
    let new_selected = fresh.len();
    cards.extend(fresh);

    if kind == SessionKind::Practice {
        cards.extend(learned);
    }

    cards.shuffle(rng);

    tracing::debug!(?kind, due_selected, new_selected, total = cards.len(), "composed session");

    SessionPlan {
        kind,
        cards,
        due_selected,
        new_selected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kana_core::model::{Category, ScriptType};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn entry(romanization: &str) -> CharacterEntry {
        CharacterEntry::new(romanization, romanization, ScriptType::Hiragana, Category::K)
    }

    fn entries(prefix: &str, count: usize) -> Vec<CharacterEntry> {
        (0..count).map(|i| entry(&format!("{prefix}{i}"))).collect()
    }

    fn ids(plan: &SessionPlan) -> Vec<String> {
        let mut ids: Vec<_> = plan.cards.iter().map(|e| e.id.to_string()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn regular_respects_both_quotas() {
        let pool = SessionPool {
            due: entries("due", 8),
            new: entries("new", 8),
            remaining_review: 3,
            remaining_new: 2,
            ..SessionPool::default()
        };
        let plan = compose_session(SessionKind::Regular, pool, &mut StdRng::seed_from_u64(7));
        assert_eq!(plan.due_selected, 3);
        assert_eq!(plan.new_selected, 2);
        assert_eq!(plan.total(), 5);
    }

    #[test]
    fn regular_with_spent_new_quota_has_no_new_cards() {
        let pool = SessionPool {
            due: Vec::new(),
            new: entries("new", 4),
            remaining_review: 50,
            remaining_new: 0,
            ..SessionPool::default()
        };
        let plan = compose_session(SessionKind::Regular, pool, &mut StdRng::seed_from_u64(1));
        assert!(plan.is_empty());
    }

    #[test]
    fn regular_takes_shared_character_once() {
        let shared = entry("ka");
        let pool = SessionPool {
            due: vec![shared.clone()],
            new: vec![shared, entry("ki")],
            remaining_review: 10,
            remaining_new: 10,
            ..SessionPool::default()
        };
        let plan = compose_session(SessionKind::Regular, pool, &mut StdRng::seed_from_u64(3));
        assert_eq!(plan.due_selected, 1);
        assert_eq!(plan.new_selected, 1);
        assert_eq!(ids(&plan), ["hiragana-ka", "hiragana-ki"]);
    }

    #[test]
    fn extra_sessions_take_five_ignoring_quotas() {
        let pool = SessionPool {
            due: entries("due", 9),
            new: entries("new", 9),
            remaining_review: 0,
            remaining_new: 0,
            ..SessionPool::default()
        };
        let extra_new = compose_session(
            SessionKind::ExtraNew,
            pool.clone(),
            &mut StdRng::seed_from_u64(5),
        );
        assert_eq!(extra_new.new_selected, EXTRA_SESSION_SIZE);
        assert_eq!(extra_new.due_selected, 0);
        assert_eq!(
            ids(&extra_new),
            ["hiragana-new0", "hiragana-new1", "hiragana-new2", "hiragana-new3", "hiragana-new4"]
        );

        let extra_review =
            compose_session(SessionKind::ExtraReview, pool, &mut StdRng::seed_from_u64(5));
        assert_eq!(extra_review.due_selected, EXTRA_SESSION_SIZE);
        assert_eq!(extra_review.new_selected, 0);
    }

    #[test]
    fn extra_session_with_few_candidates_takes_what_exists() {
        let pool = SessionPool {
            new: entries("new", 2),
            ..SessionPool::default()
        };
        let plan = compose_session(SessionKind::ExtraNew, pool, &mut StdRng::seed_from_u64(5));
        assert_eq!(plan.total(), 2);
    }

    #[test]
    fn practice_uses_every_learned_character() {
        let pool = SessionPool {
            due: entries("due", 3),
            new: entries("new", 3),
            learned: entries("learned", 12),
            remaining_review: 50,
            remaining_new: 10,
        };
        let plan = compose_session(SessionKind::Practice, pool, &mut StdRng::seed_from_u64(9));
        assert_eq!(plan.total(), 12);
        assert_eq!(plan.due_selected, 0);
        assert_eq!(plan.new_selected, 0);
    }

    #[test]
    fn practice_counts_neither_due_nor_new() {
        let pool = SessionPool {
            learned: entries("learned", 4),
            remaining_review: 50,
            remaining_new: 10,
            ..SessionPool::default()
        };
        let plan = compose_session(SessionKind::Practice, pool, &mut StdRng::seed_from_u64(4));
        assert_eq!(
            ids(&plan),
            ["hiragana-learned0", "hiragana-learned1", "hiragana-learned2", "hiragana-learned3"]
        );
        assert_eq!((plan.due_selected, plan.new_selected), (0, 0));
    }

    #[test]
    fn seeded_rng_gives_reproducible_order() {
        let pool = SessionPool {
            due: entries("due", 10),
            new: entries("new", 10),
            remaining_review: 10,
            remaining_new: 10,
            ..SessionPool::default()
        };
        let first = compose_session(
            SessionKind::Regular,
            pool.clone(),
            &mut StdRng::seed_from_u64(42),
        );
        let second = compose_session(SessionKind::Regular, pool, &mut StdRng::seed_from_u64(42));
        assert_eq!(first.cards, second.cards);
    }

    #[test]
    fn only_practice_is_exempt_from_scheduling() {
        assert!(SessionKind::Regular.counts_toward_schedule());
        assert!(SessionKind::ExtraNew.counts_toward_schedule());
        assert!(SessionKind::ExtraReview.counts_toward_schedule());
        assert!(!SessionKind::Practice.counts_toward_schedule());
    }
}
