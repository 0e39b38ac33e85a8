use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use kana_core::model::{CharacterEntry, CharacterId, Outcome};

use super::plan::{SessionKind, SessionPlan};
use super::progress::SessionProgress;
use crate::error::SessionError;
use crate::review_service::dedup_outcomes;

//
// ─── DRILL STYLES ──────────────────────────────────────────────────────────────
//

/// How the cards of a phase are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DrillStyle {
    /// Show the character, pick its romanization.
    Recognition,
    /// Show the romanization, pick the character.
    Recall,
    /// Show the romanization, draw or type the character.
    Production,
    /// Match characters with romanizations in a grid.
    Pairing,
}

impl DrillStyle {
    /// The default phase order of a regular session.
    pub const STANDARD: [DrillStyle; 3] = [
        DrillStyle::Recognition,
        DrillStyle::Recall,
        DrillStyle::Pairing,
    ];
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Cards have not been handed over yet.
    Loading,
    /// Drilling the phase at this index.
    Active { phase: usize },
    Complete,
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// In-memory state of one session as it moves through its drill phases.
///
/// Every phase drills the same cards. Outcomes from all phases are kept in
/// order and collapsed by [`SessionState::aggregated`], so a character
/// answered in several phases is committed once with its latest result.
#[derive(Debug, Clone)]
pub struct SessionState {
    kind: SessionKind,
    phases: Vec<DrillStyle>,
    cards: Vec<CharacterEntry>,
    status: SessionStatus,
    log: Vec<(usize, Outcome)>,
}

impl SessionState {
    /// Create a session that will run through `phases` in order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoPhases` if `phases` is empty.
    pub fn new(kind: SessionKind, phases: Vec<DrillStyle>) -> Result<Self, SessionError> {
        if phases.is_empty() {
            return Err(SessionError::NoPhases);
        }
        Ok(Self {
            kind,
            phases,
            cards: Vec::new(),
            status: SessionStatus::Loading,
            log: Vec::new(),
        })
    }

    /// Create and immediately begin a session from a composed plan.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoPhases` if `phases` is empty.
    pub fn from_plan(plan: SessionPlan, phases: Vec<DrillStyle>) -> Result<Self, SessionError> {
        let mut state = Self::new(plan.kind, phases)?;
        state.begin(plan.cards)?;
        Ok(state)
    }

    /// Hand the cards over and enter the first phase.
    ///
    /// An empty card list completes the session at once.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotActive` if the session already began.
    pub fn begin(&mut self, cards: Vec<CharacterEntry>) -> Result<SessionStatus, SessionError> {
        if self.status != SessionStatus::Loading {
            return Err(SessionError::NotActive);
        }
        self.status = if cards.is_empty() {
            SessionStatus::Complete
        } else {
            SessionStatus::Active { phase: 0 }
        };
        self.cards = cards;
        Ok(self.status)
    }

    /// Record an outcome for a card of the current phase.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotActive` before `begin` or after completion,
    /// and `SessionError::UnknownCharacter` for characters outside the session.
    pub fn record(&mut self, outcome: Outcome) -> Result<(), SessionError> {
        let SessionStatus::Active { phase } = self.status else {
            return Err(SessionError::NotActive);
        };
        if !self.cards.iter().any(|c| c.id == outcome.character_id) {
            return Err(SessionError::UnknownCharacter(outcome.character_id));
        }
        self.log.push((phase, outcome));
        Ok(())
    }

    /// Move to the next phase, completing the session after the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotActive` if no phase is running.
    pub fn advance(&mut self) -> Result<SessionStatus, SessionError> {
        let SessionStatus::Active { phase } = self.status else {
            return Err(SessionError::NotActive);
        };
        let next = phase + 1;
        self.status = if next < self.phases.len() {
            SessionStatus::Active { phase: next }
        } else {
            SessionStatus::Complete
        };
        tracing::debug!(kind = ?self.kind, from = phase, status = ?self.status, "advanced session");
        Ok(self.status)
    }

    #[must_use]
    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == SessionStatus::Complete
    }

    #[must_use]
    pub fn cards(&self) -> &[CharacterEntry] {
        &self.cards
    }

    #[must_use]
    pub fn phases(&self) -> &[DrillStyle] {
        &self.phases
    }

    /// Drill style of the running phase.
    #[must_use]
    pub fn current_style(&self) -> Option<DrillStyle> {
        match self.status {
            SessionStatus::Active { phase } => self.phases.get(phase).copied(),
            SessionStatus::Loading | SessionStatus::Complete => None,
        }
    }

    /// Every recorded outcome, in recording order.
    pub fn outcomes(&self) -> impl Iterator<Item = &Outcome> {
        self.log.iter().map(|(_, outcome)| outcome)
    }

    /// Outcomes collapsed to one per character, keeping the latest result in first-seen order.
    #[must_use]
    pub fn aggregated(&self) -> Vec<Outcome> {
        dedup_outcomes(self.outcomes().cloned())
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.cards.len();
        let phase_count = self.phases.len();
        let (phase, answered) = match self.status {
            SessionStatus::Loading => (0, 0),
            SessionStatus::Active { phase } => {
                let answered: HashSet<&CharacterId> = self
                    .log
                    .iter()
                    .filter(|(p, _)| *p == phase)
                    .map(|(_, outcome)| &outcome.character_id)
                    .collect();
                (phase, answered.len())
            }
            SessionStatus::Complete => (phase_count, total),
        };
        SessionProgress {
            phase,
            phase_count,
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete: self.is_complete(),
        }
    }
}
