use rand::Rng;
use std::sync::Arc;

use kana_core::model::{CharacterId, LearningGoals, LearningGoalsDraft, Outcome, Snapshot};
use kana_core::tracker::QuotaTracker;
use kana_core::{Catalog, KanaCatalog};
use storage::repository::{SnapshotRepository, Storage};

use crate::Clock;
use crate::error::{SessionError, StudyError};
use crate::review_service::{CommitSummary, ReviewService};
use crate::selection::{StudyOverview, due_and_new, learned_cards};
use crate::sessions::{
    DrillStyle, SessionKind, SessionPlan, SessionPool, SessionState, compose_session,
};

/// Coordinates the learner snapshot, the catalog, and the scheduling rules.
///
/// Every operation loads the snapshot, computes, and saves the result.
/// Nothing is cached between calls.
#[derive(Clone)]
pub struct StudyService {
    clock: Clock,
    snapshots: Arc<dyn SnapshotRepository>,
    catalog: Arc<dyn Catalog>,
    reviews: ReviewService,
}

impl StudyService {
    #[must_use]
    pub fn new(
        clock: Clock,
        snapshots: Arc<dyn SnapshotRepository>,
        catalog: Arc<dyn Catalog>,
    ) -> Self {
        Self {
            clock,
            snapshots,
            catalog,
            reviews: ReviewService::new(),
        }
    }

    /// Build a service over `storage` with the built-in kana catalog.
    #[must_use]
    pub fn from_storage(clock: Clock, storage: &Storage) -> Self {
        Self::new(
            clock,
            Arc::clone(&storage.snapshots),
            Arc::new(KanaCatalog::builtin()),
        )
    }

    /// Build a service backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Sqlite` if the database cannot be opened or migrated.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, StudyError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(clock, &storage))
    }

    /// Override the clock (usually for deterministic testing).
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<dyn Catalog> {
        Arc::clone(&self.catalog)
    }

    /// The stored snapshot as it is now.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Storage` if the repository cannot be read.
    pub async fn snapshot(&self) -> Result<Snapshot, StudyError> {
        Ok(self.snapshots.load().await?)
    }

    /// Dashboard figures for today.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Storage` if the repository cannot be read.
    pub async fn overview(&self) -> Result<StudyOverview, StudyError> {
        let snapshot = self.snapshots.load().await?;
        Ok(StudyOverview::compute(
            self.catalog.as_ref(),
            &snapshot,
            self.clock.today(),
        ))
    }

    /// Pick the cards for a `kind` session, shuffled with `rng`.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Storage` if the repository cannot be read.
    pub async fn compose<R: Rng + ?Sized>(
        &self,
        kind: SessionKind,
        rng: &mut R,
    ) -> Result<SessionPlan, StudyError> {
        let snapshot = self.snapshots.load().await?;
        let today = self.clock.today();
        let catalog = self.catalog.as_ref();
        let goals = &snapshot.goals;

        let selection = due_and_new(
            catalog,
            goals,
            &snapshot.review_states,
            &snapshot.learned_ids,
            today,
        );
        let remaining = QuotaTracker::new().remaining(goals, &snapshot.statistics, today);
        let learned = if kind == SessionKind::Practice {
            learned_cards(catalog, goals, &snapshot.learned_ids)
        } else {
            Vec::new()
        };

        let pool = SessionPool {
            due: selection.due,
            new: selection.new,
            learned,
            remaining_review: remaining.reviews,
            remaining_new: remaining.new_cards,
        };
        Ok(compose_session(kind, pool, rng))
    }

    /// Compose a session and enter its first drill phase.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Session` if `phases` is empty and
    /// `StudyError::Storage` if the repository cannot be read.
    pub async fn start_session<R: Rng + ?Sized>(
        &self,
        kind: SessionKind,
        phases: Vec<DrillStyle>,
        rng: &mut R,
    ) -> Result<SessionState, StudyError> {
        if phases.is_empty() {
            return Err(SessionError::NoPhases.into());
        }
        let plan = self.compose(kind, rng).await?;
        Ok(SessionState::from_plan(plan, phases)?)
    }

    /// Commit a batch of outcomes and persist the result.
    ///
    /// Practice batches are summarized without writing to the repository.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Storage` if the snapshot cannot be loaded or saved.
    pub async fn commit(
        &self,
        kind: SessionKind,
        outcomes: Vec<Outcome>,
    ) -> Result<CommitSummary, StudyError> {
        let mut snapshot = self.snapshots.load().await?;
        let summary = self.reviews.apply_outcomes(
            &mut snapshot,
            kind,
            outcomes,
            self.catalog.as_ref(),
            self.clock.today(),
        );
        if kind.counts_toward_schedule() {
            self.snapshots.save(&snapshot).await?;
        }
        Ok(summary)
    }

    /// Commit raw drill results as `(character id, quality, correct)` tuples.
    ///
    /// The whole batch is rejected if any quality lies outside 0-5.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Core` for an invalid quality and
    /// `StudyError::Storage` if the snapshot cannot be loaded or saved.
    pub async fn commit_raw<I, S>(
        &self,
        kind: SessionKind,
        raw: I,
    ) -> Result<CommitSummary, StudyError>
    where
        I: IntoIterator<Item = (S, u8, bool)>,
        S: Into<CharacterId>,
    {
        let outcomes = raw
            .into_iter()
            .map(|(id, quality, correct)| Outcome::from_raw(id, quality, Some(correct)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(kana_core::Error::from)?;
        self.commit(kind, outcomes).await
    }

    /// Commit the aggregated outcomes of a finished session.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Session` with `SessionError::NotComplete` if the
    /// session still has phases to run, and `StudyError::Storage` on I/O failure.
    pub async fn commit_session(&self, session: &SessionState) -> Result<CommitSummary, StudyError> {
        if !session.is_complete() {
            return Err(SessionError::NotComplete.into());
        }
        self.commit(session.kind(), session.aggregated()).await
    }

    /// Validate and store new learning goals.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Core` if the draft is invalid and
    /// `StudyError::Storage` if the snapshot cannot be loaded or saved.
    pub async fn update_goals(&self, draft: LearningGoalsDraft) -> Result<LearningGoals, StudyError> {
        let goals = draft.validate().map_err(kana_core::Error::from)?;
        let mut snapshot = self.snapshots.load().await?;
        snapshot.goals = goals.clone();
        self.snapshots.save(&snapshot).await?;
        tracing::info!(
            daily_new_cards = goals.daily_new_cards(),
            daily_review_limit = goals.daily_review_limit(),
            "updated learning goals"
        );
        Ok(goals)
    }

    /// Erase all progress, goals included.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Storage` if the repository cannot be written.
    pub async fn reset(&self) -> Result<(), StudyError> {
        self.snapshots.reset().await?;
        tracing::info!("reset study progress");
        Ok(())
    }
}
