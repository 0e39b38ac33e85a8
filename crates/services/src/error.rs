//! Shared error types for the services crate.

use thiserror::Error;

use kana_core::model::CharacterId;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted while driving a study session.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no drill phases configured")]
    NoPhases,
    #[error("session is not accepting outcomes")]
    NotActive,
    #[error("session is not complete")]
    NotComplete,
    #[error("character {0} is not part of this session")]
    UnknownCharacter(CharacterId),
}

/// Errors emitted by `StudyService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StudyError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Core(#[from] kana_core::Error),
}
