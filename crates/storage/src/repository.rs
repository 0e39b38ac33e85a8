use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use kana_core::model::Snapshot;

use crate::codec;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the learner snapshot.
///
/// Adapters store one opaque blob under a fixed key; last write wins.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Load the stored snapshot.
    ///
    /// Missing or malformed content yields `Snapshot::default()`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only if the backend itself cannot be read.
    async fn load(&self) -> Result<Snapshot, StorageError>;

    /// Replace the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be encoded or written.
    async fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError>;

    /// Remove all stored progress.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn reset(&self) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Holds the encoded blob so loads go through the same codec as durable adapters.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    blob: Arc<Mutex<Option<String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with a raw stored value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn put_raw(&self, raw: impl Into<String>) -> Result<(), StorageError> {
        let mut guard = self
            .blob
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(raw.into());
        Ok(())
    }

    /// The raw stored value, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn raw(&self) -> Result<Option<String>, StorageError> {
        let guard = self
            .blob
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl SnapshotRepository for InMemoryRepository {
    async fn load(&self) -> Result<Snapshot, StorageError> {
        let raw = self.raw()?;
        Ok(codec::decode_lenient(raw.as_deref()))
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let encoded = codec::encode(snapshot)?;
        self.put_raw(encoded)
    }

    async fn reset(&self) -> Result<(), StorageError> {
        let mut guard = self
            .blob
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Aggregates the snapshot repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub snapshots: Arc<dyn SnapshotRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            snapshots: Arc::new(InMemoryRepository::new()),
        }
    }
}
