use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use kana_core::model::Snapshot;

use super::SqliteRepository;
use crate::codec::{self, SNAPSHOT_KEY};
use crate::repository::{SnapshotRepository, StorageError};

impl SqliteRepository {
    /// Raw value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    pub async fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        row.try_get("value")
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub async fn put_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl SnapshotRepository for SqliteRepository {
    async fn load(&self) -> Result<Snapshot, StorageError> {
        let raw = self.get_raw(SNAPSHOT_KEY).await?;
        Ok(codec::decode_lenient(raw.as_deref()))
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let encoded = codec::encode(snapshot)?;
        self.put_raw(SNAPSHOT_KEY, &encoded).await
    }

    async fn reset(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(SNAPSHOT_KEY)
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        tracing::info!("stored snapshot removed");
        Ok(())
    }
}
