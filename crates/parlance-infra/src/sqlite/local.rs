//! SQLite selection-cache implementation.
//!
//! Persists the active session id in the `local_state` key-value table.
//! Process-local state: one row, overwritten on every selection change,
//! read once at startup.

use parlance_core::selection::SelectionCache;
use parlance_types::error::StoreError;
use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// Key under which the active session id is cached.
const ACTIVE_SESSION_KEY: &str = "active_session_id";

/// SQLite-backed implementation of `SelectionCache`.
pub struct SqliteSelectionCache {
    pool: DatabasePool,
}

impl SqliteSelectionCache {
    /// Create a new cache backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl SelectionCache for SqliteSelectionCache {
    async fn load(&self) -> Result<Option<Uuid>, StoreError> {
        let row = sqlx::query("SELECT value FROM local_state WHERE key = ?")
            .bind(ACTIVE_SESSION_KEY)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let value: String = row
                    .try_get("value")
                    .map_err(|e| StoreError::Query(e.to_string()))?;
                let session_id = Uuid::parse_str(&value)
                    .map_err(|e| StoreError::Query(format!("invalid cached session id: {e}")))?;
                Ok(Some(session_id))
            }
            None => Ok(None),
        }
    }

    async fn store(&self, session_id: &Uuid) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO local_state (key, value, updated_at)
               VALUES (?, ?, ?)
               ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(ACTIVE_SESSION_KEY)
        .bind(session_id.to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }
}
