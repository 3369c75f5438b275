//! SQLite chat store implementation.
//!
//! Implements `ChatStore` from `parlance-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, RFC 3339 datetime
//! text. Every query carries the user id in its WHERE clause -- row-level
//! authorization lives here, not in the callers.

use parlance_core::chat::store::ChatStore;
use parlance_types::chat::{ChatMessage, ChatSession, MessageRole};
use parlance_types::error::StoreError;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatStore`.
pub struct SqliteChatStore {
    pool: DatabasePool,
}

impl SqliteChatStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct SessionRow {
    session_id: String,
    user_id: String,
    title: String,
    created_at: String,
}

impl SessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            session_id: row.try_get("session_id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_session(self) -> Result<ChatSession, StoreError> {
        let session_id = Uuid::parse_str(&self.session_id)
            .map_err(|e| StoreError::Query(format!("invalid session id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(ChatSession {
            session_id,
            user_id: self.user_id,
            title: self.title,
            created_at,
        })
    }
}

struct MessageRow {
    id: String,
    session_id: String,
    user_id: String,
    role: String,
    content: String,
    image: Option<String>,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            user_id: row.try_get("user_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            image: row.try_get("image")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::Query(format!("invalid message id: {e}")))?;
        let session_id = Uuid::parse_str(&self.session_id)
            .map_err(|e| StoreError::Query(format!("invalid session_id: {e}")))?;
        let role: MessageRole = self.role.parse().map_err(StoreError::Query)?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(ChatMessage {
            id,
            session_id,
            user_id: self.user_id,
            role,
            content: self.content,
            image: self.image,
            created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

// ---------------------------------------------------------------------------
// ChatStore implementation
// ---------------------------------------------------------------------------

impl ChatStore for SqliteChatStore {
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<ChatSession>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM chat_sessions WHERE user_id = ? ORDER BY created_at DESC, session_id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut sessions = Vec::with_capacity(rows.len());
        for row in &rows {
            let session_row =
                SessionRow::from_row(row).map_err(|e| StoreError::Query(e.to_string()))?;
            sessions.push(session_row.into_session()?);
        }

        Ok(sessions)
    }

    async fn insert_session(&self, session: &ChatSession) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO chat_sessions (session_id, user_id, title, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(session.session_id.to_string())
        .bind(&session.user_id)
        .bind(&session.title)
        .bind(format_datetime(&session.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }

    async fn rename_session_if(
        &self,
        session_id: &Uuid,
        user_id: &str,
        expected_title: &str,
        new_title: &str,
    ) -> Result<bool, StoreError> {
        // Compare-and-set: the WHERE clause carries the expected title, so a
        // concurrent rename makes this affect zero rows instead of clobbering.
        let result = sqlx::query(
            "UPDATE chat_sessions SET title = ? WHERE session_id = ? AND user_id = ? AND title = ?",
        )
        .bind(new_title)
        .bind(session_id.to_string())
        .bind(user_id)
        .bind(expected_title)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_messages(
        &self,
        user_id: &str,
        session_id: &Uuid,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM chat_messages WHERE user_id = ? AND session_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(user_id)
        .bind(session_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row =
                MessageRow::from_row(row).map_err(|e| StoreError::Query(e.to_string()))?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }

    async fn insert_message(&self, message: &ChatMessage) -> Result<(), StoreError> {
        // The INSERT ... SELECT guards on parent-session ownership: a missing
        // session or one owned by another user affects zero rows.
        let result = sqlx::query(
            r#"INSERT INTO chat_messages (id, session_id, user_id, role, content, image, created_at)
               SELECT ?, ?, ?, ?, ?, ?, ?
               WHERE EXISTS (
                   SELECT 1 FROM chat_sessions WHERE session_id = ? AND user_id = ?
               )"#,
        )
        .bind(message.id.to_string())
        .bind(message.session_id.to_string())
        .bind(&message.user_id)
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(&message.image)
        .bind(format_datetime(&message.created_at))
        .bind(message.session_id.to_string())
        .bind(&message.user_id)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Unauthorized);
        }

        Ok(())
    }
}
