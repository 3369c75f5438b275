//! Chat session and message types for Parlance.
//!
//! These types model the conversation data that flows between the session
//! view, the persistence gateway, and the generation dispatcher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Default title assigned to freshly created sessions.
///
/// Doubles as the sentinel for auto-titling: the first submission into a
/// session renames it if and only if the stored title still equals this value.
pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

/// Maximum length (in characters) of an auto-assigned session title.
pub const MAX_TITLE_CHARS: usize = 50;

/// Author of a message within a session.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (role IN ('user', 'assistant'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A conversation thread owned by a single user.
///
/// Sessions are created on explicit user action with the default title and
/// renamed at most once by the auto-title rule. This core never deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub session_id: Uuid,
    pub user_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    /// Create a fresh session for a user with the default title.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            session_id: Uuid::now_v7(),
            user_id: user_id.into(),
            title: DEFAULT_SESSION_TITLE.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// One turn in a session, authored by either the user or the assistant.
///
/// Messages are append-only and totally ordered within a session by
/// `created_at` ascending, ties broken by `id` (uuid v7 ids are
/// time-sortable, so this equals insertion order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub user_id: String,
    pub role: MessageRole,
    pub content: String,
    /// Image payload as a ready-to-render data URI, assistant messages only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}
