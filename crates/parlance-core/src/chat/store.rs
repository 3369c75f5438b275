//! ChatStore trait definition.
//!
//! The persistence gateway: typed CRUD access to the session and message
//! collections, always scoped by user identity. Implementations live in
//! parlance-infra (e.g., `SqliteChatStore`) and are responsible for
//! rejecting cross-user access at the row level.

use parlance_types::chat::{ChatMessage, ChatSession};
use parlance_types::error::StoreError;
use uuid::Uuid;

/// Gateway trait for chat session and message persistence.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). Sessions and
/// messages are append-only from this core's point of view; the only mutation
/// is the conditional title rename.
pub trait ChatStore: Send + Sync {
    /// List a user's sessions, newest `created_at` first.
    fn list_sessions(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ChatSession>, StoreError>> + Send;

    /// Persist a newly created session.
    fn insert_session(
        &self,
        session: &ChatSession,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Rename a session only while its stored title still equals
    /// `expected_title`. Returns whether a row actually changed.
    ///
    /// This compare-and-set keeps auto-titling idempotent under two rapid
    /// submissions racing to rename the same session.
    fn rename_session_if(
        &self,
        session_id: &Uuid,
        user_id: &str,
        expected_title: &str,
        new_title: &str,
    ) -> impl std::future::Future<Output = Result<bool, StoreError>> + Send;

    /// List a session's messages ordered by creation time ascending,
    /// ties broken by insertion order.
    fn list_messages(
        &self,
        user_id: &str,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, StoreError>> + Send;

    /// Append one message to its parent session.
    ///
    /// Fails with `StoreError::Unauthorized` when the parent session does
    /// not exist or belongs to a different user.
    fn insert_message(
        &self,
        message: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
