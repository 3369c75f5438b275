//! Per-user session directory.
//!
//! Holds the cached, newest-first session list and creates new sessions.
//! Creation is best-effort: a persistence failure degrades to "no session
//! created" with a warning, never a retry.

use parlance_types::chat::ChatSession;
use parlance_types::error::StoreError;
use tracing::warn;

use crate::chat::store::ChatStore;

/// The listed sessions for one user, cached between refreshes.
pub struct SessionDirectory {
    user_id: String,
    sessions: Vec<ChatSession>,
}

impl SessionDirectory {
    /// Create an empty directory for a user.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            sessions: Vec::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The cached session list, newest `created_at` first.
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    /// Re-read the session list from the store.
    pub async fn refresh<S: ChatStore>(&mut self, store: &S) -> Result<(), StoreError> {
        self.sessions = store.list_sessions(&self.user_id).await?;
        Ok(())
    }

    /// Create and persist a fresh session with the default title.
    ///
    /// Returns `None` when the write fails; the cached list is untouched so
    /// the directory view simply does not update. The caller is responsible
    /// for the select-then-refresh sequencing that keeps the selected id
    /// present in the listed sequence.
    pub async fn create_session<S: ChatStore>(&mut self, store: &S) -> Option<ChatSession> {
        let session = ChatSession::new(self.user_id.clone());
        match store.insert_session(&session).await {
            Ok(()) => Some(session),
            Err(err) => {
                warn!(
                    user_id = %self.user_id,
                    error = %err,
                    "failed to persist new session"
                );
                None
            }
        }
    }
}
