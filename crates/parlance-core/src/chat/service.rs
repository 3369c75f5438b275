//! Chat service orchestrating the session view against its collaborators.
//!
//! `ChatService` ties the synchronous [`SessionView`] state machine to the
//! persistence gateway, the generation dispatcher, the session directory,
//! and the local selection cache. All flows run on one logical thread; the
//! service suspends only at its await points.
//!
//! Consistency model: the local append happens before the durable write
//! (optimistic update). Between the two there is a window where the view is
//! ahead of storage; a failed write leaves the view ahead until the next
//! fresh load. Failed writes are logged at `warn!` and never retried -- the
//! UI flow continues regardless. A stricter variant would gate the local
//! append on the write succeeding, trading perceived latency for
//! consistency; this implementation deliberately keeps the optimistic
//! ordering.

use parlance_types::chat::{ChatMessage, ChatSession, DEFAULT_SESSION_TITLE, MAX_TITLE_CHARS};
use parlance_types::generation::GenerationRequest;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::chat::directory::SessionDirectory;
use crate::chat::store::ChatStore;
use crate::chat::view::{GenerationKind, Resolution, SessionView, SubmissionTicket};
use crate::generation::{GenerationDispatcher, ImageGenerator, TextGenerator};
use crate::selection::SelectionCache;

/// Durable stand-in content for assistant image messages.
///
/// The optimistic local copy keeps empty content next to the image payload;
/// the stored record carries this literal so a text-only consumer of the
/// history still sees a turn there.
pub const IMAGE_CONTENT_PLACEHOLDER: &str = "[image]";

/// Orchestrates one user's session view, directory, and generation flows.
pub struct ChatService<S, C, T, I>
where
    S: ChatStore,
    C: SelectionCache,
    T: TextGenerator,
    I: ImageGenerator,
{
    store: S,
    selection: C,
    dispatcher: GenerationDispatcher<T, I>,
    directory: SessionDirectory,
    view: SessionView,
}

impl<S, C, T, I> ChatService<S, C, T, I>
where
    S: ChatStore,
    C: SelectionCache,
    T: TextGenerator,
    I: ImageGenerator,
{
    /// Create a service for an authenticated user.
    pub fn new(
        user_id: impl Into<String>,
        store: S,
        selection: C,
        dispatcher: GenerationDispatcher<T, I>,
    ) -> Self {
        let user_id = user_id.into();
        Self {
            store,
            selection,
            dispatcher,
            directory: SessionDirectory::new(user_id.clone()),
            view: SessionView::new(user_id),
        }
    }

    pub fn view(&self) -> &SessionView {
        &self.view
    }

    pub fn directory(&self) -> &SessionDirectory {
        &self.directory
    }

    /// The cached session list, newest first.
    pub fn sessions(&self) -> &[ChatSession] {
        self.directory.sessions()
    }

    /// Replace the input buffer (the UI's textarea mirror).
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.view.set_input(text);
    }

    /// First-load initialization: refresh the directory and restore the
    /// cached session selection, loading its history when present.
    ///
    /// Every failure here degrades to an emptier view with a warning; a
    /// broken cache or store must not block startup.
    #[tracing::instrument(skip(self), fields(user_id = %self.view.user_id()))]
    pub async fn bootstrap(&mut self) {
        if let Err(err) = self.directory.refresh(&self.store).await {
            warn!(error = %err, "failed to list sessions at startup");
        }

        let cached = self.selection.load().await;
        match cached {
            Ok(Some(session_id)) => {
                debug!(session_id = %session_id, "restored cached session selection");
                self.view.select_session(session_id);
                self.reload_history(session_id).await;
            }
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "failed to read cached session selection");
            }
        }
    }

    /// Make `session_id` the active session: clear the stale local list,
    /// persist the selection, and load the session's history fresh from
    /// storage. Reselecting the already-active session is a no-op.
    #[tracing::instrument(skip(self), fields(user_id = %self.view.user_id(), session_id = %session_id))]
    pub async fn select_session(&mut self, session_id: Uuid) {
        if !self.view.select_session(session_id) {
            return;
        }
        if let Err(err) = self.selection.store(&session_id).await {
            warn!(error = %err, "failed to persist session selection");
        }
        self.reload_history(session_id).await;
    }

    /// Create a new session, select it, then refresh the directory.
    ///
    /// The ordering matters: selection happens before the list refresh so
    /// the UI never shows a selected session absent from the list. Returns
    /// `None` when persistence failed (best-effort policy: nothing is
    /// created, nothing changes).
    #[tracing::instrument(skip(self), fields(user_id = %self.view.user_id()))]
    pub async fn create_session(&mut self) -> Option<Uuid> {
        let session = self.directory.create_session(&self.store).await?;
        let session_id = session.session_id;
        info!(session_id = %session_id, "created session");

        self.select_session(session_id).await;
        if let Err(err) = self.directory.refresh(&self.store).await {
            warn!(error = %err, "failed to refresh session list after create");
        }
        Some(session_id)
    }

    /// Submit the input buffer to the text-completion backend.
    ///
    /// Returns `None` when a precondition refused the submission (blank
    /// input, generation already pending, or no active session); otherwise
    /// the resolution the view applied to the completed request.
    #[tracing::instrument(skip(self), fields(user_id = %self.view.user_id()))]
    pub async fn submit_text(&mut self) -> Option<Resolution> {
        let ticket = self.view.begin_submission(GenerationKind::Text)?;
        self.persist_user_turn(&ticket).await;

        let request = GenerationRequest::Text {
            prompt: ticket.prompt().to_string(),
        };
        let outcome = self.dispatcher.dispatch(&request).await;
        let resolution = self.view.finish_submission(&ticket, outcome);

        if let Resolution::Applied(message) = &resolution {
            self.persist_assistant_message(message).await;
        }
        Some(resolution)
    }

    /// Submit the input buffer to the image-synthesis backend.
    ///
    /// Same flow and preconditions as [`Self::submit_text`]; on success the
    /// assistant message carries the image payload, stored durably with the
    /// [`IMAGE_CONTENT_PLACEHOLDER`] content.
    #[tracing::instrument(skip(self), fields(user_id = %self.view.user_id()))]
    pub async fn submit_image(&mut self) -> Option<Resolution> {
        let ticket = self.view.begin_submission(GenerationKind::Image)?;
        self.persist_user_turn(&ticket).await;

        let request = GenerationRequest::Image {
            prompt: ticket.prompt().to_string(),
            model: None,
        };
        let outcome = self.dispatcher.dispatch(&request).await;
        let resolution = self.view.finish_submission(&ticket, outcome);

        if let Resolution::Applied(message) = &resolution {
            self.persist_assistant_message(message).await;
        }
        Some(resolution)
    }

    async fn reload_history(&mut self, session_id: Uuid) {
        let loaded = self
            .store
            .list_messages(self.view.user_id(), &session_id)
            .await;
        match loaded {
            Ok(history) => self.view.load_history(history),
            Err(err) => {
                warn!(
                    session_id = %session_id,
                    error = %err,
                    "failed to load session history"
                );
            }
        }
    }

    /// Persist the optimistic user message and apply the auto-title rule.
    ///
    /// Both writes are fire-and-forget relative to the submission flow. The
    /// rename is a conditional write keyed on the default-title sentinel, so
    /// only the first submission into a session ever changes the title.
    async fn persist_user_turn(&self, ticket: &SubmissionTicket) {
        let session_id = ticket.session_id();
        if let Err(err) = self.store.insert_message(ticket.user_message()).await {
            warn!(
                session_id = %session_id,
                error = %err,
                "failed to persist user message"
            );
        }

        let title: String = ticket.prompt().chars().take(MAX_TITLE_CHARS).collect();
        match self
            .store
            .rename_session_if(&session_id, self.view.user_id(), DEFAULT_SESSION_TITLE, &title)
            .await
        {
            Ok(true) => info!(session_id = %session_id, "session auto-titled"),
            Ok(false) => {}
            Err(err) => {
                warn!(
                    session_id = %session_id,
                    error = %err,
                    "failed to apply session title"
                );
            }
        }
    }

    async fn persist_assistant_message(&self, message: &ChatMessage) {
        let mut record = message.clone();
        if record.image.is_some() && record.content.is_empty() {
            record.content = IMAGE_CONTENT_PLACEHOLDER.to_string();
        }
        if let Err(err) = self.store.insert_message(&record).await {
            warn!(
                session_id = %record.session_id,
                error = %err,
                "failed to persist assistant message"
            );
        }
    }
}
