//! Session-view state machine.
//!
//! Owns the active session id, the optimistic ordered message list, the
//! input buffer, and the pending-generation state for one user-agent view.
//! All transitions are synchronous; the async orchestration (persistence,
//! dispatch) lives in [`super::service::ChatService`].
//!
//! A submission moves the view `Idle -> AwaitingText | AwaitingImage`,
//! returning a [`SubmissionTicket`] that carries the session id the request
//! was issued for. Completion hands the ticket back: a ticket whose session
//! id no longer matches the active selection is discarded, so a reply can
//! never leak into a session the user switched to mid-flight.

use chrono::Utc;
use parlance_types::chat::{ChatMessage, MessageRole};
use parlance_types::generation::{GenerationError, GenerationOutput};
use uuid::Uuid;

/// Synthetic assistant message shown when text generation fails.
/// Local-view only; never persisted.
pub const TEXT_ERROR_MESSAGE: &str = "Sorry, there was an error with the AI response.";

/// Synthetic assistant message shown when image generation fails.
/// Local-view only; never persisted.
pub const IMAGE_ERROR_MESSAGE: &str = "Sorry, there was an error with image generation.";

/// Placeholder substituted when the text provider returns empty content.
pub const EMPTY_RESPONSE_PLACEHOLDER: &str = "(No response)";

/// Which capability a submission targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    Text,
    Image,
}

/// In-flight state of the view.
///
/// The two capabilities are mutually exclusive: a new submission of either
/// kind is only accepted from `Idle`, which serializes user-initiated
/// generation requests per session view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingGeneration {
    #[default]
    Idle,
    Text,
    Image,
}

/// Token tying an in-flight generation request to the session it was issued
/// for. Carries the optimistically appended user message so the caller can
/// persist it without re-reading the view.
#[derive(Debug, Clone)]
pub struct SubmissionTicket {
    session_id: Uuid,
    kind: GenerationKind,
    user_message: ChatMessage,
}

impl SubmissionTicket {
    /// The session this request was issued for.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn kind(&self) -> GenerationKind {
        self.kind
    }

    /// The user message appended when the submission began.
    pub fn user_message(&self) -> &ChatMessage {
        &self.user_message
    }

    /// The prompt to send to the provider.
    pub fn prompt(&self) -> &str {
        &self.user_message.content
    }
}

/// What [`SessionView::finish_submission`] did with a completed request.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// An assistant message was appended and should be persisted.
    Applied(ChatMessage),
    /// A synthetic, local-only error message was appended. Not persisted.
    ErrorShown,
    /// The result arrived for a session that is no longer active.
    Discarded,
}

/// The session-view context object: one per user-agent instance.
pub struct SessionView {
    user_id: String,
    active_session_id: Option<Uuid>,
    messages: Vec<ChatMessage>,
    input: String,
    pending: PendingGeneration,
}

impl SessionView {
    /// Create an empty view for a user: no selection, no messages, idle.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            active_session_id: None,
            messages: Vec::new(),
            input: String::new(),
            pending: PendingGeneration::Idle,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn active_session_id(&self) -> Option<Uuid> {
        self.active_session_id
    }

    /// The locally rendered, ordered message list for the active session.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn pending(&self) -> PendingGeneration {
        self.pending
    }

    pub fn is_idle(&self) -> bool {
        self.pending == PendingGeneration::Idle
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input buffer (the UI's textarea mirror).
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Make `session_id` the active session. Legal in any state.
    ///
    /// Selecting a different session clears the local list immediately so
    /// stale content is never rendered; the caller reloads from storage.
    /// Does not cancel an in-flight generation request -- its ticket will
    /// fail the stale check in [`Self::finish_submission`] instead.
    /// Returns whether the selection changed.
    pub fn select_session(&mut self, session_id: Uuid) -> bool {
        if self.active_session_id == Some(session_id) {
            return false;
        }
        self.messages.clear();
        self.active_session_id = Some(session_id);
        true
    }

    /// Replace the local list with freshly loaded history.
    pub fn load_history(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
    }

    /// Begin a generation submission of the given kind.
    ///
    /// Guards: the trimmed input must be non-empty, no generation may be
    /// pending, and a session must be selected. Any failed guard makes the
    /// whole call a no-op returning `None` -- no append, no buffer change.
    ///
    /// On success the raw (untrimmed) input becomes an optimistic `user`
    /// message on the local list, the input buffer is cleared, the view
    /// moves to the pending state for `kind`, and the returned ticket
    /// carries everything the caller needs to persist and dispatch.
    pub fn begin_submission(&mut self, kind: GenerationKind) -> Option<SubmissionTicket> {
        if self.input.trim().is_empty() || !self.is_idle() {
            return None;
        }
        let session_id = self.active_session_id?;

        let user_message = ChatMessage {
            id: Uuid::now_v7(),
            session_id,
            user_id: self.user_id.clone(),
            role: MessageRole::User,
            content: std::mem::take(&mut self.input),
            image: None,
            created_at: Utc::now(),
        };
        self.messages.push(user_message.clone());
        self.pending = match kind {
            GenerationKind::Text => PendingGeneration::Text,
            GenerationKind::Image => PendingGeneration::Image,
        };

        Some(SubmissionTicket {
            session_id,
            kind,
            user_message,
        })
    }

    /// Complete the submission identified by `ticket`.
    ///
    /// Always returns the view to `Idle`. If the ticket's session is no
    /// longer the active one the outcome is discarded untouched (the stale
    /// response guard). Otherwise a success appends the assistant reply --
    /// text, the empty-reply placeholder, or an image payload with empty
    /// content -- and a failure appends the fixed error literal for the
    /// ticket's capability, which exists only in this view for the page
    /// lifetime.
    pub fn finish_submission(
        &mut self,
        ticket: &SubmissionTicket,
        outcome: Result<GenerationOutput, GenerationError>,
    ) -> Resolution {
        self.pending = PendingGeneration::Idle;

        if self.active_session_id != Some(ticket.session_id) {
            tracing::debug!(
                session_id = %ticket.session_id,
                "discarding generation result for inactive session"
            );
            return Resolution::Discarded;
        }

        match outcome {
            Ok(output) => {
                let (content, image) = match output {
                    GenerationOutput::Text(text) if text.is_empty() => {
                        (EMPTY_RESPONSE_PLACEHOLDER.to_string(), None)
                    }
                    GenerationOutput::Text(text) => (text, None),
                    GenerationOutput::Image(data_uri) => (String::new(), Some(data_uri)),
                };
                let message = self.append_assistant(ticket.session_id, content, image);
                Resolution::Applied(message)
            }
            Err(err) => {
                tracing::warn!(
                    session_id = %ticket.session_id,
                    error = %err,
                    "generation failed; showing synthetic error message"
                );
                let content = match ticket.kind {
                    GenerationKind::Text => TEXT_ERROR_MESSAGE,
                    GenerationKind::Image => IMAGE_ERROR_MESSAGE,
                };
                self.append_assistant(ticket.session_id, content.to_string(), None);
                Resolution::ErrorShown
            }
        }
    }

    fn append_assistant(
        &mut self,
        session_id: Uuid,
        content: String,
        image: Option<String>,
    ) -> ChatMessage {
        let message = ChatMessage {
            id: Uuid::now_v7(),
            session_id,
            user_id: self.user_id.clone(),
            role: MessageRole::Assistant,
            content,
            image,
            created_at: Utc::now(),
        };
        self.messages.push(message.clone());
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_with_session() -> (SessionView, Uuid) {
        let mut view = SessionView::new("auth0|tester");
        let session_id = Uuid::now_v7();
        view.select_session(session_id);
        (view, session_id)
    }

    #[test]
    fn test_new_view_is_empty_and_idle() {
        let view = SessionView::new("u");
        assert!(view.active_session_id().is_none());
        assert!(view.messages().is_empty());
        assert!(view.is_idle());
    }

    #[test]
    fn test_blank_input_is_noop() {
        let (mut view, _) = view_with_session();
        view.set_input("   \n\t ");
        assert!(view.begin_submission(GenerationKind::Text).is_none());
        assert!(view.messages().is_empty());
        // The buffer is untouched by a refused submission.
        assert_eq!(view.input(), "   \n\t ");
    }

    #[test]
    fn test_no_active_session_is_noop() {
        let mut view = SessionView::new("u");
        view.set_input("Hello");
        assert!(view.begin_submission(GenerationKind::Text).is_none());
        assert!(view.messages().is_empty());
    }

    #[test]
    fn test_begin_appends_user_message_and_clears_input() {
        let (mut view, session_id) = view_with_session();
        view.set_input("Hello");

        let ticket = view.begin_submission(GenerationKind::Text).unwrap();
        assert_eq!(ticket.session_id(), session_id);
        assert_eq!(ticket.prompt(), "Hello");
        assert_eq!(view.pending(), PendingGeneration::Text);
        assert_eq!(view.input(), "");
        assert_eq!(view.messages().len(), 1);
        assert_eq!(view.messages()[0].role, MessageRole::User);
        assert_eq!(view.messages()[0].content, "Hello");
    }

    #[test]
    fn test_submission_while_pending_is_noop() {
        let (mut view, _) = view_with_session();
        view.set_input("first");
        view.begin_submission(GenerationKind::Text).unwrap();

        view.set_input("second");
        assert!(view.begin_submission(GenerationKind::Text).is_none());
        assert!(view.begin_submission(GenerationKind::Image).is_none());
        assert_eq!(view.messages().len(), 1);
    }

    #[test]
    fn test_text_success_appends_assistant_reply() {
        let (mut view, _) = view_with_session();
        view.set_input("Hello");
        let ticket = view.begin_submission(GenerationKind::Text).unwrap();

        let resolution = view.finish_submission(
            &ticket,
            Ok(GenerationOutput::Text("Hi there!".to_string())),
        );

        assert!(view.is_idle());
        let Resolution::Applied(message) = resolution else {
            panic!("expected Applied");
        };
        assert_eq!(message.role, MessageRole::Assistant);
        assert_eq!(message.content, "Hi there!");
        assert_eq!(view.messages().len(), 2);
    }

    #[test]
    fn test_empty_text_reply_gets_placeholder() {
        let (mut view, _) = view_with_session();
        view.set_input("Hello");
        let ticket = view.begin_submission(GenerationKind::Text).unwrap();

        let resolution =
            view.finish_submission(&ticket, Ok(GenerationOutput::Text(String::new())));

        let Resolution::Applied(message) = resolution else {
            panic!("expected Applied");
        };
        assert_eq!(message.content, EMPTY_RESPONSE_PLACEHOLDER);
    }

    #[test]
    fn test_image_success_carries_payload_with_empty_content() {
        let (mut view, _) = view_with_session();
        view.set_input("a fox in the snow");
        let ticket = view.begin_submission(GenerationKind::Image).unwrap();
        assert_eq!(view.pending(), PendingGeneration::Image);

        let resolution = view.finish_submission(
            &ticket,
            Ok(GenerationOutput::Image(
                "data:image/png;base64,AAAA".to_string(),
            )),
        );

        let Resolution::Applied(message) = resolution else {
            panic!("expected Applied");
        };
        assert_eq!(message.content, "");
        assert_eq!(message.image.as_deref(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_text_failure_shows_literal_error() {
        let (mut view, _) = view_with_session();
        view.set_input("Hello");
        let ticket = view.begin_submission(GenerationKind::Text).unwrap();

        let resolution = view.finish_submission(
            &ticket,
            Err(GenerationError::Provider {
                status: 502,
                message: "bad gateway".to_string(),
            }),
        );

        assert_eq!(resolution, Resolution::ErrorShown);
        assert!(view.is_idle());
        let last = view.messages().last().unwrap();
        assert_eq!(last.role, MessageRole::Assistant);
        assert_eq!(last.content, TEXT_ERROR_MESSAGE);
        assert!(last.image.is_none());
    }

    #[test]
    fn test_image_failure_shows_image_literal() {
        let (mut view, _) = view_with_session();
        view.set_input("a fox");
        let ticket = view.begin_submission(GenerationKind::Image).unwrap();

        let resolution = view.finish_submission(
            &ticket,
            Err(GenerationError::MissingCredential {
                provider: "stability",
            }),
        );

        assert_eq!(resolution, Resolution::ErrorShown);
        assert_eq!(view.messages().last().unwrap().content, IMAGE_ERROR_MESSAGE);
    }

    #[test]
    fn test_switching_sessions_clears_list_but_not_pending() {
        let (mut view, _) = view_with_session();
        view.set_input("Hello");
        view.begin_submission(GenerationKind::Text).unwrap();

        let other = Uuid::now_v7();
        assert!(view.select_session(other));
        assert!(view.messages().is_empty());
        // The in-flight request is not cancelled by switching.
        assert_eq!(view.pending(), PendingGeneration::Text);
    }

    #[test]
    fn test_reselecting_active_session_keeps_list() {
        let (mut view, session_id) = view_with_session();
        view.load_history(vec![ChatMessage {
            id: Uuid::now_v7(),
            session_id,
            user_id: "auth0|tester".to_string(),
            role: MessageRole::User,
            content: "kept".to_string(),
            image: None,
            created_at: Utc::now(),
        }]);

        assert!(!view.select_session(session_id));
        assert_eq!(view.messages().len(), 1);
    }

    // Scenario: the user switches away while a generation request is
    // outstanding. The late result must not land in the newly active list.
    #[test]
    fn test_stale_result_is_discarded_after_switch() {
        let (mut view, _) = view_with_session();
        view.set_input("Hello from S1");
        let ticket = view.begin_submission(GenerationKind::Text).unwrap();

        let s2 = Uuid::now_v7();
        view.select_session(s2);

        let resolution = view.finish_submission(
            &ticket,
            Ok(GenerationOutput::Text("late reply".to_string())),
        );

        assert_eq!(resolution, Resolution::Discarded);
        assert!(view.is_idle());
        assert!(view.messages().is_empty());
    }

    #[test]
    fn test_discard_still_unblocks_new_submissions() {
        let (mut view, _) = view_with_session();
        view.set_input("Hello");
        let ticket = view.begin_submission(GenerationKind::Text).unwrap();

        view.select_session(Uuid::now_v7());
        view.finish_submission(&ticket, Ok(GenerationOutput::Text("late".to_string())));

        view.set_input("next question");
        assert!(view.begin_submission(GenerationKind::Text).is_some());
    }
}
