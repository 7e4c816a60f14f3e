//! Conversation state machine.
//!
//! `ConversationSession` owns the transcript, the pending input buffer and
//! the single in-flight flag. The flag gates new submissions rather than
//! queueing them: at most one chat request is outstanding at a time.
//!
//! State transitions are synchronous (`begin`/`complete`) so the UI can
//! mutate shared state on either side of the awaited network call;
//! `ConversationController` composes both around a `ChatBackend` for
//! headless use and tests.

use crate::api::{AnswerPayload, ApiError, ChatBackend};
use crate::types::Message;

/// Placeholder rendered when a successful response carries no answer text.
pub const NO_ANSWER: &str = "No answer";

#[derive(Debug, Default)]
pub struct ConversationSession {
    messages: Vec<Message>,
    input: String,
    in_flight: bool,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Sole integration point with the speech bridge: a recognized
    /// transcript replaces the pending input buffer verbatim and is never
    /// auto-submitted.
    pub fn receive_voice_transcript(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Accepts or silently rejects a submission. On acceptance the user
    /// turn is appended immediately (unconditional on the network outcome),
    /// the input buffer is cleared and the session becomes gated; the
    /// returned question is what the caller must send, exactly once.
    pub fn begin(&mut self, text: &str) -> Option<String> {
        let question = text.trim();
        if question.is_empty() || self.in_flight {
            return None;
        }

        self.messages.push(Message::user(question));
        self.input.clear();
        self.in_flight = true;
        Some(question.to_string())
    }

    /// Appends the assistant turn for the outcome of the network call and
    /// ungates the session. Every exit path of a submission ends here, so
    /// the in-flight flag can never stay stuck.
    pub fn complete(&mut self, outcome: Result<AnswerPayload, ApiError>) {
        let message = match outcome {
            Ok(payload) => Message::assistant(
                payload.answer.unwrap_or_else(|| NO_ANSWER.to_string()),
                payload.citations,
            ),
            Err(err) => {
                tracing::warn!(error = %err, "chat request failed");
                Message::assistant(err.user_message(), Vec::new())
            }
        };
        self.messages.push(message);
        self.in_flight = false;
    }
}

/// Drives a full submit round-trip against a `ChatBackend`.
pub struct ConversationController<B: ChatBackend> {
    session: ConversationSession,
    backend: B,
}

impl<B: ChatBackend> ConversationController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            session: ConversationSession::new(),
            backend,
        }
    }

    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    pub fn receive_voice_transcript(&mut self, text: impl Into<String>) {
        self.session.receive_voice_transcript(text);
    }

    /// Submits `text` as a question. Returns false when the submission was
    /// rejected (empty input or a request already in flight); otherwise
    /// exactly one user turn and one assistant turn (answer or error) are
    /// appended, in that order.
    pub async fn submit(&mut self, text: &str) -> bool {
        let Some(question) = self.session.begin(text) else {
            return false;
        };
        let outcome = self.backend.ask(&question).await;
        self.session.complete(outcome);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Citation, Role};

    #[test]
    fn test_begin_rejects_blank_input() {
        let mut session = ConversationSession::new();
        assert_eq!(session.begin(""), None);
        assert_eq!(session.begin("   \t\n"), None);
        assert!(session.messages().is_empty());
        assert!(!session.in_flight());
    }

    #[test]
    fn test_begin_rejects_while_in_flight() {
        let mut session = ConversationSession::new();
        assert!(session.begin("first question").is_some());
        assert!(session.in_flight());

        assert_eq!(session.begin("second question"), None);
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn test_begin_appends_user_turn_and_clears_input() {
        let mut session = ConversationSession::new();
        session.set_input("  what is the leave policy?  ");
        let text = session.input().to_string();
        let question = session.begin(&text).expect("submission accepted");

        assert_eq!(question, "what is the leave policy?");
        assert_eq!(session.input(), "");
        assert_eq!(session.messages().len(), 1);
        let turn = &session.messages()[0];
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.content, "what is the leave policy?");
        assert!(turn.citations.is_empty());
    }

    #[test]
    fn test_complete_success_appends_answer_with_citations() {
        let mut session = ConversationSession::new();
        session.begin("question").unwrap();

        let citations = vec![
            Citation {
                index: 3,
                source_name: Some("policy.pdf".into()),
                locator: Some("http://localhost:8000/files/policy.pdf".into()),
            },
            Citation {
                index: 1,
                source_name: None,
                locator: None,
            },
        ];
        session.complete(Ok(AnswerPayload {
            answer: Some("Here is the answer.".into()),
            citations: citations.clone(),
        }));

        assert!(!session.in_flight());
        assert_eq!(session.messages().len(), 2);
        let turn = &session.messages()[1];
        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.content, "Here is the answer.");
        // Backend order, not index order.
        assert_eq!(turn.citations, citations);
    }

    #[test]
    fn test_complete_missing_answer_renders_placeholder() {
        let mut session = ConversationSession::new();
        session.begin("question").unwrap();
        session.complete(Ok(AnswerPayload::default()));

        let turn = session.messages().last().unwrap();
        assert_eq!(turn.content, NO_ANSWER);
        assert!(turn.citations.is_empty());
        assert!(!session.in_flight());
    }

    #[test]
    fn test_complete_error_appends_detail_verbatim() {
        let mut session = ConversationSession::new();
        session.begin("question").unwrap();
        session.complete(Err(ApiError::Backend {
            status: 500,
            detail: Some("vectorstore unavailable".into()),
        }));

        let turn = session.messages().last().unwrap();
        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.content, "vectorstore unavailable");
        assert!(turn.citations.is_empty());
        assert!(!session.in_flight());
    }

    #[test]
    fn test_transcript_is_append_only_across_errors() {
        let mut session = ConversationSession::new();
        session.begin("question").unwrap();
        let user_turn = session.messages()[0].clone();
        session.complete(Err(ApiError::Backend {
            status: 502,
            detail: None,
        }));

        // The failed user turn is untouched; the error is a new turn.
        assert_eq!(session.messages()[0], user_turn);
        assert_eq!(session.messages().len(), 2);
    }

    #[test]
    fn test_voice_transcript_replaces_buffer_without_submitting() {
        let mut session = ConversationSession::new();
        session.set_input("typed so far");
        session.receive_voice_transcript("what is EPF?");

        assert_eq!(session.input(), "what is EPF?");
        assert!(session.messages().is_empty());
        assert!(!session.in_flight());
    }
}
