use chat_api::{ChatApiError, ChatResponse};
use time::OffsetDateTime;

use crate::host::LoginRedirect;
use crate::message::Message;

/// Identifier for one submitted message awaiting its reply.
pub type SendId = u64;

pub const ERROR_NOT_AUTHENTICATED: &str = "Not authenticated. Please log in.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Sending,
}

/// Work item handed to the transport after the optimistic append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub send_id: SendId,
    pub user_id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The user message was appended and the request should be sent.
    Started(PendingSend),
    /// Blank input; nothing changed.
    Empty,
    /// No user identity; the error text was set and history is untouched.
    NotAuthenticated,
}

/// History, in-flight sends and error text for one conversation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationSession {
    user_id: Option<String>,
    history: Vec<Message>,
    in_flight: Vec<SendId>,
    error: Option<String>,
    next_send_id: SendId,
}

impl ConversationSession {
    pub fn new(user_id: Option<String>) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Messages in chronological (and display) order.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn state(&self) -> SessionState {
        if self.in_flight.is_empty() {
            SessionState::Idle
        } else {
            SessionState::Sending
        }
    }

    pub fn is_sending(&self) -> bool {
        self.state() == SessionState::Sending
    }

    pub fn error_text(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Starts a send: appends the user message, enters `Sending` and clears
    /// the error. Input is trimmed first.
    pub fn begin_submit(&mut self, text: &str, now: OffsetDateTime) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SubmitOutcome::Empty;
        }

        let Some(user_id) = self.user_id().map(ToOwned::to_owned) else {
            self.reject_unauthenticated();
            return SubmitOutcome::NotAuthenticated;
        };

        self.history.push(Message::user(text, now));

        self.next_send_id += 1;
        let send_id = self.next_send_id;
        self.in_flight.push(send_id);
        self.error = None;

        SubmitOutcome::Started(PendingSend {
            send_id,
            user_id,
            text: text.to_owned(),
        })
    }

    /// Records the precondition failure without touching history.
    pub fn reject_unauthenticated(&mut self) {
        self.error = Some(ERROR_NOT_AUTHENTICATED.to_owned());
    }

    /// Appends the assistant reply for `send_id`. Returns `false` and changes
    /// nothing when the send is unknown or already settled.
    pub fn complete_send(
        &mut self,
        send_id: SendId,
        response: ChatResponse,
        now: OffsetDateTime,
    ) -> bool {
        if !self.settle(send_id) {
            return false;
        }

        self.history.push(Message::assistant(response, now));
        true
    }

    /// Stores the failure text for `send_id`. Returns the redirect to perform
    /// when the failure means the user has to sign in again.
    pub fn fail_send(&mut self, send_id: SendId, error: &ChatApiError) -> Option<LoginRedirect> {
        if !self.settle(send_id) {
            return None;
        }

        self.error = Some(error.to_string());
        error
            .requires_login()
            .then(LoginRedirect::session_expired)
    }

    fn settle(&mut self, send_id: SendId) -> bool {
        let Some(index) = self.in_flight.iter().position(|id| *id == send_id) else {
            return false;
        };
        self.in_flight.remove(index);
        true
    }
}
