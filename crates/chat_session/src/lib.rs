//! Conversation state for the task assistant chat.
//!
//! [`session::ConversationSession`] is a synchronous state machine owning the
//! message history, the in-flight flag and the error text.
//! [`controller::ChatController`] drives it against a [`backend::ChatBackend`]
//! and reports redraws and login redirects to a [`host::SessionHost`].
//!
//! Ordering contract: the user message is appended before the request is
//! sent, and the matching assistant message is appended once, after the
//! request settles. A failed send leaves the user message in place and
//! appends nothing.
//!
//! Submissions are not serialized. Two overlapping submits each append their
//! user message immediately, and their replies land in completion order.

pub mod backend;
pub mod config;
pub mod controller;
pub mod host;
pub mod message;
pub mod session;

pub use backend::{ChatBackend, SendMode};
pub use controller::ChatController;
pub use host::{LoginReason, LoginRedirect, SessionHost};
pub use message::{Message, Role};
pub use session::{ConversationSession, PendingSend, SendId, SessionState, SubmitOutcome};
