use std::sync::{Arc, Mutex, MutexGuard};

use time::OffsetDateTime;

use crate::backend::{ChatBackend, SendMode};
use crate::host::{LoginRedirect, SessionHost};
use crate::session::{ConversationSession, SubmitOutcome};

/// Drives a [`ConversationSession`] against a backend.
///
/// The session lock is never held across an await, so the host can read
/// history and flags while a send is in flight.
pub struct ChatController {
    session: Mutex<ConversationSession>,
    backend: Arc<dyn ChatBackend>,
    host: Arc<dyn SessionHost>,
    mode: SendMode,
}

impl ChatController {
    pub fn new(
        session: ConversationSession,
        backend: Arc<dyn ChatBackend>,
        host: Arc<dyn SessionHost>,
    ) -> Self {
        Self {
            session: Mutex::new(session),
            backend,
            host,
            mode: SendMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: SendMode) -> Self {
        self.mode = mode;
        self
    }

    /// Locks the session for reading.
    ///
    /// Take one guard per statement and drop it before calling `session()`
    /// again or awaiting `submit`: the lock is not reentrant, so a second
    /// guard in the same expression blocks the thread.
    pub fn session(&self) -> MutexGuard<'_, ConversationSession> {
        lock_unpoisoned(&self.session)
    }

    /// Sends `text` and folds the outcome back into the session.
    ///
    /// Failures end up in the session's error text; none are returned.
    pub async fn submit(&self, text: &str) {
        if !self.backend.has_credentials().await {
            if !text.trim().is_empty() {
                tracing::warn!("submit rejected: no credential available");
                self.session().reject_unauthenticated();
                self.host.request_render();
                self.host.navigate_to_login(LoginRedirect::session_expired());
            }
            return;
        }

        let outcome = self.session().begin_submit(text, OffsetDateTime::now_utc());
        let pending = match outcome {
            SubmitOutcome::Started(pending) => pending,
            SubmitOutcome::Empty => return,
            SubmitOutcome::NotAuthenticated => {
                tracing::warn!("submit rejected: no user identity");
                self.host.request_render();
                return;
            }
        };
        tracing::debug!(send_id = pending.send_id, mode = ?self.mode, "submitting message");
        self.host.request_render();

        let result = self
            .backend
            .send(&pending.user_id, &pending.text, self.mode)
            .await;

        let redirect = {
            let mut session = self.session();
            match result {
                Ok(response) => {
                    session.complete_send(pending.send_id, response, OffsetDateTime::now_utc());
                    None
                }
                Err(error) => {
                    tracing::warn!(send_id = pending.send_id, error = %error, "send failed");
                    session.fail_send(pending.send_id, &error)
                }
            }
        };
        self.host.request_render();

        if let Some(redirect) = redirect {
            tracing::info!(path = %redirect.path(), "redirecting to login");
            self.host.navigate_to_login(redirect);
        }
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
