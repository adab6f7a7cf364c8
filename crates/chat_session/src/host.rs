/// Why the user is being sent to the login view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginReason {
    SessionExpired,
}

impl LoginReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionExpired => "session_expired",
        }
    }
}

/// Navigation request emitted when a send fails because the user has to
/// sign in again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginRedirect {
    pub reason: LoginReason,
}

impl LoginRedirect {
    pub fn session_expired() -> Self {
        Self {
            reason: LoginReason::SessionExpired,
        }
    }

    /// Login route carrying the reason, e.g. `/login?error=session_expired`.
    pub fn path(&self) -> String {
        format!("/login?error={}", self.reason.as_str())
    }
}

/// UI side of a conversation: notified when state changes and asked to
/// navigate when the session has expired.
pub trait SessionHost: Send + Sync {
    fn request_render(&self);
    fn navigate_to_login(&self, redirect: LoginRedirect);
}
