use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Failure surfaced by the chat transport.
///
/// `Display` output is the human-readable text the conversation layer stores
/// as its error state.
#[derive(Debug, Error)]
pub enum ChatApiError {
    #[error("Not authenticated - please log in")]
    NotAuthenticated,
    #[error("Session expired - please log in again")]
    SessionExpired,
    #[error("You don't have permission to access this resource")]
    Forbidden,
    #[error("{message}")]
    Status { status: StatusCode, message: String },
    #[error("Message must not be empty")]
    EmptyMessage,
    #[error("Message is too long ({length} characters, maximum is {max})")]
    MessageTooLong { length: usize, max: usize },
    #[error("no response body")]
    MissingBody,
    #[error("request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid response payload: {0}")]
    InvalidResponse(#[from] serde_json::Error),
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("invalid header: {0}")]
    InvalidHeader(String),
}

/// Coarse failure class used by callers that branch on error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No credential, expired session, or forbidden.
    Auth,
    /// The server (or local validation) rejected the request.
    Request,
    /// Network failure, missing body, or an unreadable payload.
    Transport,
    /// The client was misconfigured.
    Config,
}

impl ChatApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAuthenticated | Self::SessionExpired | Self::Forbidden => ErrorKind::Auth,
            Self::Status { .. } | Self::EmptyMessage | Self::MessageTooLong { .. } => {
                ErrorKind::Request
            }
            Self::MissingBody | Self::Http(_) | Self::InvalidResponse(_) => ErrorKind::Transport,
            Self::InvalidBaseUrl(_) | Self::InvalidHeader(_) => ErrorKind::Config,
        }
    }

    /// True when the user has to sign in again before retrying.
    ///
    /// `Forbidden` is excluded: signing in again does not grant access.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::SessionExpired)
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::SessionExpired => Some(StatusCode::UNAUTHORIZED),
            Self::Forbidden => Some(StatusCode::FORBIDDEN),
            Self::Http(error) => error.status(),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    detail: Option<Value>,
}

/// Maps a non-success status to its error, or `None` for 2xx.
///
/// 401 and 403 are classified without looking at the body.
pub fn classify_status(status: StatusCode, body: &str) -> Option<ChatApiError> {
    if status.is_success() {
        return None;
    }

    Some(match status {
        StatusCode::UNAUTHORIZED => ChatApiError::SessionExpired,
        StatusCode::FORBIDDEN => ChatApiError::Forbidden,
        _ => ChatApiError::Status {
            status,
            message: parse_error_detail(status, body),
        },
    })
}

/// Extracts the server-supplied `detail` text, falling back to a generic
/// message carrying the status code.
///
/// Validation failures arrive as `{"detail":[{"msg":..}, ..]}`; the first
/// `msg` is used for those.
pub fn parse_error_detail(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .and_then(|payload| payload.detail)
        .and_then(|detail| detail_message(&detail))
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
}

fn detail_message(detail: &Value) -> Option<String> {
    match detail {
        Value::String(message) => non_empty_string(message),
        Value::Array(items) => items
            .iter()
            .find_map(|item| item.get("msg").and_then(Value::as_str))
            .and_then(non_empty_string),
        _ => None,
    }
}

fn non_empty_string(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}
