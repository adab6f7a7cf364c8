use serde::{Deserialize, Serialize};

use crate::error::ChatApiError;

/// Longest message, in characters, the backend accepts.
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// Request body for `POST /api/{user_id}/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub stream: bool,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, stream: bool) -> Self {
        Self {
            message: message.into(),
            stream,
        }
    }

    /// Checks the same bounds the backend schema enforces.
    pub fn validate(&self) -> Result<(), ChatApiError> {
        if self.message.trim().is_empty() {
            return Err(ChatApiError::EmptyMessage);
        }

        let length = self.message.chars().count();
        if length > MAX_MESSAGE_CHARS {
            return Err(ChatApiError::MessageTooLong {
                length,
                max: MAX_MESSAGE_CHARS,
            });
        }

        Ok(())
    }
}
