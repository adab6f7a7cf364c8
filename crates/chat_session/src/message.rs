use chat_api::{ChatResponse, ToolInvocation};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the conversation history. Never mutated once appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub tool_calls: Vec<ToolInvocation>,
    pub timestamp: OffsetDateTime,
}

impl Message {
    pub fn user(content: impl Into<String>, timestamp: OffsetDateTime) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tool_calls: Vec::new(),
            timestamp,
        }
    }

    pub fn assistant(response: ChatResponse, timestamp: OffsetDateTime) -> Self {
        Self {
            role: Role::Assistant,
            content: response.message,
            tool_calls: response.tools_invoked,
            timestamp,
        }
    }
}
