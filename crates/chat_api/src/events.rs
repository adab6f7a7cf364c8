use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One backend tool execution reported alongside an assistant reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub tool_name: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolInvocation {
    pub fn succeeded(tool_name: impl Into<String>, result: Option<Value>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            result,
            error: None,
        }
    }

    pub fn failed(tool_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }

    /// Human label for the tool, e.g. `create_task` becomes `create task`.
    pub fn display_label(&self) -> String {
        self.tool_name.replace('_', " ")
    }
}

/// Complete one-shot reply from the chat endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    #[serde(default)]
    pub tools_invoked: Vec<ToolInvocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

/// Event decoded from one `data: <json>` frame of a streaming reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StreamEvent {
    ToolInvocation(ToolInvocation),
    Content(String),
    Done,
}

impl StreamEvent {
    /// Decodes a frame payload. Malformed JSON, unknown `type` values, and
    /// `data` of the wrong shape all yield `None`.
    pub fn from_payload(payload: &str) -> Option<Self> {
        let value = serde_json::from_str::<Value>(payload).ok()?;
        map_event(value)
    }
}

fn map_event(mut value: Value) -> Option<StreamEvent> {
    let data = value.get_mut("data").map(Value::take).unwrap_or(Value::Null);
    let event_type = value.get("type")?.as_str()?;

    match event_type {
        "content" => match data {
            Value::String(text) => Some(StreamEvent::Content(text)),
            _ => None,
        },
        "tool_invocation" => serde_json::from_value::<ToolInvocation>(data)
            .ok()
            .map(StreamEvent::ToolInvocation),
        "done" => Some(StreamEvent::Done),
        _ => None,
    }
}
