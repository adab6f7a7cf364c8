//! Transport-only client primitives for the task assistant chat endpoint.
//!
//! This crate owns request building, HTTP status classification and the
//! line-oriented event stream decoder for `POST /api/{user_id}/chat`. Token
//! issuance is not handled here; callers plug a [`CredentialProvider`] in.
//!
//! Two send modes exist: [`ChatApiClient::send_once`] returns a complete
//! [`ChatResponse`], and [`ChatApiClient::send_streaming`] returns a lazy
//! [`EventStream`] that reads the response body only as events are requested.

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod events;
pub mod headers;
pub mod payload;
pub mod sse;
pub mod stream;
pub mod url;

pub use client::ChatApiClient;
pub use config::ChatApiConfig;
pub use credentials::{CredentialProvider, StaticToken};
pub use error::{ChatApiError, ErrorKind};
pub use events::{ChatResponse, StreamEvent, ToolInvocation};
pub use payload::ChatRequest;
pub use reqwest::StatusCode;
pub use sse::SseLineDecoder;
pub use stream::EventStream;
pub use url::chat_endpoint;
