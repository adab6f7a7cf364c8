use async_trait::async_trait;
use chat_api::{ChatApiClient, ChatApiError, ChatResponse};

/// Transport variant a controller sends with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SendMode {
    /// One request, one complete JSON reply.
    #[default]
    OneShot,
    /// Event stream folded into a reply once it ends.
    Streaming,
}

/// Remote chat agent as seen by the conversation layer.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Whether a credential is currently available. Checked before the
    /// optimistic append so an unauthenticated submit leaves history alone.
    async fn has_credentials(&self) -> bool {
        true
    }

    async fn send(
        &self,
        user_id: &str,
        text: &str,
        mode: SendMode,
    ) -> Result<ChatResponse, ChatApiError>;
}

#[async_trait]
impl ChatBackend for ChatApiClient {
    async fn has_credentials(&self) -> bool {
        self.acquire_token().await.is_ok()
    }

    async fn send(
        &self,
        user_id: &str,
        text: &str,
        mode: SendMode,
    ) -> Result<ChatResponse, ChatApiError> {
        match mode {
            SendMode::OneShot => self.send_once(user_id, text).await,
            SendMode::Streaming => {
                self.send_streaming(user_id, text)
                    .await?
                    .collect_response()
                    .await
            }
        }
    }
}
