use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use url::Url;

use crate::config::ChatApiConfig;
use crate::credentials::{usable_token, CredentialProvider};
use crate::error::{classify_status, ChatApiError};
use crate::events::ChatResponse;
use crate::headers::build_headers;
use crate::payload::ChatRequest;
use crate::stream::EventStream;
use crate::url::chat_endpoint;

/// Authenticated client for the chat endpoint.
///
/// No retries happen here; a failed send is returned to the caller as-is.
pub struct ChatApiClient {
    http: Client,
    config: ChatApiConfig,
    credentials: Arc<dyn CredentialProvider>,
}

impl std::fmt::Debug for ChatApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ChatApiClient {
    pub fn new(
        config: ChatApiConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ChatApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ChatApiError::from)?;
        Ok(Self {
            http,
            config,
            credentials,
        })
    }

    pub fn config(&self) -> &ChatApiConfig {
        &self.config
    }

    pub fn endpoint(&self, user_id: &str) -> Result<Url, ChatApiError> {
        chat_endpoint(&self.config.base_url, user_id)
    }

    /// Resolves a usable bearer token, or fails with
    /// [`ChatApiError::NotAuthenticated`].
    pub async fn acquire_token(&self) -> Result<String, ChatApiError> {
        usable_token(self.credentials.token().await).ok_or(ChatApiError::NotAuthenticated)
    }

    pub fn build_headers(&self, token: &str, stream: bool) -> Result<HeaderMap, ChatApiError> {
        let headers = build_headers(&self.config, token, stream);
        let mut out = HeaderMap::new();
        for (key, value) in headers {
            out.insert(
                HeaderName::from_bytes(key.as_bytes())
                    .map_err(|_| ChatApiError::InvalidHeader(format!("invalid header key: {key}")))?,
                HeaderValue::from_str(&value).map_err(|_| {
                    ChatApiError::InvalidHeader(format!("invalid header value for {key}"))
                })?,
            );
        }
        Ok(out)
    }

    /// Builds the authenticated POST. The credential is checked first, so a
    /// missing token fails before the message or URL are looked at.
    pub async fn build_request(
        &self,
        user_id: &str,
        request: &ChatRequest,
    ) -> Result<RequestBuilder, ChatApiError> {
        let token = self.acquire_token().await?;
        request.validate()?;

        let endpoint = self.endpoint(user_id)?;
        let headers = self.build_headers(&token, request.stream)?;
        Ok(self.http.post(endpoint).headers(headers).json(request))
    }

    /// Sends one message and waits for the complete JSON reply.
    pub async fn send_once(&self, user_id: &str, text: &str) -> Result<ChatResponse, ChatApiError> {
        let response = self.dispatch(user_id, ChatRequest::new(text, false)).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice::<ChatResponse>(&body)?)
    }

    /// Sends one message and returns the reply as a lazy event stream.
    pub async fn send_streaming(
        &self,
        user_id: &str,
        text: &str,
    ) -> Result<EventStream, ChatApiError> {
        let response = self.dispatch(user_id, ChatRequest::new(text, true)).await?;
        if !has_readable_body(&response) {
            return Err(ChatApiError::MissingBody);
        }
        Ok(EventStream::from_response(response))
    }

    async fn dispatch(&self, user_id: &str, request: ChatRequest) -> Result<Response, ChatApiError> {
        let builder = self.build_request(user_id, &request).await?;
        tracing::debug!(user_id, stream = request.stream, "dispatching chat request");

        let response = builder.send().await?;
        check_status(response).await
    }
}

/// Passes 2xx responses through and turns everything else into an error
/// before the body is consumed for anything but the error detail.
async fn check_status(response: Response) -> Result<Response, ChatApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => String::new(),
        _ => response.text().await.unwrap_or_default(),
    };
    let error = classify_status(status, &body).unwrap_or_else(|| ChatApiError::Status {
        status,
        message: format!("Request failed with status {}", status.as_u16()),
    });
    tracing::warn!(status = status.as_u16(), error = %error, "chat request rejected");
    Err(error)
}

fn has_readable_body(response: &Response) -> bool {
    response.status() != StatusCode::NO_CONTENT && response.content_length() != Some(0)
}
