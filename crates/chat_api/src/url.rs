use url::Url;

use crate::error::ChatApiError;

/// Default base URL for chat requests.
pub const DEFAULT_CHAT_BASE_URL: &str = "http://localhost:8000";

/// Resolve `{base}/api/{user_id}/chat`.
///
/// Any path already on the base is kept as a prefix and the user id is
/// percent-encoded as a single path segment.
pub fn chat_endpoint(base_url: &str, user_id: &str) -> Result<Url, ChatApiError> {
    let base = if base_url.trim().is_empty() {
        DEFAULT_CHAT_BASE_URL
    } else {
        base_url.trim()
    };

    let mut url =
        Url::parse(base).map_err(|error| ChatApiError::InvalidBaseUrl(format!("{base}: {error}")))?;
    url.path_segments_mut()
        .map_err(|()| ChatApiError::InvalidBaseUrl(format!("{base}: cannot carry a path")))?
        .pop_if_empty()
        .extend(["api", user_id, "chat"]);

    Ok(url)
}
