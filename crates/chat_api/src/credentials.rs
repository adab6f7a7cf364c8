use async_trait::async_trait;

/// Supplies the bearer token for the current user session.
///
/// Returning `None` means the user is not authenticated; the client fails
/// before any network call in that case.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn token(&self) -> Option<String>;
}

/// Fixed token, or a fixed absence of one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticToken {
    token: Option<String>,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn absent() -> Self {
        Self { token: None }
    }

    pub fn from_option(token: Option<String>) -> Self {
        Self { token }
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn token(&self) -> Option<String> {
        self.token.clone()
    }
}

/// Blank tokens count as absent.
pub(crate) fn usable_token(raw: Option<String>) -> Option<String> {
    let token = raw?;
    let trimmed = token.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
