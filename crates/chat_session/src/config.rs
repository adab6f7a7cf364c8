//! Environment configuration for the terminal front-end.

use std::env;

use chat_api::config::env_string_opt;

use crate::backend::SendMode;

pub const ENV_USER_ID: &str = "CHAT_USER_ID";
pub const ENV_TOKEN: &str = "CHAT_TOKEN";
pub const ENV_STREAM: &str = "CHAT_STREAM";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub user_id: Option<String>,
    pub token: Option<String>,
    pub mode: SendMode,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self {
            user_id: env_string_opt(ENV_USER_ID),
            token: env_string_opt(ENV_TOKEN),
            mode: if env_flag(ENV_STREAM) {
                SendMode::Streaming
            } else {
                SendMode::OneShot
            },
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}
