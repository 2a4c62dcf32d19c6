//! Process configuration from the environment.
//!
//! The credential set is built once at startup and passed down explicitly;
//! nothing reads the environment after this point.

use std::env;

use thiserror::Error;

pub const ENV_TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const ENV_DHAN_CLIENT_ID: &str = "DHAN_CLIENT_ID";
pub const ENV_DHAN_ACCESS_TOKEN: &str = "DHAN_ACCESS_TOKEN";

/// Fatal startup configuration error: the scheduler never starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("environment variable {0} is empty")]
    Empty(&'static str),
}

/// Immutable credential set. Values are never logged.
#[derive(Clone, Debug)]
pub struct BotConfig {
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,
    pub dhan_client_id: String,
    pub dhan_access_token: String,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            telegram_bot_token: required(ENV_TELEGRAM_BOT_TOKEN)?,
            telegram_chat_id: required(ENV_TELEGRAM_CHAT_ID)?,
            dhan_client_id: required(ENV_DHAN_CLIENT_ID)?,
            dhan_access_token: required(ENV_DHAN_ACCESS_TOKEN)?,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    let value = env::var(name).map_err(|_| ConfigError::Missing(name))?;
    if value.trim().is_empty() {
        return Err(ConfigError::Empty(name));
    }
    Ok(value)
}
