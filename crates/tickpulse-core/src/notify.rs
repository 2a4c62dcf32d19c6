//! Delivery boundary and the Telegram channel implementation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::domain::RenderedMessage;
use crate::http_client::{HttpClient, HttpRequest};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const DELIVERY_TIMEOUT_MS: u64 = 10_000;

/// Delivery failed. The caller decides whether the loop continues; no retry
/// happens at this boundary, so a caller-side retry may duplicate a message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("delivery transport error: {0}")]
    Transport(String),
    #[error("channel rejected the message (status {status}): {description}")]
    Rejected { status: u16, description: String },
}

/// Outbound message channel for one configured recipient. Exactly one
/// delivery attempt per message.
pub trait Notifier: Send + Sync {
    fn deliver<'a>(
        &'a self,
        message: &'a RenderedMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), DeliveryError>> + Send + 'a>>;
}

/// Telegram Bot API channel. The bot token is part of the request URL and
/// is never logged.
pub struct TelegramNotifier {
    http: Arc<dyn HttpClient>,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        http: Arc<dyn HttpClient>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            http,
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SendMessageResponse {
    #[serde(default)]
    ok: bool,
    description: Option<String>,
}

impl Notifier for TelegramNotifier {
    fn deliver<'a>(
        &'a self,
        message: &'a RenderedMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), DeliveryError>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!("{TELEGRAM_API_BASE}/bot{}/sendMessage", self.bot_token);
            let body = json!({
                "chat_id": self.chat_id,
                "text": message.text,
                "parse_mode": "Markdown",
            });
            let request = HttpRequest::post(url)
                .with_json_body(&body)
                .with_timeout_ms(DELIVERY_TIMEOUT_MS);

            let response = self
                .http
                .execute(request)
                .await
                .map_err(|error| DeliveryError::Transport(error.to_string()))?;

            let decoded = serde_json::from_str::<SendMessageResponse>(&response.body).ok();
            let accepted = response.is_success() && decoded.as_ref().is_some_and(|d| d.ok);
            if !accepted {
                return Err(DeliveryError::Rejected {
                    status: response.status,
                    description: decoded
                        .and_then(|d| d.description)
                        .unwrap_or_else(|| String::from("no description")),
                });
            }

            Ok(())
        })
    }
}
