//! Telegram report delivery.
//!
//! Delivery is best-effort: missing credentials are a silent skip and a
//! failed send is logged, never propagated — the report has already been
//! printed by the time this runs.

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, error, info};

use crate::config::TelegramConfig;

/// Default Telegram Bot API base URL. Overridable for tests.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

const SEND_TIMEOUT_SECS: u64 = 30;

/// Outbound message delivery. Production sends through the Telegram Bot
/// API; tests substitute a recording implementation.
#[async_trait]
pub trait MessageTransport {
    async fn send(&self, bot_token: &str, chat_id: &str, text: &str) -> Result<()>;
}

/// Sends messages via `POST {api_base}/bot{token}/sendMessage`.
pub struct TelegramTransport {
    client: reqwest::Client,
    api_base: String,
}

impl TelegramTransport {
    pub fn new() -> Result<Self> {
        Self::with_api_base(TELEGRAM_API_BASE)
    }

    pub fn with_api_base(api_base: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.into(),
        })
    }
}

#[async_trait]
impl MessageTransport for TelegramTransport {
    async fn send(&self, bot_token: &str, chat_id: &str, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, bot_token);
        let body = json!({ "chat_id": chat_id, "text": text });

        // without_url keeps the bot token out of error messages
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow!("Telegram request failed: {}", e.without_url()))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Telegram API returned status {}",
                response.status()
            ));
        }
        Ok(())
    }
}

/// Send the report if credentials are configured; otherwise do nothing.
pub async fn notify(config: &TelegramConfig, transport: &dyn MessageTransport, report: &str) {
    let Some((bot_token, chat_id)) = config.credentials() else {
        debug!("Telegram credentials not configured, skipping notification");
        return;
    };

    match transport.send(bot_token, chat_id, report).await {
        Ok(()) => info!("Report delivered to Telegram"),
        Err(e) => error!("Failed to send Telegram message: {}", e),
    }
}
