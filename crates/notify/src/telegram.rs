//! Telegram Bot API notifier.
//!
//! Delivers notifications via the Bot API `sendMessage` endpoint as plain
//! text. The endpoint is configured as a full URL so the bot token can live
//! in an environment variable (`https://api.telegram.org/bot${TOKEN}/sendMessage`).

use std::time::Duration;

use crate::traits::{Notification, Notifier, NotifyError};

/// Per-request timeout for `sendMessage`.
pub const SEND_TIMEOUT: Duration = Duration::from_secs(15);

/// Sends notifications to one Telegram chat or channel.
#[derive(Debug)]
pub struct TelegramNotifier {
    api_url: String,
    chat_id: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl TelegramNotifier {
    /// Creates a new `TelegramNotifier` from configuration values.
    ///
    /// `${VAR_NAME}` references in `api_url` are resolved from the
    /// environment. Returns [`NotifyError::Config`] if the URL is empty,
    /// a referenced variable is missing, or the chat id is empty.
    pub fn from_config(api_url: String, chat_id: String) -> Result<Self, NotifyError> {
        let resolved_url = resolve_env_vars(&api_url)?;

        if resolved_url.trim().is_empty() {
            return Err(NotifyError::Config(
                "Telegram API URL must not be empty".to_string(),
            ));
        }
        if chat_id.trim().is_empty() {
            return Err(NotifyError::Config(
                "Telegram chat id must not be empty".to_string(),
            ));
        }

        Ok(Self {
            api_url: resolved_url,
            chat_id,
            timeout: SEND_TIMEOUT,
            client: reqwest::Client::new(),
        })
    }

    /// Override the request timeout. Only tests should need this.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    /// Sends a notification via `sendMessage`.
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": notification.body,
        });

        let topic = notification.topic().unwrap_or("-");
        tracing::debug!(chat_id = %self.chat_id, topic, "Sending Telegram notification");

        let response = self
            .client
            .post(&self.api_url)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let resp_body: Option<serde_json::Value> = serde_json::from_str(&text).ok();

        let ok_flag = resp_body
            .as_ref()
            .and_then(|b| b.get("ok"))
            .and_then(|v| v.as_bool());

        if status.is_success() && ok_flag != Some(false) {
            tracing::info!(chat_id = %self.chat_id, topic, "Telegram notification sent");
            return Ok(());
        }

        // Handle rate limiting (HTTP 429). Not retried; the topic fires
        // again after its cooldown if slots are still open.
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp_body
                .as_ref()
                .and_then(|b| b.get("parameters"))
                .and_then(|p| p.get("retry_after"))
                .and_then(|v| v.as_u64())
                .unwrap_or(30);
            return Err(NotifyError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let description = resp_body
            .as_ref()
            .and_then(|b| b.get("description"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| {
                if text.trim().is_empty() {
                    "Unknown Telegram API error".to_string()
                } else {
                    text.trim().to_string()
                }
            });

        Err(NotifyError::Upstream {
            status: status.as_u16(),
            description,
        })
    }

    /// Returns the channel name for this notifier.
    fn channel_name(&self) -> &str {
        "telegram"
    }
}

/// Resolve `${VAR_NAME}` patterns in a string using `std::env::var`.
///
/// Returns an error if a referenced variable is not set.
fn resolve_env_vars(input: &str) -> Result<String, NotifyError> {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            // Consume the '{'
            chars.next();
            let mut var_name = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '}' {
                    closed = true;
                    break;
                }
                var_name.push(c);
            }
            if !closed {
                return Err(NotifyError::Config(format!(
                    "unclosed env var reference in: {input}"
                )));
            }
            let value = std::env::var(&var_name).map_err(|_| {
                NotifyError::Config(format!("env var not found: {var_name}"))
            })?;
            result.push_str(&value);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}
