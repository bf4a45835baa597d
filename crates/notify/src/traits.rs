//! Notifier trait definition and shared error types.

use std::collections::HashMap;

/// Errors that can occur during notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("messaging API error (HTTP {status}): {description}")]
    Upstream { status: u16, description: String },

    #[error("Template rendering failed: {0}")]
    Template(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NotifyError::Timeout
        } else {
            NotifyError::Transport(err)
        }
    }
}

/// A rendered notification ready for delivery.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Notification {
    /// The rendered subject/title.
    pub subject: String,
    /// The rendered body content.
    pub body: String,
    /// Additional metadata (e.g., center id, date).
    pub metadata: HashMap<String, String>,
}

impl Notification {
    /// The `topic` metadata entry, if the renderer set one.
    pub fn topic(&self) -> Option<&str> {
        self.metadata.get("topic").map(String::as_str)
    }
}

/// Trait for notification channel implementations.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification through this channel.
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;

    /// Test connectivity with a sample notification.
    async fn test(&self) -> Result<(), NotifyError> {
        let test_notification = Notification {
            subject: "[TEST] Slot watcher".to_string(),
            body: "This is a test notification from slotwatch.".to_string(),
            metadata: HashMap::from([("topic".to_string(), "test".to_string())]),
        };
        self.send(&test_notification).await
    }

    /// Human-readable name for this channel (e.g., "telegram", "stdout").
    fn channel_name(&self) -> &str;
}

/// Result of dispatching one record's notification.
#[derive(Debug)]
pub struct DispatchResult {
    pub channel: String,
    /// Topic of the record, `center/age+/date`.
    pub topic: String,
    pub success: bool,
    pub error: Option<String>,
    pub duration_ms: u64,
}
