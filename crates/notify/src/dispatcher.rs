//! Sends one notification per approved record.
//!
//! Records are rendered and sent concurrently. Each send is independent:
//! a failure is logged and reported in its [`DispatchResult`], and never
//! stops the other sends. Nothing is retried.

use slotwatch_core::AvailabilityRecord;

use crate::templating::{topic, MessageRenderer};
use crate::traits::{DispatchResult, Notifier, NotifyError};

/// Renders records and delivers them through a single channel.
pub struct Dispatcher {
    channel: Box<dyn Notifier>,
    renderer: MessageRenderer,
}

impl Dispatcher {
    /// Create a dispatcher for `channel` using `renderer` for message text.
    pub fn new(channel: Box<dyn Notifier>, renderer: MessageRenderer) -> Self {
        Self { channel, renderer }
    }

    pub fn channel_name(&self) -> &str {
        self.channel.channel_name()
    }

    /// Dispatch every record, concurrently.
    ///
    /// Returns one result per record, in input order.
    pub async fn dispatch_all(&self, records: &[AvailabilityRecord]) -> Vec<DispatchResult> {
        if records.is_empty() {
            return Vec::new();
        }
        futures::future::join_all(records.iter().map(|r| self.dispatch_one(r))).await
    }

    /// Render and send a single record.
    pub async fn dispatch_one(&self, record: &AvailabilityRecord) -> DispatchResult {
        let topic = topic(record);
        let start = std::time::Instant::now();

        let result = match self.renderer.render(record) {
            Ok(notification) => self.channel.send(&notification).await,
            Err(e) => Err(e),
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        let (success, error) = match result {
            Ok(()) => {
                tracing::info!(
                    topic = %topic,
                    channel = self.channel.channel_name(),
                    duration_ms,
                    "Notification delivered"
                );
                (true, None)
            }
            Err(e) => {
                tracing::warn!(
                    topic = %topic,
                    channel = self.channel.channel_name(),
                    kind = error_kind(&e),
                    error = %e,
                    duration_ms,
                    "Notification delivery failed"
                );
                (false, Some(e.to_string()))
            }
        };

        DispatchResult {
            channel: self.channel.channel_name().to_string(),
            topic,
            success,
            error,
            duration_ms,
        }
    }

    /// Send a test notification through the channel (`slotwatch --test-notify`).
    pub async fn test_notify(&self) -> Result<(), NotifyError> {
        self.channel.test().await
    }
}

fn error_kind(err: &NotifyError) -> &'static str {
    match err {
        NotifyError::Timeout => "timeout",
        NotifyError::Transport(_) => "transport",
        NotifyError::Upstream { .. } => "upstream",
        NotifyError::RateLimited { .. } => "rate_limited",
        NotifyError::Template(_) => "template",
        NotifyError::Config(_) => "config",
    }
}
