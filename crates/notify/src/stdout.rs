//! Dry-run notifier that prints messages instead of sending them.

use crate::traits::{Notification, Notifier, NotifyError};

/// Prints each notification to standard output.
#[derive(Debug, Default)]
pub struct StdoutNotifier {
    /// Channel the message would have gone to, shown in the banner.
    target: String,
}

impl StdoutNotifier {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    fn format(&self, notification: &Notification) -> String {
        match notification.topic() {
            Some(topic) => format!(
                "=== {} [{}] (dry run, to {}) ===\n{}\n",
                notification.subject, topic, self.target, notification.body
            ),
            None => format!(
                "=== {} (dry run, to {}) ===\n{}\n",
                notification.subject, self.target, notification.body
            ),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for StdoutNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        println!("{}", self.format(notification));
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "stdout"
    }
}
