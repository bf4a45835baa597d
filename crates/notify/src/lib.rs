//! Slot availability notifications.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable notification channels
//! - Telegram Bot API and stdout (dry-run) notifier implementations
//! - Minijinja rendering of availability records into message text
//! - Dispatcher that sends one message per record, each independently

pub mod dispatcher;
pub mod stdout;
pub mod telegram;
pub mod templating;
pub mod traits;

pub use dispatcher::Dispatcher;
pub use stdout::StdoutNotifier;
pub use telegram::TelegramNotifier;
pub use templating::{MessageRenderer, DEFAULT_MESSAGE_TEMPLATE};
pub use traits::{DispatchResult, Notification, Notifier, NotifyError};
