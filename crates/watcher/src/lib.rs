//! Polling loop: fetch availability, filter repeats, dispatch notifications.
//!
//! [`Watcher`] owns the cooldown state and runs one tick per fire time of a
//! [`CronTicker`]. Failures inside a tick are logged and the loop moves on.

pub mod schedule;
pub mod watcher;

pub use schedule::{CronTicker, ScheduleError};
pub use watcher::{TickReport, Watcher};
