//! Cooldown-based suppression of repeated availability notifications.
//!
//! Upstream republishes the same open slots on every poll. The
//! [`NotificationFilter`] remembers when each (center, age band, date) topic
//! last fired and only lets a session through again once the cooldown has
//! elapsed. State lives in a caller-owned [`FilterState`]; the filter never
//! reads the clock itself.

mod filter;
mod key;
mod state;

#[cfg(test)]
mod tests;

pub use self::filter::{Classification, FilterOutcome, NotificationFilter, COOLDOWN_MS};
pub use self::key::NotificationKey;
pub use self::state::FilterState;
