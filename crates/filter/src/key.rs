//! Notification topic key.

use std::fmt;

use slotwatch_core::{Center, Session};

/// Identifies one notification topic: a center, an age band, and a date.
///
/// Capacity is not part of the key: a capacity change inside the cooldown
/// window does not produce another message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotificationKey {
    pub center_id: u64,
    pub min_age_limit: u32,
    pub date: String,
}

impl NotificationKey {
    pub fn new(center_id: u64, min_age_limit: u32, date: impl Into<String>) -> Self {
        Self {
            center_id,
            min_age_limit,
            date: date.into(),
        }
    }

    pub fn for_session(center: &Center, session: &Session) -> Self {
        Self::new(center.center_id, session.min_age_limit, session.date.as_str())
    }
}

impl fmt::Display for NotificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}+/{}", self.center_id, self.min_age_limit, self.date)
    }
}
