//! [`FilterState`]: last-notified timestamps per topic.

use std::collections::HashMap;

use slotwatch_core::Millis;

use crate::key::NotificationKey;

/// Last-notified timestamp for every topic that has ever been approved.
///
/// A key with no entry has never been notified. Entries are only written by
/// [`NotificationFilter::apply`](crate::NotificationFilter::apply) and are
/// never removed unless the owner calls [`prune_expired`](Self::prune_expired).
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    entries: HashMap<NotificationKey, Millis>,
}

impl FilterState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// When the topic was last approved, if ever.
    pub fn last_notified(&self, key: &NotificationKey) -> Option<Millis> {
        self.entries.get(key).copied()
    }

    /// Record an approval at `at`, overwriting any previous timestamp.
    pub(crate) fn record(&mut self, key: NotificationKey, at: Millis) {
        self.entries.insert(key, at);
    }

    /// Drop entries older than `cooldown_ms` at `now`. Returns how many were removed.
    ///
    /// An expired entry and a missing entry lead to the same decision, so
    /// pruning bounds memory without changing which sessions get through.
    pub fn prune_expired(&mut self, now: Millis, cooldown_ms: Millis) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, last| now.saturating_sub(*last) <= cooldown_ms);
        before - self.entries.len()
    }

    /// Number of tracked topics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no topic has been notified yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
