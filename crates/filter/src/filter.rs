//! [`NotificationFilter`]: decides which sessions are new enough to announce.

use slotwatch_core::{AvailabilityRecord, Center, Millis};
use tracing::{debug, info};

use crate::key::NotificationKey;
use crate::state::FilterState;

/// Minimum time between two notifications for the same topic (10 minutes).
pub const COOLDOWN_MS: Millis = 600_000;

/// What a filter pass saw, for tick-level logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The batch had no centers (missing, malformed, or empty list).
    NoCenters,
    /// Centers were present but nothing passed the filter.
    NoNewSlots,
    /// This many sessions were approved.
    Approved(usize),
}

/// Result of one filter pass.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// Approved records, in input order.
    pub records: Vec<AvailabilityRecord>,
    pub classification: Classification,
}

/// Stateless decision logic; the state is passed in by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationFilter {
    _private: (),
}

impl NotificationFilter {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Whether a topic may fire at `now`.
    ///
    /// True when the topic was never notified, or strictly more than
    /// [`COOLDOWN_MS`] has elapsed since its last approval.
    pub fn is_due(&self, state: &FilterState, key: &NotificationKey, now: Millis) -> bool {
        match state.last_notified(key) {
            None => true,
            Some(last) => now.saturating_sub(last) > COOLDOWN_MS,
        }
    }

    /// Run one batch of centers through the filter.
    ///
    /// Sessions are visited in input order. Sessions with no capacity are
    /// skipped; sessions whose topic is still cooling down are dropped
    /// without touching `state`. Every approved session stamps its topic
    /// with `now` and yields one [`AvailabilityRecord`].
    pub fn apply(&self, centers: &[Center], state: &mut FilterState, now: Millis) -> FilterOutcome {
        if centers.is_empty() {
            info!("no centers available");
            return FilterOutcome {
                records: Vec::new(),
                classification: Classification::NoCenters,
            };
        }

        let mut records = Vec::new();

        for center in centers {
            for session in &center.sessions {
                if session.available_capacity <= 0 {
                    continue;
                }

                let key = NotificationKey::for_session(center, session);
                if !self.is_due(state, &key, now) {
                    debug!(
                        topic = %key,
                        capacity = session.available_capacity,
                        "topic still in cooldown"
                    );
                    continue;
                }

                debug!(topic = %key, capacity = session.available_capacity, "topic approved");
                state.record(key, now);
                records.push(AvailabilityRecord::from_session(center, session));
            }
        }

        let classification = if records.is_empty() {
            info!(centers = centers.len(), "slot unavailable");
            Classification::NoNewSlots
        } else {
            Classification::Approved(records.len())
        };

        FilterOutcome {
            records,
            classification,
        }
    }
}
