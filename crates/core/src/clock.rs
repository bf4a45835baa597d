//! Clock abstraction so business logic never reads the wall clock directly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::NaiveDate;

/// Milliseconds on a monotonic clock. Only differences are meaningful.
pub type Millis = u64;

/// Source of "now" for the filter and "today" for the availability query.
pub trait Clock: Send + Sync {
    /// Monotonic reading in milliseconds.
    fn now_millis(&self) -> Millis;

    /// Local calendar date used for the availability query.
    fn today(&self) -> NaiveDate;
}

/// Process clock: monotonic millis since construction, local calendar date.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }

    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Hand-driven clock for tests and replay.
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicU64,
    today: NaiveDate,
}

impl ManualClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            millis: AtomicU64::new(0),
            today,
        }
    }

    pub fn set(&self, millis: Millis) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: Millis) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> Millis {
        self.millis.load(Ordering::SeqCst)
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
