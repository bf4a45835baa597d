//! Cron parsing and wait-for-next-fire helpers.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, TimeZone};
use cron::Schedule;

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("invalid cron expression '{expression}': {source}")]
    InvalidCron {
        expression: String,
        #[source]
        source: cron::error::Error,
    },
}

/// Normalize a 5-field cron expression to 6-field by prepending "0 " for seconds.
///
/// The `cron` crate requires 6 fields: `sec min hour day-of-month month day-of-week`.
/// Operators write standard 5-field cron: `min hour day-of-month month day-of-week`.
pub fn normalize_cron(cron_5field: &str) -> String {
    let trimmed = cron_5field.trim();
    let field_count = trimmed.split_whitespace().count();
    if field_count == 5 {
        format!("0 {}", trimmed)
    } else {
        // Already 6-field or non-standard; pass through as-is.
        trimmed.to_string()
    }
}

/// Fire times for the polling loop.
#[derive(Debug, Clone)]
pub struct CronTicker {
    expression: String,
    schedule: Schedule,
}

impl CronTicker {
    /// Parse a 5- or 6-field cron expression.
    pub fn parse(expression: &str) -> Result<Self, ScheduleError> {
        let normalized = normalize_cron(expression);
        let schedule =
            Schedule::from_str(&normalized).map_err(|source| ScheduleError::InvalidCron {
                expression: expression.to_string(),
                source,
            })?;
        Ok(Self {
            expression: normalized,
            schedule,
        })
    }

    /// Normalized 6-field expression.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// First fire time strictly after `now`.
    ///
    /// Fire times that passed while a tick was running are skipped, never
    /// queued, so ticks cannot pile up.
    pub fn next_after<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.schedule.after(now).next()
    }

    /// How long to sleep from `now` until the next fire time.
    pub fn until_next<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<Duration> {
        let next = self.next_after(now)?;
        Some(
            next.signed_duration_since(now.clone())
                .to_std()
                .unwrap_or(Duration::ZERO),
        )
    }
}
