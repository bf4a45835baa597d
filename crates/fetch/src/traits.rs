//! Fetcher trait definition and shared error types.

use std::time::Duration;

use chrono::NaiveDate;
use slotwatch_core::AvailabilityResponse;

/// Errors that can occur while querying the availability API.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("upstream error (HTTP {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    /// Classify a reqwest failure, keeping timeouts distinct.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else {
            FetchError::Transport(err)
        }
    }

    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout(_) => "timeout",
            FetchError::Transport(_) => "transport",
            FetchError::Upstream { .. } => "upstream",
            FetchError::MalformedResponse(_) => "malformed",
        }
    }
}

/// One availability lookup: a district on a calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub district_id: String,
    pub date: NaiveDate,
}

impl AvailabilityQuery {
    pub fn new(district_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            district_id: district_id.into(),
            date,
        }
    }

    /// Day-month-year without zero padding, e.g. `10-5-2021`.
    pub fn date_param(&self) -> String {
        self.date.format("%-d-%-m-%Y").to_string()
    }
}

/// Source of availability data for a tick.
#[async_trait::async_trait]
pub trait AvailabilityFetcher: Send + Sync {
    /// Issue a single query. No retry.
    async fn fetch(&self, query: &AvailabilityQuery) -> Result<AvailabilityResponse, FetchError>;
}
