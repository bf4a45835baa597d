//! HTTP availability fetcher.

use std::time::Duration;

use slotwatch_core::AvailabilityResponse;

use crate::traits::{AvailabilityFetcher, AvailabilityQuery, FetchError};

/// Fixed per-request timeout for the availability query.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Queries the availability endpoint with `district_id` and `date` parameters.
#[derive(Debug)]
pub struct HttpFetcher {
    endpoint: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher for `endpoint` with the standard timeout.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("slotwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Transport)?;

        Ok(Self {
            endpoint: endpoint.into(),
            timeout: FETCH_TIMEOUT,
            client,
        })
    }

    /// Override the timeout. Only tests should need this.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl AvailabilityFetcher for HttpFetcher {
    async fn fetch(&self, query: &AvailabilityQuery) -> Result<AvailabilityResponse, FetchError> {
        let date = query.date_param();

        tracing::debug!(
            endpoint = %self.endpoint,
            district_id = %query.district_id,
            date = %date,
            "Querying availability"
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("district_id", query.district_id.as_str()), ("date", date.as_str())])
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout))?;

        let body: serde_json::Value = match serde_json::from_slice(&bytes) {
            Ok(v) => v,
            Err(e) if status.is_success() => {
                return Err(FetchError::MalformedResponse(format!("body is not JSON: {e}")));
            }
            Err(_) => {
                return Err(FetchError::Upstream {
                    status: status.as_u16(),
                    message: String::from_utf8_lossy(&bytes).trim().to_string(),
                });
            }
        };

        // Upstream reports failures as `{"errorCode": .., "error": ".."}`,
        // sometimes with a 2xx status.
        if let Some(error) = body.get("error").filter(|v| is_set(v)) {
            let message = error
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown status").to_string(),
            });
        }

        // `null` or a bare string means there is nothing to report for the day.
        if !body.is_object() {
            tracing::debug!(
                body = %body,
                "Availability body is not an object; treating as no centers"
            );
            return Ok(AvailabilityResponse::default());
        }

        let parsed: AvailabilityResponse = serde_json::from_value(body)
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;

        tracing::debug!(centers = parsed.centers.len(), "Availability fetched");
        Ok(parsed)
    }
}

/// An `error` field only counts when it carries something: `null`, `false`,
/// `0` and `""` are ignored.
fn is_set(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64() != Some(0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
