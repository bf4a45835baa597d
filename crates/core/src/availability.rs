//! Availability data published by the upstream API.
//!
//! The upstream shape is loosely enforced: `centers` and `sessions` that are
//! missing or not arrays read as empty, and individual entries that do not
//! match are skipped. A tick with bad data is a tick with no data.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

/// Top-level response body of the availability query.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AvailabilityResponse {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub centers: Vec<Center>,
}

/// A vaccination center and its published sessions.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Center {
    pub center_id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub pincode: String,
    #[serde(default)]
    pub state_name: Option<String>,
    #[serde(default)]
    pub district_name: Option<String>,
    #[serde(default)]
    pub block_name: Option<String>,
    #[serde(default)]
    pub fee_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub sessions: Vec<Session>,
}

/// One bookable day at a center for one age band.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Session {
    #[serde(default)]
    pub session_id: Option<String>,
    pub date: String,
    pub min_age_limit: u32,
    #[serde(default)]
    pub vaccine: String,
    #[serde(default)]
    pub available_capacity: i64,
    #[serde(default)]
    pub available_capacity_dose1: Option<i64>,
    #[serde(default)]
    pub available_capacity_dose2: Option<i64>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub slots: Vec<String>,
}

/// A session approved for notification, flattened with its center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityRecord {
    pub center_id: u64,
    pub center_name: String,
    pub address: String,
    pub pincode: String,
    pub date: String,
    pub age_limit: u32,
    pub vaccine: String,
    pub availability: i64,
    pub slots: Vec<String>,
    pub fee_type: Option<String>,
    pub dose1: Option<i64>,
    pub dose2: Option<i64>,
}

impl AvailabilityRecord {
    pub fn from_session(center: &Center, session: &Session) -> Self {
        Self {
            center_id: center.center_id,
            center_name: center.name.clone(),
            address: center.address.clone(),
            pincode: center.pincode.clone(),
            date: session.date.clone(),
            age_limit: session.min_age_limit,
            vaccine: session.vaccine.clone(),
            availability: session.available_capacity,
            slots: session.slots.clone(),
            fee_type: center.fee_type.clone(),
            dose1: session.available_capacity_dose1,
            dose2: session.available_capacity_dose2,
        }
    }
}

/// Accept any JSON value; keep the array entries that deserialize as `T`.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Null => return Ok(Vec::new()),
        other => {
            tracing::debug!(kind = json_kind(&other), "expected an array, treating as empty");
            return Ok(Vec::new());
        }
    };

    let total = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed entry");
                None
            }
        })
        .collect();

    if kept.len() < total {
        tracing::debug!(total, kept = kept.len(), "dropped malformed array entries");
    }
    Ok(kept)
}

/// Postal codes arrive as numbers; keep them as text.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
