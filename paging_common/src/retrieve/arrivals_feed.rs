//! # Arrivals Feed Client
//!
//! Looks up today's arriving flight numbers from the ground handler's flight
//! information service, so operators can pick a flight instead of typing it.
//!
//! ## Key Features:
//! - **Retries**: transient failures are retried with exponential backoff, three
//!   times at most.
//! - **Basic auth**: credentials come from configuration, never from code.
//! - **Lenient parsing**: the upstream payload shape drifts; see
//!   [`extract_flight_numbers`].

use chrono::Local;
use reqwest::Url;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Default upstream endpoint.
pub const DEFAULT_ARRIVALS_URL: &str = "https://nexus.ptjas.co.id/restapinexusgen";
pub const DEFAULT_STATION: &str = "CGK";
pub const DEFAULT_SOURCE: &str = "ALL";

/// Object keys tried, in order, before the loose `*flight*` match.
const FLIGHT_KEYS: [&str; 5] = ["flight_no", "flightNo", "flight", "FLIGHT_NO", "FLIGHT"];

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("invalid arrivals URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("cannot build HTTP client: {0}")]
    Build(reqwest::Error),
    #[error("arrivals request failed: {0}")]
    Transport(#[from] reqwest_middleware::Error),
    #[error("arrivals feed returned {status}")]
    Upstream { status: u16, body: String },
    #[error("invalid arrivals payload: {0}")]
    Decode(#[from] reqwest::Error),
}

/// # Arrivals Query
///
/// Filter sent upstream. Dates are `YYYY-MM-DD` and passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalsQuery {
    pub station: String,
    pub start_date: String,
    pub to_date: String,
    pub source: String,
}

impl Default for ArrivalsQuery {
    /// Station `CGK`, source `ALL`, both dates today (local time).
    fn default() -> Self {
        let today = Local::now().format("%Y-%m-%d").to_string();
        Self {
            station: DEFAULT_STATION.to_string(),
            start_date: today.clone(),
            to_date: today,
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}

impl ArrivalsQuery {
    /// Builds a query from optional parts; blank or missing parts take the defaults.
    pub fn from_parts(
        station: Option<String>,
        start_date: Option<String>,
        to_date: Option<String>,
        source: Option<String>,
    ) -> Self {
        let defaults = Self::default();
        let pick = |value: Option<String>, default: String| value.filter(|v| !v.is_empty()).unwrap_or(default);
        Self {
            station: pick(station, defaults.station),
            start_date: pick(start_date, defaults.start_date),
            to_date: pick(to_date, defaults.to_date),
            source: pick(source, defaults.source),
        }
    }
}

/// # Arrivals Feed
pub struct ArrivalsFeed {
    inner: ClientWithMiddleware,
    url: Url,
    username: String,
    password: String,
}

impl ArrivalsFeed {
    pub fn new(url: &str, username: impl Into<String>, password: impl Into<String>) -> Result<Self, FeedError> {
        let url = Url::parse(url)?;

        // Exponential backoff, 3 retries on transient errors.
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(FeedError::Build)?;
        let inner = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            inner,
            url,
            username: username.into(),
            password: password.into(),
        })
    }

    /// Raw upstream payload for `query`.
    pub async fn fetch(&self, query: &ArrivalsQuery) -> Result<Value, FeedError> {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("type", "arrival")
            .append_pair("station", &query.station)
            .append_pair("start_date", &query.start_date)
            .append_pair("to_date", &query.to_date)
            .append_pair("source", &query.source);

        debug!(station = %query.station, start = %query.start_date, to = %query.to_date, "Fetching arrivals");

        let response = self
            .inner
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Arrivals feed rejected the request");
            return Err(FeedError::Upstream {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<Value>().await?)
    }

    /// Distinct flight numbers for `query`.
    pub async fn flight_numbers(&self, query: &ArrivalsQuery) -> Result<Vec<String>, FeedError> {
        let payload = self.fetch(query).await?;
        Ok(extract_flight_numbers(&payload))
    }
}

/// # Extract Flight Numbers
///
/// Accepts a top-level array or an object with a `data` array; anything else
/// yields nothing. Per item:
/// - a string is taken as is;
/// - an object gives the first non-empty value among [`FLIGHT_KEYS`], or else
///   the first non-empty value whose key contains `flight` in any case.
///
/// Empty results are dropped and duplicates removed, keeping first-seen order.
pub fn extract_flight_numbers(payload: &Value) -> Vec<String> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => FLIGHT_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(scalar_text))
                .or_else(|| {
                    map.iter()
                        .filter(|(key, _)| key.to_ascii_lowercase().contains("flight"))
                        .find_map(|(_, value)| scalar_text(value))
                }),
            _ => None,
        })
        .filter(|flight| !flight.is_empty())
        .filter(|flight| seen.insert(flight.clone()))
        .collect()
}

/// Text form of a non-empty scalar; `null`, `false`, `0`, `""` and containers give `None`.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}
