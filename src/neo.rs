//! Client for the near-earth object feed.
//!
//! The feed returns a mapping from `YYYY-MM-DD` to the asteroids making a
//! close approach on that day. Only the entry for the requested date is
//! read; its absence is a server error rather than an empty day.

use crate::client::Transport;
use crate::outcome::FetchOutcome;
use crate::types::AsteroidRecord;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Default NEO feed endpoint.
pub const NEO_ENDPOINT: &str = "https://api.nasa.gov/neo/rest/v1/feed";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum NeoParseError {
    #[error("invalid feed body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no data for date {0}")]
    MissingDate(NaiveDate),
    #[error("invalid close approach date {value:?} for {name}")]
    ApproachDate {
        name: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("invalid miss distance {value:?} for {name}")]
    MissDistance { name: String, value: String },
}

#[derive(Debug, Deserialize)]
struct RawFeed {
    near_earth_objects: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawAsteroid {
    name: String,
    estimated_diameter: RawDiameter,
    is_potentially_hazardous_asteroid: bool,
    /// Absent and `null` both count as no approach data.
    #[serde(default)]
    close_approach_data: Option<Vec<RawApproach>>,
}

#[derive(Debug, Deserialize)]
struct RawDiameter {
    meters: RawDiameterRange,
}

#[derive(Debug, Deserialize)]
struct RawDiameterRange {
    estimated_diameter_max: f64,
}

#[derive(Debug, Deserialize)]
struct RawApproach {
    close_approach_date: String,
    miss_distance: RawMissDistance,
}

#[derive(Debug, Deserialize)]
struct RawMissDistance {
    kilometers: Decimal,
}

/// The feed encodes distances as strings; bare numbers are accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Decimal {
    Number(f64),
    Text(String),
}

impl RawAsteroid {
    /// Convert to a record. `Ok(None)` means the entry has no close
    /// approach data and should be skipped.
    fn into_record(self) -> Result<Option<AsteroidRecord>, NeoParseError> {
        let Some(approach) = self.close_approach_data.unwrap_or_default().into_iter().next() else {
            return Ok(None);
        };

        let close_approach_date =
            NaiveDate::parse_from_str(&approach.close_approach_date, DATE_FORMAT).map_err(
                |source| NeoParseError::ApproachDate {
                    name: self.name.clone(),
                    value: approach.close_approach_date.clone(),
                    source,
                },
            )?;

        let miss_distance_km = match approach.miss_distance.kilometers {
            Decimal::Number(km) => km,
            Decimal::Text(text) => {
                text.trim()
                    .parse::<f64>()
                    .map_err(|_| NeoParseError::MissDistance {
                        name: self.name.clone(),
                        value: text.clone(),
                    })?
            }
        };

        Ok(Some(AsteroidRecord {
            name: self.name,
            max_diameter_meters: self.estimated_diameter.meters.estimated_diameter_max,
            is_hazardous: self.is_potentially_hazardous_asteroid,
            close_approach_date,
            miss_distance_km,
        }))
    }
}

/// Extract the asteroids listed under `as_of` from a feed body.
///
/// Entries without close approach data are dropped; any other malformed
/// entry fails the whole day.
pub fn parse_feed(body: &[u8], as_of: NaiveDate) -> Result<Vec<AsteroidRecord>, NeoParseError> {
    let mut feed: RawFeed = serde_json::from_slice(body)?;
    let key = as_of.format(DATE_FORMAT).to_string();

    let day = feed
        .near_earth_objects
        .remove(&key)
        .ok_or(NeoParseError::MissingDate(as_of))?;
    let entries: Vec<RawAsteroid> = serde_json::from_value(day)?;

    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        let name = entry.name.clone();
        match entry.into_record()? {
            Some(record) => records.push(record),
            None => tracing::warn!("Skipping {}: no close approach data", name),
        }
    }

    Ok(records)
}

/// Fetches and classifies near-earth object feed responses.
#[derive(Debug, Clone)]
pub struct NeoFeedClient<T> {
    transport: T,
    endpoint: String,
}

impl<T: Transport> NeoFeedClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            endpoint: NEO_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Request URL for a single day's feed.
    pub fn request_url(&self, key: &str, as_of: NaiveDate) -> String {
        let date = as_of.format(DATE_FORMAT);
        format!(
            "{}?start_date={}&end_date={}&api_key={}",
            self.endpoint, date, date, key
        )
    }

    /// Fetch the asteroids approaching on `as_of`, in feed order.
    pub async fn fetch_neo(&self, key: &str, as_of: NaiveDate) -> FetchOutcome<Vec<AsteroidRecord>> {
        let response = match self.transport.get(&self.request_url(key, as_of)).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("NEO feed unreachable: {}", e);
                return e.into();
            }
        };

        let outcome = match response.status {
            200 => match parse_feed(&response.body, as_of) {
                Ok(records) => FetchOutcome::Success(records),
                Err(e) => FetchOutcome::server_error(Some(200), e.to_string()),
            },
            403 => FetchOutcome::forbidden(&response.body_text()),
            status => FetchOutcome::unexpected_status(status),
        };

        match &outcome {
            FetchOutcome::Success(records) => {
                tracing::info!("Fetched {} near-earth objects for {}", records.len(), as_of)
            }
            other => tracing::warn!(
                "NEO fetch failed ({}): {}",
                other.kind(),
                other.detail().unwrap_or_default()
            ),
        }

        outcome
    }
}
