//! Client for the astronomy picture of the day feed.

use crate::client::Transport;
use crate::outcome::FetchOutcome;
use crate::types::PictureRecord;
use serde::Deserialize;

/// Default picture feed endpoint.
pub const PICTURE_ENDPOINT: &str = "https://api.nasa.gov/planetary/apod";

pub const MALFORMED_RESPONSE: &str = "malformed response";
pub const BAD_REQUEST: &str = "bad request: check key/parameters";

#[derive(Debug, Deserialize)]
struct RawPicture {
    title: String,
    explanation: String,
    url: String,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    media_type: Option<String>,
}

impl From<RawPicture> for PictureRecord {
    fn from(raw: RawPicture) -> Self {
        Self {
            title: raw.title,
            explanation: raw.explanation,
            image_url: raw.url,
            date: raw.date,
            media_type: raw.media_type,
        }
    }
}

/// Fetches and classifies picture-of-the-day responses.
#[derive(Debug, Clone)]
pub struct PictureFeedClient<T> {
    transport: T,
    endpoint: String,
}

impl<T: Transport> PictureFeedClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            endpoint: PICTURE_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Request URL carrying `key` as the only query parameter.
    pub fn request_url(&self, key: &str) -> String {
        format!("{}?api_key={}", self.endpoint, key)
    }

    /// Fetch today's picture metadata.
    pub async fn fetch_picture(&self, key: &str) -> FetchOutcome<PictureRecord> {
        let response = match self.transport.get(&self.request_url(key)).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Picture feed unreachable: {}", e);
                return e.into();
            }
        };

        let outcome = match response.status {
            200 => match response.json::<RawPicture>() {
                Ok(raw) => FetchOutcome::Success(PictureRecord::from(raw)),
                Err(e) => {
                    tracing::warn!("Picture feed returned an unusable body: {}", e);
                    FetchOutcome::server_error(Some(200), MALFORMED_RESPONSE)
                }
            },
            400 => FetchOutcome::client_error(400, BAD_REQUEST),
            403 => FetchOutcome::forbidden(&response.body_text()),
            status => FetchOutcome::unexpected_status(status),
        };

        match &outcome {
            FetchOutcome::Success(record) => {
                tracing::info!("Fetched picture of the day: {}", record.title)
            }
            other => tracing::warn!(
                "Picture fetch failed ({}): {}",
                other.kind(),
                other.detail().unwrap_or_default()
            ),
        }

        outcome
    }
}
