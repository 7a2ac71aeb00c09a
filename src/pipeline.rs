//! Request orchestration: one call, one flow, one outcome.

use crate::client::{ClientConfig, HttpClient, Transport, TransportError};
use crate::config::Credential;
use crate::image_store::ImageStore;
use crate::neo::NeoFeedClient;
use crate::outcome::FetchOutcome;
use crate::picture::PictureFeedClient;
use crate::table;
use crate::types::{AsteroidRecord, CachedImage, PictureRecord};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;

/// Result of the picture flow. The image outcome is reported separately so
/// that a failed download or write never hides the metadata.
#[derive(Debug)]
pub struct PictureFetch {
    pub picture: FetchOutcome<PictureRecord>,
    /// `None` when no download was attempted: the metadata fetch failed or
    /// the day's media is not a still image.
    pub image: Option<FetchOutcome<CachedImage>>,
}

/// Owns the credential and the clients for both feeds.
pub struct Pipeline<T> {
    credential: Credential,
    picture: PictureFeedClient<T>,
    neo: NeoFeedClient<T>,
    images: ImageStore<T>,
}

impl<T: Transport> Pipeline<T> {
    /// Assemble from individually configured clients.
    pub fn from_parts(
        credential: Credential,
        picture: PictureFeedClient<T>,
        neo: NeoFeedClient<T>,
        images: ImageStore<T>,
    ) -> Self {
        Self {
            credential,
            picture,
            neo,
            images,
        }
    }

    /// Fetch the picture metadata and, if it references an image, cache it.
    pub async fn picture(&self) -> PictureFetch {
        let picture = self.picture.fetch_picture(self.credential.picture_key()).await;

        let image = match picture.success() {
            Some(record) if record.is_image() => Some(
                self.images
                    .fetch_and_save(&record.image_url, &record.title)
                    .await,
            ),
            Some(record) => {
                tracing::info!(
                    "Skipping image download for media type {}",
                    record.media_type.as_deref().unwrap_or("unknown")
                );
                None
            }
            None => None,
        };

        PictureFetch { picture, image }
    }

    /// Fetch the asteroids approaching on `as_of`.
    pub async fn asteroids(&self, as_of: NaiveDate) -> FetchOutcome<Vec<AsteroidRecord>> {
        self.neo.fetch_neo(self.credential.neo_key(), as_of).await
    }

    /// Fetch the asteroids approaching on `as_of`, rendered as a table.
    pub async fn asteroid_table(&self, as_of: NaiveDate) -> FetchOutcome<String> {
        self.asteroids(as_of).await.map(|records| table::format(&records))
    }

    /// Today's asteroid table, keyed by the local calendar date.
    pub async fn todays_asteroid_table(&self) -> FetchOutcome<String> {
        self.asteroid_table(Local::now().date_naive()).await
    }
}

/// Builder for a [`Pipeline`] over the real HTTP client.
pub struct PipelineBuilder {
    credential: Option<Credential>,
    client_config: ClientConfig,
    output_dir: PathBuf,
    picture_endpoint: Option<String>,
    neo_endpoint: Option<String>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            credential: None,
            client_config: ClientConfig::default(),
            output_dir: PathBuf::from("."),
            picture_endpoint: None,
            neo_endpoint: None,
        }
    }

    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn client_config(mut self, config: ClientConfig) -> Self {
        self.client_config = config;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn picture_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.picture_endpoint = Some(endpoint.into());
        self
    }

    pub fn neo_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.neo_endpoint = Some(endpoint.into());
        self
    }

    pub fn build(self) -> Result<Pipeline<HttpClient>, BuildError> {
        let credential = self.credential.ok_or(BuildError::MissingCredential)?;
        let transport = HttpClient::new(self.client_config)?;

        let mut picture = PictureFeedClient::new(transport.clone());
        if let Some(endpoint) = self.picture_endpoint {
            picture = picture.with_endpoint(endpoint);
        }

        let mut neo = NeoFeedClient::new(transport.clone());
        if let Some(endpoint) = self.neo_endpoint {
            neo = neo.with_endpoint(endpoint);
        }

        let images = ImageStore::with_dir(transport, self.output_dir);

        Ok(Pipeline::from_parts(credential, picture, neo, images))
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no credential configured")]
    MissingCredential,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::StubTransport;
    use crate::image_store::CORRUPT_IMAGE;
    use crate::outcome::OutcomeKind;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;
    use tempfile::tempdir;

    const PICTURE_BODY: &str = r#"{"title": "Orion Nebula", "explanation": "Stars.", "url": "https://img.test/orion.png", "media_type": "image"}"#;

    fn pipeline(stub: StubTransport, dir: &std::path::Path) -> Pipeline<StubTransport> {
        Pipeline::from_parts(
            Credential::new("PICTURE", "NEO"),
            PictureFeedClient::new(stub.clone()).with_endpoint("https://feed.test/apod"),
            NeoFeedClient::new(stub.clone()).with_endpoint("https://feed.test/neo"),
            ImageStore::with_dir(stub, dir),
        )
    }

    fn png() -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(12, 6))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[tokio::test]
    async fn test_picture_flow_saves_image() {
        let dir = tempdir().unwrap();
        let stub = StubTransport::new()
            .respond("https://feed.test/apod", 200, PICTURE_BODY)
            .respond("https://img.test/", 200, png());

        let result = pipeline(stub.clone(), dir.path()).picture().await;

        assert_eq!(result.picture.success().unwrap().title, "Orion Nebula");
        let image = result.image.expect("image attempted");
        assert_eq!(image.success().unwrap().filename, "Orion_Nebula.jpg");
        assert!(dir.path().join("Orion_Nebula.jpg").exists());
        assert_eq!(
            stub.requests(),
            vec![
                "https://feed.test/apod?api_key=PICTURE".to_string(),
                "https://img.test/orion.png".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_image_failure_keeps_metadata() {
        let dir = tempdir().unwrap();
        let stub = StubTransport::new()
            .respond("https://feed.test/apod", 200, PICTURE_BODY)
            .respond("https://img.test/", 200, b"garbage".to_vec());

        let result = pipeline(stub, dir.path()).picture().await;

        assert!(result.picture.is_success());
        let image = result.image.unwrap();
        assert_eq!(image.kind(), OutcomeKind::ServerError);
        assert_eq!(image.detail(), Some(CORRUPT_IMAGE));
    }

    #[tokio::test]
    async fn test_unsafe_title_keeps_metadata() {
        let root = tempdir().unwrap();
        let store_dir = root.path().join("store");
        std::fs::create_dir(&store_dir).unwrap();
        let body = r#"{"title": "../Orion Nebula", "explanation": "Stars.", "url": "https://img.test/orion.png"}"#;
        let stub = StubTransport::new()
            .respond("https://feed.test/apod", 200, body)
            .respond("https://img.test/", 200, png());

        let result = pipeline(stub, &store_dir).picture().await;

        assert_eq!(result.picture.success().unwrap().title, "../Orion Nebula");
        assert_eq!(result.image.unwrap().kind(), OutcomeKind::ServerError);
        assert!(!root.path().join("Orion_Nebula.jpg").exists());
    }

    #[tokio::test]
    async fn test_video_skips_image_store() {
        let dir = tempdir().unwrap();
        let body = r#"{"title": "Launch", "explanation": "Video.", "url": "https://video.test/embed", "media_type": "video"}"#;
        let stub = StubTransport::new().respond("https://feed.test/apod", 200, body);

        let result = pipeline(stub.clone(), dir.path()).picture().await;

        assert!(result.picture.is_success());
        assert!(result.image.is_none());
        assert_eq!(stub.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_picture_skips_image_store() {
        let dir = tempdir().unwrap();
        let stub = StubTransport::new().respond("https://feed.test/apod", 500, "");

        let result = pipeline(stub.clone(), dir.path()).picture().await;

        assert_eq!(result.picture.detail(), Some("unexpected status 500"));
        assert!(result.image.is_none());
        assert_eq!(stub.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_asteroid_table_uses_neo_key() {
        let dir = tempdir().unwrap();
        let body = r#"{"near_earth_objects": {"2024-01-01": []}}"#;
        let stub = StubTransport::new().respond("https://feed.test/neo", 200, body);
        let as_of = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let outcome = pipeline(stub.clone(), dir.path()).asteroid_table(as_of).await;

        assert_eq!(outcome.success().map(|t| t.lines().count()), Some(2));
        assert!(stub.requests()[0].ends_with("api_key=NEO"));
    }

    #[test]
    fn test_builder_requires_credential() {
        let result = PipelineBuilder::new().build();
        assert!(matches!(result, Err(BuildError::MissingCredential)));
    }
}
