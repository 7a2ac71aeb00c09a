//! Download, decode and persist the picture of the day.
//!
//! Each successful fetch writes exactly one file, named after the picture
//! title, into the store directory. A file with the same name is overwritten.

use crate::client::Transport;
use crate::outcome::FetchOutcome;
use crate::types::CachedImage;
use image::{DynamicImage, ImageFormat};
use std::path::{Component, Path, PathBuf};

pub const CORRUPT_IMAGE: &str = "corrupt image data";
pub const UNSAFE_FILENAME: &str = "title does not form a plain file name";

/// File name for a picture title: every space becomes an underscore and
/// `.jpg` is appended. No other character is altered.
pub fn sanitize_filename(title: &str) -> String {
    format!("{}.jpg", title.replace(' ', "_"))
}

/// Whether `filename` is a single plain path component, so joining it onto
/// the store directory cannot leave that directory.
fn is_plain_filename(filename: &str) -> bool {
    let mut components = Path::new(filename).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Fetches image bytes and writes them under a title-derived name.
#[derive(Debug, Clone)]
pub struct ImageStore<T> {
    transport: T,
    dir: PathBuf,
}

impl<T: Transport> ImageStore<T> {
    pub fn with_dir(transport: T, dir: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            dir: dir.into(),
        }
    }

    /// Download `image_url`, decode it and write it as `<title>.jpg`.
    /// Titles that would not land directly inside the store directory are
    /// refused before anything is downloaded.
    pub async fn fetch_and_save(&self, image_url: &str, title: &str) -> FetchOutcome<CachedImage> {
        let filename = sanitize_filename(title);
        if !is_plain_filename(&filename) {
            tracing::warn!("Refusing to save image under {:?}", filename);
            return FetchOutcome::server_error(None, format!("{}: {:?}", UNSAFE_FILENAME, filename));
        }

        let response = match self.transport.get(image_url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Image host unreachable: {}", e);
                return e.into();
            }
        };

        if response.status != 200 {
            tracing::warn!("Image download returned status {}", response.status);
            return FetchOutcome::unexpected_status(response.status);
        }

        let image = match image::load_from_memory(&response.body) {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!("Failed to decode {} bytes of image data: {}", response.body.len(), e);
                return FetchOutcome::server_error(Some(response.status), CORRUPT_IMAGE);
            }
        };

        let path = self.dir.join(&filename);

        if let Err(detail) = write_jpeg(&image, &path) {
            tracing::error!("Failed to save image to {}: {}", path.display(), detail);
            return FetchOutcome::server_error(None, detail);
        }

        tracing::info!(
            "Saved {}x{} image to {}",
            image.width(),
            image.height(),
            path.display()
        );

        FetchOutcome::Success(CachedImage {
            filename,
            path,
            image,
        })
    }
}

/// Encode as JPEG at `path`. JPEG has no alpha channel, so the image is
/// flattened to RGB first.
fn write_jpeg(image: &DynamicImage, path: &Path) -> Result<(), String> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    rgb.save_with_format(path, ImageFormat::Jpeg)
        .map_err(|e| format!("failed to write {}: {}", path.display(), e))
}
