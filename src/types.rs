//! Core data types for the picture and near-earth object feeds.

use chrono::NaiveDate;
use image::DynamicImage;
use std::fmt;
use std::path::PathBuf;

/// Maximum preview width in pixels.
pub const PREVIEW_MAX_WIDTH: u32 = 600;
/// Maximum preview height in pixels.
pub const PREVIEW_MAX_HEIGHT: u32 = 400;

/// Metadata for the picture of the day.
///
/// `title`, `explanation` and `image_url` are copied verbatim from the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureRecord {
    pub title: String,
    pub explanation: String,
    pub image_url: String,
    /// Publication date as reported by the feed (`YYYY-MM-DD`).
    pub date: Option<String>,
    /// `"image"` or `"video"` when the feed reports it.
    pub media_type: Option<String>,
}

impl PictureRecord {
    pub fn new(title: String, explanation: String, image_url: String) -> Self {
        Self {
            title,
            explanation,
            image_url,
            date: None,
            media_type: None,
        }
    }

    /// Whether the referenced media can be fetched as a still image.
    ///
    /// Records without a media type are assumed to be images.
    pub fn is_image(&self) -> bool {
        match self.media_type.as_deref() {
            None => true,
            Some(kind) => kind.eq_ignore_ascii_case("image"),
        }
    }
}

/// A single asteroid close approach from the NEO feed.
#[derive(Debug, Clone, PartialEq)]
pub struct AsteroidRecord {
    pub name: String,
    pub max_diameter_meters: f64,
    pub is_hazardous: bool,
    pub close_approach_date: NaiveDate,
    pub miss_distance_km: f64,
}

impl fmt::Display for AsteroidRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.1} m, {}, {} at {:.1} km)",
            self.name,
            self.max_diameter_meters,
            if self.is_hazardous { "hazardous" } else { "not hazardous" },
            self.close_approach_date,
            self.miss_distance_km
        )
    }
}

/// A decoded picture that has been written to disk.
#[derive(Debug, Clone)]
pub struct CachedImage {
    /// File name derived from the picture title.
    pub filename: String,
    /// Full path the image was written to.
    pub path: PathBuf,
    pub image: DynamicImage,
}

impl CachedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Scaled-down copy for display, bounded to
    /// [`PREVIEW_MAX_WIDTH`] x [`PREVIEW_MAX_HEIGHT`]. Smaller images are
    /// returned at their original size. The file on disk is not touched.
    pub fn preview(&self) -> DynamicImage {
        if self.width() <= PREVIEW_MAX_WIDTH && self.height() <= PREVIEW_MAX_HEIGHT {
            return self.image.clone();
        }
        self.image.thumbnail(PREVIEW_MAX_WIDTH, PREVIEW_MAX_HEIGHT)
    }
}
