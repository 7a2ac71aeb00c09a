//! Daily astronomy feeds: the picture of the day and near-earth objects.
//!
//! This library provides functionality to:
//! - Fetch the astronomy picture of the day and cache its image locally
//! - Fetch the day's near-earth object close approaches
//! - Render both as text for a console or menu shell
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │  Presenter  │───▶│  Pipeline   │───▶│ PictureFeed │───┐
//! │ (menu/CLI)  │    │             │    └──────┬──────┘   │
//! └─────────────┘    │             │           ▼          │
//!                    │             │    ┌─────────────┐   │   ┌─────────────┐
//!                    │             │    │ ImageStore  │───┼──▶│  Transport  │
//!                    │             │    └─────────────┘   │   │   (HTTP)    │
//!                    │             │    ┌─────────────┐   │   └─────────────┘
//!                    │             │───▶│   NeoFeed   │───┘
//!                    └─────────────┘    └──────┬──────┘
//!                                              ▼
//!                                       ┌─────────────┐
//!                                       │    Table    │
//!                                       └─────────────┘
//! ```
//!
//! Every flow yields exactly one [`FetchOutcome`], which the presenter
//! matches on. Nothing is retried.
//!
//! # Example
//!
//! ```no_run
//! use skywatch::{Credential, PipelineBuilder};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credential = Credential::from_env()?;
//!     let pipeline = PipelineBuilder::new().credential(credential).build()?;
//!
//!     let fetch = pipeline.picture().await;
//!     if let Some(record) = fetch.picture.success() {
//!         println!("{}", record.title);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod image_store;
pub mod menu;
pub mod neo;
pub mod outcome;
pub mod picture;
pub mod pipeline;
pub mod presenter;
pub mod table;
pub mod types;

pub use client::{ClientConfig, HttpClient, HttpResponse, Transport, TransportError};
pub use config::{ConfigError, Credential};
pub use image_store::{sanitize_filename, ImageStore};
pub use neo::NeoFeedClient;
pub use outcome::{FetchOutcome, OutcomeKind};
pub use picture::PictureFeedClient;
pub use pipeline::{PictureFetch, Pipeline, PipelineBuilder};
pub use presenter::{ConsolePresenter, Presenter};
pub use types::{AsteroidRecord, CachedImage, PictureRecord};
