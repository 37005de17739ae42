//! HTTP page fetching and image downloads.
//!
//! This module provides functionality for fetching a page's HTML and saving
//! images to disk with streaming support.
//!
//! # Features
//!
//! - Browser User-Agent on every request
//! - Streaming downloads through a bounded write buffer
//! - Deterministic filenames derived from the full image URL
//! - Skip-if-exists, checked atomically at file creation
//! - Configurable timeouts (30s connect, 5min read by default)
//!
//! # Example
//!
//! ```no_run
//! use imgcrawl_core::download::HttpClient;
//! use std::path::Path;
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let image = Url::parse("https://example.com/logo.png")?;
//! let outcome = client
//!     .download_image(&image, Path::new("./example.com"), 1024, 100)
//!     .await?;
//! println!("Saved: {}", outcome.path().display());
//! # Ok(())
//! # }
//! ```

mod client;
pub mod constants;
mod error;
mod filename;

pub use client::{DownloadOutcome, HttpClient};
pub use constants::{DEFAULT_BUFFER_SIZE, DEFAULT_MAX_FILENAME_LENGTH};
pub use error::DownloadError;
pub use filename::{IMAGE_EXTENSIONS, sanitize_image_filename};

// No module-local Result alias: signatures spell out `Result<T, DownloadError>`.
