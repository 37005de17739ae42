//! imgcrawl Core Library
//!
//! This library provides the core functionality for the imgcrawl tool,
//! which fetches a single web page and saves every image it embeds into a
//! local directory.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Optional file configuration and crawl settings
//! - [`crawl`] - Orchestration of a single page crawl
//! - [`download`] - HTTP client, streaming image downloads, filename sanitization
//! - [`parser`] - HTML image extraction and URL validation

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod crawl;
pub mod download;
pub mod parser;
mod user_agent;

// Re-export commonly used types
pub use config::{CrawlSettings, FileConfig, VerbositySetting, load_default_file_config};
pub use crawl::{CrawlReport, Crawler, ImageOutcome, default_download_dir};
pub use download::{
    DEFAULT_BUFFER_SIZE, DEFAULT_MAX_FILENAME_LENGTH, DownloadError, HttpClient,
    sanitize_image_filename,
};
pub use parser::{extract_image_urls, is_valid, parse_page_url};
pub use user_agent::BROWSER_USER_AGENT;
