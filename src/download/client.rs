//! HTTP client wrapper for fetching pages and streaming images to disk.
//!
//! This module provides the `HttpClient` struct which handles page fetches and
//! streaming image downloads with proper timeout configuration and error handling.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use super::filename::sanitize_image_filename;
use crate::user_agent::BROWSER_USER_AGENT;

/// HTTP client for page fetches and image downloads.
///
/// Every request carries a desktop browser User-Agent. The client is created
/// once per crawl and reused for the page and all of its images, taking
/// advantage of connection pooling.
///
/// # Example
///
/// ```no_run
/// use imgcrawl_core::HttpClient;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let page = Url::parse("https://example.com/gallery")?;
/// let html = client.fetch_page(&page, false).await?;
/// println!("fetched {} bytes", html.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

/// What happened to a single image download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The image was fetched and written to `path`.
    Downloaded {
        /// Final output path.
        path: PathBuf,
        /// Bytes written to disk.
        bytes: u64,
    },
    /// A file already existed at `path`; no request was made.
    Skipped {
        /// Existing output path.
        path: PathBuf,
    },
}

impl DownloadOutcome {
    /// Returns the local path of the image, downloaded or pre-existing.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Downloaded { path, .. } | Self::Skipped { path } => path,
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes
    /// - Gzip decompression: enabled
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Fetches the HTML of a page.
    ///
    /// A non-2xx status is logged and its body used anyway, unless
    /// `strict_status` is set, in which case it is an error.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The request fails (DNS, connection, timeout)
    /// - The body cannot be read
    /// - `strict_status` is set and the server returns 4xx/5xx
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_page(&self, url: &Url, strict_status: bool) -> Result<String, DownloadError> {
        debug!("fetching page");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| DownloadError::from_reqwest(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            if strict_status {
                return Err(DownloadError::http_status(url.as_str(), status.as_u16()));
            }
            warn!(status = status.as_u16(), "page returned non-success status, parsing body anyway");
        }

        let html = response
            .text()
            .await
            .map_err(|e| DownloadError::from_reqwest(url.as_str(), e))?;

        debug!(bytes = html.len(), "page fetched");
        Ok(html)
    }

    /// Downloads one image into `target_dir`, skipping it if already present.
    ///
    /// The local name is [`sanitize_image_filename`] of the full URL. The body
    /// is streamed chunk by chunk through a `buffer_size`-byte write buffer;
    /// only the write buffer and the network chunk in flight are in memory,
    /// never the whole image.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - `target_dir` cannot be created or the file cannot be written
    /// - The request fails or the server returns 4xx/5xx
    /// - The connection drops mid-body (the partial file is removed)
    #[instrument(skip(self), fields(url = %url))]
    pub async fn download_image(
        &self,
        url: &Url,
        target_dir: &Path,
        buffer_size: usize,
        max_filename_length: usize,
    ) -> Result<DownloadOutcome, DownloadError> {
        tokio::fs::create_dir_all(target_dir)
            .await
            .map_err(|e| DownloadError::io(target_dir, e))?;

        let filename = sanitize_image_filename(url.as_str(), max_filename_length);
        let file_path = target_dir.join(&filename);

        if tokio::fs::try_exists(&file_path)
            .await
            .map_err(|e| DownloadError::io(file_path.clone(), e))?
        {
            debug!(path = %file_path.display(), "image already present, skipping");
            return Ok(DownloadOutcome::Skipped { path: file_path });
        }

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| DownloadError::from_reqwest(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url.as_str(), status.as_u16()));
        }

        // create_new makes the existence check and the creation one step.
        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file_path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                debug!(path = %file_path.display(), "image appeared concurrently, skipping");
                return Ok(DownloadOutcome::Skipped { path: file_path });
            }
            Err(e) => return Err(DownloadError::io(file_path, e)),
        };

        let stream_result = stream_to_file(file, buffer_size, response, url, &file_path).await;

        let bytes = match stream_result {
            Ok(bytes) => bytes,
            Err(error) => {
                debug!(path = %file_path.display(), "cleaning up partial file after error");
                let _ = tokio::fs::remove_file(&file_path).await;
                return Err(error);
            }
        };

        info!(path = %file_path.display(), bytes, "image saved");

        Ok(DownloadOutcome::Downloaded {
            path: file_path,
            bytes,
        })
    }

}

/// Streams response body to file, returning bytes written.
///
/// This is extracted to enable cleanup on error in the caller.
async fn stream_to_file(
    file: File,
    buffer_size: usize,
    response: reqwest::Response,
    url: &Url,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::with_capacity(buffer_size, file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::from_reqwest(url.as_str(), e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path, e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path, e))?;

    Ok(bytes_written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_download_outcome_path_for_both_variants() {
        let downloaded = DownloadOutcome::Downloaded {
            path: PathBuf::from("imgs/a.png"),
            bytes: 3,
        };
        let skipped = DownloadOutcome::Skipped {
            path: PathBuf::from("imgs/b.png"),
        };
        assert_eq!(downloaded.path(), Path::new("imgs/a.png"));
        assert_eq!(skipped.path(), Path::new("imgs/b.png"));
    }

    #[tokio::test]
    async fn test_download_image_skips_existing_without_network() {
        let temp_dir = TempDir::new().unwrap();
        // Port 9 (discard) is never contacted because the file already exists.
        let url = Url::parse("http://127.0.0.1:9/cat.png").unwrap();
        let name = sanitize_image_filename(url.as_str(), 100);
        std::fs::write(temp_dir.path().join(&name), b"old").unwrap();

        let outcome = HttpClient::new()
            .download_image(&url, temp_dir.path(), 1024, 100)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DownloadOutcome::Skipped {
                path: temp_dir.path().join(name)
            }
        );
    }

    #[tokio::test]
    async fn test_download_image_creates_missing_target_dir() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("nested").join("images");
        let url = Url::parse("http://127.0.0.1:9/cat.png").unwrap();

        // The request itself fails, but the directory is created first.
        let _ = HttpClient::new_with_timeouts(1, 1)
            .download_image(&url, &target, 1024, 100)
            .await;

        assert!(target.is_dir());
    }

    #[tokio::test]
    async fn test_download_image_target_is_a_file_returns_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("not-a-dir");
        std::fs::write(&target, b"x").unwrap();
        let url = Url::parse("http://127.0.0.1:9/cat.png").unwrap();

        let result = HttpClient::new()
            .download_image(&url, &target, 1024, 100)
            .await;

        assert!(
            matches!(result, Err(DownloadError::Io { .. })),
            "expected Io error, got {result:?}"
        );
    }
}
