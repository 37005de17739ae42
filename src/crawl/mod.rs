//! Single-page crawl orchestration.
//!
//! A crawl fetches one page, extracts its image URLs and downloads them one
//! after another into a target directory. Network failures on individual
//! images are recorded in the [`CrawlReport`] and the loop moves on;
//! filesystem failures and page fetch failures abort the run.

mod report;

use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::CrawlSettings;
use crate::download::{DownloadError, DownloadOutcome, HttpClient};
use crate::parser::{dedupe_preserving_order, extract_image_urls};

pub use report::{CrawlReport, ImageOutcome, ImageResult};

/// Returns the directory images land in when none is given: the page host.
///
/// # Errors
///
/// Returns [`DownloadError::InvalidUrl`] if the page URL has no host.
pub fn default_download_dir(page_url: &Url) -> Result<PathBuf, DownloadError> {
    page_url
        .host_str()
        .filter(|host| !host.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| DownloadError::invalid_url(page_url.as_str()))
}

/// Runs crawls with a shared HTTP client and fixed settings.
#[derive(Debug, Clone)]
pub struct Crawler {
    client: HttpClient,
    settings: CrawlSettings,
}

impl Crawler {
    /// Creates a crawler whose HTTP client uses the timeouts in `settings`.
    #[must_use]
    pub fn new(settings: CrawlSettings) -> Self {
        let client =
            HttpClient::new_with_timeouts(settings.connect_timeout_secs, settings.read_timeout_secs);
        Self::with_client(client, settings)
    }

    /// Creates a crawler around an existing client.
    #[must_use]
    pub fn with_client(client: HttpClient, settings: CrawlSettings) -> Self {
        Self { client, settings }
    }

    /// Returns the settings this crawler runs with.
    #[must_use]
    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    /// Crawls `page_url` and downloads every image it references.
    ///
    /// When `download_path` is `None` the images go to a directory named after
    /// the page host. `progress` is sized to the number of images and advanced
    /// once per image; pass [`ProgressBar::hidden`] for no output.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The page URL has no host and no `download_path` was given
    /// - The page cannot be fetched
    /// - The download directory or an image file cannot be written
    /// - An image fails and `fail_fast` is set
    #[instrument(skip(self, progress), fields(page = %page_url))]
    pub async fn run(
        &self,
        page_url: &Url,
        download_path: Option<&Path>,
        progress: &ProgressBar,
    ) -> Result<CrawlReport, DownloadError> {
        let download_dir = match download_path {
            Some(path) => path.to_path_buf(),
            None => default_download_dir(page_url)?,
        };
        debug!(dir = %download_dir.display(), "resolved download directory");

        let html = self
            .client
            .fetch_page(page_url, self.settings.strict_status)
            .await?;

        let mut images = extract_image_urls(&html, page_url);
        if self.settings.dedupe {
            let before = images.len();
            images = dedupe_preserving_order(images);
            debug!(removed = before - images.len(), "deduplicated image URLs");
        }
        info!(images = images.len(), "found images");

        let mut report = CrawlReport::new(page_url.clone(), download_dir.clone());
        progress.set_length(images.len() as u64);

        for image in images {
            progress.set_message(image.to_string());
            let outcome = match self
                .client
                .download_image(
                    &image,
                    &download_dir,
                    self.settings.buffer_size,
                    self.settings.max_filename_length,
                )
                .await
            {
                Ok(DownloadOutcome::Downloaded { path, bytes }) => {
                    ImageOutcome::Downloaded { path, bytes }
                }
                Ok(DownloadOutcome::Skipped { path }) => ImageOutcome::Skipped { path },
                Err(error) if error.is_network() && !self.settings.fail_fast => {
                    warn!(url = %image, error = %error, "image download failed, continuing");
                    ImageOutcome::Failed(error)
                }
                Err(error) => {
                    progress.abandon();
                    return Err(error);
                }
            };
            report.push(image, outcome);
            progress.inc(1);
        }

        progress.finish_and_clear();

        info!(
            downloaded = report.downloaded(),
            skipped = report.skipped(),
            failed = report.failed(),
            total = report.total(),
            "crawl complete"
        );

        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_download_dir_is_page_host() {
        let url = Url::parse("https://images.example.com/gallery?page=2").unwrap();
        assert_eq!(
            default_download_dir(&url).unwrap(),
            PathBuf::from("images.example.com")
        );
    }

    #[test]
    fn test_default_download_dir_drops_port() {
        let url = Url::parse("http://127.0.0.1:8080/").unwrap();
        assert_eq!(default_download_dir(&url).unwrap(), PathBuf::from("127.0.0.1"));
    }

    #[test]
    fn test_default_download_dir_without_host_is_invalid_url() {
        let url = Url::parse("file:///tmp/page.html").unwrap();
        assert!(matches!(
            default_download_dir(&url),
            Err(DownloadError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_crawler_new_keeps_settings() {
        let settings = CrawlSettings {
            dedupe: true,
            ..CrawlSettings::default()
        };
        let crawler = Crawler::new(settings.clone());
        assert_eq!(crawler.settings(), &settings);
    }

    #[tokio::test]
    async fn test_run_without_host_fails_before_any_request() {
        let crawler = Crawler::new(CrawlSettings::default());
        let url = Url::parse("file:///tmp/page.html").unwrap();

        let result = crawler.run(&url, None, &ProgressBar::hidden()).await;

        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
    }
}
