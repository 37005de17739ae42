//! Per-image results of a crawl.

use std::path::{Path, PathBuf};

use url::Url;

use crate::download::DownloadError;

/// What happened to one image of the page.
#[derive(Debug)]
pub enum ImageOutcome {
    /// Fetched and written to disk.
    Downloaded {
        /// Output path.
        path: PathBuf,
        /// Bytes written.
        bytes: u64,
    },
    /// Already present on disk; not fetched.
    Skipped {
        /// Existing path.
        path: PathBuf,
    },
    /// The download failed; the run continued.
    Failed(DownloadError),
}

impl ImageOutcome {
    /// Local path for downloaded or skipped images.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Downloaded { path, .. } | Self::Skipped { path } => Some(path),
            Self::Failed(_) => None,
        }
    }

    /// True unless the download failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// One image URL and its outcome.
#[derive(Debug)]
pub struct ImageResult {
    /// Resolved image URL.
    pub url: Url,
    /// What happened to it.
    pub outcome: ImageOutcome,
}

/// Summary of a finished crawl, in page order.
#[derive(Debug)]
pub struct CrawlReport {
    page_url: Url,
    download_dir: PathBuf,
    images: Vec<ImageResult>,
}

impl CrawlReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new(page_url: Url, download_dir: PathBuf) -> Self {
        Self {
            page_url,
            download_dir,
            images: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, url: Url, outcome: ImageOutcome) {
        self.images.push(ImageResult { url, outcome });
    }

    /// The crawled page.
    #[must_use]
    pub fn page_url(&self) -> &Url {
        &self.page_url
    }

    /// Directory images were written to.
    #[must_use]
    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Every image in page order.
    #[must_use]
    pub fn images(&self) -> &[ImageResult] {
        &self.images
    }

    /// Failed images only.
    pub fn failures(&self) -> impl Iterator<Item = (&Url, &DownloadError)> {
        self.images.iter().filter_map(|result| match &result.outcome {
            ImageOutcome::Failed(error) => Some((&result.url, error)),
            _ => None,
        })
    }

    /// Number of images fetched in this run.
    #[must_use]
    pub fn downloaded(&self) -> usize {
        self.count(|outcome| matches!(outcome, ImageOutcome::Downloaded { .. }))
    }

    /// Number of images already on disk.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, ImageOutcome::Skipped { .. }))
    }

    /// Number of failed images.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, ImageOutcome::Failed(_)))
    }

    /// Number of images processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.images.len()
    }

    fn count(&self, predicate: impl Fn(&ImageOutcome) -> bool) -> usize {
        self.images
            .iter()
            .filter(|result| predicate(&result.outcome))
            .count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse("https://x.com/").unwrap().join(path).unwrap()
    }

    #[test]
    fn test_report_counts_each_outcome() {
        let mut report = CrawlReport::new(url("/"), PathBuf::from("x.com"));
        report.push(
            url("a.png"),
            ImageOutcome::Downloaded {
                path: PathBuf::from("x.com/a.png"),
                bytes: 10,
            },
        );
        report.push(
            url("b.png"),
            ImageOutcome::Skipped {
                path: PathBuf::from("x.com/b.png"),
            },
        );
        report.push(
            url("c.png"),
            ImageOutcome::Failed(DownloadError::http_status("https://x.com/c.png", 404)),
        );

        assert_eq!(report.downloaded(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.total(), 3);
        assert_eq!(report.download_dir(), Path::new("x.com"));

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0.as_str(), "https://x.com/c.png");
    }

    #[test]
    fn test_outcome_path_and_success() {
        let skipped = ImageOutcome::Skipped {
            path: PathBuf::from("d/a.png"),
        };
        let failed = ImageOutcome::Failed(DownloadError::timeout("https://x.com/a.png"));
        assert_eq!(skipped.path(), Some(Path::new("d/a.png")));
        assert!(skipped.is_success());
        assert_eq!(failed.path(), None);
        assert!(!failed.is_success());
    }

    #[test]
    fn test_empty_report() {
        let report = CrawlReport::new(url("/"), PathBuf::from("x.com"));
        assert_eq!(report.total(), 0);
        assert_eq!(report.failures().count(), 0);
        assert_eq!(report.page_url().as_str(), "https://x.com/");
    }
}
