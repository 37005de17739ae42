//! Progress bar for the image download loop.

use indicatif::{ProgressBar, ProgressStyle};
use url::Url;

/// Builds the download progress bar, or a hidden one when `enabled` is false.
///
/// The crawler sets the length once the page has been parsed.
pub(crate) fn crawl_progress_bar(enabled: bool, page_url: &Url) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{prefix} [{bar:30}] {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar.set_prefix(format!("Crawling images from {page_url}"));
    bar
}
