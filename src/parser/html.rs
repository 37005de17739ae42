//! Image reference extraction from HTML documents.

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::{debug, trace};
use url::Url;

use super::url::resolve_image_url;

#[allow(clippy::expect_used)]
static IMG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("img selector is valid")); // Static selector, safe to panic

/// Extracts every image URL referenced by an `img` tag, in document order.
///
/// Tags without a `src` attribute (or with an empty one) are skipped, which is
/// common for lazy-loaded images. Each source is resolved against `base`;
/// references that do not resolve to an absolute URL with a host are dropped
/// silently. Duplicates are kept.
///
/// # Example
///
/// ```
/// use imgcrawl_core::parser::extract_image_urls;
/// use url::Url;
///
/// let base = Url::parse("https://x.com/p").unwrap();
/// let urls = extract_image_urls(r#"<img src="a.png"><img><img src="/b.jpg">"#, &base);
/// let urls: Vec<&str> = urls.iter().map(Url::as_str).collect();
/// assert_eq!(urls, ["https://x.com/a.png", "https://x.com/b.jpg"]);
/// ```
#[tracing::instrument(skip(html), fields(html_len = html.len(), base = %base))]
#[must_use]
pub fn extract_image_urls(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut urls = Vec::new();
    let mut tags = 0_usize;

    for element in document.select(&IMG_SELECTOR) {
        tags += 1;
        let Some(src) = element.value().attr("src").map(str::trim) else {
            trace!("img tag without src, skipping");
            continue;
        };
        if src.is_empty() {
            trace!("img tag with empty src, skipping");
            continue;
        }
        if let Some(resolved) = resolve_image_url(base, src) {
            urls.push(resolved);
        }
    }

    debug!(tags, images = urls.len(), "extracted image URLs");
    urls
}

/// Removes repeated URLs, keeping the first occurrence of each.
#[must_use]
pub fn dedupe_preserving_order(urls: Vec<Url>) -> Vec<Url> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(url.as_str().to_owned()))
        .collect()
}
