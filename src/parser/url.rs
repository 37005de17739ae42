//! URL validation and relative reference resolution.

use tracing::trace;
use url::Url;

use super::error::ParseError;

/// Returns true iff `url` is an absolute URL with a non-empty scheme and host.
///
/// # Examples
///
/// ```
/// use imgcrawl_core::parser::is_valid;
///
/// assert!(is_valid("https://example.com/a.png"));
/// assert!(!is_valid("/a.png"));
/// assert!(!is_valid(""));
/// ```
#[must_use]
pub fn is_valid(url: &str) -> bool {
    Url::parse(url).is_ok_and(|parsed| is_valid_url(&parsed))
}

/// Same check as [`is_valid`] on an already parsed URL.
#[must_use]
pub fn is_valid_url(url: &Url) -> bool {
    !url.scheme().is_empty() && url.host_str().is_some_and(|host| !host.is_empty())
}

/// Resolves an `img` source attribute against the page URL.
///
/// Uses RFC 3986 reference resolution: absolute references replace the base,
/// relative ones are joined against its scheme, host and path. Returns `None`
/// when the reference cannot be resolved or the result is not a valid
/// absolute URL.
#[must_use]
pub fn resolve_image_url(base: &Url, src: &str) -> Option<Url> {
    let resolved = match base.join(src) {
        Ok(resolved) => resolved,
        Err(e) => {
            trace!(src, error = %e, "image reference could not be resolved");
            return None;
        }
    };
    if is_valid_url(&resolved) {
        Some(resolved)
    } else {
        trace!(url = %resolved, "resolved image URL has no host, dropping");
        None
    }
}

/// Parses the page URL supplied by the operator.
///
/// # Validation rules:
/// - Must be parseable by the `url` crate as an absolute URL
/// - Must use http or https scheme
/// - Must have a host (domain or IP)
///
/// # Errors
///
/// Returns [`ParseError::InvalidUrl`] describing the first rule that failed.
pub fn parse_page_url(raw: &str) -> Result<Url, ParseError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|e| ParseError::malformed(trimmed, &e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(ParseError::unsupported_scheme(trimmed, scheme)),
    }

    if !is_valid_url(&parsed) {
        return Err(ParseError::no_host(trimmed));
    }

    Ok(parsed)
}
