//! Filename derivation for downloaded images.
//!
//! A local filename is derived from the full image URL, not just its last path
//! segment, so two images with the same basename on different paths or hosts
//! never collide in the download directory.

/// Characters that are illegal or problematic in common filesystem path components.
const INVALID_CHARACTERS: [char; 10] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*', '&'];

/// Recognized image extensions, in priority order. The first entry is the default.
pub const IMAGE_EXTENSIONS: [&str; 11] = [
    ".jpeg", ".jpg", ".png", ".gif", ".tiff", ".psd", ".pdf", ".eps", ".ai", ".indd", ".raw",
];

/// Converts an image URL into a safe, bounded-length local filename.
///
/// Steps, applied in order:
/// 1. Lowercase the whole URL.
/// 2. Replace each of `< > : " / \ | ? * &` with `_`.
/// 3. Ensure one of [`IMAGE_EXTENSIONS`] ends the name.
/// 4. Keep only the last `max_length` characters when the name is longer.
///
/// The result depends only on `url` and `max_length`.
///
/// # Example
///
/// ```
/// use imgcrawl_core::sanitize_image_filename;
///
/// assert_eq!(
///     sanitize_image_filename("https://x.com/A.PNG", 100),
///     "https___x.com_a.png"
/// );
/// ```
#[must_use]
pub fn sanitize_image_filename(url: &str, max_length: usize) -> String {
    let lowered = url.to_lowercase();
    let replaced: String = lowered
        .chars()
        .map(|c| if INVALID_CHARACTERS.contains(&c) { '_' } else { c })
        .collect();
    let with_extension = ensure_image_extension(replaced);
    keep_last_chars(with_extension, max_length)
}

/// Makes sure `filename` ends with a recognized image extension.
///
/// Scans [`IMAGE_EXTENSIONS`] in order and stops at the first entry that either
/// ends the name (no change) or appears anywhere inside it (that entry is
/// appended). When no entry appears at all, `.jpeg` is appended.
fn ensure_image_extension(mut filename: String) -> String {
    for ext in IMAGE_EXTENSIONS {
        if filename.ends_with(ext) {
            return filename;
        }
        if filename.contains(ext) {
            filename.push_str(ext);
            return filename;
        }
    }
    filename.push_str(IMAGE_EXTENSIONS[0]);
    filename
}

/// Drops characters from the front until at most `max_length` remain.
fn keep_last_chars(filename: String, max_length: usize) -> String {
    let length = filename.chars().count();
    if length <= max_length {
        return filename;
    }
    filename.chars().skip(length - max_length).collect()
}
