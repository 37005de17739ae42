//! Page URL validation and image reference extraction.
//!
//! This module turns a fetched HTML document into the ordered list of absolute
//! image URLs it references.
//!
//! # Example
//!
//! ```
//! use imgcrawl_core::parser::{extract_image_urls, parse_page_url};
//!
//! let page = parse_page_url("https://example.com/gallery/").unwrap();
//! let images = extract_image_urls(r#"<img src="cat.png"><img src="//cdn.example.com/dog.jpg">"#, &page);
//! assert_eq!(images[0].as_str(), "https://example.com/gallery/cat.png");
//! assert_eq!(images[1].as_str(), "https://cdn.example.com/dog.jpg");
//! ```

mod error;
mod html;
mod url;

pub use error::ParseError;
pub use html::{dedupe_preserving_order, extract_image_urls};
pub use self::url::{is_valid, is_valid_url, parse_page_url, resolve_image_url};
