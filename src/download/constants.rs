//! Constants for the download module (timeouts, buffers, filename bounds).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large images).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Default write buffer size for streamed image bodies, in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Default maximum length of a sanitized filename, in characters.
pub const DEFAULT_MAX_FILENAME_LENGTH: usize = 100;
