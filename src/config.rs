//! Crawl settings and the optional configuration file.
//!
//! Settings are resolved in three layers: built-in defaults, then values from
//! `config.toml`, then command-line flags (applied by the binary).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::download::constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_BUFFER_SIZE, DEFAULT_MAX_FILENAME_LENGTH, READ_TIMEOUT_SECS,
};

/// Largest accepted write buffer, in bytes (16 MiB).
pub const MAX_BUFFER_SIZE: usize = 16 * 1024 * 1024;

/// Accepted range for `max_filename_length`. The lower bound leaves room for
/// the longest recognized extension plus a few characters of name.
pub const FILENAME_LENGTH_RANGE: std::ops::RangeInclusive<usize> = 8..=255;

/// Effective settings for one crawl run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSettings {
    /// Write buffer size for streamed image bodies, in bytes.
    pub buffer_size: usize,
    /// Maximum sanitized filename length, in characters.
    pub max_filename_length: usize,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// HTTP request timeout in seconds.
    pub read_timeout_secs: u64,
    /// Download each distinct image URL once.
    pub dedupe: bool,
    /// Treat a non-2xx page response as a fatal error.
    pub strict_status: bool,
    /// Abort the run on the first failed image.
    pub fail_fast: bool,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_filename_length: DEFAULT_MAX_FILENAME_LENGTH,
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
            dedupe: false,
            strict_status: false,
            fail_fast: false,
        }
    }
}

impl CrawlSettings {
    /// Defaults overlaid with any values present in `file`.
    #[must_use]
    pub fn with_file_config(file: Option<&FileConfig>) -> Self {
        let defaults = Self::default();
        let Some(file) = file else {
            return defaults;
        };
        Self {
            buffer_size: file.buffer_size.unwrap_or(defaults.buffer_size),
            max_filename_length: file
                .max_filename_length
                .unwrap_or(defaults.max_filename_length),
            connect_timeout_secs: file
                .connect_timeout_secs
                .unwrap_or(defaults.connect_timeout_secs),
            read_timeout_secs: file.read_timeout_secs.unwrap_or(defaults.read_timeout_secs),
            dedupe: file.dedupe.unwrap_or(defaults.dedupe),
            strict_status: file.strict_status.unwrap_or(defaults.strict_status),
            fail_fast: file.fail_fast.unwrap_or(defaults.fail_fast),
        }
    }
}

/// TOML-backed file configuration for crawl defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Write buffer size in bytes.
    pub buffer_size: Option<usize>,
    /// Maximum sanitized filename length.
    pub max_filename_length: Option<usize>,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// HTTP request timeout in seconds.
    pub read_timeout_secs: Option<u64>,
    /// Download each distinct image URL once.
    pub dedupe: Option<bool>,
    /// Fail on non-2xx page responses.
    pub strict_status: Option<bool>,
    /// Abort on the first failed image.
    pub fail_fast: Option<bool>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first out-of-range key.
    pub fn validate(&self) -> Result<()> {
        if let Some(size) = self.buffer_size
            && !(1..=MAX_BUFFER_SIZE).contains(&size)
        {
            bail!("Invalid config value for `buffer_size`: {size}. Expected range: 1..={MAX_BUFFER_SIZE}");
        }

        if let Some(length) = self.max_filename_length
            && !FILENAME_LENGTH_RANGE.contains(&length)
        {
            bail!(
                "Invalid config value for `max_filename_length`: {length}. Expected range: {}..={}",
                FILENAME_LENGTH_RANGE.start(),
                FILENAME_LENGTH_RANGE.end()
            );
        }

        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the tracing filter directive for this mode.
    #[must_use]
    pub fn filter_directive(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/imgcrawl/config.toml`
/// 2. `$HOME/.config/imgcrawl/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("imgcrawl")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("imgcrawl")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the default path if present.
///
/// A missing file is not an error.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, parsed or validated.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(path_ref) if path_ref.exists() => {
            debug!(path = %path_ref.display(), "loading config file");
            Some(load_file_config(path_ref)?)
        }
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

/// Loads and validates a config file at an explicit path.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_number = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_number}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let context = || format!("Invalid `{key}` value on line {line_number}");

        match key {
            "buffer_size" => {
                cfg.buffer_size = Some(parse_integer_usize(value).with_context(context)?);
            }
            "max_filename_length" => {
                cfg.max_filename_length = Some(parse_integer_usize(value).with_context(context)?);
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(parse_integer_u64(value).with_context(context)?);
            }
            "read_timeout_secs" => {
                cfg.read_timeout_secs = Some(parse_integer_u64(value).with_context(context)?);
            }
            "dedupe" => {
                cfg.dedupe = Some(parse_boolean(value).with_context(context)?);
            }
            "strict_status" => {
                cfg.strict_status = Some(parse_boolean(value).with_context(context)?);
            }
            "fail_fast" => {
                cfg.fail_fast = Some(parse_boolean(value).with_context(context)?);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(context)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_number}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_number}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim().replace('_', "");
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_integer_usize(raw_value: &str) -> Result<usize> {
    let value = parse_integer_u64(raw_value)?;
    usize::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for usize"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

fn parse_boolean(raw_value: &str) -> Result<bool> {
    match raw_value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!("Expected 'true' or 'false'"),
    }
}
