//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use imgcrawl_core::{CrawlSettings, FileConfig, VerbositySetting};

/// Download every image embedded in a web page.
///
/// Images are saved under the directory given with --path, or under a
/// directory named after the page host. Files that already exist are skipped.
///
/// Exit codes: 0 all images saved or skipped, 1 run aborted or every image
/// failed, 2 some images failed.
#[derive(Parser, Debug)]
#[command(name = "imgcrawl")]
#[command(author, version, about)]
pub struct Args {
    /// URL of the page to crawl
    pub url: String,

    /// Directory to save images into (defaults to the page host name)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Write buffer size for image bodies in bytes (1-16777216)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=16_777_216))]
    pub buffer_size: Option<u64>,

    /// Maximum length of saved filenames in characters (8-255)
    #[arg(long, value_parser = clap::value_parser!(u16).range(8..=255))]
    pub max_filename_length: Option<u16>,

    /// Download each distinct image URL only once
    #[arg(long)]
    pub dedupe: bool,

    /// Abort when the page itself returns a non-2xx status
    #[arg(long)]
    pub strict_status: bool,

    /// Abort on the first failed image instead of continuing
    #[arg(long)]
    pub fail_fast: bool,
}

impl Args {
    /// Overlays flags given on the command line onto `settings`.
    pub fn apply_to(&self, settings: &mut CrawlSettings) {
        if let Some(size) = self.buffer_size.and_then(|size| usize::try_from(size).ok()) {
            settings.buffer_size = size;
        }
        if let Some(length) = self.max_filename_length {
            settings.max_filename_length = usize::from(length);
        }
        settings.dedupe |= self.dedupe;
        settings.strict_status |= self.strict_status;
        settings.fail_fast |= self.fail_fast;
    }

    /// True when `-q` is given, or the config asks for quiet and no `-v` overrides it.
    #[must_use]
    pub fn is_quiet(&self, file: Option<&FileConfig>) -> bool {
        self.quiet
            || (self.verbose == 0
                && file.and_then(|config| config.verbosity) == Some(VerbositySetting::Quiet))
    }
}
