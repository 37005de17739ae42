//! CLI entry point for the imgcrawl tool.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use imgcrawl_core::config::LoadedConfig;
use imgcrawl_core::{CrawlReport, CrawlSettings, Crawler, load_default_file_config, parse_page_url};
use tracing::{debug, info};

mod cli;
mod exit_handler;
mod progress;

use cli::Args;
use exit_handler::{ProcessExit, determine_exit_outcome};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(exit) => exit.into(),
        Err(error) => {
            eprintln!("error: {error:#}");
            ProcessExit::Failure.into()
        }
    }
}

async fn run() -> Result<ProcessExit> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    let loaded_config = load_default_file_config()?;

    let quiet = args.is_quiet(loaded_config.config.as_ref());
    init_tracing(&args, quiet, &loaded_config);

    debug!(?args, "CLI arguments parsed");
    if let Some(path) = loaded_config.path.as_deref()
        && loaded_config.config.is_some()
    {
        debug!(path = %path.display(), "config file loaded");
    }

    let page_url = parse_page_url(&args.url)?;

    let mut settings = CrawlSettings::with_file_config(loaded_config.config.as_ref());
    args.apply_to(&mut settings);
    debug!(?settings, "effective crawl settings");

    let show_progress = !quiet && io::stderr().is_terminal();
    let progress = progress::crawl_progress_bar(show_progress, &page_url);

    let crawler = Crawler::new(settings);
    let report = crawler
        .run(&page_url, args.path.as_deref(), &progress)
        .await
        .with_context(|| format!("crawl of {page_url} aborted"))?;

    if !quiet {
        print_summary(&report);
    }

    Ok(determine_exit_outcome(
        report.downloaded() + report.skipped(),
        report.failed(),
    ))
}

/// Determine log level based on verbose/quiet flags.
/// Priority: `RUST_LOG` env var > quiet > verbose flag > config verbosity > default (info)
fn init_tracing(args: &Args, quiet: bool, loaded_config: &LoadedConfig) {
    let default_level = if quiet {
        "error"
    } else {
        match args.verbose {
            0 => loaded_config
                .config
                .as_ref()
                .and_then(|config| config.verbosity)
                .map_or("info", |verbosity| verbosity.filter_directive()),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_summary(report: &CrawlReport) {
    println!(
        "{} images from {}: {} downloaded, {} skipped, {} failed -> {}",
        report.total(),
        report.page_url(),
        report.downloaded(),
        report.skipped(),
        report.failed(),
        report.download_dir().display()
    );
    for (url, error) in report.failures() {
        println!("  failed: {url}: {error}");
    }
    if report.total() == 0 {
        info!("no images found on page");
    }
}
