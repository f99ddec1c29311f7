//! CLI entry point for the flexmirror tool.

use anyhow::{Result, bail};
use clap::Parser;
use flexmirror_core::{MirrorEngine, Settings};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let settings = Settings::load(&args.config)?;
    info!(
        sources = settings.sources.len(),
        root = %settings.base_download_folder.display(),
        "settings loaded"
    );

    // Browse URL validity is checked here, before any network activity.
    let engine = MirrorEngine::new(&settings, args.keep_going)?;
    let stats = engine.run().await?;

    info!(
        downloaded = stats.downloaded,
        skipped = stats.skipped,
        "all files downloaded successfully"
    );

    if stats.failed_sources > 0 {
        bail!("{} source(s) failed to mirror", stats.failed_sources);
    }

    Ok(())
}
