//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Mirror data-logger folders from a FlexGate browse interface.
///
/// Reads a TOML settings file naming the browse endpoint and the sources
/// (serial, folders, specific files) to mirror, then downloads every
/// matching remote file that is not already present locally.
#[derive(Parser, Debug)]
#[command(name = "flexmirror")]
#[command(author, version, about)]
pub struct Args {
    /// Path to the TOML settings file
    #[arg(short = 'c', long, default_value = "settings.toml")]
    pub config: PathBuf,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Continue with the next source when one fails (exit code still
    /// reports the failure)
    #[arg(long)]
    pub keep_going: bool,
}
