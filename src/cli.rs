//! Command-line surface: argument parsing, logging setup, and the run entry.

use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::fs_op::error::SubsetError;
use crate::subset::{move_random_subset, SubsetReport, SubsetRequest};

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "subset_mover")]
#[command(version)]
#[command(about = "Move a random subset of a directory's entries into another directory")]
pub struct Cli {
    /// Directory to draw entries from
    pub source: PathBuf,

    /// Directory to move the selected entries into (created if missing)
    pub destination: PathBuf,

    /// Number of entries to move
    #[arg(allow_negative_numbers = true)]
    pub count: i64,

    /// Log progress to stderr (-v for a summary, -vv per entry)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Outcome of parsing the command line.
#[derive(Debug)]
pub enum ParseOutcome {
    Run(Cli),
    /// Help or version was requested; clap prints it and exits 0.
    Info(clap::Error),
}

/// Parse `args` (including the program name).
///
/// Usage errors become `SubsetError::InvalidArguments`.
pub fn parse_args<I, T>(args: I) -> Result<ParseOutcome, SubsetError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(ParseOutcome::Run(cli)),
        Err(e) if !e.use_stderr() => Ok(ParseOutcome::Info(e)),
        Err(e) => Err(SubsetError::from(e)),
    }
}

/// Install the stderr `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise the verbosity flag picks the level and
/// a quiet run only reports warnings.
pub fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .compact()
        .try_init();
}

impl Cli {
    pub fn request(&self) -> SubsetRequest {
        SubsetRequest::new(&self.source, &self.destination, self.count)
    }
}

/// Execute a parsed command line with fresh thread-local randomness.
pub fn run(cli: &Cli) -> Result<SubsetReport, SubsetError> {
    let mut rng = rand::rng();
    move_random_subset(&cli.request(), &mut rng)
}
