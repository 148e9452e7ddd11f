//! CLI struct definitions for the proofgate command-line interface.
//!
//! A bare `proofgate` performs the full check-and-exit cycle; every flag is
//! optional.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "proofgate",
    version = env!("CARGO_PKG_VERSION"),
    about = "Fails the build unless every safety-critical predicate has a formal proof harness."
)]
pub struct Cli {
    /// Gate configuration file (defaults to $PROOFGATE_CONFIG, then ./proofgate.toml).
    #[clap(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Reconcile against a previously captured verifier listing instead of running the verifier.
    #[clap(long, value_name = "PATH")]
    pub listing: Option<PathBuf>,
    /// Output format.
    #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Print per-phase timing information on stderr.
    #[clap(long, short = 'v')]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
