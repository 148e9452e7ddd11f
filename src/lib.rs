//! proofgate: a formal-verification coverage gate for CI.
//!
//! Safety-critical predicates (treatment adequacy, structural limits,
//! fouling/operations constraints, governance constraints, violation-residual
//! computation, invariant validation) must each carry a machine-checked proof
//! harness. `proofgate` asks the verifier which functions it has harnesses
//! for, reconciles that against the configured predicate list, and blocks the
//! build on any gap.
//!
//! # Pipeline
//!
//! Strictly linear, one pass per process:
//!
//! 1. [`core::config`]: load `proofgate.toml`
//! 2. [`core::invoker`]: run the verifier in list mode, bounded by a deadline
//! 3. [`core::listing`]: decode the listing into a proven-function set
//! 4. [`core::matcher`]: substring reconciliation
//! 5. [`core::reporter`]: render and map to an exit status
//!
//! # Exit codes
//!
//! - `0`: every critical predicate is covered
//! - `1`: coverage gap; the missing predicates are listed
//! - `2`: the gate could not decide (configuration, verifier, timeout, listing)
//!
//! # Examples
//!
//! ```bash
//! # Run the verifier and check coverage
//! proofgate
//!
//! # Check a listing captured earlier in the pipeline, JSON output
//! proofgate --listing kani-list.json --format json
//! ```

pub mod cli;
pub mod core;

use crate::cli::{Cli, OutputFormat};
use crate::core::error::GateError;
use crate::core::reporter::{self, GateSummary};
use crate::core::{config, invoker, listing, matcher, output};
use clap::Parser;
use colored::Colorize;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

/// Inputs to one gate run, independent of how they were collected.
#[derive(Debug, Clone, Default)]
pub struct GateOptions {
    pub config: Option<PathBuf>,
    /// Value of `PROOFGATE_CONFIG`, if set.
    pub config_env: Option<String>,
    /// Value of `PROOFGATE_TIMEOUT_SECS`, if set.
    pub timeout_env: Option<String>,
    pub listing: Option<PathBuf>,
    pub cwd: PathBuf,
    pub verbose: bool,
}

impl GateOptions {
    pub fn from_cli(cli: &Cli, cwd: PathBuf) -> Self {
        Self {
            config: cli.config.clone(),
            config_env: std::env::var(config::CONFIG_ENV).ok(),
            timeout_env: std::env::var(config::TIMEOUT_ENV).ok(),
            listing: cli.listing.clone(),
            cwd,
            verbose: cli.verbose,
        }
    }
}

/// Parse the command line, run the gate, print the result and return the
/// process exit status.
pub fn run() -> u8 {
    let cli = Cli::parse();
    let result = std::env::current_dir()
        .map_err(GateError::from)
        .and_then(|cwd| check(&GateOptions::from_cli(&cli, cwd)));

    match (result, cli.format) {
        (Ok(summary), OutputFormat::Text) => {
            println!("{}", reporter::render_text(&summary));
            summary.exit_code()
        }
        (Ok(summary), OutputFormat::Json) => {
            println!("{}", reporter::render_json(&summary));
            summary.exit_code()
        }
        (Err(err), OutputFormat::Text) => {
            eprintln!("{}", reporter::render_error_text(&err));
            err.exit_code()
        }
        (Err(err), OutputFormat::Json) => {
            println!("{}", reporter::render_error_json(&err));
            err.exit_code()
        }
    }
}

/// One full pass: configure, collect the listing, parse, reconcile.
pub fn check(options: &GateOptions) -> Result<GateSummary, GateError> {
    let started = Instant::now();

    let config_path = config::resolve_config_path(
        options.config.as_deref(),
        options.config_env.as_deref(),
        &options.cwd,
    )?;
    let mut gate_config = config::load_config(&config_path)?;
    config::apply_timeout_override(&mut gate_config, options.timeout_env.as_deref())?;
    let critical = gate_config.gate.critical_predicates.clone();
    trace(
        options.verbose,
        started,
        &format!(
            "config {} ({} critical predicates)",
            config_path.display(),
            critical.len()
        ),
    );

    let (text, source) = match &options.listing {
        Some(file) => {
            let path = options.cwd.join(file);
            let text = fs::read_to_string(&path)
                .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))?;
            (text, format!("file:{}", path.display()))
        }
        None => {
            trace(
                options.verbose,
                started,
                &format!(
                    "invoking {} (timeout {}s)",
                    gate_config.verifier.display_command(),
                    gate_config.verifier.timeout_secs
                ),
            );
            let run = invoker::invoke(&gate_config.verifier)?;
            trace(
                options.verbose,
                started,
                &format!(
                    "verifier finished in {}",
                    output::format_elapsed(run.duration_ms)
                ),
            );
            let text = invoker::listing_text(&gate_config.verifier, &run)?;
            (text, run.command)
        }
    };

    let proven = listing::parse_listing(&text)?;
    trace(
        options.verbose,
        started,
        &format!("parsed {} proven functions", proven.len()),
    );

    let report = matcher::reconcile(&critical, &proven);
    let summary = GateSummary::new(critical, report, proven.len(), source);
    trace(
        options.verbose,
        started,
        &format!("{} predicate(s) missing", summary.missing.len()),
    );
    Ok(summary)
}

fn trace(verbose: bool, started: Instant, message: &str) {
    if !verbose {
        return;
    }
    let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    eprintln!(
        "{} {} {}",
        "▸".bright_cyan(),
        message,
        format!("[{}]", output::format_elapsed(elapsed)).dimmed()
    );
}
