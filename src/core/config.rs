//! Gate configuration loaded from `proofgate.toml`.
//!
//! The critical predicate list and the verifier command line are injected at
//! startup so the gate can evolve without source changes.

use crate::core::error::GateError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "proofgate.toml";
pub const CONFIG_ENV: &str = "PROOFGATE_CONFIG";
pub const TIMEOUT_ENV: &str = "PROOFGATE_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 900;

/// Predicate names are bare or path-qualified Rust identifiers.
const PREDICATE_NAME_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*(::[A-Za-z_][A-Za-z0-9_]*)*$";

/// Top-level structure of `proofgate.toml`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GateConfig {
    pub gate: GateSection,
    #[serde(default)]
    pub verifier: VerifierConfig,
}

/// The `[gate]` table. `critical_predicates` is required so that a config
/// typo can never turn into a vacuous pass.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GateSection {
    pub critical_predicates: Vec<String>,
    #[serde(default)]
    pub reject_duplicates: bool,
}

/// The `[verifier]` table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerifierConfig {
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    /// Resolved against the config file's directory at load time.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Read the listing from this file instead of stdout.
    #[serde(default)]
    pub output_file: Option<PathBuf>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: default_args(),
            working_dir: None,
            timeout_secs: default_timeout_secs(),
            output_file: None,
        }
    }
}

impl VerifierConfig {
    /// Full command line for diagnostics.
    pub fn display_command(&self) -> String {
        if self.args.is_empty() {
            self.command.clone()
        } else {
            format!("{} {}", self.command, self.args.join(" "))
        }
    }
}

fn default_command() -> String {
    "cargo".to_string()
}

fn default_args() -> Vec<String> {
    vec![
        "kani".to_string(),
        "--list".to_string(),
        "--output-format=json".to_string(),
    ]
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Pick the config path: explicit flag, then `PROOFGATE_CONFIG`, then
/// `proofgate.toml` in `cwd`. Finding nothing is a fault.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    env_value: Option<&str>,
    cwd: &Path,
) -> Result<PathBuf, GateError> {
    if let Some(path) = explicit {
        return Ok(cwd.join(path));
    }
    if let Some(value) = env_value.map(str::trim).filter(|v| !v.is_empty()) {
        return Ok(cwd.join(value));
    }
    let candidate = cwd.join(CONFIG_FILE_NAME);
    if candidate.is_file() {
        return Ok(candidate);
    }
    Err(GateError::Config(format!(
        "no configuration found: pass --config, set {}, or create {}",
        CONFIG_ENV,
        candidate.display()
    )))
}

/// Load, resolve and validate a config file.
pub fn load_config(path: &Path) -> Result<GateConfig, GateError> {
    let content = fs::read_to_string(path).map_err(|e| {
        GateError::Config(format!("cannot read {}: {}", path.display(), e))
    })?;
    let mut config: GateConfig = toml::from_str(&content)
        .map_err(|e| GateError::Config(format!("{}: {}", path.display(), e)))?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    config.verifier.working_dir = Some(match config.verifier.working_dir.take() {
        Some(dir) => base.join(dir),
        None => base.to_path_buf(),
    });

    validate_config(&config)?;
    Ok(config)
}

/// Parse TOML text without touching the filesystem.
pub fn parse_config(content: &str) -> Result<GateConfig, GateError> {
    toml::from_str(content).map_err(|e| GateError::Config(e.to_string()))
}

/// Apply `PROOFGATE_TIMEOUT_SECS` on top of the file value.
pub fn apply_timeout_override(
    config: &mut GateConfig,
    env_value: Option<&str>,
) -> Result<(), GateError> {
    let Some(raw) = env_value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(());
    };
    let secs: u64 = raw.parse().map_err(|_| {
        GateError::Config(format!(
            "{} must be a positive integer, got '{}'",
            TIMEOUT_ENV, raw
        ))
    })?;
    if secs == 0 {
        return Err(GateError::Config(format!(
            "{} must be greater than zero",
            TIMEOUT_ENV
        )));
    }
    config.verifier.timeout_secs = secs;
    Ok(())
}

pub fn validate_config(config: &GateConfig) -> Result<(), GateError> {
    if config.verifier.command.trim().is_empty() {
        return Err(GateError::Config(
            "verifier.command must not be empty".to_string(),
        ));
    }
    if config.verifier.timeout_secs == 0 {
        return Err(GateError::Config(
            "verifier.timeout_secs must be greater than zero".to_string(),
        ));
    }

    let name_re = Regex::new(PREDICATE_NAME_PATTERN).map_err(|e| GateError::Config(e.to_string()))?;
    let bad: Vec<&str> = config
        .gate
        .critical_predicates
        .iter()
        .map(String::as_str)
        .filter(|name| !name_re.is_match(name))
        .collect();
    if !bad.is_empty() {
        return Err(GateError::Config(format!(
            "invalid predicate name(s): {:?}",
            bad
        )));
    }

    if config.gate.reject_duplicates {
        let mut seen = HashSet::new();
        let dupes: Vec<&str> = config
            .gate
            .critical_predicates
            .iter()
            .map(String::as_str)
            .filter(|name| !seen.insert(*name))
            .collect();
        if !dupes.is_empty() {
            return Err(GateError::Config(format!(
                "duplicate predicate(s) with reject_duplicates = true: {:?}",
                dupes
            )));
        }
    }

    Ok(())
}
