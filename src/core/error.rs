use std::io;
use thiserror::Error;

/// Process exit status when every critical predicate is covered.
pub const EXIT_PASS: u8 = 0;
/// Process exit status when at least one critical predicate has no proof.
pub const EXIT_COVERAGE_GAP: u8 = 1;
/// Process exit status for any fault that prevented a coverage decision.
pub const EXIT_FAULT: u8 = 2;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("CONFIG_INVALID: {0}")]
    Config(String),
    #[error("TOOL_INVOCATION_FAILED: {0}")]
    ToolInvocation(String),
    #[error("TOOL_TIMEOUT: verifier did not finish within {secs}s ({command})")]
    ToolTimeout { command: String, secs: u64 },
    #[error("MALFORMED_OUTPUT: {0}")]
    MalformedOutput(String),
    #[error("IO_ERROR: {0}")]
    Io(#[from] io::Error),
}

impl GateError {
    /// Stable machine-readable kind, used in JSON envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_invalid",
            Self::ToolInvocation(_) => "tool_invocation_failed",
            Self::ToolTimeout { .. } => "tool_timeout",
            Self::MalformedOutput(_) => "malformed_output",
            Self::Io(_) => "io_error",
        }
    }

    /// Every fault shares one exit status, distinct from a coverage gap.
    pub fn exit_code(&self) -> u8 {
        EXIT_FAULT
    }
}
