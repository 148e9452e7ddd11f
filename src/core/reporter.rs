//! Gate reporting: human-readable and JSON renderings of a gate run, and the
//! exit status each outcome maps to.

use crate::core::envelope::Envelope;
use crate::core::error::{EXIT_COVERAGE_GAP, EXIT_PASS, GateError};
use crate::core::matcher::{CoverageReport, PredicateCoverage};
use colored::Colorize;
use serde::Serialize;
use serde_json::Value as JsonValue;

const ENVELOPE_CMD: &str = "proofgate";

#[derive(Debug, Serialize)]
struct ResultBody<'a> {
    exit_code: u8,
    source: &'a str,
    critical: &'a [String],
    missing: &'a [String],
    coverage: &'a [PredicateCoverage],
    proven_count: usize,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    exit_code: u8,
    error_kind: &'static str,
    message: String,
}

/// Everything known about one completed reconciliation.
#[derive(Debug, Clone)]
pub struct GateSummary {
    pub critical: Vec<String>,
    pub report: CoverageReport,
    pub missing: Vec<String>,
    pub proven_count: usize,
    /// Verifier command line, or `file:<path>` for a captured listing.
    pub source: String,
}

impl GateSummary {
    pub fn new(
        critical: Vec<String>,
        report: CoverageReport,
        proven_count: usize,
        source: String,
    ) -> Self {
        let missing = report.missing();
        Self {
            critical,
            report,
            missing,
            proven_count,
            source,
        }
    }

    pub fn passed(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn exit_code(&self) -> u8 {
        if self.passed() {
            EXIT_PASS
        } else {
            EXIT_COVERAGE_GAP
        }
    }
}

/// Text report for stdout.
pub fn render_text(summary: &GateSummary) -> String {
    let covered = summary
        .report
        .entries
        .iter()
        .filter(|e| e.is_covered())
        .count();
    let total = summary.report.entries.len();

    if summary.passed() {
        return format!(
            "{} All critical predicates have formal verification ({}/{} covered, {} proven functions)",
            "✅".bright_green(),
            covered,
            total,
            summary.proven_count
        );
    }

    let mut out = format!(
        "{} Missing verification for {} critical predicate(s):",
        "❌".bright_red(),
        summary.missing.len()
    );
    for name in &summary.missing {
        out.push_str("\n  - ");
        out.push_str(name);
    }
    out.push('\n');
    out.push_str(&format!(
        "{}",
        "Blocking CI until proofs are added.".bright_yellow()
    ));
    out
}

/// JSON envelope for stdout.
pub fn render_json(summary: &GateSummary) -> JsonValue {
    let status = if summary.passed() { "pass" } else { "fail" };
    let body = ResultBody {
        exit_code: summary.exit_code(),
        source: &summary.source,
        critical: &summary.critical,
        missing: &summary.missing,
        coverage: &summary.report.entries,
        proven_count: summary.proven_count,
    };
    Envelope::new(ENVELOPE_CMD, status, body).to_json()
}

/// Text rendering of a fault, for stderr.
pub fn render_error_text(err: &GateError) -> String {
    let hint = "This is a gate fault, not a coverage gap; fix the verifier setup and re-run.";
    format!(
        "{} {}\n{}",
        "⚠ proofgate could not decide coverage:".bright_red().bold(),
        err,
        hint.bright_white()
    )
}

/// JSON envelope for a fault.
pub fn render_error_json(err: &GateError) -> JsonValue {
    let body = ErrorBody {
        exit_code: err.exit_code(),
        error_kind: err.kind(),
        message: err.to_string(),
    };
    Envelope::new(ENVELOPE_CMD, "error", body).to_json()
}
