//! Coverage reconciliation between the critical predicate list and the
//! proven-function set.
//!
//! A predicate counts as covered when any proven identifier contains its name
//! as a contiguous substring. The rule is deliberately permissive so that
//! module paths, harness prefixes and generic suffixes added by the verifier
//! still match the bare predicate name. It is not boundary-aware, which means
//! an unrelated function whose name embeds a predicate name also counts;
//! [`PredicateCoverage::covered_by`] records the identifier that matched so a
//! reviewer can audit that.

use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// Coverage status of one critical predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredicateCoverage {
    pub predicate: String,
    /// First proven identifier, in set order, that contains the predicate.
    pub covered_by: Option<String>,
}

impl PredicateCoverage {
    pub fn is_covered(&self) -> bool {
        self.covered_by.is_some()
    }
}

/// Per-predicate reconciliation, in critical-list order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    pub entries: Vec<PredicateCoverage>,
}

impl CoverageReport {
    /// Missing predicates in list order, each reported once.
    pub fn missing(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|entry| !entry.is_covered())
            .filter(|entry| seen.insert(entry.predicate.as_str()))
            .map(|entry| entry.predicate.clone())
            .collect()
    }

    pub fn all_covered(&self) -> bool {
        self.entries.iter().all(PredicateCoverage::is_covered)
    }
}

/// Identifier in `proven` that covers `predicate`, if any.
pub fn covering_identifier<'a>(
    predicate: &str,
    proven: &'a BTreeSet<String>,
) -> Option<&'a str> {
    proven
        .iter()
        .map(String::as_str)
        .find(|identifier| identifier.contains(predicate))
}

/// Evaluate every entry of `critical` independently against `proven`.
pub fn reconcile(critical: &[String], proven: &BTreeSet<String>) -> CoverageReport {
    let entries = critical
        .iter()
        .map(|predicate| PredicateCoverage {
            predicate: predicate.clone(),
            covered_by: covering_identifier(predicate, proven).map(str::to_string),
        })
        .collect();
    CoverageReport { entries }
}

/// Predicates from `critical` with no covering identifier, in list order
/// and without repeats. Always a subset of `critical`.
pub fn determine_missing(critical: &[String], proven: &BTreeSet<String>) -> Vec<String> {
    reconcile(critical, proven).missing()
}
