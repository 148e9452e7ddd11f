//! Decoding of verifier listings into the proven-function set.
//!
//! Two JSON shapes are understood: a flat array of identifiers, and the
//! document Kani writes for `list --format json`, where harness names are
//! grouped per source file and contracts name the function they cover. A
//! function under contract only counts as proven when at least one harness
//! checks that contract.

use crate::core::error::GateError;
use crate::core::output::compact_line;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

const PREVIEW_CHARS: usize = 160;

/// Identifiers the verifier reports as formally checked, in sorted order.
pub type ProvenFunctionSet = BTreeSet<String>;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing {
    Flat(Vec<String>),
    Document(KaniListDocument),
}

#[derive(Debug, Deserialize)]
struct KaniListDocument {
    #[serde(rename = "standard-harnesses", default)]
    standard_harnesses: Option<BTreeMap<String, Vec<String>>>,
    #[serde(rename = "contract-harnesses", default)]
    contract_harnesses: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    contracts: Option<Vec<ContractEntry>>,
}

#[derive(Debug, Deserialize)]
struct ContractEntry {
    function: String,
    #[serde(default)]
    harnesses: Vec<String>,
}

impl KaniListDocument {
    fn is_empty_shape(&self) -> bool {
        self.standard_harnesses.is_none()
            && self.contract_harnesses.is_none()
            && self.contracts.is_none()
    }

    fn into_set(self) -> ProvenFunctionSet {
        let mut proven = ProvenFunctionSet::new();
        for harnesses in [self.standard_harnesses, self.contract_harnesses]
            .into_iter()
            .flatten()
        {
            proven.extend(harnesses.into_values().flatten());
        }
        for contract in self.contracts.into_iter().flatten() {
            if contract.harnesses.is_empty() {
                continue;
            }
            proven.insert(contract.function);
            proven.extend(contract.harnesses);
        }
        proven
    }
}

/// Parse listing text into a [`ProvenFunctionSet`].
pub fn parse_listing(text: &str) -> Result<ProvenFunctionSet, GateError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GateError::MalformedOutput(
            "verifier produced an empty listing".to_string(),
        ));
    }

    let listing: Listing = serde_json::from_str(trimmed).map_err(|e| {
        GateError::MalformedOutput(format!(
            "listing is not a JSON array of identifiers or a Kani list document ({}); got: {}",
            e,
            compact_line(trimmed, PREVIEW_CHARS)
        ))
    })?;

    match listing {
        Listing::Flat(items) => Ok(items.into_iter().collect()),
        // serde also fills structs from sequences, so only objects are documents.
        Listing::Document(doc) if !trimmed.starts_with('{') || doc.is_empty_shape() => {
            Err(GateError::MalformedOutput(format!(
                "expected a JSON object with standard-harnesses, contract-harnesses or \
                 contracts; got: {}",
                compact_line(trimmed, PREVIEW_CHARS)
            )))
        }
        Listing::Document(doc) => Ok(doc.into_set()),
    }
}
