//! JSON command envelope for `--format json`.
//!
//! Every machine-readable gate result is one envelope: fixed header fields
//! plus a flattened body specific to the outcome.

use serde::Serialize;
use serde_json::Value as JsonValue;

pub const ENVELOPE_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub envelope_version: &'static str,
    pub cmd: &'static str,
    pub status: &'static str,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(cmd: &'static str, status: &'static str, body: T) -> Self {
        Self {
            envelope_version: ENVELOPE_VERSION,
            cmd,
            status,
            body,
        }
    }

    /// A body that does not serialize to an object yields only the header.
    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or_default()
    }
}
