//! Core modules for the coverage gate.
//!
//! Leaves first: configuration and errors, then the invoker, listing parser,
//! matcher and reporter that make up the single-pass pipeline.

pub mod config;
pub mod envelope;
pub mod error;
pub mod invoker;
pub mod listing;
pub mod matcher;
pub mod output;
pub mod reporter;

