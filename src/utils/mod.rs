//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Short code generation over a configured alphabet
//! - [`datetime`] - Lenient timestamp parsing for request payloads

pub mod code_generator;
pub mod datetime;
