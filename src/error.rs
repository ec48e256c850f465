//! Error types for rewriting, sessions and preset decoding.

use thiserror::Error;

/// Precondition failures surfaced by the rewriting engine and the session.
///
/// Malformed-but-plausible configuration never ends up here; it degrades to
/// pass-through or no-op behaviour instead (see [`crate::ConfigIssue`]).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LSystemError {
    #[error("invalid generation target {0}: generation must be non-negative")]
    InvalidGenerationTarget(i64),

    #[error("no configuration has been applied")]
    NotConfigured,
}

/// Failures while decoding a preset line into a [`crate::Configuration`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PresetError {
    #[error("malformed `{key}` entry: {item:?}")]
    MalformedPair { key: &'static str, item: String },

    #[error("invalid number for `{key}`: {value:?}")]
    InvalidNumber { key: String, value: String },

    #[error("offset needs two comma separated numbers, got {0:?}")]
    InvalidOffset(String),
}
