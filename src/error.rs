//! Error types for parameter derivation

use thiserror::Error;

/// Main error type for derivation failures
///
/// Every variant is fatal: derivation is pure and deterministic, so retrying
/// with the same inputs reproduces the same failure. Callers fix the cluster
/// spec or the image table, not the call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Two derivation steps produced the same parameter name
    #[error("duplicate parameter: {0}")]
    DuplicateParameter(String),

    /// The image resolution table has no entry for the requested distro
    #[error("no image configured for distro: {0}")]
    UnknownImage(String),

    /// A structurally-required field was absent despite upstream validation
    #[error("missing required field: {0}")]
    MissingField(String),
}

impl Error {
    /// Create a duplicate-parameter error for the given name
    pub fn duplicate_parameter(name: impl Into<String>) -> Self {
        Self::DuplicateParameter(name.into())
    }

    /// Create an unknown-image error for the given distro key
    pub fn unknown_image(distro: impl Into<String>) -> Self {
        Self::UnknownImage(distro.into())
    }

    /// Create a missing-field error with the given field path
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }
}
