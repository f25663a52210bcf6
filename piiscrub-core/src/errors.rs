//! errors.rs - Custom error types for the piiscrub-core library.
//!
//! This module defines a structured error enum for the library. Errors fall in two
//! families: client-input errors (a malformed dataset, options, or request document),
//! which a hosting API reports back to its caller, and configuration or system errors,
//! which are raised at engine construction or by file-loading helpers.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `piiscrub-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PiiScrubError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown action '{0}'. Expected one of: tokenize, mask, scramble, redact")]
    UnknownAction(String),

    #[error("Unknown PII type '{0}'. Expected one of: name, email, phone, ssn, credit_card, address")]
    UnknownPiiType(String),

    #[error("Policy validation failed:\n{0}")]
    InvalidPolicy(String),

    #[error("Policy '{0}' not found. It is not a valid file path, and was not found in expected locations.")]
    PolicyNotFound(String),

    #[error("Failed to compile detection pattern for '{0}': {1}")]
    PatternCompilationError(String, regex::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),
}

impl PiiScrubError {
    /// True for errors caused by the shape or content of a caller's request rather
    /// than by the engine's configuration or environment.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::UnknownAction(_))
    }
}

impl From<serde_json::Error> for PiiScrubError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_syntax() || e.is_eof() || e.is_data() {
            Self::InvalidInput(e.to_string())
        } else {
            Self::SerializationError(e.to_string())
        }
    }
}
