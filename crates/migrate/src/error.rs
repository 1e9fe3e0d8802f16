//! Migration error handling

use fhir_core::FhirError;
use thiserror::Error;

/// Errors that abort a transfer step
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Failed to parse response JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Fhir(#[from] FhirError),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
