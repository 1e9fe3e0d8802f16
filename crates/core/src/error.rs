use thiserror::Error;

/// Errors raised while reading or editing FHIR documents
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FhirError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid resource: {0}")]
    Invalid(String),
}
