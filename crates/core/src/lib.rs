//! fhir-core: Shared FHIR R4 wire types and utilities
//!
//! This crate provides the Bundle envelope used for both search pages and
//! transaction submissions, OperationOutcome decoding, and the handful of
//! resource edits a record migration needs.

pub mod bundle;
pub mod error;
pub mod outcome;
pub mod resource;

// Re-export our types
pub use bundle::{
    Bundle, BundleEntry, BundleLink, BundleRequest, BundleResponse, BundleType, HttpVerb, Meta,
};
pub use error::FhirError;
pub use outcome::{IssueSeverity, OperationOutcome, OperationOutcomeIssue};
pub use resource::{location_id, rewrite_subject, strip_fields};
