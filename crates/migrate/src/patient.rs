//! Patient copy and identifier mapping

use fhir_core::{Bundle, FhirError, location_id};

use crate::client::FhirClient;
use crate::error::MigrateError;

/// Source patient id and the id the destination assigned to its copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientMapping {
    pub source_id: String,
    pub destination_id: String,
}

/// Copy patient `source_id` and return the destination's id for it
pub async fn transfer_patient(
    source: &FhirClient,
    destination: &FhirClient,
    source_id: &str,
) -> Result<PatientMapping, MigrateError> {
    let url = source.search_url("Patient", &[("_id", source_id)])?;
    let page = source.search(&url).await?;

    let resource = page
        .entry
        .into_iter()
        .next()
        .and_then(|e| e.resource)
        .ok_or_else(|| FhirError::NotFound(format!("Patient/{}", source_id)))?;

    let response = destination
        .transaction(&Bundle::single("Patient", resource))
        .await?;
    let destination_id = location_id(response.first_location()?, "Patient")?;

    tracing::info!(
        source_id = %source_id,
        destination_id = %destination_id,
        "Patient created"
    );

    Ok(PatientMapping {
        source_id: source_id.to_string(),
        destination_id,
    })
}
