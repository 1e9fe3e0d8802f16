//! Reference ValueSet seeded once per run

use fhir_core::Bundle;
use serde_json::{Value as JsonValue, json};

use crate::client::FhirClient;
use crate::error::MigrateError;

/// Blood-pressure medications offered by the client application
pub fn blood_pressure_medications() -> JsonValue {
    json!({
        "resourceType": "ValueSet",
        "text": {
            "status": "generated",
            "div": "<div xmlns='http://www.w3.org/1999/xhtml'><a name='mm'/></div>"
        },
        "id": "cf-1561094099678",
        "expansion": {
            "timestamp": "2019-06-20T17:00:49.192Z",
            "total": 5,
            "contains": [
                {"code": "259255", "display": "Atorvastatin 80 MG Oral Tablet"},
                {"code": "833036", "display": "Captopril 25 MG Oral Tablet"},
                {"code": "197361", "display": "Amlodipine 5 MG Oral Tablet"},
                {"code": "309362", "display": "Clopidogrel 75 MG Oral Tablet"},
                {"code": "312961", "display": "Simvastatin 20 MG Oral Tablet"}
            ]
        },
        "title": "blood-pressure-medications"
    })
}

/// POST the reference ValueSet to the destination
pub async fn seed_value_set(destination: &FhirClient) -> Result<(), MigrateError> {
    let bundle = Bundle::single("ValueSet", blood_pressure_medications());
    destination.transaction(&bundle).await?;
    tracing::info!(title = "blood-pressure-medications", "ValueSet seeded");
    Ok(())
}
