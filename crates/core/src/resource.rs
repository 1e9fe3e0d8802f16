//! In-place edits of opaque resources

use serde_json::Value as JsonValue;

use crate::error::FhirError;

/// Point `subject.reference` of `resource` at `Patient/{patient_id}`
pub fn rewrite_subject(resource: &mut JsonValue, patient_id: &str) -> Result<(), FhirError> {
    let subject = resource
        .get_mut("subject")
        .ok_or_else(|| FhirError::MissingField("subject".to_string()))?
        .as_object_mut()
        .ok_or_else(|| FhirError::Invalid("subject is not an object".to_string()))?;

    subject.insert(
        "reference".to_string(),
        JsonValue::String(format!("Patient/{}", patient_id)),
    );
    Ok(())
}

/// Remove top-level `fields` from `resource`; absent fields are ignored
pub fn strip_fields(resource: &mut JsonValue, fields: &[&str]) -> Result<(), FhirError> {
    let obj = resource
        .as_object_mut()
        .ok_or_else(|| FhirError::Invalid("resource is not an object".to_string()))?;
    for field in fields {
        obj.remove(*field);
    }
    Ok(())
}

/// Extract the logical id from a server-reported location.
///
/// Accepts `Type/id`, `Type/id/_history/n` and absolute URLs ending in
/// either form.
pub fn location_id(location: &str, resource_type: &str) -> Result<String, FhirError> {
    let segments: Vec<&str> = location.split('/').collect();
    segments
        .iter()
        .position(|s| *s == resource_type)
        .and_then(|i| segments.get(i + 1))
        .filter(|id| !id.is_empty())
        .map(|id| id.to_string())
        .ok_or_else(|| {
            FhirError::Invalid(format!(
                "location '{}' does not name a {}",
                location, resource_type
            ))
        })
}
