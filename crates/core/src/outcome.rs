use serde::{Deserialize, Serialize};

/// Severity of the issue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Fatal,
    Error,
    Warning,
    Information,
}

/// A single issue reported by a server.
///
/// `code` stays a plain string: servers return codes outside the subset
/// we would otherwise have to enumerate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationOutcomeIssue {
    pub severity: IssueSeverity,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}

/// FHIR OperationOutcome resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOutcome {
    pub resource_type: String,
    #[serde(default)]
    pub issue: Vec<OperationOutcomeIssue>,
}

impl OperationOutcome {
    /// Parse an error body, returning `None` unless it is an OperationOutcome
    pub fn from_body(body: &str) -> Option<Self> {
        serde_json::from_str::<Self>(body)
            .ok()
            .filter(|o| o.resource_type == "OperationOutcome")
    }

    /// Joined diagnostics of all issues, or `None` when no issue carries any
    pub fn summary(&self) -> Option<String> {
        let msgs: Vec<&str> = self
            .issue
            .iter()
            .filter_map(|i| i.diagnostics.as_deref())
            .collect();
        if msgs.is_empty() {
            None
        } else {
            Some(msgs.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_joins_diagnostics() {
        let body = r#"{
            "resourceType": "OperationOutcome",
            "issue": [
                {"severity": "error", "code": "processing", "diagnostics": "No Encounter/7"},
                {"severity": "warning", "code": "informational"},
                {"severity": "error", "code": "invalid", "diagnostics": "Bad subject"}
            ]
        }"#;
        let outcome = OperationOutcome::from_body(body).unwrap();
        assert_eq!(
            outcome.summary().as_deref(),
            Some("No Encounter/7; Bad subject")
        );
    }

    #[test]
    fn other_bodies_are_not_outcomes() {
        assert!(OperationOutcome::from_body("gateway timeout").is_none());
        assert!(OperationOutcome::from_body(r#"{"resourceType": "Bundle"}"#).is_none());
    }
}
