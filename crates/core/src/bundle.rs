use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::FhirError;

/// Identity stamped on every transaction envelope we build
pub const TRANSACTION_BUNDLE_ID: &str = "c4b905c0-6197-4879-96f9-9a81490281b1";

/// `meta.lastUpdated` stamped on every transaction envelope we build
pub const TRANSACTION_LAST_UPDATED: &str = "2019-06-20T16:25:17.710+00:00";

/// FHIR Bundle types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BundleType {
    Searchset,
    History,
    Collection,
    Document,
    Message,
    Transaction,
    TransactionResponse,
    Batch,
    BatchResponse,
}

/// HTTP verb of a transaction entry request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
}

/// Resource metadata (only the fields we stamp)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// FHIR Bundle resource (search pages and transactions)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    #[serde(rename = "type")]
    pub bundle_type: BundleType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub link: Vec<BundleLink>,

    #[serde(default)]
    pub entry: Vec<BundleEntry>,
}

/// Link between bundle pages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BundleLink {
    pub relation: String,
    pub url: String,
}

/// Entry in a Bundle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<JsonValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<BundleRequest>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<BundleResponse>,
}

/// Request directive of a transaction entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BundleRequest {
    pub method: HttpVerb,
    pub url: String,
}

/// Outcome of one entry in a transaction-response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleResponse {
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

impl Bundle {
    /// Create an empty transaction envelope.
    ///
    /// Every call returns a fresh entry vector.
    pub fn transaction() -> Self {
        Self {
            resource_type: "Bundle".to_string(),
            id: Some(TRANSACTION_BUNDLE_ID.to_string()),
            meta: Some(Meta {
                last_updated: Some(TRANSACTION_LAST_UPDATED.to_string()),
            }),
            bundle_type: BundleType::Transaction,
            total: None,
            link: Vec::new(),
            entry: Vec::new(),
        }
    }

    /// Create a transaction holding a single POST of `resource`
    pub fn single(resource_type: &str, resource: JsonValue) -> Self {
        let mut bundle = Self::transaction();
        bundle.push(resource_type, resource);
        bundle
    }

    /// Append a POST entry for `resource`
    pub fn push(&mut self, resource_type: &str, resource: JsonValue) {
        self.entry.push(BundleEntry::post(resource_type, resource));
    }

    /// URL of the link with the given relation, if any
    pub fn link_url(&self, relation: &str) -> Option<&str> {
        self.link
            .iter()
            .find(|l| l.relation == relation)
            .map(|l| l.url.as_str())
    }

    /// URL of the following page, or `None` when this is the last page
    pub fn next_link(&self) -> Option<&str> {
        self.link_url("next")
    }

    /// Location reported for the first entry of a transaction-response
    pub fn first_location(&self) -> Result<&str, FhirError> {
        self.entry
            .first()
            .ok_or_else(|| FhirError::MissingField("entry[0]".to_string()))?
            .response
            .as_ref()
            .ok_or_else(|| FhirError::MissingField("entry[0].response".to_string()))?
            .location
            .as_deref()
            .ok_or_else(|| FhirError::MissingField("entry[0].response.location".to_string()))
    }
}

impl BundleEntry {
    /// Create a transaction entry that POSTs `resource` to its type endpoint
    pub fn post(resource_type: &str, resource: JsonValue) -> Self {
        Self {
            full_url: None,
            resource: Some(resource),
            request: Some(BundleRequest {
                method: HttpVerb::Post,
                url: resource_type.to_string(),
            }),
            response: None,
        }
    }

    /// Logical id of the carried resource, for diagnostics
    pub fn resource_id(&self) -> Option<&str> {
        self.resource
            .as_ref()
            .and_then(|r| r.get("id"))
            .and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transaction_starts_empty() {
        let bundle = Bundle::transaction();
        assert!(bundle.entry.is_empty());
        assert_eq!(bundle.bundle_type, BundleType::Transaction);
        assert_eq!(bundle.id.as_deref(), Some(TRANSACTION_BUNDLE_ID));
    }

    #[test]
    fn transactions_do_not_share_entries() {
        let mut first = Bundle::transaction();
        first.push("Patient", json!({"resourceType": "Patient"}));
        let second = Bundle::transaction();

        assert_eq!(first.entry.len(), 1);
        assert!(second.entry.is_empty());
    }

    #[test]
    fn transaction_serializes_as_fhir() {
        let bundle = Bundle::single("ValueSet", json!({"resourceType": "ValueSet"}));
        let value = serde_json::to_value(&bundle).unwrap();

        assert_eq!(value["resourceType"], "Bundle");
        assert_eq!(value["type"], "transaction");
        assert_eq!(value["meta"]["lastUpdated"], TRANSACTION_LAST_UPDATED);
        assert_eq!(value["entry"][0]["request"]["method"], "POST");
        assert_eq!(value["entry"][0]["request"]["url"], "ValueSet");
        assert!(value.get("link").is_none());
    }

    #[test]
    fn next_link_requires_next_relation() {
        let page: Bundle = serde_json::from_value(json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "link": [{"relation": "self", "url": "http://src/Observation?subject=1"}]
        }))
        .unwrap();
        assert_eq!(page.next_link(), None);

        let page: Bundle = serde_json::from_value(json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "link": [
                {"relation": "self", "url": "http://src/Observation?subject=1"},
                {"relation": "next", "url": "http://src/Observation?page=2"}
            ]
        }))
        .unwrap();
        assert_eq!(page.next_link(), Some("http://src/Observation?page=2"));
    }

    #[test]
    fn page_without_links_or_entries_parses() {
        let page: Bundle =
            serde_json::from_value(json!({"resourceType": "Bundle", "type": "searchset"})).unwrap();
        assert!(page.link.is_empty());
        assert!(page.entry.is_empty());
        assert_eq!(page.next_link(), None);
    }

    #[test]
    fn first_location_reads_transaction_response() {
        let response: Bundle = serde_json::from_value(json!({
            "resourceType": "Bundle",
            "type": "transaction-response",
            "entry": [{"response": {"status": "201 Created", "location": "Patient/99/_history/1"}}]
        }))
        .unwrap();
        assert_eq!(response.bundle_type, BundleType::TransactionResponse);
        assert_eq!(response.first_location().unwrap(), "Patient/99/_history/1");

        let empty: Bundle = serde_json::from_value(json!({
            "resourceType": "Bundle",
            "type": "transaction-response"
        }))
        .unwrap();
        assert_eq!(
            empty.first_location(),
            Err(FhirError::MissingField("entry[0]".to_string()))
        );
    }
}
