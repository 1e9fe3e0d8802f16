//! HTTP client for a FHIR server's search and transaction endpoints

use std::time::Duration;

use fhir_core::{Bundle, OperationOutcome};
use reqwest::Url;

use crate::error::MigrateError;

const FHIR_JSON: &str = "application/fhir+json";

/// Client bound to one FHIR base URL
#[derive(Clone)]
pub struct FhirClient {
    http: reqwest::Client,
    base_url: String,
}

impl FhirClient {
    /// Create a client for `base_url` with the given request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, MigrateError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the first-page URL of a search on `resource_type`
    pub fn search_url(
        &self,
        resource_type: &str,
        params: &[(&str, &str)],
    ) -> Result<String, MigrateError> {
        let url = format!("{}/{}", self.base_url, resource_type);
        Url::parse_with_params(&url, params)
            .map(String::from)
            .map_err(|e| MigrateError::InvalidUrl {
                url,
                reason: e.to_string(),
            })
    }

    /// GET one search page by absolute URL
    pub async fn search(&self, url: &str) -> Result<Bundle, MigrateError> {
        let resp = self
            .http
            .get(url)
            .header("Accept", FHIR_JSON)
            .send()
            .await?;
        handle_response(resp).await
    }

    /// POST a transaction bundle to the base URL, returning the transaction-response
    pub async fn transaction(&self, bundle: &Bundle) -> Result<Bundle, MigrateError> {
        let resp = self
            .http
            .post(&self.base_url)
            .header("Accept", FHIR_JSON)
            .header("Content-Type", FHIR_JSON)
            .body(serde_json::to_vec(bundle)?)
            .send()
            .await?;
        handle_response(resp).await
    }
}

async fn handle_response(resp: reqwest::Response) -> Result<Bundle, MigrateError> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        let message = OperationOutcome::from_body(&body)
            .and_then(|o| o.summary())
            .unwrap_or(body);
        return Err(MigrateError::Status { status, message });
    }

    Ok(serde_json::from_str(&body)?)
}
