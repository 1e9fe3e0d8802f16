//! Walks a search result set page by page through its `next` links

use std::collections::HashSet;

use fhir_core::Bundle;

use crate::client::FhirClient;
use crate::error::MigrateError;

/// One fetched page of a search result set
#[derive(Debug)]
pub struct Page {
    pub url: String,
    pub bundle: Bundle,
}

/// A page that could not be fetched or parsed; paging stops after it
#[derive(Debug)]
pub struct PageError {
    pub url: String,
    pub error: MigrateError,
}

/// Sequential cursor over the pages of one search
pub struct Pager {
    next: Option<String>,
    visited: HashSet<String>,
}

impl Pager {
    pub fn new(first_url: String) -> Self {
        Self {
            next: Some(first_url),
            visited: HashSet::new(),
        }
    }

    /// Fetch the next page, or `None` once the result set is exhausted.
    ///
    /// A failed fetch is returned once and ends the walk.
    pub async fn next_page(&mut self, client: &FhirClient) -> Option<Result<Page, PageError>> {
        let url = self.next.take()?;
        self.visited.insert(url.clone());

        match client.search(&url).await {
            Ok(bundle) => {
                self.next = bundle
                    .next_link()
                    .filter(|next| !self.visited.contains(*next))
                    .map(str::to_string);
                Some(Ok(Page { url, bundle }))
            }
            Err(error) => {
                tracing::warn!(url = %url, error = %error, "Failed to fetch search page");
                Some(Err(PageError { url, error }))
            }
        }
    }
}
