//! Paged transform-and-submit of patient-scoped resources
//!
//! Every resource kind is moved the same way: walk the source search,
//! point each resource at the destination patient, drop fields that
//! reference data we do not copy, and POST the result. The kinds differ
//! only in the search, the dropped fields, how submissions are grouped and
//! how far a malformed resource reaches. Those differences live in
//! [`TransferPlan`].

use fhir_core::{Bundle, BundleEntry, FhirError, rewrite_subject, strip_fields};

use crate::client::FhirClient;
use crate::error::MigrateError;
use crate::pager::Pager;
use crate::report::{SkipScope, TransferSummary};

/// LOINC code for total cholesterol
pub const LOINC_TOTAL_CHOLESTEROL: &str = "2093-3";

/// LOINC code for HDL cholesterol
pub const LOINC_HDL_CHOLESTEROL: &str = "2085-9";

const OBSERVATION_STRIP: &[&str] = &["encounter"];
const MEDICATION_STRIP: &[&str] = &["encounter", "reasonReference", "requester"];

/// How transformed resources are sent to the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    /// One transaction holding every resource, sent after the last page
    Batch,
    /// One single-entry transaction per resource
    PerResource,
}

/// What a malformed resource or failed submission takes down with it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureScope {
    /// Abort the whole run
    Run,
    /// Drop the page the resource came from
    Page,
    /// Drop only that resource
    Resource,
}

/// Patient-scoped resource kinds, in transfer order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Observations,
    TotalCholesterol,
    HdlCholesterol,
    MedicationRequests,
}

impl TransferKind {
    pub const ALL: [TransferKind; 4] = [
        TransferKind::Observations,
        TransferKind::TotalCholesterol,
        TransferKind::HdlCholesterol,
        TransferKind::MedicationRequests,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TransferKind::Observations => "Observation",
            TransferKind::TotalCholesterol => "TotalCholesterol",
            TransferKind::HdlCholesterol => "HdlCholesterol",
            TransferKind::MedicationRequests => "MedicationRequest",
        }
    }

    /// Plan for copying this kind for source patient `source_id`.
    ///
    /// Batch plans only POST when at least one resource was collected, so a
    /// patient with no records of a kind sends nothing for it. Cholesterol
    /// Observations drop `encounter` like every other copied Observation:
    /// encounters are not migrated, so the reference would dangle on the
    /// destination.
    pub fn plan(self, source_id: &str) -> TransferPlan {
        let subject = ("subject".to_string(), source_id.to_string());
        match self {
            TransferKind::Observations => TransferPlan {
                label: self.label(),
                resource_type: "Observation",
                query: vec![subject],
                strip: OBSERVATION_STRIP,
                mode: SubmitMode::Batch,
                failure: FailureScope::Run,
            },
            TransferKind::TotalCholesterol | TransferKind::HdlCholesterol => {
                let code = if self == TransferKind::TotalCholesterol {
                    LOINC_TOTAL_CHOLESTEROL
                } else {
                    LOINC_HDL_CHOLESTEROL
                };
                TransferPlan {
                    label: self.label(),
                    resource_type: "Observation",
                    query: vec![subject, ("code".to_string(), code.to_string())],
                    strip: OBSERVATION_STRIP,
                    mode: SubmitMode::PerResource,
                    failure: FailureScope::Resource,
                }
            }
            TransferKind::MedicationRequests => TransferPlan {
                label: self.label(),
                resource_type: "MedicationRequest",
                query: vec![subject],
                strip: MEDICATION_STRIP,
                mode: SubmitMode::Batch,
                failure: FailureScope::Page,
            },
        }
    }
}

/// Parameters of one paged transform-and-submit
#[derive(Debug, Clone)]
pub struct TransferPlan {
    pub label: &'static str,
    pub resource_type: &'static str,
    pub query: Vec<(String, String)>,
    pub strip: &'static [&'static str],
    pub mode: SubmitMode,
    pub failure: FailureScope,
}

impl TransferPlan {
    /// Rewrite one search entry into a POST entry for `destination_id`
    pub fn prepare(
        &self,
        entry: BundleEntry,
        destination_id: &str,
    ) -> Result<BundleEntry, FhirError> {
        let mut resource = entry
            .resource
            .ok_or_else(|| FhirError::MissingField("entry.resource".to_string()))?;
        rewrite_subject(&mut resource, destination_id)?;
        strip_fields(&mut resource, self.strip)?;
        Ok(BundleEntry::post(self.resource_type, resource))
    }

    /// Rewrite a whole page, failing on the first malformed entry
    fn prepare_page(
        &self,
        entries: Vec<BundleEntry>,
        destination_id: &str,
    ) -> Result<Vec<BundleEntry>, FhirError> {
        entries
            .into_iter()
            .map(|e| self.prepare(e, destination_id))
            .collect()
    }
}

/// Run `plan` against `source`, submitting to `destination`
pub async fn run(
    source: &FhirClient,
    destination: &FhirClient,
    plan: &TransferPlan,
    destination_id: &str,
) -> Result<TransferSummary, MigrateError> {
    let query: Vec<(&str, &str)> = plan
        .query
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    let mut pager = Pager::new(source.search_url(plan.resource_type, &query)?);
    let mut batch = Bundle::transaction();
    let mut summary = TransferSummary::new(plan.label);

    while let Some(page) = pager.next_page(source).await {
        let page = match page {
            Ok(page) => page,
            Err(failed) => {
                summary.skip(SkipScope::Page, failed.url, failed.error);
                continue;
            }
        };
        summary.pages += 1;
        tracing::debug!(
            kind = plan.label,
            url = %page.url,
            entries = page.bundle.entry.len(),
            "Fetched page"
        );

        let prepared = match plan.failure {
            FailureScope::Page => match plan.prepare_page(page.bundle.entry, destination_id) {
                Ok(entries) => entries,
                Err(e) => {
                    summary.skip(SkipScope::Page, page.url, e);
                    continue;
                }
            },
            FailureScope::Run => plan.prepare_page(page.bundle.entry, destination_id)?,
            FailureScope::Resource => {
                let mut entries = Vec::new();
                for entry in page.bundle.entry {
                    let id = entry.resource_id().unwrap_or("<no id>").to_string();
                    match plan.prepare(entry, destination_id) {
                        Ok(prepared) => entries.push(prepared),
                        Err(e) => summary.skip(SkipScope::Resource, id, e),
                    }
                }
                entries
            }
        };

        match plan.mode {
            SubmitMode::Batch => batch.entry.extend(prepared),
            SubmitMode::PerResource => {
                for entry in prepared {
                    let id = entry.resource_id().unwrap_or("<no id>").to_string();
                    let mut single = Bundle::transaction();
                    single.entry.push(entry);
                    match destination.transaction(&single).await {
                        Ok(_) => summary.submitted += 1,
                        Err(e) if plan.failure == FailureScope::Run => return Err(e),
                        Err(e) => summary.skip(SkipScope::Resource, id, e),
                    }
                }
            }
        }
    }

    if plan.mode == SubmitMode::Batch && !batch.entry.is_empty() {
        let count = batch.entry.len();
        match destination.transaction(&batch).await {
            Ok(_) => summary.submitted += count,
            Err(e) if plan.failure == FailureScope::Run => return Err(e),
            Err(e) => summary.skip(
                SkipScope::Batch,
                format!("{} {} entries", count, plan.resource_type),
                e,
            ),
        }
    }

    tracing::info!(
        kind = plan.label,
        pages = summary.pages,
        submitted = summary.submitted,
        skipped = summary.skipped.len(),
        "Transfer complete"
    );
    Ok(summary)
}
