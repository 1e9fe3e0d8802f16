//! fhir-migrate library crate
//!
//! Exposes [`Migration`] and `config` for integration tests.
//! The actual binary entrypoint is in `main.rs`.

pub mod client;
pub mod config;
mod error;
pub mod pager;
pub mod patient;
pub mod report;
pub mod transfer;
pub mod valueset;

pub use client::FhirClient;
pub use config::Config;
pub use error::MigrateError;
pub use patient::PatientMapping;
pub use report::{MigrationReport, PatientReport, SkipScope, Skipped, TransferSummary};
pub use transfer::{FailureScope, SubmitMode, TransferKind, TransferPlan};

/// A configured copy from one FHIR server to another
pub struct Migration {
    config: Config,
    source: FhirClient,
    destination: FhirClient,
}

impl Migration {
    pub fn new(config: Config) -> Result<Self, MigrateError> {
        let source = FhirClient::new(&config.source_url, config.timeout)?;
        let destination = FhirClient::new(&config.destination_url, config.timeout)?;
        Ok(Self {
            config,
            source,
            destination,
        })
    }

    /// Seed the ValueSet, then copy every configured patient in order.
    ///
    /// A rejected ValueSet seed is logged and recorded in the report.
    /// Returns on the first error from a patient copy or Observation transfer.
    pub async fn run(&self) -> Result<MigrationReport, MigrateError> {
        let mut report = MigrationReport::start();

        match valueset::seed_value_set(&self.destination).await {
            Ok(()) => report.value_set_seeded = true,
            Err(e) => tracing::warn!(error = %e, "ValueSet seed rejected, continuing"),
        }

        for source_id in &self.config.patient_ids {
            tracing::info!(patient = %source_id, "Transferring patient");
            report.patients.push(self.transfer_patient(source_id).await?);
        }

        report.finish();
        Ok(report)
    }

    /// Copy one patient and every patient-scoped kind that references it
    pub async fn transfer_patient(&self, source_id: &str) -> Result<PatientReport, MigrateError> {
        let mapping =
            patient::transfer_patient(&self.source, &self.destination, source_id).await?;

        let mut transfers = Vec::with_capacity(TransferKind::ALL.len());
        for kind in TransferKind::ALL {
            let plan = kind.plan(&mapping.source_id);
            transfers.push(
                transfer::run(&self.source, &self.destination, &plan, &mapping.destination_id)
                    .await?,
            );
        }

        Ok(PatientReport {
            source_id: mapping.source_id,
            destination_id: mapping.destination_id,
            transfers,
        })
    }
}
