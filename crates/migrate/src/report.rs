//! Run report: what was submitted and what was skipped

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Granularity at which work was dropped
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SkipScope {
    Page,
    Resource,
    /// A whole batch transaction the destination refused
    Batch,
}

/// A page or resource left out of the migration, with the reason
#[derive(Debug, Clone, Serialize)]
pub struct Skipped {
    pub scope: SkipScope,
    /// Page URL, resource id or batch description
    pub location: String,
    pub reason: String,
}

/// Outcome of one resource-kind transfer for one patient
#[derive(Debug, Clone, Serialize)]
pub struct TransferSummary {
    pub kind: String,
    pub pages: usize,
    pub submitted: usize,
    pub skipped: Vec<Skipped>,
}

impl TransferSummary {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            pages: 0,
            submitted: 0,
            skipped: Vec::new(),
        }
    }

    pub fn skip(
        &mut self,
        scope: SkipScope,
        location: impl Into<String>,
        reason: impl fmt::Display,
    ) {
        let skipped = Skipped {
            scope,
            location: location.into(),
            reason: reason.to_string(),
        };
        tracing::warn!(
            kind = %self.kind,
            scope = ?skipped.scope,
            location = %skipped.location,
            reason = %skipped.reason,
            "Skipped"
        );
        self.skipped.push(skipped);
    }
}

/// Everything copied for one source patient
#[derive(Debug, Clone, Serialize)]
pub struct PatientReport {
    pub source_id: String,
    pub destination_id: String,
    pub transfers: Vec<TransferSummary>,
}

/// Report of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub value_set_seeded: bool,
    pub patients: Vec<PatientReport>,
}

impl MigrationReport {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            value_set_seeded: false,
            patients: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn total_submitted(&self) -> usize {
        self.patients
            .iter()
            .flat_map(|p| &p.transfers)
            .map(|t| t.submitted)
            .sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.patients
            .iter()
            .flat_map(|p| &p.transfers)
            .map(|t| t.skipped.len())
            .sum()
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Migrated {} patients ({} resources submitted, {} skipped), ValueSet seeded: {}",
            self.patients.len(),
            self.total_submitted(),
            self.total_skipped(),
            self.value_set_seeded
        )?;
        for patient in &self.patients {
            writeln!(
                f,
                "  Patient/{} -> Patient/{}",
                patient.source_id, patient.destination_id
            )?;
            for t in &patient.transfers {
                writeln!(
                    f,
                    "    {:<20} {:>4} submitted {:>3} skipped",
                    t.kind,
                    t.submitted,
                    t.skipped.len()
                )?;
                for s in &t.skipped {
                    writeln!(f, "      - {}: {}", s.location, s.reason)?;
                }
            }
        }
        if let Some(finished) = self.finished_at {
            let elapsed = finished - self.started_at;
            writeln!(
                f,
                "Elapsed: {}.{:03}s",
                elapsed.num_seconds(),
                elapsed.num_milliseconds() % 1000
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_span_all_patients() {
        let mut meds = TransferSummary::new("MedicationRequest");
        meds.submitted = 3;
        meds.skip(
            SkipScope::Page,
            "http://src/MedicationRequest?page=2",
            "Missing field: subject",
        );

        let mut obs = TransferSummary::new("Observation");
        obs.submitted = 4;

        let mut report = MigrationReport::start();
        report.patients.push(PatientReport {
            source_id: "422".to_string(),
            destination_id: "99".to_string(),
            transfers: vec![obs, meds],
        });
        report.finish();

        assert_eq!(report.total_submitted(), 7);
        assert_eq!(report.total_skipped(), 1);

        let text = report.to_string();
        assert!(text.contains("Patient/422 -> Patient/99"));
        assert!(text.contains("Missing field: subject"));
    }
}
