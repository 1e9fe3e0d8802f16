//! Migration configuration

use std::time::Duration;

use clap::Parser;

/// Source server the records are copied from
pub const DEFAULT_SOURCE_URL: &str = "https://api.logicahealth.org/stratfhireducation/open";

/// Source patients copied when no `--patient` is given
pub const DEFAULT_PATIENT_IDS: [&str; 10] =
    ["422", "378", "338", "672", "260", "588", "538", "191", "467", "3"];

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Command line interface
#[derive(Debug, Parser)]
#[command(name = "fhir-migrate")]
#[command(about = "Copy patient records from one FHIR server to another")]
#[command(version)]
pub struct Cli {
    /// Destination FHIR base URL (transaction endpoint)
    pub destination: String,

    /// Source FHIR base URL
    #[arg(short, long, env = "FHIR_SOURCE_URL", default_value = DEFAULT_SOURCE_URL)]
    pub source: String,

    /// Source patient id to copy (repeatable)
    #[arg(short, long = "patient")]
    pub patients: Vec<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Emit JSON logs and a JSON report
    #[arg(long)]
    pub log_json: bool,
}

/// Migration configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub source_url: String,
    pub destination_url: String,
    pub patient_ids: Vec<String>,
    pub timeout: Duration,
}

impl Config {
    /// Configuration with default source, patients and timeout
    pub fn new(destination_url: impl Into<String>) -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            destination_url: destination_url.into(),
            patient_ids: DEFAULT_PATIENT_IDS.iter().map(|s| s.to_string()).collect(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        let mut config = Config::new(cli.destination.clone());
        config.source_url = cli.source.clone();
        if !cli.patients.is_empty() {
            config.patient_ids = cli.patients.clone();
        }
        config.timeout = Duration::from_secs(cli.timeout_secs);
        config
    }
}
