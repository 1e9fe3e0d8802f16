//! fhir-migrate: copy patient records between FHIR servers.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fhir_migrate::Migration;
use fhir_migrate::config::{Cli, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(cli.log_json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.log_json).then(tracing_subscriber::fmt::layer))
        .init();

    let config = Config::from(&cli);
    tracing::info!(
        source = %config.source_url,
        destination = %config.destination_url,
        patients = config.patient_ids.len(),
        "Starting migration"
    );

    let migration = match Migration::new(config) {
        Ok(migration) => migration,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create HTTP clients");
            return ExitCode::FAILURE;
        }
    };

    match migration.run().await {
        Ok(report) => {
            if cli.log_json {
                match serde_json::to_string(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => tracing::error!(error = %e, "Failed to serialize report"),
                }
            } else {
                print!("{}", report);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Migration aborted");
            ExitCode::FAILURE
        }
    }
}
