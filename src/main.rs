mod cli;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use petdiag::diagnosis::{DetailsRequest, PetProfile};
use petdiag::{DiagnosisService, Settings};

use crate::cli::{Cli, Commands};
use crate::ui::Console;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut settings = Settings::load(cli.config.as_deref())?;
    let console = Console::new();

    match cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
        static_dir: None,
    }) {
        Commands::Serve {
            host,
            port,
            static_dir,
        } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            if let Some(static_dir) = static_dir {
                settings.server.static_dir = static_dir;
            }

            console.banner();
            console.info(&format!(
                "Static files: {}",
                settings.server.static_dir.display()
            ));
            let service = DiagnosisService::from_settings(&settings);
            if !service.is_configured() {
                console.warn(&format!(
                    "{} is not set; /diagnose and /veterinary-details will answer 503",
                    settings.provider.api_key_env
                ));
            }

            petdiag::server::serve(
                &settings.server.host,
                settings.server.port,
                &settings.server.static_dir,
                service,
            )
            .await?;
        }
        Commands::Config { init } => {
            if init {
                let path = match cli.config {
                    Some(path) => path,
                    None => Settings::config_path()?,
                };
                if Settings::write_default(&path)? {
                    console.success(&format!("Wrote default config to {}", path.display()));
                } else {
                    console.warn(&format!("{} already exists, left unchanged", path.display()));
                }
            }
            console.show_config(&settings);
        }
        Commands::Diagnose { file } => {
            let content = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let value: serde_json::Value =
                serde_json::from_str(&content).context("Profile file is not valid JSON")?;
            let profile =
                PetProfile::from_value(value).context("Profile file must hold a JSON object")?;

            let service = DiagnosisService::from_settings(&settings);
            let report = service.diagnose(&profile).await?;
            console.success(&report.diagnosis);
            console.json(&report);
        }
        Commands::Details {
            diagnosis,
            species,
            breed,
        } => {
            let service = DiagnosisService::from_settings(&settings);
            let report = service
                .veterinary_details(DetailsRequest {
                    diagnosis: Some(diagnosis),
                    species: Some(species),
                    breed: Some(breed),
                })
                .await?;
            console.json(&report);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "petdiag=debug"
    } else {
        "petdiag=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
