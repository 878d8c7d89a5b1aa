//! Encounter pipeline - Development Tools

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use encounter_tools::build::{run_build, BuildOptions};
use encounter_tools::validate::validate_settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "encounter-tools")]
#[command(about = "Development tools for the encounter pipeline")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one encounter build and print the result as JSON
    Build {
        /// Settings file (.json or .ron)
        #[arg(long, default_value = "settings.json")]
        settings: PathBuf,
        /// Contract override JSON
        #[arg(long)]
        contract: PathBuf,
        /// Scene JSON
        #[arg(long)]
        scene: PathBuf,
        /// RNG seed for reproducible builds
        #[arg(long)]
        seed: Option<u64>,
        /// Simulated date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Check a settings file
    Validate {
        /// Settings file (.json or .ron)
        #[arg(long, default_value = "settings.json")]
        settings: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match cli.command {
        Commands::Build {
            settings,
            contract,
            scene,
            seed,
            date,
        } => {
            let options = BuildOptions {
                settings,
                contract,
                scene,
                seed,
                date,
            };
            let report = run_build(&options)
                .and_then(|report| Ok(serde_json::to_string_pretty(&report)?));
            match report {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    tracing::error!("Build failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Validate { settings } => {
            tracing::info!("Validating settings in: {}", settings.display());
            match validate_settings(&settings) {
                Ok(problems) if problems.is_empty() => tracing::info!("Validation passed"),
                Ok(problems) => {
                    tracing::error!("Validation found {} problem(s)", problems.len());
                    std::process::exit(1);
                }
                Err(e) => {
                    tracing::error!("Validation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}
