//! licensebom -- license-focused SBOM generator.
//!
//! Scans a project tree for npm lockfiles and writes one SBOM document per
//! lockfile. SBOM documents go to stdout (or `-o FILE`); logs go to stderr.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;

use licensebom_core::config::{GeneralConfig, VALID_LOG_LEVELS};

use cli::{Cli, Commands, LogFormat, OutputFormat};
use error::CliError;
use output::OutputWriter;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {}", err);
        std::process::exit(err.exit_code());
    }
}

async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    let config_path = commands::config::resolve_config_path(cli.config.as_deref());
    let loaded = commands::config::load_effective(config_path.as_deref()).await;

    if !cli.no_logging {
        let mut general = loaded
            .as_ref()
            .map(|config| config.general.clone())
            .unwrap_or_default();
        apply_log_overrides(&mut general, cli.log_level.as_deref(), cli.log_format)?;
        logging::init_tracing(&general).map_err(|e| CliError::Config(e.to_string()))?;
    }

    match cli.command {
        Some(Commands::Config(args)) => {
            let writer = OutputWriter::new(OutputFormat::from_json_flag(args.json));
            commands::config::execute(args, config_path.as_deref(), loaded, &writer)
        }
        Some(Commands::Detectors(args)) => {
            let config = loaded?;
            let writer = OutputWriter::new(OutputFormat::from_json_flag(args.json));
            commands::detectors::execute(args, &config, &writer)
        }
        None => {
            let config = loaded?;
            commands::generate::execute(cli.generate, &config).await
        }
    }
}

/// Apply `--log-level` / `--log-format` on top of the loaded `[general]` section.
fn apply_log_overrides(
    general: &mut GeneralConfig,
    level: Option<&str>,
    format: Option<LogFormat>,
) -> Result<(), CliError> {
    if let Some(level) = level {
        let level = level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(CliError::Config(format!(
                "invalid --log-level '{}': must be one of: {}",
                level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }
        general.log_level = level;
    }
    if let Some(format) = format {
        general.log_format = format.as_str().to_owned();
    }
    Ok(())
}
