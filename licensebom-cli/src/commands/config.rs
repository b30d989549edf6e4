//! `licensebom config` command handler

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use licensebom_core::config::LicensebomConfig;
use licensebom_core::error::LicensebomError;
use licensebom_sbom::{SbomBuilderConfig, SbomPipelineBuilder};

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Configuration file picked up from the working directory when `-c` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "licensebom.toml";

/// Resolve which configuration file to load.
///
/// An explicit path always wins (and must exist). Otherwise `./licensebom.toml`
/// is used when present, and `None` means defaults plus environment overrides.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
        fallback.is_file().then_some(fallback)
    })
}

/// Load the effective configuration (file + env overrides + defaults).
pub async fn load_effective(path: Option<&Path>) -> Result<LicensebomConfig, LicensebomError> {
    match path {
        Some(path) => LicensebomConfig::load(path).await,
        None => LicensebomConfig::from_env(),
    }
}

fn describe_source(path: Option<&Path>) -> String {
    path.map_or_else(
        || "(defaults + environment)".to_owned(),
        |p| p.display().to_string(),
    )
}

/// Execute the `config` command.
///
/// `loaded` is the result of [`load_effective`] for `config_path`; load
/// failures are reported by `validate` rather than aborting up front.
pub fn execute(
    args: ConfigArgs,
    config_path: Option<&Path>,
    loaded: Result<LicensebomConfig, LicensebomError>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, loaded, writer),
        ConfigAction::Show { section } => execute_show(config_path, loaded, section, writer),
    }
}

/// Execute the config validate subcommand.
///
/// Beyond the file-level checks, the SBOM section is converted into a pipeline
/// configuration and every detector pattern is compiled.
///
/// # Errors
///
/// Returns `CliError::Config` if validation fails (parse errors, invalid values, bad patterns).
fn execute_validate(
    config_path: Option<&Path>,
    loaded: Result<LicensebomConfig, LicensebomError>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let source = describe_source(config_path);
    info!(source = %source, "validating configuration");

    let errors = match loaded {
        Ok(config) => pipeline_errors(&config),
        Err(e) => vec![e.to_string()],
    };

    let report = ConfigValidationReport {
        source,
        valid: errors.is_empty(),
        errors,
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

/// Checks that only the SBOM crate can perform.
fn pipeline_errors(config: &LicensebomConfig) -> Vec<String> {
    let result = SbomBuilderConfig::from_core(&config.sbom)
        .and_then(|builder_config| SbomPipelineBuilder::new().config(builder_config).build());
    match result {
        Ok(_) => Vec::new(),
        Err(e) => vec![e.to_string()],
    }
}

/// Execute the config show subcommand.
///
/// # Errors
///
/// Returns `CliError::Config` if loading fails or `CliError::Command` if section name is invalid.
fn execute_show(
    config_path: Option<&Path>,
    loaded: Result<LicensebomConfig, LicensebomError>,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = loaded?;
    let source = describe_source(config_path);
    info!(source = %source, "showing configuration");

    let report = build_config_report(&config, source, section)?;
    writer.render(&report)?;

    Ok(())
}

fn build_config_report(
    config: &LicensebomConfig,
    source: String,
    section: Option<String>,
) -> Result<ConfigReport, CliError> {
    match section.as_deref() {
        None => section_report(config, source, None),
        Some("general") => section_report(&config.general, source, Some("general".to_owned())),
        Some("sbom") => section_report(&config.sbom, source, Some("sbom".to_owned())),
        Some(other) => Err(CliError::Command(format!(
            "unknown section: {} (expected: general, sbom)",
            other
        ))),
    }
}

fn section_report<T: Serialize>(
    value: &T,
    source: String,
    section: Option<String>,
) -> Result<ConfigReport, CliError> {
    Ok(ConfigReport {
        source,
        section,
        config: serde_json::to_value(value)?,
        config_toml: toml::to_string_pretty(value)
            .unwrap_or_else(|e| format!("(serialization error: {})", e)),
    })
}

/// Configuration display report.
///
/// JSON output carries the configuration as an object; text output prints TOML.
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration source (file path or defaults)
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Effective configuration values
    pub config: serde_json::Value,
    /// Serialized TOML configuration
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration source (file path or defaults)
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            writeln!(w)?;
            writeln!(w, "  Errors:")?;
            for error in &self.errors {
                writeln!(w, "    - {}", error)?;
            }
        }

        Ok(())
    }
}
