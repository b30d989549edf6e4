//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// licensebom -- license-focused SBOM generator.
///
/// Without a subcommand, scans INPUT_SRC and writes one SBOM document per
/// discovered lockfile.
#[derive(Parser, Debug)]
#[command(
    name = "licensebom",
    version,
    about,
    long_about = None,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Path to the licensebom.toml configuration file.
    ///
    /// When omitted, ./licensebom.toml is used if present.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Override log format.
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// Disable logging entirely.
    #[arg(long, global = true)]
    pub no_logging: bool,

    #[command(flatten)]
    pub generate: GenerateArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Machine-readable JSON lines.
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

impl LogFormat {
    /// Name used in the `[general]` config section.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
        }
    }
}

/// Supported output formats for informational subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputFormat {
    /// Pick JSON when `json` is set, text otherwise.
    pub fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the active detectors (built-in and configured).
    Detectors(DetectorsArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- generate (default) ----

/// Generate SBOM documents for a project tree.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Project directory to scan (archives and URLs are recognised but not supported).
    #[arg(value_name = "INPUT_SRC", default_value = ".")]
    pub input: String,

    /// Write documents to this file instead of stdout.
    #[arg(short, long, value_name = "OUTPUT_DST")]
    pub output: Option<PathBuf>,

    /// Write single-line JSON instead of pretty-printed JSON.
    #[arg(long)]
    pub compact: bool,

    /// Keep only the first record per (name, version).
    #[arg(long)]
    pub dedupe: bool,
}

// ---- detectors ----

/// List the active detectors.
#[derive(Args, Debug)]
pub struct DetectorsArgs {
    /// Output JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

// ---- config ----

/// Manage licensebom configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Output JSON instead of text.
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, sbom).
        #[arg(long)]
        section: Option<String>,
    },
}
