//! `licensebom detectors` command handler

use std::io::Write;

use serde::Serialize;

use licensebom_core::config::LicensebomConfig;
use licensebom_sbom::{Detector, DetectorRole, SbomBuilderConfig, SbomPipelineBuilder};

use crate::cli::DetectorsArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `detectors` command.
///
/// Builds the pipeline from the effective configuration so that invalid
/// glob patterns surface here exactly as they would during generation.
pub fn execute(
    _args: DetectorsArgs,
    config: &LicensebomConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let builder_config = SbomBuilderConfig::from_core(&config.sbom)?;
    let pipeline = SbomPipelineBuilder::new().config(builder_config).build()?;

    let report = DetectorListReport {
        detectors: pipeline
            .registry()
            .detectors()
            .iter()
            .map(|d| Detector::clone(d))
            .collect(),
    };

    writer.render(&report)?;
    Ok(())
}

/// Active detectors in first-match priority order.
#[derive(Serialize)]
pub struct DetectorListReport {
    pub detectors: Vec<Detector>,
}

/// Role label and ecosystem column for the text table.
fn role_columns(role: DetectorRole) -> (&'static str, Option<String>) {
    match role {
        DetectorRole::Lockfile(eco) => ("lockfile", Some(eco.to_string())),
        DetectorRole::LicenseFile => ("license_file", None),
        DetectorRole::Manifest => ("manifest", None),
    }
}

impl Render for DetectorListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Detectors ({} active):", self.detectors.len())?;
        writeln!(w)?;

        if self.detectors.is_empty() {
            writeln!(w, "  No detectors registered.")?;
            return Ok(());
        }

        writeln!(
            w,
            "  {:<4} {:<20} {:<10} {:<14} {:<10} Patterns",
            "#", "Name", "Kind", "Role", "Ecosystem"
        )?;
        writeln!(w, "  {}", "-".repeat(80))?;

        for (idx, detector) in self.detectors.iter().enumerate() {
            let (role, ecosystem) = role_columns(detector.role);
            writeln!(
                w,
                "  {:<4} {:<20} {:<10} {:<14} {:<10} {}",
                idx + 1,
                detector.name.bold(),
                detector.kind,
                role,
                ecosystem.as_deref().unwrap_or("-"),
                detector.patterns.join(", ")
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use licensebom_sbom::DetectorRegistry;

    fn default_report() -> DetectorListReport {
        DetectorListReport {
            detectors: DetectorRegistry::with_defaults()
                .detectors()
                .iter()
                .map(|d| Detector::clone(d))
                .collect(),
        }
    }

    #[test]
    fn test_default_entries_in_priority_order() {
        let report = default_report();
        let names: Vec<&str> = report.detectors.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["npm-lockfile", "license-file"]);
        assert_eq!(
            role_columns(report.detectors[0].role),
            ("lockfile", Some("npm".to_owned()))
        );
        assert_eq!(role_columns(report.detectors[1].role), ("license_file", None));
    }

    #[test]
    fn test_render_text_table() {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        default_report()
            .render_text(&mut buffer)
            .expect("rendering should succeed");
        let output = String::from_utf8(buffer).expect("valid UTF-8");

        assert!(output.contains("Detectors (2 active)"));
        assert!(output.contains("**/package-lock.json"));
        assert!(output.contains("license_file"));
    }

    #[test]
    fn test_render_text_empty() {
        let report = DetectorListReport {
            detectors: Vec::new(),
        };
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("rendering should succeed");
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("No detectors registered."));
    }

    #[test]
    fn test_json_omits_missing_ecosystem() {
        let json = serde_json::to_value(default_report()).expect("serialize");
        assert_eq!(json["detectors"][0]["role"], "lockfile");
        assert_eq!(json["detectors"][0]["ecosystem"], "npm");
        assert_eq!(json["detectors"][1]["role"], "license_file");
        assert!(json["detectors"][1].get("ecosystem").is_none());
    }

    #[test]
    fn test_execute_rejects_invalid_custom_pattern() {
        let mut config = LicensebomConfig::default();
        config.sbom.detectors.push(licensebom_core::config::DetectorConfig {
            name: "broken".to_owned(),
            patterns: vec!["**/[".to_owned()],
            kind: "file".to_owned(),
            role: "manifest".to_owned(),
            ecosystem: None,
        });
        let writer = OutputWriter::new(crate::cli::OutputFormat::Json);
        let err = execute(DetectorsArgs { json: true }, &config, &writer)
            .expect_err("unclosed class should fail");
        assert_eq!(err.exit_code(), 2);
    }
}
