//! Default command: generate SBOM documents for a project tree

use std::io::Write;

use tracing::info;

use licensebom_core::config::LicensebomConfig;
use licensebom_sbom::{
    NameCollision, OutputSink, OutputStyle, PipelineReport, SbomBuilderConfig, SbomPipelineBuilder,
};

use crate::cli::GenerateArgs;
use crate::error::CliError;

/// Execute the default generate command.
///
/// Documents are written even when some lockfiles fail; the failures are
/// summarised on stderr and reported through `CliError::Artifacts`.
pub async fn execute(args: GenerateArgs, config: &LicensebomConfig) -> Result<(), CliError> {
    let mut builder_config = SbomBuilderConfig::from_core(&config.sbom)?;
    if args.dedupe {
        builder_config.name_collision = NameCollision::Dedupe;
    }

    let pipeline = SbomPipelineBuilder::new().config(builder_config).build()?;

    info!(input = %args.input, "starting SBOM generation");

    let input = args.input.clone();
    let report = tokio::task::spawn_blocking(move || pipeline.run_source(&input))
        .await
        .map_err(|e| CliError::Command(format!("generation task failed: {}", e)))??;

    let style = if args.compact {
        OutputStyle::Compact
    } else {
        OutputStyle::Pretty
    };
    let sink = OutputSink::from_option(args.output);
    sink.write_all(&report.documents, style)?;

    info!(
        documents = report.documents.len(),
        dependencies = report.dependency_count(),
        failures = report.failures.len(),
        output = %sink,
        "SBOM generation finished"
    );

    if report.has_failures() {
        let stderr = std::io::stderr();
        let mut handle = stderr.lock();
        write_failure_summary(&report, &mut handle)?;
        return Err(CliError::Artifacts {
            failed: report.failures.len(),
        });
    }

    Ok(())
}

/// Print one line per failed artifact.
fn write_failure_summary(report: &PipelineReport, w: &mut dyn Write) -> std::io::Result<()> {
    use colored::Colorize;

    writeln!(
        w,
        "{} {} artifact(s) could not be processed ({} document(s) written):",
        "warning:".yellow().bold(),
        report.failures.len(),
        report.documents.len()
    )?;
    for failure in &report.failures {
        writeln!(w, "  {} {}", failure.path.bold(), failure.error)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use licensebom_sbom::{ArtifactFailure, SbomBuilderError};

    #[test]
    fn test_failure_summary_lists_every_path() {
        colored::control::set_override(false);
        let report = PipelineReport {
            failures: vec![ArtifactFailure {
                path: "legacy/package-lock.json".to_owned(),
                error: SbomBuilderError::UnsupportedSchema {
                    path: "legacy/package-lock.json".to_owned(),
                    version: 1,
                },
            }],
            ..PipelineReport::default()
        };

        let mut buffer = Vec::new();
        write_failure_summary(&report, &mut buffer).expect("summary should render");
        let output = String::from_utf8(buffer).expect("valid UTF-8");

        assert!(output.contains("1 artifact(s) could not be processed (0 document(s) written)"));
        assert!(output.contains("legacy/package-lock.json"));
        assert!(output.contains("lockfileVersion 1"));
    }

    #[tokio::test]
    async fn test_execute_writes_documents_to_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("package-lock.json"),
            r#"{"name":"demo","version":"1.0.0","lockfileVersion":3,
                "packages":{"":{"license":"MIT","dependencies":{"a":"^1"}},
                "node_modules/a":{"version":"1.0.0","license":"ISC"}}}"#,
        )
        .expect("write lockfile");
        let out = dir.path().join("sbom.json");

        let args = GenerateArgs {
            input: dir.path().display().to_string(),
            output: Some(out.clone()),
            compact: true,
            dedupe: false,
        };
        execute(args, &LicensebomConfig::default())
            .await
            .expect("generation should succeed");

        let written = std::fs::read_to_string(&out).expect("read output");
        let doc: serde_json::Value =
            serde_json::from_str(written.trim_end()).expect("one compact document");
        assert_eq!(doc["name"], "demo");
        assert_eq!(doc["directDependencies"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_execute_reports_artifact_failures() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("package-lock.json"), "{ not json").expect("write");
        let out = dir.path().join("sbom.json");

        let args = GenerateArgs {
            input: dir.path().display().to_string(),
            output: Some(out.clone()),
            compact: false,
            dedupe: false,
        };
        let err = execute(args, &LicensebomConfig::default())
            .await
            .expect_err("malformed lockfile should be reported");

        assert_eq!(err.exit_code(), 3);
        assert!(out.exists(), "output is still written");
    }

    #[tokio::test]
    async fn test_execute_missing_root_is_discovery_error() {
        let args = GenerateArgs {
            input: "/definitely/not/a/real/licensebom/root".to_owned(),
            output: None,
            compact: false,
            dedupe: false,
        };
        let err = execute(args, &LicensebomConfig::default())
            .await
            .expect_err("missing root should fail");
        assert_eq!(err.exit_code(), 4);
    }
}
