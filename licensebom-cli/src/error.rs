//! CLI-specific error types and exit code mapping

use licensebom_core::error::{LicensebomError, SbomError};
use licensebom_sbom::SbomBuilderError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// Documents were written but some lockfiles could not be processed.
    #[error("{failed} artifact(s) failed")]
    Artifacts { failed: usize },

    /// The input tree could not be resolved or walked.
    #[error("discovery error: {0}")]
    Discovery(String),

    /// SBOM documents could not be serialised or written.
    #[error("output error: {0}")]
    Output(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                   |
    /// |------|-------------------------------------------|
    /// | 0    | Success                                   |
    /// | 1    | General / command error                   |
    /// | 2    | Configuration error                       |
    /// | 3    | Some lockfiles failed (documents written) |
    /// | 4    | Input could not be resolved or walked     |
    /// | 10   | IO / output error                         |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Artifacts { .. } => 3,
            Self::Discovery(_) => 4,
            Self::Output(_) | Self::JsonSerialize(_) | Self::Io(_) => 10,
            Self::Command(_) => 1,
        }
    }
}

impl From<LicensebomError> for CliError {
    fn from(e: LicensebomError) -> Self {
        let msg = e.to_string();
        match e {
            LicensebomError::Config(_) => Self::Config(msg),
            LicensebomError::Sbom(SbomError::Discovery(_)) => Self::Discovery(msg),
            LicensebomError::Sbom(SbomError::Serialization(_)) => Self::Output(msg),
            LicensebomError::Sbom(SbomError::Setup(_)) => Self::Config(msg),
            LicensebomError::Sbom(SbomError::Extraction(_)) => Self::Command(msg),
            LicensebomError::Io(io) => Self::Io(io),
        }
    }
}

impl From<SbomBuilderError> for CliError {
    fn from(e: SbomBuilderError) -> Self {
        let msg = e.to_string();
        match e {
            SbomBuilderError::Config { .. } | SbomBuilderError::InvalidPattern { .. } => {
                Self::Config(msg)
            }
            SbomBuilderError::Discovery { .. } | SbomBuilderError::UnsupportedSource { .. } => {
                Self::Discovery(msg)
            }
            SbomBuilderError::Serialization { .. } => Self::Output(msg),
            _ => Self::Command(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_config_error() {
        let err = CliError::Config("test error".to_owned());
        assert_eq!(err.exit_code(), 2, "config error should return exit code 2");
    }

    #[test]
    fn test_exit_code_artifacts() {
        let err = CliError::Artifacts { failed: 2 };
        assert_eq!(err.exit_code(), 3, "partial failure should return exit code 3");
        assert_eq!(err.to_string(), "2 artifact(s) failed");
    }

    #[test]
    fn test_exit_code_discovery() {
        let err = CliError::Discovery("permission denied".to_owned());
        assert_eq!(err.exit_code(), 4, "discovery error should return exit code 4");
    }

    #[test]
    fn test_exit_code_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = CliError::Io(io_err);
        assert_eq!(err.exit_code(), 10, "io error should return exit code 10");
    }

    #[test]
    fn test_exit_code_output_error() {
        let err = CliError::Output("broken pipe".to_owned());
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn test_exit_code_command_error() {
        let err = CliError::Command("test error".to_owned());
        assert_eq!(err.exit_code(), 1, "command error should return exit code 1");
    }

    #[test]
    fn test_exit_code_json_serialize_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid json")
            .expect_err("should fail parsing");
        let err = CliError::JsonSerialize(json_err);
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn test_error_display_config() {
        let err = CliError::Config("invalid TOML syntax".to_owned());
        let display_str = err.to_string();
        assert!(display_str.contains("configuration error"));
        assert!(display_str.contains("invalid TOML syntax"));
    }

    #[test]
    fn test_from_core_config_error() {
        use licensebom_core::error::ConfigError;
        let core_err = LicensebomError::Config(ConfigError::FileNotFound {
            path: "test.toml".to_owned(),
        });
        let cli_err: CliError = core_err.into();
        assert!(matches!(cli_err, CliError::Config(_)));
        assert_eq!(cli_err.exit_code(), 2);
    }

    #[test]
    fn test_from_builder_discovery_error() {
        let err = SbomBuilderError::Discovery {
            path: "/missing".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such dir"),
        };
        let cli_err: CliError = err.into();
        assert_eq!(cli_err.exit_code(), 4);
        assert!(cli_err.to_string().contains("/missing"));
    }

    #[test]
    fn test_from_builder_unsupported_source() {
        let err = SbomBuilderError::UnsupportedSource {
            uri: "https://example.com/app.zip".to_owned(),
            reason: "remote sources are not supported".to_owned(),
        };
        let cli_err: CliError = err.into();
        assert!(matches!(cli_err, CliError::Discovery(_)));
    }

    #[test]
    fn test_from_builder_invalid_pattern() {
        let err = SbomBuilderError::InvalidPattern {
            detector: "custom".to_owned(),
            pattern: "[".to_owned(),
            reason: "unclosed class".to_owned(),
        };
        let cli_err: CliError = err.into();
        assert_eq!(cli_err.exit_code(), 2);
    }

    #[test]
    fn test_from_builder_serialization() {
        let err = SbomBuilderError::Serialization {
            destination: "out.json".to_owned(),
            reason: "disk full".to_owned(),
        };
        let cli_err: CliError = err.into();
        assert_eq!(cli_err.exit_code(), 10);
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let cli_err: CliError = io_err.into();
        match cli_err {
            CliError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::PermissionDenied),
            _ => panic!("expected Io error variant"),
        }
    }
}
