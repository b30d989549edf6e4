//! SBOM 출력 대상
//!
//! 문서마다 JSON 하나를 쓰고 줄바꿈을 붙입니다. 문서가 여러 개면 연속된
//! JSON 스트림이 됩니다. 파일 대상은 실행당 한 번만 잘라내고 다시 씁니다.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::error::SbomBuilderError;
use crate::types::SbomDocument;

/// JSON 출력 스타일
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputStyle {
    /// 들여쓰기된 JSON
    #[default]
    Pretty,
    /// 한 줄 JSON
    Compact,
}

/// 출력 대상
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    /// 표준 출력
    Stdout,
    /// 파일 (생성 또는 덮어쓰기)
    File(PathBuf),
}

impl OutputSink {
    /// 경로가 주어지면 파일, 아니면 표준 출력
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdout, Self::File)
    }

    /// 문서를 모두 씁니다.
    ///
    /// # Errors
    ///
    /// 대상을 열 수 없거나 쓰기/직렬화에 실패하면 `SbomBuilderError::Serialization`
    pub fn write_all(
        &self,
        documents: &[SbomDocument],
        style: OutputStyle,
    ) -> Result<(), SbomBuilderError> {
        match self {
            Self::Stdout => {
                let stdout = std::io::stdout();
                let mut lock = stdout.lock();
                self.write_to(&mut lock, documents, style)
            }
            Self::File(path) => {
                let file = File::create(path).map_err(|e| self.failure(e))?;
                let mut writer = BufWriter::new(file);
                self.write_to(&mut writer, documents, style)
            }
        }
    }

    /// 임의의 writer에 문서를 씁니다.
    pub fn write_to<W: Write>(
        &self,
        writer: &mut W,
        documents: &[SbomDocument],
        style: OutputStyle,
    ) -> Result<(), SbomBuilderError> {
        for document in documents {
            let encoded = match style {
                OutputStyle::Pretty => serde_json::to_writer_pretty(&mut *writer, document),
                OutputStyle::Compact => serde_json::to_writer(&mut *writer, document),
            };
            encoded.map_err(|e| self.failure(e))?;
            writer.write_all(b"\n").map_err(|e| self.failure(e))?;
        }
        writer.flush().map_err(|e| self.failure(e))
    }

    fn failure(&self, reason: impl fmt::Display) -> SbomBuilderError {
        SbomBuilderError::Serialization {
            destination: self.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => write!(f, "stdout"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::types::{ComponentType, Ecosystem};

    fn document(name: &str) -> SbomDocument {
        SbomDocument {
            name: name.to_owned(),
            version: "1.0.0".to_owned(),
            identity: 1,
            license: None,
            license_class: None,
            discovered_license: None,
            component_type: ComponentType::Library,
            ecosystems: BTreeSet::from([Ecosystem::Npm]),
            source_path: "package-lock.json".to_owned(),
            generated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            direct_dependencies: Vec::new(),
            transitive_dependencies: Vec::new(),
        }
    }

    #[test]
    fn compact_writes_one_line_per_document() {
        let mut buf = Vec::new();
        OutputSink::Stdout
            .write_to(&mut buf, &[document("a"), document("b")], OutputStyle::Compact)
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["name"], "a");
    }

    #[test]
    fn pretty_documents_form_a_json_stream() {
        let mut buf = Vec::new();
        OutputSink::Stdout
            .write_to(&mut buf, &[document("a"), document("b")], OutputStyle::Pretty)
            .unwrap();
        let names: Vec<String> = serde_json::Deserializer::from_slice(&buf)
            .into_iter::<serde_json::Value>()
            .map(|v| v.unwrap()["name"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(buf.ends_with(b"}\n"));
    }

    #[test]
    fn file_sink_truncates_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sbom.json");
        std::fs::write(&path, "old content that is longer than the new one ".repeat(100)).unwrap();

        let sink = OutputSink::File(path.clone());
        sink.write_all(&[document("a")], OutputStyle::Compact).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("old content"));
        assert!(written.starts_with("{\"name\":\"a\""));
    }

    #[test]
    fn unwritable_destination_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let sink = OutputSink::File(dir.path().join("missing").join("sbom.json"));
        let err = sink.write_all(&[document("a")], OutputStyle::Pretty).unwrap_err();
        assert!(matches!(err, SbomBuilderError::Serialization { .. }));
        assert!(err.to_string().contains("sbom.json"));
    }

    #[test]
    fn no_documents_writes_nothing() {
        let mut buf = Vec::new();
        OutputSink::Stdout
            .write_to(&mut buf, &[], OutputStyle::Pretty)
            .unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn from_option_picks_destination() {
        assert_eq!(OutputSink::from_option(None), OutputSink::Stdout);
        assert_eq!(
            OutputSink::from_option(Some(PathBuf::from("out.json"))).to_string(),
            "out.json"
        );
    }
}
