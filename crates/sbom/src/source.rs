//! 입력 소스 해석
//!
//! 사용자가 넘긴 입력(경로 또는 URL)을 [`RootHandle`]로 분류합니다.
//! 현재 탐색 가능한 소스는 로컬 디렉토리뿐이며, 아카이브와 원격 소스는
//! 분류만 하고 [`SbomBuilderError::UnsupportedSource`]로 거부합니다.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::SbomBuilderError;

/// 아카이브로 취급하는 파일 확장자
const ARCHIVE_SUFFIXES: [&str; 6] = [".zip", ".jar", ".tar", ".tar.gz", ".tgz", ".tar.bz2"];

/// 해석된 입력 소스
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootHandle {
    /// 로컬 디렉토리
    LocalDirectory(PathBuf),
    /// 로컬 아카이브 파일
    LocalArchive(PathBuf),
    /// 원격 아카이브 URL
    RemoteArchive(String),
}

impl RootHandle {
    /// 트리 탐색기에 넘길 수 있는 루트 디렉토리를 반환합니다.
    ///
    /// # Errors
    ///
    /// 로컬 디렉토리가 아니면 `SbomBuilderError::UnsupportedSource`
    pub fn walkable_root(&self) -> Result<&Path, SbomBuilderError> {
        match self {
            Self::LocalDirectory(path) => Ok(path),
            Self::LocalArchive(path) => Err(SbomBuilderError::UnsupportedSource {
                uri: path.display().to_string(),
                reason: "archive inputs are not supported".to_owned(),
            }),
            Self::RemoteArchive(url) => Err(SbomBuilderError::UnsupportedSource {
                uri: url.clone(),
                reason: "remote inputs are not supported".to_owned(),
            }),
        }
    }
}

impl fmt::Display for RootHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalDirectory(path) => write!(f, "directory {}", path.display()),
            Self::LocalArchive(path) => write!(f, "archive {}", path.display()),
            Self::RemoteArchive(url) => write!(f, "remote {url}"),
        }
    }
}

/// 입력 문자열을 [`RootHandle`]로 해석합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceResolver;

impl SourceResolver {
    /// 새 해석기를 생성합니다.
    pub fn new() -> Self {
        Self
    }

    /// 입력을 해석합니다.
    ///
    /// - `http://`, `https://`로 시작하면 원격 아카이브
    /// - 존재하는 디렉토리면 로컬 디렉토리
    /// - 아카이브 확장자를 가진 파일이면 로컬 아카이브
    ///
    /// # Errors
    ///
    /// 입력이 비었거나, 존재하지 않거나, 아카이브가 아닌 일반 파일이면
    /// `SbomBuilderError::UnsupportedSource`
    pub fn resolve(&self, uri: &str) -> Result<RootHandle, SbomBuilderError> {
        let trimmed = uri.trim();
        if trimmed.is_empty() {
            return Err(SbomBuilderError::UnsupportedSource {
                uri: uri.to_owned(),
                reason: "input must not be empty".to_owned(),
            });
        }

        let lowered = trimmed.to_lowercase();
        if lowered.starts_with("http://") || lowered.starts_with("https://") {
            return Ok(RootHandle::RemoteArchive(trimmed.to_owned()));
        }

        let path = Path::new(trimmed);
        let metadata = std::fs::metadata(path).map_err(|e| SbomBuilderError::UnsupportedSource {
            uri: trimmed.to_owned(),
            reason: e.to_string(),
        })?;

        if metadata.is_dir() {
            return Ok(RootHandle::LocalDirectory(path.to_path_buf()));
        }

        if ARCHIVE_SUFFIXES.iter().any(|suffix| lowered.ends_with(suffix)) {
            return Ok(RootHandle::LocalArchive(path.to_path_buf()));
        }

        Err(SbomBuilderError::UnsupportedSource {
            uri: trimmed.to_owned(),
            reason: "not a directory or archive".to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_local_directory() {
        let dir = tempfile::tempdir().unwrap();
        let uri = dir.path().display().to_string();
        let handle = SourceResolver::new().resolve(&uri).unwrap();
        assert_eq!(handle, RootHandle::LocalDirectory(dir.path().to_path_buf()));
        assert_eq!(handle.walkable_root().unwrap(), dir.path());
    }

    #[test]
    fn resolves_remote_url_but_refuses_to_walk() {
        let handle = SourceResolver::new()
            .resolve("https://example.com/project.zip")
            .unwrap();
        assert!(matches!(handle, RootHandle::RemoteArchive(_)));
        assert!(matches!(
            handle.walkable_root(),
            Err(SbomBuilderError::UnsupportedSource { .. })
        ));
    }

    #[test]
    fn resolves_local_archive_but_refuses_to_walk() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("project.tar.gz");
        std::fs::write(&archive, b"").unwrap();

        let handle = SourceResolver::new()
            .resolve(&archive.display().to_string())
            .unwrap();
        assert_eq!(handle, RootHandle::LocalArchive(archive));
        assert!(handle.walkable_root().is_err());
    }

    #[test]
    fn rejects_missing_path() {
        let err = SourceResolver::new()
            .resolve("/tmp/licensebom_missing_source_98765")
            .unwrap_err();
        assert!(err.to_string().contains("licensebom_missing_source_98765"));
    }

    #[test]
    fn rejects_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, b"hi").unwrap();
        let err = SourceResolver::new()
            .resolve(&file.display().to_string())
            .unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(SourceResolver::new().resolve("  ").is_err());
    }
}
