//! 디렉토리 트리 탐색기
//!
//! 루트 아래의 모든 일반 파일을 결정적인 사전순으로 방문하고, 루트 기준 상대 경로를
//! 탐지기 패턴과 대조합니다. 파일 하나는 최대 하나의 탐지기에만 매칭되며,
//! 등록 순서가 가장 빠른 탐지기가 선택됩니다.
//!
//! 심볼릭 링크는 따라가지 않습니다. 탐색 도중 I/O 에러가 발생하면 부분 결과를
//! 버리고 [`SbomBuilderError::Discovery`]를 반환합니다.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::detector::{Detector, DetectorKind};
use crate::error::SbomBuilderError;

/// 탐색 중 탐지기에 매칭된 파일
#[derive(Debug, Clone)]
pub struct DiscoveredMatch {
    /// 루트 기준 상대 경로
    pub relative_path: PathBuf,
    /// 매칭된 탐지기
    pub detector: Arc<Detector>,
    /// 매칭된 패턴
    pub pattern: String,
}

impl DiscoveredMatch {
    /// `/` 구분자로 정규화된 상대 경로 문자열
    pub fn source_path(&self) -> String {
        normalize(&self.relative_path)
    }
}

/// 파일 탐지기로 구성된 트리 탐색기
///
/// 생성 시 모든 패턴을 하나의 [`GlobSet`]으로 컴파일합니다. 패턴 인덱스는
/// (탐지기 등록 순서, 패턴 선언 순서)를 따르므로 가장 작은 인덱스가 첫 매칭입니다.
#[derive(Debug)]
pub struct TreeWalker {
    set: GlobSet,
    slots: Vec<(Arc<Detector>, String)>,
}

impl TreeWalker {
    /// 탐지기 목록으로 탐색기를 생성합니다. 파일 종류가 아닌 탐지기는 무시됩니다.
    ///
    /// # Errors
    ///
    /// 패턴 컴파일 실패 시 `SbomBuilderError::InvalidPattern`
    pub fn new(detectors: &[Arc<Detector>]) -> Result<Self, SbomBuilderError> {
        let mut builder = GlobSetBuilder::new();
        let mut slots = Vec::new();

        for detector in detectors.iter().filter(|d| d.kind == DetectorKind::File) {
            for pattern in &detector.patterns {
                let glob = GlobBuilder::new(pattern)
                    .literal_separator(true)
                    .build()
                    .map_err(|e| SbomBuilderError::InvalidPattern {
                        detector: detector.name.clone(),
                        pattern: pattern.clone(),
                        reason: e.kind().to_string(),
                    })?;
                builder.add(glob);
                slots.push((Arc::clone(detector), pattern.clone()));
            }
        }

        let set = builder.build().map_err(|e| SbomBuilderError::InvalidPattern {
            detector: "*".to_owned(),
            pattern: e.glob().unwrap_or_default().to_owned(),
            reason: e.kind().to_string(),
        })?;

        Ok(Self { set, slots })
    }

    /// 상대 경로 하나를 분류합니다. 매칭되는 탐지기가 없으면 `None`입니다.
    pub fn classify(&self, relative_path: &Path) -> Option<DiscoveredMatch> {
        let index = self.set.matches(relative_path).into_iter().min()?;
        let (detector, pattern) = &self.slots[index];
        Some(DiscoveredMatch {
            relative_path: relative_path.to_path_buf(),
            detector: Arc::clone(detector),
            pattern: pattern.clone(),
        })
    }

    /// 루트 아래를 탐색하여 매칭된 파일을 방문 순서대로 반환합니다.
    ///
    /// # Errors
    ///
    /// 디렉토리를 읽을 수 없으면 `SbomBuilderError::Discovery` (부분 결과 없음)
    pub fn discover(&self, root: &Path) -> Result<Vec<DiscoveredMatch>, SbomBuilderError> {
        let entries = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .min_depth(1)
            .into_iter()
            .map(|entry| {
                let entry = entry.map_err(|e| SbomBuilderError::Discovery {
                    path: e.path().unwrap_or(root).display().to_string(),
                    source: e.into(),
                })?;
                Ok(entry
                    .file_type()
                    .is_file()
                    .then(|| entry.path().to_path_buf()))
            });

        self.collect(root, entries)
    }

    /// 방문 항목을 분류합니다. `None` 항목은 일반 파일이 아닌 엔트리입니다.
    ///
    /// 에러를 만나면 그때까지의 매칭을 버리고 즉시 반환합니다.
    fn collect<I>(&self, root: &Path, entries: I) -> Result<Vec<DiscoveredMatch>, SbomBuilderError>
    where
        I: IntoIterator<Item = Result<Option<PathBuf>, SbomBuilderError>>,
    {
        let mut matches = Vec::new();

        for entry in entries {
            let Some(path) = entry? else {
                continue;
            };

            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };

            debug!(
                target: "licensebom::discovery",
                path = %normalize(relative),
                "checking file"
            );

            if let Some(found) = self.classify(relative) {
                info!(
                    target: "licensebom::matches",
                    path = %found.source_path(),
                    detector = %found.detector.name,
                    pattern = %found.pattern,
                    "matched detector"
                );
                matches.push(found);
            }
        }

        Ok(matches)
    }

    /// 컴파일된 패턴 수
    pub fn pattern_count(&self) -> usize {
        self.slots.len()
    }
}

/// 플랫폼 구분자와 무관하게 `/`로 연결된 경로 문자열을 만듭니다.
pub(crate) fn normalize(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{DetectorRegistry, DetectorRole};

    fn default_walker() -> TreeWalker {
        let registry = DetectorRegistry::with_defaults();
        TreeWalker::new(&registry.detectors_for(DetectorKind::File)).unwrap()
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"{}").unwrap();
    }

    #[test]
    fn double_star_matches_top_level_and_nested() {
        let walker = default_walker();
        assert!(walker.classify(Path::new("LICENSE")).is_some());
        assert!(walker.classify(Path::new("a/b/LICENSE")).is_some());
        assert!(walker.classify(Path::new("LICENSE.md")).is_none());
        assert!(walker.classify(Path::new("a/LICENSE/x")).is_none());
    }

    #[test]
    fn single_star_does_not_cross_separator() {
        let detector = Arc::new(Detector::new(
            "top-json",
            ["*.json"],
            DetectorKind::File,
            DetectorRole::Manifest,
        ));
        let walker = TreeWalker::new(&[detector]).unwrap();
        assert!(walker.classify(Path::new("package.json")).is_some());
        assert!(walker.classify(Path::new("sub/package.json")).is_none());
    }

    #[test]
    fn first_registered_detector_wins() {
        let first = Arc::new(Detector::new(
            "first",
            ["**/*.json"],
            DetectorKind::File,
            DetectorRole::Manifest,
        ));
        let second = Arc::new(Detector::npm_lockfile());
        let walker = TreeWalker::new(&[first, second]).unwrap();

        let found = walker.classify(Path::new("package-lock.json")).unwrap();
        assert_eq!(found.detector.name, "first");
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let detector = Arc::new(Detector::new(
            "broken",
            ["**/[unclosed"],
            DetectorKind::File,
            DetectorRole::Manifest,
        ));
        let err = TreeWalker::new(&[detector]).unwrap_err();
        assert!(matches!(err, SbomBuilderError::InvalidPattern { .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn directory_detectors_are_ignored() {
        let detector = Arc::new(Detector::new(
            "dirs",
            ["**/node_modules"],
            DetectorKind::Directory,
            DetectorRole::Manifest,
        ));
        let walker = TreeWalker::new(&[detector]).unwrap();
        assert_eq!(walker.pattern_count(), 0);
    }

    #[test]
    fn discover_returns_lexical_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b/package-lock.json");
        touch(dir.path(), "a/package-lock.json");
        touch(dir.path(), "LICENSE");
        touch(dir.path(), "README.md");

        let found = default_walker().discover(dir.path()).unwrap();
        let paths: Vec<_> = found.iter().map(DiscoveredMatch::source_path).collect();
        assert_eq!(
            paths,
            vec!["LICENSE", "a/package-lock.json", "b/package-lock.json"]
        );
    }

    #[test]
    fn discover_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let found = default_walker().discover(dir.path()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn discover_missing_root_is_discovery_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = default_walker().discover(&missing).unwrap_err();
        assert!(matches!(err, SbomBuilderError::Discovery { .. }));
        assert!(err.to_string().contains("missing"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_followed() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "real/LICENSE");
        touch(root, "elsewhere/package-lock.json");
        // 루트로 되돌아가는 순환 링크
        symlink(root, root.join("real/loop")).unwrap();
        // 파일을 가리키는 링크
        symlink(
            root.join("elsewhere/package-lock.json"),
            root.join("real/package-lock.json"),
        )
        .unwrap();
        symlink(root.join("real/LICENSE"), root.join("LICENSE")).unwrap();

        let found = default_walker().discover(root).unwrap();
        let paths: Vec<_> = found.iter().map(DiscoveredMatch::source_path).collect();
        assert_eq!(
            paths,
            vec!["elsewhere/package-lock.json", "real/LICENSE"]
        );
    }

    #[test]
    fn walk_error_discards_partial_matches() {
        let root = Path::new("/project");
        let entries = vec![
            Ok(Some(root.join("a/package-lock.json"))),
            Ok(None),
            Err(SbomBuilderError::Discovery {
                path: "/project/b/locked".to_owned(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            }),
            Ok(Some(root.join("c/package-lock.json"))),
        ];

        let err = default_walker().collect(root, entries).unwrap_err();
        assert!(matches!(err, SbomBuilderError::Discovery { .. }));
        assert!(err.to_string().contains("b/locked"));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_is_discovery_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a/package-lock.json");
        touch(dir.path(), "b/locked/package-lock.json");
        let locked = dir.path().join("b/locked");
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // root 권한으로는 권한 제한이 적용되지 않음
        let readable = std::fs::read_dir(&locked).is_ok();
        let result = default_walker().discover(dir.path());
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
        if readable {
            return;
        }

        let err = result.unwrap_err();
        assert!(matches!(err, SbomBuilderError::Discovery { .. }));
        assert!(err.to_string().contains("locked"));
    }

    #[test]
    fn normalize_joins_with_slash() {
        let path: PathBuf = ["a", "b", "package-lock.json"].iter().collect();
        assert_eq!(normalize(&path), "a/b/package-lock.json");
    }
}
