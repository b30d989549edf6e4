//! 메타데이터 탐지기와 레지스트리
//!
//! [`Detector`]는 "어떤 파일이 메타데이터 소스인가"를 선언하는 규칙입니다:
//! glob 패턴 목록, 대상 종류([`DetectorKind`]), 역할([`DetectorRole`]).
//!
//! [`DetectorRegistry`]는 탐지기를 등록 순서대로 보관합니다. 같은 파일에 여러
//! 탐지기가 매칭될 수 있으므로, 등록 순서가 곧 "첫 매칭 우선" 규칙의 우선순위입니다.
//!
//! # 기본 탐지기 (등록 순서)
//!
//! 1. `npm-lockfile` -- `**/package-lock.json`
//! 2. `license-file` -- `**/LICENSE`

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use licensebom_core::config::DetectorConfig;

use crate::error::SbomBuilderError;
use crate::types::Ecosystem;

/// 탐지 대상 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKind {
    /// 일반 파일
    File,
    /// 디렉토리 (트리 탐색기는 처리하지 않음)
    Directory,
}

impl DetectorKind {
    /// 문자열에서 대상 종류를 파싱합니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "file" => Some(Self::File),
            "directory" | "dir" => Some(Self::Directory),
            _ => None,
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

/// 탐지된 파일의 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "role", content = "ecosystem")]
pub enum DetectorRole {
    /// 생태계별 lockfile (SBOM 생성 대상)
    Lockfile(Ecosystem),
    /// 프로젝트 LICENSE 파일
    LicenseFile,
    /// 기타 메타데이터 파일 (탐색 결과에만 기록)
    Manifest,
}

impl fmt::Display for DetectorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lockfile(eco) => write!(f, "lockfile({eco})"),
            Self::LicenseFile => write!(f, "license_file"),
            Self::Manifest => write!(f, "manifest"),
        }
    }
}

/// 메타데이터 탐지기
///
/// 한 번 생성되면 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detector {
    /// 탐지기 이름
    pub name: String,
    /// glob 패턴 목록 (`*`, `**`, `?`, 문자 클래스)
    pub patterns: Vec<String>,
    /// 대상 종류
    pub kind: DetectorKind,
    /// 역할
    #[serde(flatten)]
    pub role: DetectorRole,
}

impl Detector {
    /// 새 탐지기를 생성합니다.
    pub fn new(
        name: impl Into<String>,
        patterns: impl IntoIterator<Item = impl Into<String>>,
        kind: DetectorKind,
        role: DetectorRole,
    ) -> Self {
        Self {
            name: name.into(),
            patterns: patterns.into_iter().map(Into::into).collect(),
            kind,
            role,
        }
    }

    /// npm `package-lock.json` 탐지기
    pub fn npm_lockfile() -> Self {
        Self::new(
            "npm-lockfile",
            ["**/package-lock.json"],
            DetectorKind::File,
            DetectorRole::Lockfile(Ecosystem::Npm),
        )
    }

    /// 프로젝트 `LICENSE` 파일 탐지기
    pub fn license_file() -> Self {
        Self::new(
            "license-file",
            ["**/LICENSE"],
            DetectorKind::File,
            DetectorRole::LicenseFile,
        )
    }

    /// 설정 파일의 탐지기 항목에서 탐지기를 생성합니다.
    pub fn from_config(config: &DetectorConfig) -> Result<Self, SbomBuilderError> {
        let invalid = |field: &str, reason: String| SbomBuilderError::Config {
            field: format!("sbom.detectors.{}.{field}", config.name),
            reason,
        };

        let kind = DetectorKind::from_str_loose(&config.kind)
            .ok_or_else(|| invalid("kind", format!("unknown kind '{}'", config.kind)))?;

        let role = match config.role.as_str() {
            "lockfile" => {
                let raw = config
                    .ecosystem
                    .as_deref()
                    .ok_or_else(|| invalid("ecosystem", "lockfile detectors need an ecosystem".to_owned()))?;
                let ecosystem = Ecosystem::from_str_loose(raw)
                    .ok_or_else(|| invalid("ecosystem", format!("unsupported ecosystem '{raw}'")))?;
                DetectorRole::Lockfile(ecosystem)
            }
            "license_file" => DetectorRole::LicenseFile,
            "manifest" => DetectorRole::Manifest,
            other => return Err(invalid("role", format!("unknown role '{other}'"))),
        };

        Ok(Self::new(config.name.clone(), config.patterns.clone(), kind, role))
    }
}

impl fmt::Display for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} {}",
            self.name,
            self.kind,
            self.role,
            self.patterns.join(", ")
        )
    }
}

/// 탐지기 레지스트리
///
/// 등록은 추가만 가능하며 실패하지 않습니다. 패턴 유효성은
/// [`TreeWalker`](crate::walker::TreeWalker) 생성 시 검증됩니다.
#[derive(Debug, Clone, Default)]
pub struct DetectorRegistry {
    detectors: Vec<Arc<Detector>>,
}

impl DetectorRegistry {
    /// 빈 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 기본 탐지기가 등록된 레지스트리를 생성합니다.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Detector::npm_lockfile());
        registry.register(Detector::license_file());
        registry
    }

    /// 탐지기를 등록합니다. 등록 순서가 매칭 우선순위가 됩니다.
    pub fn register(&mut self, detector: Detector) {
        debug!(
            target: "licensebom::seeker",
            detector = %detector.name,
            kind = %detector.kind,
            role = %detector.role,
            "registered detector"
        );
        self.detectors.push(Arc::new(detector));
    }

    /// 주어진 종류의 탐지기를 등록 순서대로 반환합니다.
    pub fn detectors_for(&self, kind: DetectorKind) -> Vec<Arc<Detector>> {
        self.detectors
            .iter()
            .filter(|d| d.kind == kind)
            .cloned()
            .collect()
    }

    /// 등록된 모든 탐지기를 등록 순서대로 반환합니다.
    pub fn detectors(&self) -> &[Arc<Detector>] {
        &self.detectors
    }

    /// 등록된 탐지기 수
    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    /// 등록된 탐지기가 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}
