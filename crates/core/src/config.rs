//! 설정 관리 -- licensebom.toml 파싱 및 런타임 설정
//!
//! [`LicensebomConfig`]는 모든 구성 요소의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LICENSEBOM_SBOM_MAX_PACKAGES=1000` 형식)
//! 3. 설정 파일 (`licensebom.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), licensebom_core::error::LicensebomError> {
//! use licensebom_core::config::LicensebomConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LicensebomConfig::load("licensebom.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LicensebomConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, LicensebomError};

/// 허용되는 로그 레벨
pub const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
/// 허용되는 로그 형식
pub const VALID_LOG_FORMATS: [&str; 2] = ["json", "pretty"];
/// 허용되는 이름 충돌 정책
pub const VALID_NAME_COLLISIONS: [&str; 2] = ["keep", "dedupe"];
/// 허용되는 탐지기 대상 종류
pub const VALID_DETECTOR_KINDS: [&str; 2] = ["file", "directory"];
/// 허용되는 탐지기 역할
pub const VALID_DETECTOR_ROLES: [&str; 3] = ["lockfile", "license_file", "manifest"];

/// licensebom 통합 설정
///
/// `licensebom.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicensebomConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// SBOM 생성 설정
    #[serde(default)]
    pub sbom: SbomConfig,
}

impl LicensebomConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LicensebomError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일 없이 기본값 + 환경변수 오버라이드로 설정을 만듭니다.
    pub fn from_env() -> Result<Self, LicensebomError> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LicensebomError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LicensebomError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LicensebomError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LicensebomError> {
        toml::from_str(toml_str).map_err(|e| {
            LicensebomError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LICENSEBOM_{SECTION}_{FIELD}`
    /// 예: `LICENSEBOM_GENERAL_LOG_LEVEL=debug`
    ///
    /// 탐지기 목록(`sbom.detectors`)은 환경변수로 오버라이드하지 않습니다.
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LICENSEBOM_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LICENSEBOM_GENERAL_LOG_FORMAT");

        // SBOM
        override_usize(&mut self.sbom.max_file_size, "LICENSEBOM_SBOM_MAX_FILE_SIZE");
        override_usize(&mut self.sbom.max_packages, "LICENSEBOM_SBOM_MAX_PACKAGES");
        override_string(
            &mut self.sbom.name_collision,
            "LICENSEBOM_SBOM_NAME_COLLISION",
        );
        override_bool(
            &mut self.sbom.include_default_detectors,
            "LICENSEBOM_SBOM_INCLUDE_DEFAULT_DETECTORS",
        );
        override_string(&mut self.sbom.identity_salt, "LICENSEBOM_SBOM_IDENTITY_SALT");
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// 수치 범위(파일 크기, 패키지 수)는 `licensebom-sbom`의 설정 검증이 담당합니다.
    pub fn validate(&self) -> Result<(), LicensebomError> {
        check_one_of(
            "general.log_level",
            &self.general.log_level,
            &VALID_LOG_LEVELS,
        )?;
        check_one_of(
            "general.log_format",
            &self.general.log_format,
            &VALID_LOG_FORMATS,
        )?;
        check_one_of(
            "sbom.name_collision",
            &self.sbom.name_collision,
            &VALID_NAME_COLLISIONS,
        )?;

        for (idx, detector) in self.sbom.detectors.iter().enumerate() {
            let field = |name: &str| format!("sbom.detectors[{idx}].{name}");

            if detector.name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field("name"),
                    reason: "detector name must not be empty".to_owned(),
                }
                .into());
            }

            if detector.patterns.is_empty() || detector.patterns.iter().any(|p| p.is_empty()) {
                return Err(ConfigError::InvalidValue {
                    field: field("patterns"),
                    reason: "at least one non-empty glob pattern required".to_owned(),
                }
                .into());
            }

            check_one_of(&field("kind"), &detector.kind, &VALID_DETECTOR_KINDS)?;
            check_one_of(&field("role"), &detector.role, &VALID_DETECTOR_ROLES)?;

            if detector.role == "lockfile" && detector.ecosystem.is_none() {
                return Err(ConfigError::InvalidValue {
                    field: field("ecosystem"),
                    reason: "lockfile detectors must name an ecosystem".to_owned(),
                }
                .into());
            }
        }

        Ok(())
    }
}

fn check_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), LicensebomError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: format!("must be one of: {}", allowed.join(", ")),
    }
    .into())
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// SBOM 생성 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SbomConfig {
    /// lockfile 최대 허용 크기 (바이트)
    pub max_file_size: usize,
    /// lockfile 당 최대 허용 패키지 수
    pub max_packages: usize,
    /// 중첩 패키지 이름 충돌 정책 (keep, dedupe)
    pub name_collision: String,
    /// 기본 탐지기(npm lockfile, LICENSE) 등록 여부
    pub include_default_detectors: bool,
    /// 식별자 해시에 섞는 솔트
    pub identity_salt: String,
    /// 추가 탐지기 (기본 탐지기 뒤에 등록 순서대로 적용)
    pub detectors: Vec<DetectorConfig>,
}

impl Default for SbomConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            max_packages: 50_000,
            name_collision: "keep".to_owned(),
            include_default_detectors: true,
            identity_salt: String::new(),
            detectors: Vec::new(),
        }
    }
}

/// 사용자 정의 탐지기 설정
///
/// ```toml
/// [[sbom.detectors]]
/// name = "notice-file"
/// patterns = ["**/NOTICE"]
/// kind = "file"
/// role = "manifest"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// 탐지기 이름
    pub name: String,
    /// glob 패턴 목록
    pub patterns: Vec<String>,
    /// 대상 종류 (file, directory)
    #[serde(default = "default_detector_kind")]
    pub kind: String,
    /// 역할 (lockfile, license_file, manifest)
    pub role: String,
    /// lockfile 역할일 때 생태계 이름 (예: "npm")
    #[serde(default)]
    pub ecosystem: Option<String>,
}

fn default_detector_kind() -> String {
    "file".to_owned()
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}
