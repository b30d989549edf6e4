//! SBOM 파이프라인 설정
//!
//! [`SbomBuilderConfig`]는 core의 [`SbomConfig`](licensebom_core::config::SbomConfig)에서
//! 파생되며, 문자열 필드를 타입이 있는 값으로 변환합니다.
//!
//! # 사용 예시
//!
//! ```
//! use licensebom_sbom::{NameCollision, SbomBuilderConfig, SbomBuilderConfigBuilder};
//!
//! let config = SbomBuilderConfig::default();
//! config.validate().unwrap();
//!
//! let config = SbomBuilderConfigBuilder::new()
//!     .max_packages(10_000)
//!     .name_collision(NameCollision::Dedupe)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.max_packages, 10_000);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::detector::Detector;
use crate::error::SbomBuilderError;

/// 같은 (이름, 버전) 레코드가 여러 번 나올 때의 처리 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameCollision {
    /// 모든 레코드를 lockfile 순서대로 유지
    #[default]
    Keep,
    /// (이름, 버전)별 첫 레코드만 유지
    Dedupe,
}

impl NameCollision {
    /// 문자열에서 정책을 파싱합니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "keep" => Some(Self::Keep),
            "dedupe" => Some(Self::Dedupe),
            _ => None,
        }
    }
}

impl fmt::Display for NameCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keep => write!(f, "keep"),
            Self::Dedupe => write!(f, "dedupe"),
        }
    }
}

/// 설정 상한값 상수
const MAX_FILE_SIZE: usize = 100 * 1024 * 1024; // 100 MB
const MAX_PACKAGES_LIMIT: usize = 500_000;

/// SBOM 파이프라인 설정
///
/// # 필드
///
/// - **max_file_size**: lockfile 최대 크기 (바이트)
/// - **max_packages**: lockfile당 최대 패키지 수
/// - **name_collision**: 이름 충돌 정책
/// - **include_default_detectors**: 기본 탐지기 등록 여부
/// - **identity_salt**: 식별자 해시 salt (비어 있으면 실행마다 새로 생성)
/// - **detectors**: 기본 탐지기 뒤에 등록되는 사용자 정의 탐지기
#[derive(Debug, Clone)]
pub struct SbomBuilderConfig {
    /// lockfile 최대 허용 크기 (바이트)
    pub max_file_size: usize,
    /// lockfile당 최대 허용 패키지 수
    pub max_packages: usize,
    /// 이름 충돌 정책
    pub name_collision: NameCollision,
    /// 기본 탐지기 등록 여부
    pub include_default_detectors: bool,
    /// 식별자 해시 salt
    pub identity_salt: String,
    /// 사용자 정의 탐지기
    pub detectors: Vec<Detector>,
}

impl Default for SbomBuilderConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024, // 10 MB
            max_packages: 50_000,
            name_collision: NameCollision::Keep,
            include_default_detectors: true,
            identity_salt: String::new(),
            detectors: Vec::new(),
        }
    }
}

impl SbomBuilderConfig {
    /// core의 `SbomConfig`에서 파이프라인 설정을 생성합니다.
    ///
    /// # Errors
    ///
    /// 탐지기 항목의 종류/역할/생태계를 해석할 수 없으면 `SbomBuilderError::Config`
    pub fn from_core(core: &licensebom_core::config::SbomConfig) -> Result<Self, SbomBuilderError> {
        let name_collision = NameCollision::from_str_loose(&core.name_collision).ok_or_else(|| {
            SbomBuilderError::Config {
                field: "name_collision".to_owned(),
                reason: format!("unknown policy '{}'", core.name_collision),
            }
        })?;

        let detectors = core
            .detectors
            .iter()
            .map(Detector::from_config)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            max_file_size: core.max_file_size,
            max_packages: core.max_packages,
            name_collision,
            include_default_detectors: core.include_default_detectors,
            identity_salt: core.identity_salt.clone(),
            detectors,
        })
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `max_file_size`: 1-104857600 (100MB)
    /// - `max_packages`: 1-500000
    /// - 탐지기: 이름과 패턴이 비어 있으면 안 됨
    /// - 기본 탐지기를 끄면 사용자 정의 탐지기가 하나 이상 필요
    pub fn validate(&self) -> Result<(), SbomBuilderError> {
        if self.max_file_size == 0 || self.max_file_size > MAX_FILE_SIZE {
            return Err(SbomBuilderError::Config {
                field: "max_file_size".to_owned(),
                reason: format!("must be 1-{MAX_FILE_SIZE}"),
            });
        }

        if self.max_packages == 0 || self.max_packages > MAX_PACKAGES_LIMIT {
            return Err(SbomBuilderError::Config {
                field: "max_packages".to_owned(),
                reason: format!("must be 1-{MAX_PACKAGES_LIMIT}"),
            });
        }

        for detector in &self.detectors {
            if detector.name.trim().is_empty() {
                return Err(SbomBuilderError::Config {
                    field: "detectors.name".to_owned(),
                    reason: "detector name must not be empty".to_owned(),
                });
            }
            if detector.patterns.is_empty() {
                return Err(SbomBuilderError::Config {
                    field: format!("detectors.{}.patterns", detector.name),
                    reason: "at least one pattern required".to_owned(),
                });
            }
        }

        if !self.include_default_detectors && self.detectors.is_empty() {
            return Err(SbomBuilderError::Config {
                field: "detectors".to_owned(),
                reason: "no detectors registered with default detectors disabled".to_owned(),
            });
        }

        Ok(())
    }
}

/// [`SbomBuilderConfig`] 빌더
#[derive(Default)]
pub struct SbomBuilderConfigBuilder {
    config: SbomBuilderConfig,
}

impl SbomBuilderConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 최대 파일 크기(바이트)를 설정합니다.
    pub fn max_file_size(mut self, size: usize) -> Self {
        self.config.max_file_size = size;
        self
    }

    /// 최대 패키지 수를 설정합니다.
    pub fn max_packages(mut self, max: usize) -> Self {
        self.config.max_packages = max;
        self
    }

    /// 이름 충돌 정책을 설정합니다.
    pub fn name_collision(mut self, policy: NameCollision) -> Self {
        self.config.name_collision = policy;
        self
    }

    /// 기본 탐지기 등록 여부를 설정합니다.
    pub fn include_default_detectors(mut self, include: bool) -> Self {
        self.config.include_default_detectors = include;
        self
    }

    /// 식별자 해시 salt를 설정합니다.
    pub fn identity_salt(mut self, salt: impl Into<String>) -> Self {
        self.config.identity_salt = salt.into();
        self
    }

    /// 사용자 정의 탐지기를 추가합니다.
    pub fn detector(mut self, detector: Detector) -> Self {
        self.config.detectors.push(detector);
        self
    }

    /// 설정을 검증하고 빌드합니다.
    ///
    /// # Errors
    ///
    /// 유효성 검증 실패 시 `SbomBuilderError::Config` 반환
    pub fn build(self) -> Result<SbomBuilderConfig, SbomBuilderError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
