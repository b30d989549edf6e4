//! licensebom 공통 크레이트
//!
//! 설정 파일(`licensebom.toml`) 로딩과 최상위 에러 타입을 제공합니다.
//! SBOM 파이프라인 자체는 `licensebom-sbom` 크레이트에 있습니다.

pub mod config;
pub mod error;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, LicensebomError, SbomError};

// 설정
pub use config::{DetectorConfig, GeneralConfig, LicensebomConfig, SbomConfig};
