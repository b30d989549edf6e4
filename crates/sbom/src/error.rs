//! SBOM 파이프라인 에러 타입
//!
//! [`SbomBuilderError`]는 탐색-추출-조립 파이프라인에서 발생할 수 있는 모든 에러를 나타냅니다.
//! `From<SbomBuilderError> for LicensebomError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 자연스럽게 전파됩니다.
//!
//! # 에러 카테고리
//!
//! - **탐색 (실행 전체 중단)**: `Discovery`
//! - **lockfile 추출 (산출물 단위 격리)**: `MalformedLockfile`, `UnsupportedSchema`,
//!   `FileTooBig`, `TooManyPackages`, `Io`
//! - **출력**: `Serialization`
//! - **구성**: `Config`, `InvalidPattern`, `UnsupportedSource`

use licensebom_core::error::{LicensebomError, SbomError};

/// SBOM 파이프라인 도메인 에러
///
/// 모든 변형은 문제가 된 경로(또는 출력 대상, 설정 필드)와 사람이 읽을 수 있는 사유를 담습니다.
#[derive(Debug, thiserror::Error)]
pub enum SbomBuilderError {
    /// 디렉토리 탐색 중 I/O 실패 (부분 결과는 폐기됨)
    #[error("discovery error: {path}: {source}")]
    Discovery {
        /// 탐색 실패 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// lockfile 구조가 잘못되었거나 필수 필드가 없음
    #[error("malformed lockfile: {path}: {reason}")]
    MalformedLockfile {
        /// lockfile 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 지원하지 않는 lockfile 스키마 버전
    #[error("unsupported lockfile schema: {path}: lockfileVersion {version}")]
    UnsupportedSchema {
        /// lockfile 경로
        path: String,
        /// 발견된 스키마 버전
        version: u64,
    },

    /// SBOM 문서 직렬화 또는 쓰기 실패
    #[error("serialization error: {destination}: {reason}")]
    Serialization {
        /// 출력 대상 (stdout 또는 파일 경로)
        destination: String,
        /// 실패 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 탐지기 glob 패턴 컴파일 실패
    #[error("invalid pattern '{pattern}' in detector {detector}: {reason}")]
    InvalidPattern {
        /// 탐지기 이름
        detector: String,
        /// 문제의 패턴
        pattern: String,
        /// 실패 사유
        reason: String,
    },

    /// 탐색할 수 없는 입력 소스
    #[error("unsupported source: {uri}: {reason}")]
    UnsupportedSource {
        /// 입력 URI 또는 경로
        uri: String,
        /// 실패 사유
        reason: String,
    },

    /// 파일 I/O 에러 (탐색 이후 개별 파일 읽기)
    #[error("io error: {path}: {source}")]
    Io {
        /// 관련 파일 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// 파일 크기 초과
    #[error("file too large: {path}: {size} bytes (max: {max})")]
    FileTooBig {
        /// 파일 경로
        path: String,
        /// 실제 파일 크기 (바이트)
        size: usize,
        /// 최대 허용 크기 (바이트)
        max: usize,
    },

    /// 패키지 수 초과
    #[error("too many packages: {path}: {count} (max: {max})")]
    TooManyPackages {
        /// lockfile 경로
        path: String,
        /// 실제 패키지 수
        count: usize,
        /// 최대 허용 수
        max: usize,
    },
}

impl SbomBuilderError {
    /// 실행 전체를 중단해야 하는 에러인지 반환합니다.
    ///
    /// lockfile 단위 에러는 다른 lockfile 처리에 영향을 주지 않습니다.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Discovery { .. }
                | Self::Serialization { .. }
                | Self::Config { .. }
                | Self::InvalidPattern { .. }
                | Self::UnsupportedSource { .. }
        )
    }
}

impl From<SbomBuilderError> for LicensebomError {
    fn from(err: SbomBuilderError) -> Self {
        let msg = err.to_string();
        match err {
            SbomBuilderError::Discovery { .. } => LicensebomError::Sbom(SbomError::Discovery(msg)),
            SbomBuilderError::MalformedLockfile { .. }
            | SbomBuilderError::UnsupportedSchema { .. }
            | SbomBuilderError::Io { .. }
            | SbomBuilderError::FileTooBig { .. }
            | SbomBuilderError::TooManyPackages { .. } => {
                LicensebomError::Sbom(SbomError::Extraction(msg))
            }
            SbomBuilderError::Serialization { .. } => {
                LicensebomError::Sbom(SbomError::Serialization(msg))
            }
            SbomBuilderError::Config { .. }
            | SbomBuilderError::InvalidPattern { .. }
            | SbomBuilderError::UnsupportedSource { .. } => {
                LicensebomError::Sbom(SbomError::Setup(msg))
            }
        }
    }
}
