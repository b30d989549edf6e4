//! 에러 타입 -- 도메인별 에러 정의

/// licensebom 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LicensebomError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// SBOM 생성 파이프라인 에러
    #[error("sbom error: {0}")]
    Sbom(#[from] SbomError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// SBOM 파이프라인 에러 (카테고리 수준)
///
/// 세부 에러는 `licensebom-sbom` 크레이트의 도메인 에러가 담당하며,
/// 이 타입은 상위 계층에서 단계별로 분류할 때 사용합니다.
#[derive(Debug, thiserror::Error)]
pub enum SbomError {
    /// 디렉토리 탐색 실패 (실행 전체 중단)
    #[error("discovery failed: {0}")]
    Discovery(String),

    /// lockfile 추출 실패 (해당 산출물만 실패)
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// 출력 직렬화/쓰기 실패
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// 파이프라인 구성 실패
    #[error("setup failed: {0}")]
    Setup(String),
}
