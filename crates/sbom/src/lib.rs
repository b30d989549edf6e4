//! licensebom SBOM 파이프라인
//!
//! 프로젝트 디렉토리를 탐색하여 lockfile마다 라이선스 중심의 SBOM 문서를 생성합니다.
//!
//! # 구성 요소
//!
//! - [`DetectorRegistry`] / [`Detector`]: 메타데이터 파일 탐지 규칙
//! - [`TreeWalker`]: 결정적 순서의 디렉토리 탐색과 첫 매칭 우선 분류
//! - [`LockfileExtractor`] / [`NpmLockExtractor`]: lockfile을 원시 그래프로 변환
//! - [`DependencyPartitioner`]: 직접/전이 의존성 분류
//! - [`SbomAssembler`]: 문서 조립
//! - [`OutputSink`]: JSON 출력
//! - [`SbomPipeline`]: 위 단계를 묶는 오케스트레이터
//!
//! # 사용 예시
//!
//! ```no_run
//! use licensebom_sbom::{OutputSink, OutputStyle, SbomPipelineBuilder};
//!
//! let pipeline = SbomPipelineBuilder::new().build()?;
//! let report = pipeline.run(std::path::Path::new("./my-project"))?;
//! OutputSink::Stdout.write_all(&report.documents, OutputStyle::Pretty)?;
//! # Ok::<(), licensebom_sbom::SbomBuilderError>(())
//! ```

pub mod config;
pub mod detector;
pub mod error;
pub mod identity;
pub mod license;
pub mod parser;
pub mod partition;
pub mod pipeline;
pub mod sbom;
pub mod source;
pub mod types;
pub mod walker;

// --- 주요 타입 re-export ---

pub use config::{NameCollision, SbomBuilderConfig, SbomBuilderConfigBuilder};
pub use detector::{Detector, DetectorKind, DetectorRegistry, DetectorRole};
pub use error::SbomBuilderError;
pub use identity::{ContentFingerprint, Fingerprint, IdentitySubject};
pub use license::{LicenseIdentifier, LicenseMatch, SpdxTagIdentifier};
pub use parser::npm::NpmLockExtractor;
pub use parser::{LockfileExtractor, RawGraph, RawPackageEntry};
pub use partition::{DependencyPartitioner, PartitionedDependencies};
pub use pipeline::{ArtifactFailure, PipelineReport, SbomPipeline, SbomPipelineBuilder};
pub use sbom::SbomAssembler;
pub use sbom::sink::{OutputSink, OutputStyle};
pub use source::{RootHandle, SourceResolver};
pub use types::{
    ComponentType, DependencyRecord, DependencyScope, DiscoveredLicense, Ecosystem, LicenseClass,
    LicenseMethod, SbomDocument,
};
pub use walker::{DiscoveredMatch, TreeWalker};
