//! SBOM 파이프라인 오케스트레이터 -- 탐색부터 문서 조립까지
//!
//! # 내부 아키텍처
//!
//! ```text
//! root --> TreeWalker --> DiscoveredMatch (lexical order)
//!                              |
//!              +---------------+----------------+
//!              |                                |
//!        LICENSE files                      lockfiles
//!              |                                |
//!      LicenseIdentifier              LockfileExtractor --> RawGraph
//!              |                                |
//!      DiscoveredLicense             DependencyPartitioner
//!              |                                |
//!              +----------> SbomAssembler <-----+
//!                                |
//!                          SbomDocument (lockfile당 하나)
//! ```
//!
//! [`SbomBuilderError::is_fatal`]인 에러(탐색 실패 등)는 실행 전체를 중단합니다.
//! 그 외 산출물 단위 실패는 [`PipelineReport::failures`]에 기록되고 나머지 처리는 계속됩니다.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::SbomBuilderConfig;
use crate::detector::{DetectorKind, DetectorRegistry, DetectorRole};
use crate::error::SbomBuilderError;
use crate::identity::{ContentFingerprint, Fingerprint};
use crate::license::{LicenseIdentifier, SpdxTagIdentifier};
use crate::parser::npm::NpmLockExtractor;
use crate::parser::LockfileExtractor;
use crate::partition::DependencyPartitioner;
use crate::sbom::SbomAssembler;
use crate::source::SourceResolver;
use crate::types::{DiscoveredLicense, Ecosystem, LicenseClass, SbomDocument};
use crate::walker::{DiscoveredMatch, TreeWalker};

/// 처리에 실패한 산출물
#[derive(Debug)]
pub struct ArtifactFailure {
    /// 루트 기준 경로
    pub path: String,
    /// 실패 원인
    pub error: SbomBuilderError,
}

/// 한 번의 실행 결과
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// 탐지기에 매칭된 모든 파일 (방문 순서)
    pub matches: Vec<DiscoveredMatch>,
    /// 생성된 문서 (lockfile 방문 순서)
    pub documents: Vec<SbomDocument>,
    /// 실패한 산출물
    pub failures: Vec<ArtifactFailure>,
}

impl PipelineReport {
    /// 실패한 산출물이 있는지 여부
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// 모든 문서의 의존성 수 합계
    pub fn dependency_count(&self) -> usize {
        self.documents.iter().map(SbomDocument::dependency_count).sum()
    }
}

/// SBOM 파이프라인
///
/// 빌드 이후에는 불변이며, 같은 트리에 대해 반복 실행해도 결과가 같습니다
/// (생성 시각과 실행 단위 salt 제외).
pub struct SbomPipeline {
    config: SbomBuilderConfig,
    registry: DetectorRegistry,
    walker: TreeWalker,
    extractors: Vec<Box<dyn LockfileExtractor>>,
    identifier: Box<dyn LicenseIdentifier>,
    partitioner: DependencyPartitioner,
    assembler: SbomAssembler,
}

impl SbomPipeline {
    /// 등록된 탐지기 레지스트리
    pub fn registry(&self) -> &DetectorRegistry {
        &self.registry
    }

    /// 파이프라인 설정
    pub fn config(&self) -> &SbomBuilderConfig {
        &self.config
    }

    /// 입력 문자열을 해석한 뒤 실행합니다.
    ///
    /// # Errors
    ///
    /// 탐색 불가능한 소스면 `UnsupportedSource`, 그 외는 [`run`](Self::run)과 같습니다.
    pub fn run_source(&self, uri: &str) -> Result<PipelineReport, SbomBuilderError> {
        let handle = SourceResolver::new().resolve(uri)?;
        debug!(target: "licensebom::seeker", source = %handle, "resolved input");
        self.run(handle.walkable_root()?)
    }

    /// 루트 디렉토리를 탐색하여 lockfile마다 SBOM 문서를 만듭니다.
    ///
    /// # Errors
    ///
    /// 디렉토리 탐색 실패 시 `SbomBuilderError::Discovery` (부분 결과 없음)
    pub fn run(&self, root: &Path) -> Result<PipelineReport, SbomBuilderError> {
        info!(target: "licensebom::seeker", root = %root.display(), "starting discovery");
        let matches = self.walker.discover(root)?;

        let mut report = PipelineReport::default();
        let discovered_license = self.discover_license(root, &matches, &mut report)?;

        for found in &matches {
            let DetectorRole::Lockfile(ecosystem) = found.detector.role else {
                if found.detector.role == DetectorRole::Manifest {
                    debug!(
                        target: "licensebom::matches",
                        path = %found.source_path(),
                        detector = %found.detector.name,
                        "manifest recorded"
                    );
                }
                continue;
            };

            let source_path = found.source_path();
            match self.process_lockfile(root, found, ecosystem, discovered_license.clone()) {
                Ok(Some(document)) => report.documents.push(document),
                Ok(None) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(
                        target: "licensebom::extracting",
                        path = %source_path,
                        error = %e,
                        "failed to process lockfile, skipping"
                    );
                    report.failures.push(ArtifactFailure {
                        path: source_path,
                        error: e,
                    });
                }
            }
        }

        info!(
            target: "licensebom::seeker",
            matches = matches.len(),
            documents = report.documents.len(),
            failures = report.failures.len(),
            dependencies = report.dependency_count(),
            "run completed"
        );

        report.matches = matches;
        Ok(report)
    }

    /// 모든 LICENSE 파일을 방문 순서대로 식별합니다. 마지막으로 식별된 것이 남습니다.
    ///
    /// 읽기 실패는 해당 파일만 실패로 기록합니다. 치명적 에러면 실행을 중단합니다.
    fn discover_license(
        &self,
        root: &Path,
        matches: &[DiscoveredMatch],
        report: &mut PipelineReport,
    ) -> Result<Option<DiscoveredLicense>, SbomBuilderError> {
        let mut discovered = None;

        for found in matches
            .iter()
            .filter(|m| m.detector.role == DetectorRole::LicenseFile)
        {
            let source_path = found.source_path();
            let text = match self.read_limited(root, found) {
                // LICENSE 본문은 Latin-1 등 UTF-8이 아닌 경우가 흔함
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(
                        target: "licensebom::extracting",
                        path = %source_path,
                        error = %e,
                        "failed to read license file"
                    );
                    report.failures.push(ArtifactFailure {
                        path: source_path,
                        error: e,
                    });
                    continue;
                }
            };

            match self.identifier.identify(&text) {
                Some(found_license) => {
                    info!(
                        target: "licensebom::identification",
                        path = %source_path,
                        license = %found_license.license,
                        "identified license file"
                    );
                    discovered = Some(DiscoveredLicense {
                        license_class: LicenseClass::classify(&found_license.license),
                        license: found_license.license,
                        method: found_license.method,
                        source_path,
                    });
                }
                None => debug!(
                    target: "licensebom::identification",
                    path = %source_path,
                    "license file not recognized"
                ),
            }
        }

        Ok(discovered)
    }

    /// lockfile 하나를 문서로 만듭니다. 담당 추출기가 없으면 `None`입니다.
    fn process_lockfile(
        &self,
        root: &Path,
        found: &DiscoveredMatch,
        ecosystem: Ecosystem,
        discovered_license: Option<DiscoveredLicense>,
    ) -> Result<Option<SbomDocument>, SbomBuilderError> {
        let source_path = found.source_path();
        let Some(extractor) = self.extractors.iter().find(|x| x.ecosystem() == ecosystem) else {
            warn!(
                target: "licensebom::extracting",
                path = %source_path,
                ecosystem = %ecosystem,
                "no extractor for ecosystem, skipping"
            );
            return Ok(None);
        };

        let bytes = self.read_limited(root, found)?;
        let content =
            String::from_utf8(bytes).map_err(|e| SbomBuilderError::MalformedLockfile {
                path: source_path.clone(),
                reason: format!("not valid UTF-8: {}", e.utf8_error()),
            })?;
        let graph = extractor.extract(&content, &source_path)?;

        if graph.package_count() > self.config.max_packages {
            return Err(SbomBuilderError::TooManyPackages {
                path: source_path,
                count: graph.package_count(),
                max: self.config.max_packages,
            });
        }

        info!(
            target: "licensebom::extracting",
            path = %source_path,
            project = %graph.name,
            packages = graph.package_count(),
            "extracted lockfile"
        );

        let dependencies = self.partitioner.partition(&graph);
        Ok(Some(self.assembler.assemble(
            &graph,
            dependencies,
            discovered_license,
        )))
    }

    /// 크기 제한을 확인한 뒤 파일 내용을 바이트로 읽습니다.
    fn read_limited(&self, root: &Path, found: &DiscoveredMatch) -> Result<Vec<u8>, SbomBuilderError> {
        let path = root.join(&found.relative_path);
        let source_path = found.source_path();

        let metadata = std::fs::metadata(&path).map_err(|e| SbomBuilderError::Io {
            path: source_path.clone(),
            source: e,
        })?;
        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > self.config.max_file_size {
            return Err(SbomBuilderError::FileTooBig {
                path: source_path,
                size,
                max: self.config.max_file_size,
            });
        }

        std::fs::read(&path).map_err(|e| SbomBuilderError::Io {
            path: source_path,
            source: e,
        })
    }
}

/// SBOM 파이프라인 빌더
pub struct SbomPipelineBuilder {
    config: SbomBuilderConfig,
    extractors: Vec<Box<dyn LockfileExtractor>>,
    identifier: Box<dyn LicenseIdentifier>,
    fingerprint: Option<Arc<dyn Fingerprint>>,
}

impl SbomPipelineBuilder {
    /// 새 빌더를 생성합니다. npm 추출기와 기본 라이선스 식별기가 등록되어 있습니다.
    pub fn new() -> Self {
        Self {
            config: SbomBuilderConfig::default(),
            extractors: vec![Box::new(NpmLockExtractor)],
            identifier: Box::new(SpdxTagIdentifier),
            fingerprint: None,
        }
    }

    /// 파이프라인 설정을 지정합니다.
    pub fn config(mut self, config: SbomBuilderConfig) -> Self {
        self.config = config;
        self
    }

    /// lockfile 추출기를 추가합니다. 같은 생태계면 먼저 등록된 것이 쓰입니다.
    pub fn extractor(mut self, extractor: Box<dyn LockfileExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    /// LICENSE 파일 식별기를 교체합니다.
    pub fn license_identifier(mut self, identifier: Box<dyn LicenseIdentifier>) -> Self {
        self.identifier = identifier;
        self
    }

    /// 식별자 계산기를 교체합니다. 지정하지 않으면 설정의 salt를 씁니다.
    pub fn fingerprint(mut self, fingerprint: Arc<dyn Fingerprint>) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    /// 파이프라인을 빌드합니다.
    ///
    /// # Errors
    ///
    /// 설정 검증 실패 시 `Config`, 패턴 컴파일 실패 시 `InvalidPattern`
    pub fn build(self) -> Result<SbomPipeline, SbomBuilderError> {
        self.config.validate()?;

        let mut registry = if self.config.include_default_detectors {
            DetectorRegistry::with_defaults()
        } else {
            DetectorRegistry::new()
        };
        for detector in &self.config.detectors {
            registry.register(detector.clone());
        }

        let walker = TreeWalker::new(&registry.detectors_for(DetectorKind::File))?;

        let fingerprint = self
            .fingerprint
            .unwrap_or_else(|| Arc::new(ContentFingerprint::from_salt(&self.config.identity_salt)));

        Ok(SbomPipeline {
            partitioner: DependencyPartitioner::new(
                Arc::clone(&fingerprint),
                self.config.name_collision,
            ),
            assembler: SbomAssembler::new(fingerprint),
            config: self.config,
            registry,
            walker,
            extractors: self.extractors,
            identifier: self.identifier,
        })
    }
}

impl Default for SbomPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
