//! SBOM 문서 조립과 출력
//!
//! [`SbomAssembler`]는 원시 그래프의 루트 정보, 분류된 의존성, LICENSE 파일에서
//! 식별한 라이선스를 하나의 [`SbomDocument`]로 묶습니다.
//! 출력은 [`sink`] 모듈의 [`OutputSink`](sink::OutputSink)가 담당합니다.

pub mod sink;

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::identity::{Fingerprint, IdentitySubject};
use crate::parser::RawGraph;
use crate::partition::PartitionedDependencies;
use crate::types::{ComponentType, DiscoveredLicense, LicenseClass, SbomDocument};

/// SBOM 문서 조립기
pub struct SbomAssembler {
    fingerprint: Arc<dyn Fingerprint>,
}

impl SbomAssembler {
    /// 새 조립기를 생성합니다.
    pub fn new(fingerprint: Arc<dyn Fingerprint>) -> Self {
        Self { fingerprint }
    }

    /// 현재 시각으로 문서를 조립합니다.
    pub fn assemble(
        &self,
        graph: &RawGraph,
        dependencies: PartitionedDependencies,
        discovered_license: Option<DiscoveredLicense>,
    ) -> SbomDocument {
        self.assemble_at(graph, dependencies, discovered_license, Utc::now())
    }

    /// 주어진 생성 시각으로 문서를 조립합니다.
    ///
    /// 루트가 선언한 라이선스는 소문자로 정규화됩니다.
    pub fn assemble_at(
        &self,
        graph: &RawGraph,
        dependencies: PartitionedDependencies,
        discovered_license: Option<DiscoveredLicense>,
        generated_at: DateTime<Utc>,
    ) -> SbomDocument {
        let license = graph.root.declared_license.as_deref().map(str::to_lowercase);
        let identity = self.fingerprint.fingerprint(&IdentitySubject {
            ecosystem: graph.ecosystem,
            name: &graph.name,
            version: Some(&graph.version),
        });

        let document = SbomDocument {
            name: graph.name.clone(),
            version: graph.version.clone(),
            identity,
            license_class: license.as_deref().and_then(LicenseClass::classify),
            license,
            discovered_license,
            component_type: ComponentType::Library,
            ecosystems: BTreeSet::from([graph.ecosystem]),
            source_path: graph.source_path.clone(),
            generated_at,
            direct_dependencies: dependencies.direct,
            transitive_dependencies: dependencies.transitive,
        };

        info!(
            target: "licensebom::dependencies",
            path = document.source_path.as_str(),
            project = %format!("{}#{}", document.name, document.version),
            direct = document.direct_dependencies.len(),
            transitive = document.transitive_dependencies.len(),
            "assembled sbom"
        );

        document
    }
}
