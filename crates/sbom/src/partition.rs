//! 직접/전이 의존성 분류
//!
//! [`DependencyPartitioner`]는 [`RawGraph`]의 루트 이외 항목을 [`DependencyRecord`]로
//! 정규화하고, 루트가 선언한 직접 의존성 이름에 속하는지로 두 목록에 나눕니다.
//!
//! - 이름: lockfile 키의 마지막 `/` 이후 (스코프 패키지는 스코프가 잘림)
//! - 범위: `dev` 플래그면 `test`, 아니면 `compile`
//! - 두 목록은 서로소이며 합집합은 비어 있지 않은 키의 전체 항목과 같습니다
//!   (이름 충돌 정책이 `keep`일 때).

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::config::NameCollision;
use crate::identity::{Fingerprint, IdentitySubject};
use crate::parser::{RawGraph, RawPackageEntry};
use crate::types::{ComponentType, DependencyRecord, DependencyScope, LicenseClass};

/// 분류 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionedDependencies {
    /// 루트가 직접 선언한 의존성 (lockfile 순서)
    pub direct: Vec<DependencyRecord>,
    /// 나머지 의존성 (lockfile 순서)
    pub transitive: Vec<DependencyRecord>,
}

impl PartitionedDependencies {
    /// 전체 레코드 수
    pub fn len(&self) -> usize {
        self.direct.len() + self.transitive.len()
    }

    /// 레코드가 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.transitive.is_empty()
    }
}

/// lockfile 키에서 패키지 이름을 추출합니다.
///
/// 마지막 `/` 이후 부분을 사용합니다. `/`가 없으면 키 전체입니다.
pub fn package_name(key: &str) -> &str {
    key.rsplit_once('/').map_or(key, |(_, name)| name)
}

/// 의존성 분류기
pub struct DependencyPartitioner {
    fingerprint: Arc<dyn Fingerprint>,
    collision: NameCollision,
}

impl DependencyPartitioner {
    /// 새 분류기를 생성합니다.
    pub fn new(fingerprint: Arc<dyn Fingerprint>, collision: NameCollision) -> Self {
        Self {
            fingerprint,
            collision,
        }
    }

    /// 원시 그래프를 직접/전이 의존성으로 나눕니다.
    pub fn partition(&self, graph: &RawGraph) -> PartitionedDependencies {
        let direct_names: HashSet<&str> = graph.root.direct_names().collect();
        let mut seen: BTreeSet<(String, Option<String>)> = BTreeSet::new();
        let mut result = PartitionedDependencies::default();

        for entry in graph.entries.iter().filter(|e| !e.key.trim().is_empty()) {
            let record = self.to_record(graph, entry);

            if self.collision == NameCollision::Dedupe
                && !seen.insert((record.name.clone(), record.version.clone()))
            {
                debug!(
                    target: "licensebom::dependencies",
                    key = entry.key.as_str(),
                    dependency = %record,
                    "duplicate name and version, dropping"
                );
                continue;
            }

            debug!(
                target: "licensebom::identification",
                dependency = %record,
                identity = record.identity,
                "identified library"
            );

            if direct_names.contains(record.name.as_str()) {
                result.direct.push(record);
            } else {
                result.transitive.push(record);
            }
        }

        debug!(
            target: "licensebom::dependencies",
            path = graph.source_path.as_str(),
            direct = result.direct.len(),
            transitive = result.transitive.len(),
            "partitioned dependencies"
        );

        result
    }

    fn to_record(&self, graph: &RawGraph, entry: &RawPackageEntry) -> DependencyRecord {
        let name = package_name(&entry.key).to_owned();
        let identity = self.fingerprint.fingerprint(&IdentitySubject {
            ecosystem: graph.ecosystem,
            name: &name,
            version: entry.version.as_deref(),
        });

        DependencyRecord {
            identity,
            version: entry.version.clone(),
            declared_license_class: entry
                .declared_license
                .as_deref()
                .and_then(LicenseClass::classify),
            declared_license: entry.declared_license.clone(),
            component_type: ComponentType::Library,
            scope: DependencyScope::from_dev_flag(entry.dev),
            ecosystem: graph.ecosystem,
            source_path: graph.source_path.clone(),
            direct_dependencies: entry.dependencies.clone(),
            name,
        }
    }
}
