//! lockfile 추출기
//!
//! [`LockfileExtractor`] trait은 각 생태계의 lockfile을 읽어 정규화 이전의
//! [`RawGraph`]를 만드는 인터페이스입니다. 이름 추출, 범위 결정, 직접/전이
//! 분류는 [`DependencyPartitioner`](crate::partition::DependencyPartitioner)의 몫입니다.
//!
//! # 지원 형식
//!
//! - `package-lock.json` (lockfileVersion 2, 3) -- [`NpmLockExtractor`](npm::NpmLockExtractor)
//!
//! # 확장
//!
//! 새로운 형식을 지원하려면 `LockfileExtractor`를 구현하고
//! [`SbomPipelineBuilder::extractor`](crate::pipeline::SbomPipelineBuilder::extractor)로 등록합니다.

pub mod npm;

use std::collections::BTreeMap;

use crate::error::SbomBuilderError;
use crate::types::Ecosystem;

/// lockfile 추출기 trait
pub trait LockfileExtractor: Send + Sync {
    /// 이 추출기가 담당하는 생태계를 반환합니다.
    fn ecosystem(&self) -> Ecosystem;

    /// lockfile 내용을 읽어 원시 그래프를 반환합니다.
    ///
    /// # Arguments
    ///
    /// - `content`: lockfile 파일 내용 (UTF-8 문자열)
    /// - `source_path`: 루트 기준 lockfile 경로 (에러 메시지와 출력용)
    fn extract(&self, content: &str, source_path: &str) -> Result<RawGraph, SbomBuilderError>;
}

/// lockfile의 패키지 항목 하나 (정규화 이전)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPackageEntry {
    /// lockfile 키 (예: "node_modules/a/node_modules/b", 루트는 "")
    pub key: String,
    /// 설치된 버전
    pub version: Option<String>,
    /// 선언된 라이선스
    pub declared_license: Option<String>,
    /// 개발 전용 여부
    pub dev: bool,
    /// 직접 의존성 (이름 -> 버전 범위)
    pub dependencies: BTreeMap<String, String>,
    /// 개발 의존성 (이름 -> 버전 범위)
    pub dev_dependencies: BTreeMap<String, String>,
}

impl RawPackageEntry {
    /// 직접 의존성 이름 집합 (dependencies ∪ devDependencies)
    pub fn direct_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .keys()
            .chain(self.dev_dependencies.keys())
            .map(String::as_str)
    }
}

/// lockfile 하나에서 추출한 원시 패키지 그래프
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGraph {
    /// 생태계
    pub ecosystem: Ecosystem,
    /// 루트 기준 lockfile 경로
    pub source_path: String,
    /// 프로젝트 이름
    pub name: String,
    /// 프로젝트 버전
    pub version: String,
    /// 루트 항목 (키 "")
    pub root: RawPackageEntry,
    /// 루트를 제외한 항목 (lockfile 문서 순서, 중복 키 포함)
    pub entries: Vec<RawPackageEntry>,
}

impl RawGraph {
    /// 루트를 제외한 항목 수
    pub fn package_count(&self) -> usize {
        self.entries.len()
    }
}
