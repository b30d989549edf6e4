//! 도메인 타입 -- SBOM 문서와 의존성 레코드
//!
//! 직렬화 형식은 필드 선언 순서를 그대로 따르며, 열거형은 소문자 문자열,
//! 타임스탬프는 ISO-8601 UTC로 출력됩니다.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 패키지 생태계 (패키지 관리자)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// JavaScript/TypeScript (package-lock.json)
    Npm,
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Npm => write!(f, "npm"),
        }
    }
}

impl Ecosystem {
    /// 문자열에서 생태계를 파싱합니다 (대소문자 구분 없음).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "npm" | "node" | "javascript" | "js" => Some(Self::Npm),
            _ => None,
        }
    }
}

/// 의존성 범위
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyScope {
    /// 빌드/실행에 필요한 의존성
    Compile,
    /// 실행 환경이 제공하는 의존성
    Provided,
    /// 실행 시에만 필요한 의존성
    Runtime,
    /// 개발/테스트 전용 의존성
    Test,
}

impl DependencyScope {
    /// lockfile의 dev 플래그로부터 범위를 결정합니다.
    pub fn from_dev_flag(dev: bool) -> Self {
        if dev { Self::Test } else { Self::Compile }
    }
}

impl fmt::Display for DependencyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compile => write!(f, "compile"),
            Self::Provided => write!(f, "provided"),
            Self::Runtime => write!(f, "runtime"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// 컴포넌트 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    /// 라이브러리
    #[default]
    Library,
}

/// 라이선스 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LicenseClass {
    /// MIT, Apache-2.0, BSD 계열 등
    Permissive,
    /// LGPL, MPL, EPL 등 파일/라이브러리 단위 copyleft
    WeakCopyleft,
    /// GPL, AGPL 등
    StrongCopyleft,
    /// CC0, Unlicense 등
    PublicDomain,
}

impl LicenseClass {
    /// SPDX 식별자(대소문자 무관)를 분류합니다. 알 수 없는 식별자는 `None`입니다.
    ///
    /// `(MIT OR Apache-2.0)` 같은 표현식은 분류하지 않습니다.
    pub fn classify(license: &str) -> Option<Self> {
        let lowered = license.trim().to_lowercase();
        let id = lowered.strip_suffix("-only").unwrap_or(&lowered);
        let id = id.strip_suffix("-or-later").unwrap_or(id);
        let id = id.strip_suffix('+').unwrap_or(id);

        match id {
            "mit" | "mit-0" | "isc" | "apache-2.0" | "apache-1.1" | "bsd-2-clause"
            | "bsd-3-clause" | "0bsd" | "zlib" | "blueoak-1.0.0" | "python-2.0" | "artistic-2.0"
            | "x11" => Some(Self::Permissive),
            "lgpl-2.0" | "lgpl-2.1" | "lgpl-3.0" | "mpl-1.1" | "mpl-2.0" | "epl-1.0"
            | "epl-2.0" | "cddl-1.0" | "cddl-1.1" => Some(Self::WeakCopyleft),
            "gpl-2.0" | "gpl-3.0" | "agpl-3.0" | "sspl-1.0" | "eupl-1.2" => {
                Some(Self::StrongCopyleft)
            }
            "cc0-1.0" | "unlicense" | "wtfpl" => Some(Self::PublicDomain),
            _ => None,
        }
    }
}

impl fmt::Display for LicenseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permissive => write!(f, "permissive"),
            Self::WeakCopyleft => write!(f, "weak-copyleft"),
            Self::StrongCopyleft => write!(f, "strong-copyleft"),
            Self::PublicDomain => write!(f, "public-domain"),
        }
    }
}

/// LICENSE 파일 식별 방법
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LicenseMethod {
    /// `SPDX-License-Identifier:` 태그
    SpdxTag,
    /// 알려진 라이선스 제목 문구
    Title,
}

/// LICENSE 파일에서 식별된 라이선스
///
/// 선언된 라이선스를 덮어쓰지 않고 별도로 기록되어, 소비자가 불일치를 감지할 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredLicense {
    /// 소문자 라이선스 식별자 (예: "mit")
    pub license: String,
    /// 라이선스 분류
    pub license_class: Option<LicenseClass>,
    /// 식별 방법
    pub method: LicenseMethod,
    /// 루트 기준 LICENSE 파일 경로
    pub source_path: String,
}

/// 정규화된 의존성 레코드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRecord {
    /// 패키지 이름 (lockfile 키의 마지막 경로 세그먼트)
    pub name: String,
    /// 설치된 버전 (workspace 링크 항목은 없을 수 있음)
    pub version: Option<String>,
    /// 실행 단위로 안정적인 식별자
    pub identity: i64,
    /// 선언된 라이선스
    pub declared_license: Option<String>,
    /// 선언된 라이선스 분류
    pub declared_license_class: Option<LicenseClass>,
    /// 컴포넌트 종류
    pub component_type: ComponentType,
    /// 의존성 범위
    pub scope: DependencyScope,
    /// 생태계
    pub ecosystem: Ecosystem,
    /// 루트 기준 lockfile 경로
    pub source_path: String,
    /// 이 패키지의 직접 의존성 (이름 -> 버전 범위)
    pub direct_dependencies: BTreeMap<String, String>,
}

impl fmt::Display for DependencyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{} ({}, {})",
            self.name,
            self.version.as_deref().unwrap_or("?"),
            self.ecosystem,
            self.scope,
        )
    }
}

/// 조립된 SBOM 문서
///
/// lockfile 하나당 하나가 생성되며, 조립 이후에는 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbomDocument {
    /// 프로젝트 이름
    pub name: String,
    /// 프로젝트 버전
    pub version: String,
    /// 문서 식별자
    pub identity: i64,
    /// 루트 패키지가 선언한 라이선스 (소문자)
    pub license: Option<String>,
    /// 선언된 라이선스 분류
    pub license_class: Option<LicenseClass>,
    /// LICENSE 파일에서 식별된 라이선스
    pub discovered_license: Option<DiscoveredLicense>,
    /// 컴포넌트 종류
    pub component_type: ComponentType,
    /// 생태계 집합
    pub ecosystems: BTreeSet<Ecosystem>,
    /// 루트 기준 lockfile 경로
    pub source_path: String,
    /// 생성 시각 (UTC)
    pub generated_at: DateTime<Utc>,
    /// 직접 의존성
    pub direct_dependencies: Vec<DependencyRecord>,
    /// 전이 의존성
    pub transitive_dependencies: Vec<DependencyRecord>,
}

impl SbomDocument {
    /// 전체 의존성 수를 반환합니다.
    pub fn dependency_count(&self) -> usize {
        self.direct_dependencies.len() + self.transitive_dependencies.len()
    }
}

impl fmt::Display for SbomDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SbomDocument({}#{}, direct={}, transitive={})",
            self.name,
            self.version,
            self.direct_dependencies.len(),
            self.transitive_dependencies.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ecosystem_display_and_parse() {
        assert_eq!(Ecosystem::Npm.to_string(), "npm");
        assert_eq!(Ecosystem::from_str_loose("Node"), Some(Ecosystem::Npm));
        assert_eq!(Ecosystem::from_str_loose("cargo"), None);
    }

    #[test]
    fn scope_follows_dev_flag() {
        assert_eq!(DependencyScope::from_dev_flag(true), DependencyScope::Test);
        assert_eq!(DependencyScope::from_dev_flag(false), DependencyScope::Compile);
    }

    #[test]
    fn enums_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&DependencyScope::Compile).unwrap(),
            "\"compile\""
        );
        assert_eq!(
            serde_json::to_string(&ComponentType::Library).unwrap(),
            "\"library\""
        );
        assert_eq!(
            serde_json::to_string(&LicenseClass::WeakCopyleft).unwrap(),
            "\"weak-copyleft\""
        );
        assert_eq!(
            serde_json::to_string(&LicenseMethod::SpdxTag).unwrap(),
            "\"spdx-tag\""
        );
    }

    #[test]
    fn classify_known_licenses() {
        assert_eq!(LicenseClass::classify("MIT"), Some(LicenseClass::Permissive));
        assert_eq!(
            LicenseClass::classify("apache-2.0"),
            Some(LicenseClass::Permissive)
        );
        assert_eq!(
            LicenseClass::classify("GPL-3.0-or-later"),
            Some(LicenseClass::StrongCopyleft)
        );
        assert_eq!(
            LicenseClass::classify("LGPL-2.1-only"),
            Some(LicenseClass::WeakCopyleft)
        );
        assert_eq!(
            LicenseClass::classify("CC0-1.0"),
            Some(LicenseClass::PublicDomain)
        );
    }

    #[test]
    fn classify_unknown_or_expression_is_none() {
        assert_eq!(LicenseClass::classify("SEE LICENSE IN LICENSE.md"), None);
        assert_eq!(LicenseClass::classify("(MIT OR Apache-2.0)"), None);
        assert_eq!(LicenseClass::classify(""), None);
    }

    #[test]
    fn record_display() {
        let record = DependencyRecord {
            name: "left-pad".to_owned(),
            version: Some("1.3.0".to_owned()),
            identity: 7,
            declared_license: Some("MIT".to_owned()),
            declared_license_class: Some(LicenseClass::Permissive),
            component_type: ComponentType::Library,
            scope: DependencyScope::Compile,
            ecosystem: Ecosystem::Npm,
            source_path: "package-lock.json".to_owned(),
            direct_dependencies: BTreeMap::new(),
        };
        assert_eq!(record.to_string(), "left-pad#1.3.0 (npm, compile)");
    }

    #[test]
    fn record_serializes_camel_case_in_declared_order() {
        let record = DependencyRecord {
            name: "a".to_owned(),
            version: None,
            identity: 1,
            declared_license: None,
            declared_license_class: None,
            component_type: ComponentType::Library,
            scope: DependencyScope::Test,
            ecosystem: Ecosystem::Npm,
            source_path: "package-lock.json".to_owned(),
            direct_dependencies: BTreeMap::new(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"name":"a","version":null,"identity":1,"declaredLicense":null,"declaredLicenseClass":null,"componentType":"library","scope":"test","ecosystem":"npm","sourcePath":"package-lock.json","directDependencies":{}}"#
        );
    }
}
