//! package-lock.json 추출기
//!
//! [`NpmLockExtractor`]는 npm의 package-lock.json (lockfileVersion 2, 3)을 읽어
//! [`RawGraph`]를 만듭니다. `packages` 맵은 문서 순서 그대로, 중복 키까지 보존합니다.
//!
//! # package-lock.json v3 형식 예시
//!
//! ```json
//! {
//!   "name": "my-app",
//!   "version": "1.0.0",
//!   "lockfileVersion": 3,
//!   "packages": {
//!     "": { "name": "my-app", "version": "1.0.0", "license": "MIT", "dependencies": { "a": "^1.0.0" } },
//!     "node_modules/a": { "version": "1.0.0", "license": "ISC" }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use tracing::warn;

use crate::error::SbomBuilderError;
use crate::parser::{LockfileExtractor, RawGraph, RawPackageEntry};
use crate::types::Ecosystem;

/// 지원하는 lockfileVersion
const SUPPORTED_LOCKFILE_VERSIONS: [u64; 2] = [2, 3];

/// package-lock.json 추출기
pub struct NpmLockExtractor;

/// package-lock.json 구조 (파싱용)
#[derive(Deserialize)]
struct NpmLockFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default, rename = "lockfileVersion")]
    lockfile_version: Option<u64>,
    #[serde(default, deserialize_with = "ordered_packages")]
    packages: Option<Vec<(String, NpmPackageEntry)>>,
}

/// package-lock.json 내 개별 패키지 (파싱용)
#[derive(Deserialize)]
struct NpmPackageEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    license: Option<LicenseField>,
    #[serde(default)]
    dev: bool,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, String>,
}

/// `license` 필드의 여러 표기
///
/// 오래된 패키지는 `{"type": "MIT"}` 객체나 그 배열을 씁니다.
#[derive(Deserialize)]
#[serde(untagged)]
enum LicenseField {
    Spdx(String),
    Object {
        #[serde(rename = "type")]
        kind: String,
    },
    List(Vec<LicenseField>),
    Other(serde::de::IgnoredAny),
}

impl LicenseField {
    fn into_expression(self) -> Option<String> {
        match self {
            Self::Spdx(id) | Self::Object { kind: id } => {
                let id = id.trim();
                (!id.is_empty()).then(|| id.to_owned())
            }
            Self::List(items) => {
                let ids: Vec<String> = items
                    .into_iter()
                    .filter_map(LicenseField::into_expression)
                    .collect();
                match ids.len() {
                    0 => None,
                    1 => ids.into_iter().next(),
                    _ => Some(format!("({})", ids.join(" OR "))),
                }
            }
            Self::Other(_) => None,
        }
    }
}

/// `packages` 맵을 문서 순서대로 (키, 항목) 목록으로 읽습니다.
fn ordered_packages<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<(String, NpmPackageEntry)>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PackagesVisitor;

    impl<'de> Visitor<'de> for PackagesVisitor {
        type Value = Vec<(String, NpmPackageEntry)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of package paths to package entries")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, entry)) = map.next_entry::<String, NpmPackageEntry>()? {
                entries.push((key, entry));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(PackagesVisitor).map(Some)
}

impl NpmPackageEntry {
    fn into_raw(self, key: String) -> RawPackageEntry {
        RawPackageEntry {
            key,
            version: self.version,
            declared_license: self.license.and_then(LicenseField::into_expression),
            dev: self.dev,
            dependencies: self.dependencies,
            dev_dependencies: self.dev_dependencies,
        }
    }
}

impl LockfileExtractor for NpmLockExtractor {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }

    fn extract(&self, content: &str, source_path: &str) -> Result<RawGraph, SbomBuilderError> {
        let malformed = |reason: String| SbomBuilderError::MalformedLockfile {
            path: source_path.to_owned(),
            reason,
        };

        let lock_file: NpmLockFile =
            serde_json::from_str(content).map_err(|e| malformed(e.to_string()))?;

        let version = lock_file
            .lockfile_version
            .ok_or_else(|| malformed("missing lockfileVersion".to_owned()))?;
        if !SUPPORTED_LOCKFILE_VERSIONS.contains(&version) {
            return Err(SbomBuilderError::UnsupportedSchema {
                path: source_path.to_owned(),
                version,
            });
        }

        let packages = lock_file
            .packages
            .ok_or_else(|| malformed("missing packages map".to_owned()))?;

        let mut root: Option<(Option<String>, RawPackageEntry)> = None;
        let mut entries = Vec::with_capacity(packages.len());

        for (key, entry) in packages {
            if key.is_empty() {
                if root.is_some() {
                    warn!(
                        target: "licensebom::extracting",
                        path = source_path,
                        "duplicate root package entry, ignoring"
                    );
                    continue;
                }
                let name = entry.name.clone();
                root = Some((name, entry.into_raw(key)));
                continue;
            }

            if key.trim().is_empty() {
                warn!(
                    target: "licensebom::extracting",
                    path = source_path,
                    key = key.as_str(),
                    "blank package key, skipping"
                );
                continue;
            }

            entries.push(entry.into_raw(key));
        }

        let (root_name, root) = root.ok_or_else(|| malformed("missing root package entry".to_owned()))?;

        let name = lock_file
            .name
            .or(root_name)
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| malformed("missing required field 'name'".to_owned()))?;
        let project_version = lock_file
            .version
            .or_else(|| root.version.clone())
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| malformed("missing required field 'version'".to_owned()))?;

        Ok(RawGraph {
            ecosystem: Ecosystem::Npm,
            source_path: source_path.to_owned(),
            name,
            version: project_version,
            root,
            entries,
        })
    }
}
