//! LICENSE 파일 식별
//!
//! [`LicenseIdentifier`]는 LICENSE 파일 본문에서 라이선스 식별자를 찾는 인터페이스입니다.
//! 기본 구현 [`SpdxTagIdentifier`]는 `SPDX-License-Identifier:` 태그를 먼저 찾고,
//! 없으면 파일 앞부분의 알려진 제목 문구로 판별합니다. 결과는 항상 소문자입니다.

use crate::types::LicenseMethod;

/// 제목을 찾을 때 살펴보는 비어 있지 않은 앞줄 수
const TITLE_SCAN_LINES: usize = 5;

/// SPDX 태그 접두사
const SPDX_TAG: &str = "spdx-license-identifier:";

/// 식별 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseMatch {
    /// 소문자 라이선스 식별자
    pub license: String,
    /// 식별 방법
    pub method: LicenseMethod,
}

/// LICENSE 파일 식별 trait
pub trait LicenseIdentifier: Send + Sync {
    /// 본문에서 라이선스를 식별합니다. 알 수 없으면 `None`입니다.
    fn identify(&self, text: &str) -> Option<LicenseMatch>;
}

/// 알려진 라이선스 제목 (제목 문구, 본문 추가 조건, 식별자)
///
/// 더 구체적인 제목이 먼저 와야 합니다.
const TITLES: &[(&str, Option<&str>, &str)] = &[
    ("gnu affero general public license", None, "agpl-3.0"),
    ("gnu lesser general public license", Some("version 3"), "lgpl-3.0"),
    ("gnu lesser general public license", Some("version 2.1"), "lgpl-2.1"),
    ("gnu general public license", Some("version 3"), "gpl-3.0"),
    ("gnu general public license", Some("version 2"), "gpl-2.0"),
    ("mozilla public license version 2.0", None, "mpl-2.0"),
    ("mozilla public license, version 2.0", None, "mpl-2.0"),
    ("apache license", Some("version 2.0"), "apache-2.0"),
    ("eclipse public license - v 2.0", None, "epl-2.0"),
    ("bsd 3-clause license", None, "bsd-3-clause"),
    ("bsd 2-clause license", None, "bsd-2-clause"),
    ("isc license", None, "isc"),
    ("mit license", None, "mit"),
    ("the mit license", None, "mit"),
    ("this is free and unencumbered software", None, "unlicense"),
    ("the unlicense", None, "unlicense"),
    ("creative commons legal code", Some("cc0 1.0 universal"), "cc0-1.0"),
];

/// SPDX 태그 우선, 제목 문구 차선으로 식별하는 기본 구현
#[derive(Debug, Clone, Copy, Default)]
pub struct SpdxTagIdentifier;

impl SpdxTagIdentifier {
    fn from_tag(text: &str) -> Option<String> {
        text.lines().find_map(|line| {
            let lowered = line.trim().to_lowercase();
            let start = lowered.find(SPDX_TAG)?;
            let id = lowered[start + SPDX_TAG.len()..]
                .trim()
                .trim_end_matches("*/")
                .trim();
            (!id.is_empty()).then(|| id.to_owned())
        })
    }

    fn from_title(text: &str) -> Option<String> {
        let lowered = text.to_lowercase();
        let head: Vec<&str> = lowered
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .take(TITLE_SCAN_LINES)
            .collect();

        TITLES.iter().find_map(|(title, extra, id)| {
            let titled = head.iter().any(|line| line.starts_with(title));
            let confirmed = extra.is_none_or(|needle| lowered.contains(needle));
            (titled && confirmed).then(|| (*id).to_owned())
        })
    }
}

impl LicenseIdentifier for SpdxTagIdentifier {
    fn identify(&self, text: &str) -> Option<LicenseMatch> {
        if let Some(license) = Self::from_tag(text) {
            return Some(LicenseMatch {
                license,
                method: LicenseMethod::SpdxTag,
            });
        }
        Self::from_title(text).map(|license| LicenseMatch {
            license,
            method: LicenseMethod::Title,
        })
    }
}
