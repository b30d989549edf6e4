//! 컴포넌트 식별자
//!
//! 같은 (생태계, 이름, 버전)은 같은 salt 아래에서 항상 같은 `i64` 식별자를 가집니다.
//! salt를 고정하면 실행 간에도 식별자가 유지되어 여러 SBOM 사이의 교차 참조에 쓸 수 있습니다.

use sha2::{Digest, Sha256};

use crate::types::Ecosystem;

/// 식별자 계산 대상
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentitySubject<'a> {
    /// 생태계
    pub ecosystem: Ecosystem,
    /// 패키지 이름
    pub name: &'a str,
    /// 버전 (없을 수 있음)
    pub version: Option<&'a str>,
}

/// 식별자 계산 trait
pub trait Fingerprint: Send + Sync {
    /// 대상의 식별자를 계산합니다.
    fn fingerprint(&self, subject: &IdentitySubject<'_>) -> i64;
}

/// SHA-256 기반 식별자
///
/// `salt`, 생태계, 이름, 버전을 NUL 구분자로 이어 해시하고 앞 8바이트를
/// big-endian 부호 있는 `i64`로 읽습니다. 값은 항상 부호 있는 64비트 범위 안에 있습니다.
#[derive(Debug, Clone)]
pub struct ContentFingerprint {
    salt: String,
}

impl ContentFingerprint {
    /// 주어진 salt로 생성합니다.
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    /// 실행마다 새로운 무작위 salt로 생성합니다.
    pub fn per_run() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }

    /// salt가 비어 있으면 실행 단위 salt를, 아니면 주어진 salt를 씁니다.
    pub fn from_salt(salt: &str) -> Self {
        if salt.is_empty() {
            Self::per_run()
        } else {
            Self::new(salt)
        }
    }
}

impl Fingerprint for ContentFingerprint {
    fn fingerprint(&self, subject: &IdentitySubject<'_>) -> i64 {
        let mut hasher = Sha256::new();
        hasher.update(self.salt.as_bytes());
        hasher.update([0]);
        hasher.update(subject.ecosystem.to_string().as_bytes());
        hasher.update([0]);
        hasher.update(subject.name.as_bytes());
        hasher.update([0]);
        // 버전 없음과 빈 버전을 구분
        match subject.version {
            Some(version) => {
                hasher.update([1]);
                hasher.update(version.as_bytes());
            }
            None => hasher.update([0]),
        }
        let digest = hasher.finalize();

        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        i64::from_be_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject<'a>(name: &'a str, version: Option<&'a str>) -> IdentitySubject<'a> {
        IdentitySubject {
            ecosystem: Ecosystem::Npm,
            name,
            version,
        }
    }

    #[test]
    fn same_input_same_identity() {
        let fp = ContentFingerprint::new("salt");
        assert_eq!(
            fp.fingerprint(&subject("a", Some("1.0.0"))),
            fp.fingerprint(&subject("a", Some("1.0.0")))
        );
    }

    #[test]
    fn different_versions_differ() {
        let fp = ContentFingerprint::new("salt");
        assert_ne!(
            fp.fingerprint(&subject("a", Some("1.0.0"))),
            fp.fingerprint(&subject("a", Some("2.0.0")))
        );
    }

    #[test]
    fn missing_version_differs_from_empty_version() {
        let fp = ContentFingerprint::new("salt");
        assert_ne!(
            fp.fingerprint(&subject("a", None)),
            fp.fingerprint(&subject("a", Some("")))
        );
    }

    #[test]
    fn field_boundaries_are_unambiguous() {
        let fp = ContentFingerprint::new("");
        assert_ne!(
            fp.fingerprint(&subject("ab", Some("c"))),
            fp.fingerprint(&subject("a", Some("bc")))
        );
    }

    #[test]
    fn salt_changes_identity() {
        let a = ContentFingerprint::new("one");
        let b = ContentFingerprint::new("two");
        let s = subject("a", Some("1.0.0"));
        assert_ne!(a.fingerprint(&s), b.fingerprint(&s));
    }

    #[test]
    fn high_bit_digest_becomes_negative_identity() {
        // 첫 바이트의 최상위 비트가 켜진 다이제스트가 적어도 하나는 나오는 입력 범위
        let fp = ContentFingerprint::new("fixed");
        let identities: Vec<i64> = (0..64)
            .map(|i| {
                let name = format!("pkg{}", i);
                fp.fingerprint(&subject(&name, Some("1.0.0")))
            })
            .collect();

        let negative = identities.iter().find(|id| **id < 0).copied();
        let id = negative.expect("some digests have the high bit set");

        let json = serde_json::to_string(&id).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_i64(), Some(id));
        assert!(parsed.as_u64().is_none());
    }

    #[test]
    fn identity_matches_leading_digest_bytes() {
        let fp = ContentFingerprint::new("salt");
        let mut hasher = Sha256::new();
        hasher.update(b"salt\0npm\0a\0\x011.0.0");
        let digest = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);

        assert_eq!(
            fp.fingerprint(&subject("a", Some("1.0.0"))),
            i64::from_be_bytes(bytes)
        );
    }

    #[test]
    fn fixed_salt_is_stable_across_instances() {
        let s = subject("left-pad", Some("1.3.0"));
        assert_eq!(
            ContentFingerprint::from_salt("fixed").fingerprint(&s),
            ContentFingerprint::from_salt("fixed").fingerprint(&s)
        );
    }
}
