#![no_main]

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use licensebom_sbom::{
    ContentFingerprint, DependencyPartitioner, Ecosystem, NameCollision, RawGraph,
    RawPackageEntry, SbomAssembler,
};

/// 퍼저용 구조적 lockfile 입력
#[derive(Arbitrary, Debug)]
struct FuzzGraph {
    root_deps: Vec<String>,
    root_dev_deps: Vec<String>,
    entries: Vec<FuzzEntry>,
    dedupe: bool,
}

#[derive(Arbitrary, Debug)]
struct FuzzEntry {
    /// node_modules 경로 세그먼트
    segments: Vec<String>,
    version: Option<String>,
    license: Option<String>,
    dev: bool,
}

fn names(raw: &[String]) -> BTreeMap<String, String> {
    raw.iter()
        .take(32)
        .map(|n| (n.clone(), "*".to_owned()))
        .collect()
}

fuzz_target!(|input: FuzzGraph| {
    let entries: Vec<RawPackageEntry> = input
        .entries
        .iter()
        .take(100)
        .filter(|e| !e.segments.is_empty())
        .map(|e| RawPackageEntry {
            key: e
                .segments
                .iter()
                .take(4)
                .map(|s| format!("node_modules/{s}"))
                .collect::<Vec<_>>()
                .join("/"),
            version: e.version.clone(),
            declared_license: e.license.clone(),
            dev: e.dev,
            ..RawPackageEntry::default()
        })
        .collect();

    let graph = RawGraph {
        ecosystem: Ecosystem::Npm,
        source_path: "fuzz/package-lock.json".to_owned(),
        name: "fuzz".to_owned(),
        version: "0.0.0".to_owned(),
        root: RawPackageEntry {
            dependencies: names(&input.root_deps),
            dev_dependencies: names(&input.root_dev_deps),
            ..RawPackageEntry::default()
        },
        entries,
    };

    let fingerprint = Arc::new(ContentFingerprint::new("fuzz"));
    let collision = if input.dedupe {
        NameCollision::Dedupe
    } else {
        NameCollision::Keep
    };
    let partitioned = DependencyPartitioner::new(fingerprint.clone(), collision).partition(&graph);

    // 직접/전이 분류는 서로소여야 한다
    let direct: HashSet<_> = partitioned
        .direct
        .iter()
        .map(|r| (r.name.clone(), r.version.clone()))
        .collect();
    if !input.dedupe {
        assert_eq!(partitioned.len(), graph.entries.len());
    } else {
        assert!(partitioned
            .transitive
            .iter()
            .all(|r| !direct.contains(&(r.name.clone(), r.version.clone()))));
    }

    let document = SbomAssembler::new(fingerprint).assemble(&graph, partitioned, None);
    let json = serde_json::to_string(&document).expect("document must serialize");
    let _: serde_json::Value = serde_json::from_str(&json).expect("document must be valid JSON");
});
