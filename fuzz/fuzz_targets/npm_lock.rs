#![no_main]

use libfuzzer_sys::fuzz_target;
use licensebom_sbom::{LockfileExtractor, NpmLockExtractor};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(graph) = NpmLockExtractor.extract(content, "fuzz/package-lock.json") {
            // 루트 항목은 entries에 다시 나타나지 않는다
            assert!(graph.entries.iter().all(|e| !e.key.is_empty()));
        }
    }
});
