#![no_main]

use libfuzzer_sys::fuzz_target;
use licensebom_sbom::{LicenseIdentifier, SpdxTagIdentifier};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    if let Some(found) = SpdxTagIdentifier.identify(&text) {
        assert!(!found.license.is_empty());
    }
});
