#![no_main]

use libfuzzer_sys::fuzz_target;
use relink::infrastructure::manifest::parse_manifest;

fuzz_target!(|data: &[u8]| {
    // A live manifest comes from the target host and is untrusted
    if let Ok(manifest) = parse_manifest(data, "fuzz") {
        let _ = relink::compute_delta(&manifest, &relink::Manifest::empty());
        let _ = manifest.total_size();
    }
});
