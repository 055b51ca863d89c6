#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(id) = std::str::from_utf8(data) {
        // Accepted IDs end up in paths and shell scripts
        if let Ok(id) = relink::ReleaseId::parse(id) {
            assert!(!id.as_str().contains('/'));
            assert!(!id.as_str().contains('\''));
        }
    }
});
