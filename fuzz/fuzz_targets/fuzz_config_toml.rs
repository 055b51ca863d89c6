#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // deploy.toml parsing and validation should never panic
        if let Ok(config) = toml::from_str::<relink::Config>(content) {
            let _ = config.with_default_environments().validate();
        }
    }
});
