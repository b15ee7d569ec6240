#![no_main]

use framejank::config::ThresholdConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Anything that parses must also have passed validation
        if let Ok(config) = ThresholdConfig::from_toml_str(input) {
            assert!(config.validate().is_ok());
        }
    }
});
