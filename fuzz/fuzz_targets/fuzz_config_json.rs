//! Fuzz target: `ControllerConfig::from_json`
//!
//! Arbitrary text must either be rejected with an error or yield a
//! configuration that passes validation.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use garagedoor::config::ControllerConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = ControllerConfig::from_json(text) {
        assert!(config.validate().is_ok());
        assert!(config.tick_period_ms < config.door_config().timeout_ms);
    }
});
