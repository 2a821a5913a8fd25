/*
 * fuzz_targets/parse_config.rs
 *
 * arbitrary YAML through the config file parser. serde_yaml errors are
 * fine, panics aren't.
 */

#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = core::str::from_utf8(data) {
        let _ = sigfuzz::config::FileConfig::parse(Path::new("fuzz.yaml"), s);
    }
});
