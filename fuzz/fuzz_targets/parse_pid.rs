/*
 * fuzz_targets/parse_pid.rs
 *
 * parse_pid never panics and never hands back a pid that would address a
 * process group (0 or negative).
 */

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = core::str::from_utf8(data) {
        if let Ok(pid) = sigfuzz::process::parse_pid(s) {
            assert!(pid.as_raw() > 0);
        }
    }
});
