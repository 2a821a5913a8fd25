/*
 * fuzz_targets/parse_duration.rs
 *
 * parse_duration must come back with Ok or Err, never panic. Compound
 * values make this more interesting than it looks: "1.5.5ms", "9e999s",
 * "µµs", numbers that sum past u64 nanoseconds.
 */

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = core::str::from_utf8(data) {
        if let Ok(d) = sigfuzz::duration::parse_duration(s) {
            /* everything is summed in u64 nanoseconds */
            assert!(d.as_nanos() <= u128::from(u64::MAX));
        }
    }
});
