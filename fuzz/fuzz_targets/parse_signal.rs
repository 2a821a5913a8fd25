/*
 * fuzz_targets/parse_signal.rs
 *
 * parse_signal never panics, and any name it accepts maps back to a
 * signal whose Display is non-empty.
 *
 * edge cases: "SIG", "sig", "SIGé", "  term  ", "-2147483648"
 */

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = core::str::from_utf8(data) {
        if let Ok(sig) = sigfuzz::signal::parse_signal(s) {
            assert!(!sig.to_string().is_empty());
        }
    }
});
