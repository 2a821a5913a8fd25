/*
 * proptest.rs
 *
 * property-based tests for parsing functions.
 * generates thousands of inputs to find edge cases.
 */

use proptest::prelude::*;
use std::time::Duration;

use sigfuzz::duration::parse_duration;
use sigfuzz::error::ConfigError;
use sigfuzz::process::parse_pid;
use sigfuzz::signal::{self, Signal, parse_signal};

/* ============================================================================
 * Duration Parsing Properties
 * ============================================================================ */

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn duration_bare_number_is_seconds(secs in 0u64..1_000_000) {
        let d = parse_duration(&secs.to_string()).expect("bare seconds should parse");
        prop_assert_eq!(d, Duration::from_secs(secs));
    }

    #[test]
    fn duration_valid_milliseconds_parse(ms in 0u64..1_000_000) {
        let d = parse_duration(&format!("{ms}ms")).expect("valid milliseconds should parse");
        prop_assert_eq!(d, Duration::from_millis(ms));
    }

    #[test]
    fn duration_valid_microseconds_parse(us in 0u64..1_000_000) {
        let d = parse_duration(&format!("{us}us")).expect("valid microseconds should parse");
        prop_assert_eq!(d, Duration::from_micros(us));
    }

    #[test]
    fn duration_compound_sums(mins in 0u64..1000, secs in 0u64..60, ms in 0u64..1000) {
        let s = format!("{mins}m{secs}s{ms}ms");
        let d = parse_duration(&s).expect("compound duration should parse");
        prop_assert_eq!(d, Duration::from_secs(mins * 60 + secs) + Duration::from_millis(ms));
    }

    #[test]
    fn duration_negative_rejected(ms in 1u64..1_000_000) {
        let input = format!("-{ms}ms");
        let is_err = parse_duration(&input).is_err();
        prop_assert!(is_err);
    }

    #[test]
    fn duration_never_panics(s in "\\PC{0,20}") {
        let _ = parse_duration(&s);
    }

    #[test]
    fn duration_unknown_unit_rejected(n in 1u64..1000, unit in "[a-z&&[^dhmnsu]]{1,3}") {
        let input = format!("{n}{unit}");
        let is_err = parse_duration(&input).is_err();
        prop_assert!(is_err);
    }
}

/* ============================================================================
 * Signal Parsing Properties
 * ============================================================================ */

/* flip the case of each byte where the mask says so */
fn mix_case(s: &str, mask: &[bool]) -> String {
    s.chars()
        .zip(mask.iter().cycle())
        .map(|(c, &upper)| {
            if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn signal_names_case_insensitive(
        idx in 0usize..signal::all().count(),
        mask in prop::collection::vec(any::<bool>(), 1..12),
        prefixed in any::<bool>(),
    ) {
        let (name, sig) = signal::all().nth(idx).unwrap();
        let bare = &name[3..];
        let token = if prefixed { mix_case(name, &mask) } else { mix_case(bare, &mask) };
        prop_assert_eq!(parse_signal(&token).unwrap(), sig);
    }

    #[test]
    fn signal_numbers_pass_through(n in any::<i32>()) {
        /* raw numbers aren't checked against the table */
        prop_assert_eq!(parse_signal(&n.to_string()).unwrap(), Signal::from_raw(n));
    }

    #[test]
    fn signal_name_round_trips(idx in 0usize..signal::all().count()) {
        let (name, sig) = signal::all().nth(idx).unwrap();
        prop_assert_eq!(sig.name(), Some(name));
        prop_assert_eq!(sig.to_string(), name);
    }

    #[test]
    fn signal_garbage_is_unknown(s in "[A-Za-z]{1,4}_[A-Za-z0-9]{0,4}") {
        /* no signal name has an underscore */
        let is_unknown = matches!(parse_signal(&s), Err(ConfigError::UnknownSignal(_)));
        prop_assert!(is_unknown);
    }

    #[test]
    fn signal_never_panics(s in "\\PC{0,20}") {
        let _ = parse_signal(&s);
    }
}

/* ============================================================================
 * Pid Parsing Properties
 * ============================================================================ */

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn pid_positive_accepted(n in 1i32..=i32::MAX) {
        prop_assert_eq!(parse_pid(&n.to_string()).unwrap().as_raw(), n);
    }

    #[test]
    fn pid_non_positive_unresolvable(n in i32::MIN..=0) {
        let is_unresolvable = matches!(
            parse_pid(&n.to_string()),
            Err(ConfigError::UnresolvablePid { .. })
        );
        prop_assert!(is_unresolvable);
    }

    #[test]
    fn pid_out_of_range_unresolvable(n in (i64::from(i32::MAX) + 1)..i64::MAX) {
        let is_unresolvable = matches!(
            parse_pid(&n.to_string()),
            Err(ConfigError::UnresolvablePid { .. })
        );
        prop_assert!(is_unresolvable);
    }

    #[test]
    fn pid_non_numeric_invalid(s in "[a-zA-Z][a-zA-Z0-9]{0,8}") {
        let is_invalid = matches!(parse_pid(&s), Err(ConfigError::InvalidPid(_)));
        prop_assert!(is_invalid);
    }
}
