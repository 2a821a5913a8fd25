/*
 * duration.rs
 *
 * Parse "1s", "250ms", "1m30s", "1.5h". A bare number means seconds.
 * Units: ns, us (or µs), ms, s, m, h, d. Case insensitive.
 *
 * Zero parses fine here. Whether zero makes sense is the caller's call
 * (an interval of zero doesn't, see FuzzConfig::new).
 *
 * Longest representable duration is u64::MAX nanoseconds. Plenty.
 */

use std::time::Duration;

use crate::error::{ConfigError, Result};

/* everything is summed in nanoseconds; u64 of them is ~584 years */
#[allow(clippy::cast_precision_loss)]
const MAX_NANOS: f64 = u64::MAX as f64;

const NANOS_PER_SEC: f64 = 1e9;

/// Parse a duration like `"30"`, `"500ms"`, `"1m30s"` or `"0.5d"`.
///
/// # Examples
///
/// ```
/// use sigfuzz::duration::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("30").unwrap(), Duration::from_secs(30));
/// assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
/// assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
/// assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
/// ```
pub fn parse_duration(input: &str) -> Result<Duration> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ConfigError::InvalidDuration("empty duration".to_string()));
    }
    if input.starts_with('-') {
        return Err(ConfigError::InvalidDuration(format!(
            "negative values not allowed: '{input}'"
        )));
    }

    /* bare number: seconds */
    if let Ok(value) = input.parse::<f64>() {
        return nanos_to_duration(value * NANOS_PER_SEC, input);
    }

    let mut rest = input;
    let mut total = 0.0_f64;
    while !rest.is_empty() {
        let (num_str, after_num) = split_leading_number(rest);
        if num_str.is_empty() {
            return Err(ConfigError::InvalidDuration(format!(
                "expected a number in '{input}'"
            )));
        }
        let value: f64 = num_str.parse().map_err(|_| {
            ConfigError::InvalidDuration(format!("invalid number '{num_str}'"))
        })?;

        let (unit, after_unit) = split_leading_unit(after_num);
        let multiplier = unit_nanos(unit).ok_or_else(|| {
            ConfigError::InvalidDuration(format!("invalid unit '{unit}' in '{input}'"))
        })?;

        total += value * multiplier;
        rest = after_unit;
    }

    nanos_to_duration(total, input)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn nanos_to_duration(nanos: f64, input: &str) -> Result<Duration> {
    if nanos.is_nan() {
        return Err(ConfigError::InvalidDuration(format!(
            "not a number: '{input}'"
        )));
    }
    if nanos < 0.0 {
        return Err(ConfigError::InvalidDuration(format!(
            "negative values not allowed: '{input}'"
        )));
    }
    if nanos.is_infinite() || nanos.round() >= MAX_NANOS {
        return Err(ConfigError::DurationOverflow);
    }
    /* round, so "250us" doesn't come out as 249999ns */
    Ok(Duration::from_nanos(nanos.round() as u64))
}

/* "1.5ms30s" -> ("1.5", "ms30s") */
fn split_leading_number(input: &str) -> (&str, &str) {
    let end = input
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(input.len());
    input.split_at(end)
}

/* "ms30s" -> ("ms", "30s") */
fn split_leading_unit(input: &str) -> (&str, &str) {
    let end = input
        .find(|c: char| c.is_ascii_digit() || c == '.')
        .unwrap_or(input.len());
    input.split_at(end)
}

fn unit_nanos(unit: &str) -> Option<f64> {
    let nanos = match unit.to_ascii_lowercase().as_str() {
        "ns" => 1.0,
        "us" | "µs" | "μs" => 1e3,
        "ms" => 1e6,
        "s" => NANOS_PER_SEC,
        "m" => 60.0 * NANOS_PER_SEC,
        "h" => 3600.0 * NANOS_PER_SEC,
        "d" => 86400.0 * NANOS_PER_SEC,
        _ => return None,
    };
    Some(nanos)
}
