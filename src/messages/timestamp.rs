//! Normalization of upstream creation timestamps to epoch milliseconds (UTC).

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Magnitudes below this are read as epoch seconds.
///
/// 10^11 ms is early 1973, 10^11 s is the year 5138: no real message lands in
/// the band where both readings would be plausible.
pub const SECONDS_THRESHOLD: f64 = 100_000_000_000.0;

/// Parses a `createdAt` value (JSON number or numeric string).
///
/// Returns `None` for anything that is not a finite number or lies outside the
/// representable calendar range; such messages count as "timestamp absent".
pub fn normalize_timestamp(raw: &Value) -> Option<i64> {
    let value = match raw {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !value.is_finite() {
        return None;
    }

    let millis = if value.abs() < SECONDS_THRESHOLD { value * 1000.0 } else { value };
    let millis = millis.trunc();
    if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
        return None;
    }
    let millis = millis as i64;
    DateTime::<Utc>::from_timestamp_millis(millis).map(|_| millis)
}

/// RFC 3339 rendering with millisecond precision, e.g. `2024-03-15T00:00:00.000Z`.
pub fn to_iso(millis: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// The UTC calendar date (`YYYY-MM-DD`) a timestamp falls on.
pub fn calendar_date(millis: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|ts| ts.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use super::*;

    #[test]
    fn reads_milliseconds_from_numbers_and_strings() {
        assert_eq!(normalize_timestamp(&json!(1710460800000_i64)), Some(1_710_460_800_000));
        assert_eq!(normalize_timestamp(&json!("1710460800000")), Some(1_710_460_800_000));
        assert_eq!(normalize_timestamp(&json!(" 1710460800123 ")), Some(1_710_460_800_123));
    }

    #[test]
    fn scales_epoch_seconds() {
        assert_eq!(normalize_timestamp(&json!(1710460800)), Some(1_710_460_800_000));
        assert_eq!(normalize_timestamp(&json!("1710460800.5")), Some(1_710_460_800_500));
    }

    #[test]
    fn unparseable_values_are_absent() {
        for raw in [json!("yesterday"), json!(""), json!("NaN"), json!("inf"), json!(null), json!(true), json!({"ms": 1})] {
            assert_eq!(normalize_timestamp(&raw), None, "{raw}");
        }
    }

    #[test]
    fn out_of_range_values_are_absent() {
        assert_eq!(normalize_timestamp(&json!(1e300)), None);
        assert_eq!(normalize_timestamp(&json!("-1e19")), None);
    }

    #[test]
    fn renders_utc() {
        assert_eq!(to_iso(1_710_460_800_000).as_deref(), Some("2024-03-15T00:00:00.000Z"));
        assert_eq!(calendar_date(1_710_547_199_999).as_deref(), Some("2024-03-15"));
        assert_eq!(calendar_date(1_710_547_200_000).as_deref(), Some("2024-03-16"));
    }
}
