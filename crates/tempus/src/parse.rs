//! The flexible time parser: `NOW`, `NOW±<duration>`, RFC 3339 variants, and dates.

use crate::clock::{default_clock, Clock};
use crate::duration::{parse_duration, Duration};
use crate::error::{Result, TimeError};
use crate::instant::Instant;
use crate::layout::{Layout, Layouts};
use crate::value::Value;

/// Literal that resolves to the clock's current instant.
pub const NOW: &str = "NOW";

// ── parse_time ──────────────────────────────────────────────────────────────

/// Parse a time value against the process-wide clock.
///
/// See [`parse_time_with`] for the accepted forms.
///
/// # Examples
///
/// ```
/// use tempus::{parse_time, Layout};
///
/// let t = parse_time("2023-06-19T07:56Z").unwrap();
/// assert_eq!(Layout::Rfc3339.format(&t), "2023-06-19T07:56:00Z");
/// ```
pub fn parse_time(value: impl Into<Value>) -> Result<Instant> {
    parse_time_with(value, default_clock())
}

/// Parse a time value, resolving `NOW` against `clock`.
///
/// # Arguments
///
/// * `value`: A string or number. Numbers are stringified first.
/// * `clock`: The source of "now".
///
/// Forms, first match wins:
///
/// 1. `NOW` (case-sensitive)
/// 2. `NOW+<duration>` / `NOW-<duration>`, e.g. `NOW-14d`, `NOW+1h30m`
/// 3. RFC 3339 with or without fractional seconds
/// 4. RFC 3339 without seconds, e.g. `2023-06-19T07:56Z`
/// 5. `YYYY-MM-DD`, as midnight UTC
///
/// # Errors
///
/// - [`TimeError::UnsupportedType`] if `value` cannot be coerced to text
/// - [`TimeError::InvalidDuration`] / [`TimeError::UnknownUnit`] for a bad `NOW` offset
/// - [`TimeError::Overflow`] if the offset leaves the representable range
/// - [`TimeError::InvalidDatetime`] naming the value when no form matches
pub fn parse_time_with(value: impl Into<Value>, clock: &dyn Clock) -> Result<Instant> {
    let text = value.into().into_text()?;
    if let Some(t) = resolve_now(&text, clock)? {
        return Ok(t);
    }
    Layouts::textual().parse(text)
}

/// Resolve `NOW` and `NOW±<duration>`; `None` when `text` is neither.
fn resolve_now(text: &str, clock: &dyn Clock) -> Result<Option<Instant>> {
    let Some(rest) = text.strip_prefix(NOW) else {
        return Ok(None);
    };
    let offset = if rest.is_empty() {
        Duration::ZERO
    } else if let Some(positive) = rest.strip_prefix('+') {
        if positive.starts_with('-') {
            return Err(TimeError::InvalidDuration(format!(
                "'{text}': sign after '+'"
            )));
        }
        parse_duration(positive)?
    } else if rest.starts_with('-') {
        parse_duration(rest)?
    } else {
        return Ok(None);
    };
    let now = clock.now();
    now.checked_add_signed(offset.to_time_delta())
        .map(Some)
        .ok_or_else(|| TimeError::Overflow(format!("'{text}': offset leaves the supported range")))
}

/// Like [`parse_time`], but falls back to `default` on any error.
pub fn parse_time_or(value: impl Into<Value>, default: Instant) -> Instant {
    parse_time(value).unwrap_or(default)
}

// ── parse_unix_time ─────────────────────────────────────────────────────────

/// Parse Unix seconds, or anything [`parse_time`] accepts.
///
/// Numbers go straight to the second layout. Text is tried as a time first and
/// then as a number of seconds, so `1687161394` and `"1687161394"` agree.
pub fn parse_unix_time(value: impl Into<Value>) -> Result<Instant> {
    parse_unix_time_with(value, default_clock())
}

pub fn parse_unix_time_with(value: impl Into<Value>, clock: &dyn Clock) -> Result<Instant> {
    match value.into() {
        value @ (Value::Integer(_) | Value::Float(_)) => Layout::Second.parse(value),
        value => {
            let text = value.into_text()?;
            match parse_time_with(text.as_str(), clock) {
                Ok(t) => Ok(t),
                Err(e) => {
                    tracing::debug!(value = %text, error = %e, "not a time, trying unix seconds");
                    Layout::Second.parse(text.as_str()).map_err(|_| {
                        TimeError::InvalidDatetime(format!(
                            "'{text}': neither a time nor unix seconds"
                        ))
                    })
                }
            }
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::CurrentTime;
    use crate::instant::from_unix;
    use serde_json::json;

    fn pinned() -> CurrentTime {
        CurrentTime::fixed(from_unix(1_686_419_205, 0).unwrap())
    }

    #[test]
    fn test_now() {
        let clock = pinned();
        assert_eq!(parse_time_with("NOW", &clock).unwrap().timestamp(), 1_686_419_205);
    }

    #[test]
    fn test_now_minus_offsets() {
        let clock = pinned();
        assert_eq!(
            parse_time_with("NOW-1h", &clock).unwrap().timestamp(),
            1_686_419_205 - 3600
        );
        assert_eq!(
            parse_time_with("NOW-1d", &clock).unwrap().timestamp(),
            1_686_419_205 - 24 * 3600
        );
        assert_eq!(
            parse_time_with("NOW-14d", &clock).unwrap().timestamp(),
            1_686_419_205 - 14 * 24 * 3600
        );
    }

    #[test]
    fn test_now_plus_offsets() {
        let clock = pinned();
        assert_eq!(
            parse_time_with("NOW+1h30m", &clock).unwrap().timestamp(),
            1_686_419_205 + 5400
        );
        assert_eq!(
            parse_time_with("NOW+1.5h", &clock).unwrap().timestamp(),
            1_686_419_205 + 5400
        );
    }

    #[test]
    fn test_now_is_case_sensitive() {
        let clock = pinned();
        assert!(parse_time_with("now", &clock).is_err());
        assert!(parse_time_with("Now-1h", &clock).is_err());
    }

    #[test]
    fn test_now_with_bad_offset() {
        let clock = pinned();
        let err = parse_time_with("NOW-1x", &clock).unwrap_err();
        assert!(matches!(err, TimeError::UnknownUnit { .. }), "got: {err}");
        assert!(parse_time_with("NOW+", &clock).is_err());
        assert!(parse_time_with("NOWISH", &clock).is_err());
        let err = parse_time_with("NOW+-1m", &clock).unwrap_err();
        assert!(matches!(err, TimeError::InvalidDuration(_)), "got: {err}");
        assert!(parse_time_with("NOW--1m", &clock).is_err());
        assert!(parse_time_with("NOW++1m", &clock).is_err());
    }

    #[test]
    fn test_closure_clock() {
        let fixed = from_unix(100, 0).unwrap();
        let clock = move || fixed;
        assert_eq!(parse_time_with("NOW+1m", &clock).unwrap().timestamp(), 160);
    }

    #[test]
    fn test_rfc3339_variants() {
        let clock = pinned();
        let nano = parse_time_with("2023-06-19T07:56:34.123456789Z", &clock).unwrap();
        assert_eq!(nano.timestamp_subsec_nanos(), 123_456_789);
        let plain = parse_time_with("2023-06-19T07:56:34Z", &clock).unwrap();
        assert_eq!(plain.timestamp(), 1_687_161_394);
        let short = parse_time_with("2023-06-19T07:56Z", &clock).unwrap();
        assert_eq!(short.timestamp(), 1_687_161_394 - 34);
        let offset = parse_time_with("2023-06-19T09:56:34+02:00", &clock).unwrap();
        assert_eq!(offset.timestamp(), 1_687_161_394);
    }

    #[test]
    fn test_date_only_is_utc_midnight() {
        let t = parse_time("2023-06-19").unwrap();
        assert_eq!(Layout::Rfc3339.format(&t), "2023-06-19T00:00:00Z");
    }

    #[test]
    fn test_invalid_names_value() {
        let err = parse_time("invalid").unwrap_err();
        assert!(err.to_string().contains("'invalid'"), "got: {err}");
        assert!(parse_time("").is_err());
    }

    #[test]
    fn test_non_text_values() {
        assert!(matches!(
            parse_time(true).unwrap_err(),
            TimeError::UnsupportedType(_)
        ));
        // numbers are stringified, and a bare number is no time format
        assert!(parse_time(1_687_161_394).is_err());
    }

    #[test]
    fn test_parse_time_or() {
        let fallback = from_unix(5, 0).unwrap();
        assert_eq!(parse_time_or("garbage", fallback), fallback);
        assert_eq!(parse_time_or("1970-01-01", fallback).timestamp(), 0);
    }

    #[test]
    fn test_unix_time_accepts_numbers_and_text() {
        let clock = pinned();
        for value in [json!(1_687_161_394), json!("1687161394"), json!("2023-06-19T07:56:34Z")] {
            assert_eq!(
                parse_unix_time_with(value, &clock).unwrap().timestamp(),
                1_687_161_394
            );
        }
        assert_eq!(
            parse_unix_time_with("NOW", &clock).unwrap().timestamp(),
            1_686_419_205
        );
        assert_eq!(parse_unix_time(1_687_161_393.6).unwrap().timestamp(), 1_687_161_394);
    }

    #[test]
    fn test_unix_time_rejects_garbage() {
        let err = parse_unix_time("banana").unwrap_err();
        assert!(err.to_string().contains("banana"), "got: {err}");
        assert!(parse_unix_time(json!(null)).is_err());
    }
}
