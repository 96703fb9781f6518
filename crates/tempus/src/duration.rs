//! Signed nanosecond durations with a compound text notation.
//!
//! A [`Duration`] is a plain `i64` count of nanoseconds. The text form strings
//! `<number><unit>` tokens together without separators, largest unit first:
//! `1h30m`, `-2d12h`, `1.5h`, `250ms`.
//!
//! # Units
//!
//! | Unit | Meaning |
//! |------|---------|
//! | `ns` | nanosecond |
//! | `us`, `µs`, `μs` | microsecond |
//! | `ms` | millisecond |
//! | `s` | second |
//! | `m` | minute |
//! | `h` | hour |
//! | `d` | day (24h) |
//! | `w` | week (7d) |
//!
//! Units are case-sensitive. The whole input must be consumed: `"1h garbage"`
//! is an error rather than one hour.

use std::fmt::{self, Write as _};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use chrono::TimeDelta;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, TimeError};

const NANOS_PER_MICRO: i64 = 1_000;
const NANOS_PER_MILLI: i64 = 1_000 * NANOS_PER_MICRO;
const NANOS_PER_SECOND: i64 = 1_000 * NANOS_PER_MILLI;
const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: i64 = 24 * NANOS_PER_HOUR;
const NANOS_PER_WEEK: i64 = 7 * NANOS_PER_DAY;

/// Fraction digits beyond this are ignored; they are below nanosecond resolution
/// for every unit.
const MAX_FRACTION_DIGITS: usize = 18;

/// A signed span of time with nanosecond resolution.
///
/// Arithmetic saturates at the `i64` bounds instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(i64);

impl Duration {
    pub const ZERO: Duration = Duration(0);
    pub const NANOSECOND: Duration = Duration(1);
    pub const MICROSECOND: Duration = Duration(NANOS_PER_MICRO);
    pub const MILLISECOND: Duration = Duration(NANOS_PER_MILLI);
    pub const SECOND: Duration = Duration(NANOS_PER_SECOND);
    pub const MINUTE: Duration = Duration(NANOS_PER_MINUTE);
    pub const HOUR: Duration = Duration(NANOS_PER_HOUR);
    pub const DAY: Duration = Duration(NANOS_PER_DAY);
    pub const WEEK: Duration = Duration(NANOS_PER_WEEK);

    pub const fn from_nanos(nanos: i64) -> Self {
        Duration(nanos)
    }

    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    /// Whole seconds, truncated toward zero.
    pub const fn as_secs(self) -> i64 {
        self.0 / NANOS_PER_SECOND
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub const fn abs(self) -> Self {
        Duration(self.0.saturating_abs())
    }

    pub fn checked_add(self, rhs: Duration) -> Option<Duration> {
        self.0.checked_add(rhs.0).map(Duration)
    }

    pub fn checked_mul(self, rhs: i64) -> Option<Duration> {
        self.0.checked_mul(rhs).map(Duration)
    }

    /// Scale by a float factor, rounding to the nearest nanosecond.
    pub fn mul_f64(self, factor: f64) -> Duration {
        // `as` saturates for out-of-range floats and maps NaN to zero.
        Duration((self.0 as f64 * factor).round() as i64)
    }

    pub fn to_time_delta(self) -> TimeDelta {
        TimeDelta::nanoseconds(self.0)
    }

    /// Convert to a `std::time::Duration`; `None` for negative durations.
    pub fn to_std(self) -> Option<std::time::Duration> {
        u64::try_from(self.0).ok().map(std::time::Duration::from_nanos)
    }
}

impl From<Duration> for TimeDelta {
    fn from(value: Duration) -> Self {
        value.to_time_delta()
    }
}

impl TryFrom<TimeDelta> for Duration {
    type Error = TimeError;

    fn try_from(value: TimeDelta) -> Result<Self> {
        value
            .num_nanoseconds()
            .map(Duration)
            .ok_or_else(|| TimeError::Overflow(format!("'{value}': exceeds i64 nanoseconds")))
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

impl Sub for Duration {
    type Output = Duration;

    fn sub(self, rhs: Duration) -> Duration {
        Duration(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Duration {
    fn sub_assign(&mut self, rhs: Duration) {
        *self = *self - rhs;
    }
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        Duration(self.0.saturating_neg())
    }
}

impl Mul<i64> for Duration {
    type Output = Duration;

    fn mul(self, rhs: i64) -> Duration {
        Duration(self.0.saturating_mul(rhs))
    }
}

// ── Parsing ─────────────────────────────────────────────────────────────────

fn unit_nanos(unit: &str) -> Option<i64> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(NANOS_PER_MINUTE),
        "h" => Some(NANOS_PER_HOUR),
        "d" => Some(NANOS_PER_DAY),
        "w" => Some(NANOS_PER_WEEK),
        _ => None,
    }
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

/// Parse a compound duration string such as `"1h30m"`, `"-1h30m"` or `"1.5h"`.
///
/// A leading `-` negates the total, not a single token. Each token is a
/// non-negative decimal (`1`, `1.5`, `.5`) followed by a unit.
///
/// # Errors
///
/// - [`TimeError::InvalidDuration`] for empty input, a token without a number
///   or unit, or a malformed number.
/// - [`TimeError::UnknownUnit`] for a unit outside the table above.
/// - [`TimeError::Overflow`] if the total does not fit in `i64` nanoseconds.
///
/// # Examples
///
/// ```
/// use tempus::{parse_duration, Duration};
///
/// assert_eq!(parse_duration("1h30m").unwrap(), Duration::MINUTE * 90);
/// assert_eq!(parse_duration("-1.5h").unwrap(), -(Duration::MINUTE * 90));
/// assert!(parse_duration("1h garbage").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<Duration> {
    let (negative, body) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    if body.is_empty() {
        return Err(TimeError::InvalidDuration(format!(
            "'{input}': no duration components"
        )));
    }

    let limit = i128::from(i64::MAX) + 1;
    let mut total: i128 = 0;
    let mut rest = body;
    while !rest.is_empty() {
        let number_len = rest.find(|c| !is_number_char(c)).unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        if number.is_empty() {
            return Err(TimeError::InvalidDuration(format!(
                "'{input}': expected number at '{rest}'"
            )));
        }

        let unit_len = tail.find(is_number_char).unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        if unit.is_empty() {
            return Err(TimeError::InvalidDuration(format!(
                "'{input}': number '{number}' has no unit"
            )));
        }
        let factor = unit_nanos(unit).ok_or_else(|| TimeError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;

        total += scale_token(input, number, factor)?;
        if total > limit {
            return Err(TimeError::Overflow(format!(
                "'{input}': exceeds i64 nanoseconds"
            )));
        }
        rest = tail;
    }

    let total = if negative { -total } else { total };
    i64::try_from(total)
        .map(Duration)
        .map_err(|_| TimeError::Overflow(format!("'{input}': exceeds i64 nanoseconds")))
}

/// Multiply a decimal token by its unit without going through floats.
fn scale_token(input: &str, number: &str, factor: i64) -> Result<i128> {
    let invalid =
        || TimeError::InvalidDuration(format!("'{input}': invalid number '{number}'"));

    let (whole, fraction) = match number.split_once('.') {
        Some((_, "")) => return Err(invalid()),
        Some((_, f)) if f.contains('.') => return Err(invalid()),
        Some((w, f)) => (w, f),
        None => (number, ""),
    };

    let factor = i128::from(factor);
    let mut value = if whole.is_empty() {
        0
    } else {
        let whole: u64 = whole.parse().map_err(|_| {
            TimeError::Overflow(format!("'{input}': number '{number}' is too large"))
        })?;
        i128::from(whole) * factor
    };

    if !fraction.is_empty() {
        let digits = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
        let numerator: u64 = digits.parse().map_err(|_| invalid())?;
        let denominator = 10i128.pow(digits.len() as u32);
        value += i128::from(numerator) * factor / denominator;
    }

    Ok(value)
}

impl FromStr for Duration {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self> {
        parse_duration(s)
    }
}

// ── Formatting ──────────────────────────────────────────────────────────────

impl fmt::Display for Duration {
    /// Largest unit first. From the first non-zero unit down to seconds every
    /// unit is written (`1h0m0s`); sub-second units only when non-zero.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.pad("0s");
        }

        let mut out = String::new();
        if self.0 < 0 {
            out.push('-');
        }
        let mut rest = self.0.unsigned_abs();

        let whole_units = [
            (NANOS_PER_WEEK, "w"),
            (NANOS_PER_DAY, "d"),
            (NANOS_PER_HOUR, "h"),
            (NANOS_PER_MINUTE, "m"),
            (NANOS_PER_SECOND, "s"),
        ];
        let mut started = false;
        for (size, unit) in whole_units {
            let size = size as u64;
            let count = rest / size;
            rest %= size;
            if count > 0 || started {
                started = true;
                write!(out, "{count}{unit}")?;
            }
        }

        let sub_second_units = [(NANOS_PER_MILLI, "ms"), (NANOS_PER_MICRO, "µs"), (1, "ns")];
        for (size, unit) in sub_second_units {
            let size = size as u64;
            let count = rest / size;
            rest %= size;
            if count > 0 {
                write!(out, "{count}{unit}")?;
            }
        }

        f.pad(&out)
    }
}

// ── Serde ───────────────────────────────────────────────────────────────────

impl Serialize for Duration {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

struct DurationVisitor;

impl Visitor<'_> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a duration string like \"1h30m\" or an integer nanosecond count")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Duration, E> {
        parse_duration(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Duration, E> {
        Ok(Duration(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Duration, E> {
        i64::try_from(v)
            .map(Duration)
            .map_err(|_| E::custom(format!("{v} exceeds i64 nanoseconds")))
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DurationVisitor)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
