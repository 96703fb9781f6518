//! Named formats for converting between instants and text or numbers.
//!
//! A [`Layout`] is one of a closed set: three RFC 3339 shapes, a date-only
//! form, and Unix epochs at four resolutions. [`Layouts`] tries several in
//! order and returns the first success.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Offset, TimeZone};

use crate::error::{Result, TimeError};
use crate::instant::{self, Instant};
use crate::value::Value;
use crate::zone::Zone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// `YYYY-MM-DDTHH:MM:SS±hh:mm`; fractions are dropped when formatting.
    Rfc3339,
    /// Like `Rfc3339` with up to nine fraction digits; trailing zeros are trimmed.
    Rfc3339Nano,
    /// `YYYY-MM-DDTHH:MM±hh:mm`, RFC 3339 without seconds.
    Rfc3339Short,
    /// `YYYY-MM-DD`, midnight UTC when parsing.
    Date,
    Second,
    Milli,
    Micro,
    Nano,
}

impl Layout {
    pub const ALL: [Layout; 8] = [
        Layout::Rfc3339,
        Layout::Rfc3339Nano,
        Layout::Rfc3339Short,
        Layout::Date,
        Layout::Second,
        Layout::Milli,
        Layout::Micro,
        Layout::Nano,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Layout::Rfc3339 => "rfc3339",
            Layout::Rfc3339Nano => "rfc3339nano",
            Layout::Rfc3339Short => "rfc3339short",
            Layout::Date => "date",
            Layout::Second => "second",
            Layout::Milli => "milli",
            Layout::Micro => "micro",
            Layout::Nano => "nano",
        }
    }

    /// True for the Unix epoch layouts, which accept numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Layout::Second | Layout::Milli | Layout::Micro | Layout::Nano
        )
    }

    /// Render `t` in this layout.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempus::{from_unix, Layout};
    ///
    /// let t = from_unix(1654248772, 123_456_789).unwrap();
    /// assert_eq!(Layout::Rfc3339Nano.format(&t), "2022-06-03T09:32:52.123456789Z");
    /// assert_eq!(Layout::Milli.format(&t), "1654248772123");
    /// ```
    pub fn format(&self, t: &Instant) -> String {
        match self {
            Layout::Rfc3339 => format_rfc3339(t, false),
            Layout::Rfc3339Nano => format_rfc3339(t, true),
            Layout::Rfc3339Short => {
                let mut out = t.format("%Y-%m-%dT%H:%M").to_string();
                push_zone_suffix(&mut out, t);
                out
            }
            Layout::Date => t.format("%Y-%m-%d").to_string(),
            Layout::Second => t.timestamp().to_string(),
            Layout::Milli => t.timestamp_millis().to_string(),
            Layout::Micro => t.timestamp_micros().to_string(),
            Layout::Nano => {
                let nanos = i128::from(t.timestamp()) * 1_000_000_000
                    + i128::from(t.timestamp_subsec_nanos());
                nanos.to_string()
            }
        }
    }

    /// Parse `value` as this layout.
    ///
    /// Epoch layouts take integers, floats (rounded half away from zero), or
    /// numeric strings. Text layouts take strings only.
    ///
    /// # Errors
    ///
    /// - [`TimeError::UnsupportedType`] when the value has the wrong type
    /// - [`TimeError::Overflow`] when a number exceeds the i64 range
    /// - [`TimeError::InvalidDatetime`] when text does not match the layout
    pub fn parse(&self, value: impl Into<Value>) -> Result<Instant> {
        let value = value.into();
        match self {
            Layout::Second => instant::from_unix(epoch_number(value)?, 0),
            Layout::Milli => {
                let n = epoch_number(value)?;
                instant::from_unix(n.div_euclid(1_000), n.rem_euclid(1_000) * 1_000_000)
            }
            Layout::Micro => {
                let n = epoch_number(value)?;
                instant::from_unix(n.div_euclid(1_000_000), n.rem_euclid(1_000_000) * 1_000)
            }
            Layout::Nano => instant::from_unix(0, epoch_number(value)?),
            _ => {
                let Value::Text(text) = value else {
                    return Err(TimeError::UnsupportedType(format!(
                        "cannot parse {} with layout '{self}'",
                        value.type_name()
                    )));
                };
                self.parse_text(&text)
            }
        }
    }

    fn parse_text(&self, text: &str) -> Result<Instant> {
        let invalid = |reason: String| {
            TimeError::InvalidDatetime(format!("'{text}' with layout '{self}': {reason}"))
        };
        match self {
            Layout::Rfc3339 | Layout::Rfc3339Nano => DateTime::parse_from_rfc3339(text)
                .map(instant::from_fixed)
                .map_err(|e| invalid(e.to_string())),
            Layout::Rfc3339Short => {
                let full = expand_short_rfc3339(text)
                    .ok_or_else(|| invalid("expected YYYY-MM-DDTHH:MM and a zone".into()))?;
                DateTime::parse_from_rfc3339(&full)
                    .map(instant::from_fixed)
                    .map_err(|e| invalid(e.to_string()))
            }
            Layout::Date => {
                if text.len() != 10 {
                    return Err(invalid("expected YYYY-MM-DD".into()));
                }
                let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .map_err(|e| invalid(e.to_string()))?;
                Ok(Zone::Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
            }
            _ => Err(invalid("not a text layout".into())),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layout {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.to_ascii_lowercase().replace(['-', '_'], "");
        Layout::ALL
            .into_iter()
            .find(|layout| layout.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = Layout::ALL.iter().map(Layout::name).collect();
                TimeError::InvalidDatetime(format!(
                    "'{s}': unknown layout, expected one of {}",
                    names.join(", ")
                ))
            })
    }
}

// ── Layout lists ────────────────────────────────────────────────────────────

/// An ordered list of layouts; parsing returns the first that succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Layouts(Vec<Layout>);

impl Layouts {
    pub fn new(layouts: Vec<Layout>) -> Self {
        Self(layouts)
    }

    /// The textual fallback chain used by the flexible parser.
    pub fn textual() -> Self {
        Self(vec![
            Layout::Rfc3339Nano,
            Layout::Rfc3339,
            Layout::Rfc3339Short,
            Layout::Date,
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layout> {
        self.0.iter()
    }

    /// Try each layout in order.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::InvalidDatetime`] naming `value` when every layout fails,
    /// including when the list is empty.
    pub fn parse(&self, value: impl Into<Value>) -> Result<Instant> {
        let value = value.into();
        for layout in &self.0 {
            match layout.parse(value.clone()) {
                Ok(t) => return Ok(t),
                Err(e) => tracing::debug!(%layout, error = %e, "layout did not match"),
            }
        }
        Err(TimeError::InvalidDatetime(format!(
            "parse '{value}' with any layouts failed"
        )))
    }
}

impl Default for Layouts {
    fn default() -> Self {
        Self::textual()
    }
}

impl From<Vec<Layout>> for Layouts {
    fn from(layouts: Vec<Layout>) -> Self {
        Self(layouts)
    }
}

impl FromIterator<Layout> for Layouts {
    fn from_iter<I: IntoIterator<Item = Layout>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn format_rfc3339(t: &Instant, with_fraction: bool) -> String {
    let mut out = t.format("%Y-%m-%dT%H:%M:%S").to_string();
    let nanos = t.timestamp_subsec_nanos();
    if with_fraction && nanos != 0 {
        let digits = format!("{nanos:09}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    push_zone_suffix(&mut out, t);
    out
}

/// `Z` for a zero offset, `±hh:mm` otherwise.
fn push_zone_suffix(out: &mut String, t: &Instant) {
    let offset = t.offset().fix();
    if offset.local_minus_utc() == 0 {
        out.push('Z');
    } else {
        out.push_str(&offset.to_string());
    }
}

/// Turn `YYYY-MM-DDTHH:MM<zone>` into `YYYY-MM-DDTHH:MM:00<zone>`.
fn expand_short_rfc3339(text: &str) -> Option<String> {
    let head = text.get(..16)?;
    let bytes = head.as_bytes();
    if bytes[10] != b'T' || bytes[13] != b':' {
        return None;
    }
    let zone = text.get(16..)?;
    if !(zone == "Z" || zone.starts_with('+') || zone.starts_with('-')) {
        return None;
    }
    Some(format!("{head}:00{zone}"))
}

/// Interpret a value as an integer count for the epoch layouts.
fn epoch_number(value: Value) -> Result<i64> {
    match value {
        Value::Integer(n) => Ok(n),
        Value::Float(x) => round_to_i64(x, &x.to_string()),
        Value::Text(text) => {
            let trimmed = text.trim();
            if let Ok(n) = trimmed.parse::<i64>() {
                return Ok(n);
            }
            match trimmed.parse::<f64>() {
                Ok(x) if x.is_finite() => round_to_i64(x, &text),
                _ => Err(TimeError::InvalidDatetime(format!(
                    "'{text}': not a number"
                ))),
            }
        }
        other => Err(TimeError::UnsupportedType(format!(
            "cannot convert {} to a number",
            other.type_name()
        ))),
    }
}

// i64::MAX is not representable as f64; 2^63 is the first value past it.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn round_to_i64(x: f64, original: &str) -> Result<i64> {
    let rounded = x.round();
    if !rounded.is_finite() || rounded >= I64_BOUND || rounded < -I64_BOUND {
        return Err(TimeError::Overflow(format!("'{original}' exceeds the i64 range")));
    }
    Ok(rounded as i64)
}

// ── Tests ───────────────────────────────────────────────────────────────────
