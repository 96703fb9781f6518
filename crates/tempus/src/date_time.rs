//! Full-precision timestamps that round-trip as RFC 3339 with nanoseconds.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::instant::{AsInstant, Instant};
use crate::layout::Layout;
use crate::macros::{clock_getters, instant_wrapper, TimeTextVisitor};
use crate::parse::parse_time_with;
use crate::zone::Zone;

/// An [`Instant`] with full precision.
///
/// Serializes as an RFC 3339 string with up to nine fraction digits, or `null`
/// for the zero value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime(Instant);

instant_wrapper!(DateTime, parse_time_with);
clock_getters!(DateTime);

impl DateTime {
    /// Same instant, expressed in UTC.
    pub fn utc(&self) -> Self {
        Self(self.0.with_timezone(&Zone::Utc))
    }
}

impl From<Instant> for DateTime {
    fn from(t: Instant) -> Self {
        Self(t)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&Layout::Rfc3339Nano.format(&self.0))
    }
}

impl Serialize for DateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_zero() {
            serializer.serialize_none()
        } else {
            serializer.collect_str(self)
        }
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TimeTextVisitor::new("an RFC 3339 timestamp or null"))
    }
}

/// Parse a [`DateTime`] against the process-wide clock.
pub fn parse_date_time(value: impl Into<crate::Value>) -> crate::Result<DateTime> {
    DateTime::parse(value)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::CurrentTime;
    use crate::duration::Duration;
    use crate::weekday::Weekday;
    use chrono_tz::Tz;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Event {
        #[serde(default)]
        at: DateTime,
    }

    #[test]
    fn test_display_is_rfc3339_nano() {
        let t = DateTime::new(2023, 6, 19, 7, 56, 34, 123_456_000, Zone::Utc).unwrap();
        assert_eq!(t.to_string(), "2023-06-19T07:56:34.123456Z");
        assert_eq!(t.hour(), 7);
        assert_eq!(t.nanosecond(), 123_456_000);
        assert_eq!(t.weekday(), Weekday::Monday);
    }

    #[test]
    fn test_json_round_trip() {
        let t: DateTime = "2023-06-19T09:56:34.5+02:00".parse().unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#""2023-06-19T09:56:34.5+02:00""#);
        let back: DateTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
        assert_eq!(back.zone(), t.zone());
    }

    #[test]
    fn test_json_zero_is_null() {
        assert_eq!(serde_json::to_string(&DateTime::zero()).unwrap(), "null");
        for input in [r#"{"at":null}"#, r#"{"at":""}"#, r#"{"at":"null"}"#, "{}"] {
            let event: Event = serde_json::from_str(input).unwrap();
            assert!(event.at.is_zero(), "{input}");
        }
    }

    #[test]
    fn test_json_rejects_garbage() {
        assert!(serde_json::from_str::<DateTime>(r#""banana""#).is_err());
        assert!(serde_json::from_str::<DateTime>("[]").is_err());
    }

    #[test]
    fn test_json_accepts_relative_now() {
        // resolved against the process-wide clock; only check it parses to a recent value
        let t: DateTime = serde_json::from_str(r#""NOW-1h""#).unwrap();
        assert!(t.year() >= 2023);
    }

    #[test]
    fn test_parse_with_clock() {
        let clock = CurrentTime::fixed(DateTime::from_unix(1_686_419_205).unwrap().into());
        let t = DateTime::parse_with("NOW-1d", &clock).unwrap();
        assert_eq!(t.unix(), 1_686_419_205 - 86_400);
        assert_eq!(DateTime::parse_or("garbage", DateTime::zero()), DateTime::zero());
    }

    #[test]
    fn test_validate() {
        assert!(DateTime::zero().validate().is_err());
        assert!(DateTime::default().validate().is_err());
        assert!(DateTime::from_unix(0).unwrap().validate().is_ok());
    }

    #[test]
    fn test_arithmetic() {
        let t = DateTime::from_unix(1_687_161_394).unwrap();
        let later = t + Duration::HOUR;
        assert_eq!(later.unix(), 1_687_161_394 + 3600);
        assert_eq!(later - t, Duration::HOUR);
        assert_eq!(later - Duration::HOUR, t);
        assert!(t.is_before(&later));
        assert_eq!(t.add_date(0, 1, 0).month(), 7);
        assert_eq!(t.truncate(Duration::DAY).to_string(), "2023-06-19T00:00:00Z");
    }

    #[test]
    fn test_utc_keeps_instant() {
        let berlin = Zone::Named(Tz::Europe__Berlin);
        let t = DateTime::new(2024, 7, 1, 15, 37, 59, 0, berlin).unwrap();
        assert_eq!(t.to_string(), "2024-07-01T15:37:59+02:00");
        assert_eq!(t.utc().to_string(), "2024-07-01T13:37:59Z");
        assert_eq!(t.utc(), t);
    }

    #[test]
    fn test_binary_round_trip() {
        let t = DateTime::from_unix_micro(1_687_161_394_123_456).unwrap();
        assert_eq!(DateTime::from_binary(&t.to_binary()).unwrap(), t);
        assert!(DateTime::from_binary(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_format_layouts() {
        let t = DateTime::from_unix(1_687_161_394).unwrap();
        assert_eq!(t.format(Layout::Date), "2023-06-19");
        assert_eq!(t.format(Layout::Second), "1687161394");
        assert_eq!(t.unix_micro(), 1_687_161_394_000_000);
    }
}
