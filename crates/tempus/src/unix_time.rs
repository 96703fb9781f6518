//! Instants that serialize as bare Unix seconds.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::instant::{zero_instant, AsInstant, Instant};
use crate::layout::Layout;
use crate::macros::{clock_getters, instant_wrapper};
use crate::parse::{parse_time, parse_unix_time_with};
use crate::zone::Zone;

/// An [`Instant`] whose JSON form is an integer count of Unix seconds.
///
/// The value itself keeps full precision; only the JSON form drops the
/// sub-second part. Deserialization also accepts strings in any form
/// [`parse_time`] understands, and numeric strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnixTime(Instant);

instant_wrapper!(UnixTime, parse_unix_time_with);
clock_getters!(UnixTime);

impl UnixTime {
    pub fn utc(&self) -> Self {
        Self(self.0.with_timezone(&Zone::Utc))
    }
}

impl From<Instant> for UnixTime {
    fn from(t: Instant) -> Self {
        Self(t)
    }
}

impl fmt::Display for UnixTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&Layout::Rfc3339Nano.format(&self.0))
    }
}

impl Serialize for UnixTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.unix())
    }
}

struct UnixTimeVisitor;

impl<'de> Visitor<'de> for UnixTimeVisitor {
    type Value = UnixTime;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unix seconds as a number or string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<UnixTime, E> {
        UnixTime::from_unix(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<UnixTime, E> {
        let secs = i64::try_from(v).map_err(E::custom)?;
        self.visit_i64(secs)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<UnixTime, E> {
        Layout::Second.parse(v).map(UnixTime).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<UnixTime, E> {
        match v {
            "" | "null" => Ok(UnixTime::zero()),
            _ => parse_time(v)
                .or_else(|_| Layout::Second.parse(v))
                .map(UnixTime)
                .map_err(E::custom),
        }
    }

    fn visit_none<E: de::Error>(self) -> Result<UnixTime, E> {
        Ok(UnixTime(zero_instant()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<UnixTime, E> {
        Ok(UnixTime(zero_instant()))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<UnixTime, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Deserialize<'de> for UnixTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(UnixTimeVisitor)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::CurrentTime;

    #[test]
    fn test_json_is_integer() {
        let t: UnixTime = "2023-06-19T07:56:34Z".parse().unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "1687161394");
        let back: UnixTime = serde_json::from_str("1687161394").unwrap();
        assert_eq!(back, t);
        assert_eq!(back.to_string(), "2023-06-19T07:56:34Z");
    }

    #[test]
    fn test_json_accepts_strings() {
        let from_digits: UnixTime = serde_json::from_str(r#""1687161394""#).unwrap();
        let from_rfc: UnixTime = serde_json::from_str(r#""2023-06-19T07:56:34Z""#).unwrap();
        assert_eq!(from_digits, from_rfc);
        let from_float: UnixTime = serde_json::from_str("1687161393.6").unwrap();
        assert_eq!(from_float.unix(), 1_687_161_394);
    }

    #[test]
    fn test_json_empty_is_zero() {
        assert!(serde_json::from_str::<UnixTime>("null").unwrap().is_zero());
        assert!(serde_json::from_str::<UnixTime>(r#""""#).unwrap().is_zero());
        assert!(serde_json::from_str::<UnixTime>(r#""banana""#).is_err());
        assert!(serde_json::from_str::<UnixTime>("true").is_err());
    }

    #[test]
    fn test_parse_numbers_and_text() {
        assert_eq!(UnixTime::parse(1_687_161_394).unwrap().unix(), 1_687_161_394);
        assert_eq!(UnixTime::parse("1687161394").unwrap().unix(), 1_687_161_394);
        let clock = CurrentTime::fixed(UnixTime::from_unix(100).unwrap().into());
        assert_eq!(UnixTime::parse_with("NOW+1m", &clock).unwrap().unix(), 160);
    }

    #[test]
    fn test_sub_second_precision_is_kept_in_value() {
        let t = UnixTime::from_unix_micro(1_500_000).unwrap();
        assert_eq!(t.nanosecond(), 500_000_000);
        assert_eq!(serde_json::to_string(&t).unwrap(), "1");
    }
}
