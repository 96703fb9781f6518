//! Wall-clock times without a date.
//!
//! A [`TimeOfDay`] remembers its zone, so `15:37:59 Europe/Berlin` placed on a
//! January date resolves to `+01:00` and on a July date to `+02:00`.

use std::fmt;
use std::str::FromStr;

use chrono::{FixedOffset, NaiveTime, Timelike};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::clock::{default_clock, Clock};
use crate::date_time::DateTime;
use crate::error::{Result, TimeError};
use crate::instant::{self, Instant};
use crate::parse::{parse_time_with, NOW};
use crate::value::Value;
use crate::zone::{load_zone, Zone};

const CLOCK_FORMATS: [&str; 3] = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

/// A validated wall-clock time and the zone it is read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeOfDay {
    time: NaiveTime,
    zone: Zone,
}

impl Default for TimeOfDay {
    fn default() -> Self {
        Self {
            time: NaiveTime::MIN,
            zone: Zone::Utc,
        }
    }
}

impl TimeOfDay {
    /// # Errors
    ///
    /// Returns [`TimeError::InvalidTimeOfDay`] for out-of-range fields.
    pub fn new(hour: u32, minute: u32, second: u32, nanosecond: u32, zone: Zone) -> Result<Self> {
        NaiveTime::from_hms_nano_opt(hour, minute, second, nanosecond)
            .map(|time| Self { time, zone })
            .ok_or_else(|| {
                TimeError::InvalidTimeOfDay(format!(
                    "'{hour:02}:{minute:02}:{second:02}.{nanosecond}': out of range"
                ))
            })
    }

    /// The wall-clock time and zone of `t`; the date is dropped.
    pub fn from_instant(t: &Instant) -> Self {
        Self {
            time: t.time(),
            zone: t.timezone(),
        }
    }

    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    pub fn minute(&self) -> u32 {
        self.time.minute()
    }

    pub fn second(&self) -> u32 {
        self.time.second()
    }

    pub fn nanosecond(&self) -> u32 {
        self.time.nanosecond()
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Place this time on a calendar date, in this time's zone.
    ///
    /// The UTC offset is the one in effect on the target date. A time that
    /// falls into a DST gap moves forward; one in a DST fold takes the earlier
    /// instant.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::InvalidDatetime`] when the date does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempus::TimeOfDay;
    ///
    /// let t: TimeOfDay = "15:37:59 Europe/Berlin".parse().unwrap();
    /// assert_eq!(t.date(2024, 1, 1).unwrap().to_string(), "2024-01-01T15:37:59+01:00");
    /// assert_eq!(t.date(2024, 7, 1).unwrap().to_string(), "2024-07-01T15:37:59+02:00");
    /// ```
    pub fn date(&self, year: i32, month: u32, day: u32) -> Result<DateTime> {
        instant::from_components(
            year,
            month,
            day,
            self.hour(),
            self.minute(),
            self.second(),
            self.nanosecond(),
            self.zone,
        )
        .map(DateTime::from)
    }

    pub fn naive(&self) -> NaiveTime {
        self.time
    }
}

// ── Parsing ─────────────────────────────────────────────────────────────────

/// Parse a time of day against the process-wide clock.
pub fn parse_time_of_day(value: impl Into<Value>) -> Result<TimeOfDay> {
    parse_time_of_day_with(value, default_clock())
}

/// Parse a time of day.
///
/// Accepted forms:
///
/// - `NOW`: the clock's current time and zone
/// - `HH:MM`, `HH:MM:SS`, `HH:MM:SS.fraction`, each optionally followed by
///   `Z`, a `±hh:mm` offset, or a space and a zone name (`"15:37:59 Europe/Berlin"`)
/// - anything [`parse_time_with`] accepts; only the time and zone are kept
///
/// Times without a zone are UTC.
///
/// # Errors
///
/// - [`TimeError::InvalidTimezone`] for an unknown zone name
/// - [`TimeError::InvalidTimeOfDay`] when no form matches
pub fn parse_time_of_day_with(value: impl Into<Value>, clock: &dyn Clock) -> Result<TimeOfDay> {
    let text = value.into().into_text()?;
    if text == NOW {
        return Ok(TimeOfDay::from_instant(&clock.now()));
    }
    let (clock_part, zone_name) = match text.split_once(' ') {
        Some((clock_part, zone_name)) => (clock_part, Some(zone_name.trim())),
        None => (text.as_str(), None),
    };
    let suffix = match clock_part.strip_suffix('Z') {
        Some(stripped) => Some((stripped, Zone::Utc)),
        None => split_offset(clock_part).map(|(head, offset)| (head, Zone::from(offset))),
    };
    let (clock_part, zone) = match (suffix, zone_name) {
        (Some(_), Some(_)) => {
            return Err(TimeError::InvalidTimeOfDay(format!(
                "'{text}': both an offset and a zone name"
            )))
        }
        (Some(split), None) => split,
        (None, Some(name)) => (clock_part, load_zone(name)?),
        (None, None) => (clock_part, Zone::Utc),
    };
    if let Some(time) = parse_clock(clock_part) {
        return Ok(TimeOfDay { time, zone });
    }
    if zone_name.is_none() {
        if let Ok(t) = parse_time_with(text.as_str(), clock) {
            return Ok(TimeOfDay::from_instant(&t));
        }
    }
    Err(TimeError::InvalidTimeOfDay(format!(
        "'{text}': expected HH:MM[:SS[.fraction]] with optional zone, NOW, or a timestamp"
    )))
}

/// Split a trailing `+hh:mm` / `-hh:mm` off a clock reading.
fn split_offset(text: &str) -> Option<(&str, FixedOffset)> {
    let at = text.len().checked_sub(6)?;
    let (head, tail) = (text.get(..at)?, text.get(at..)?);
    let sign = match tail.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let (hours, minutes) = tail[1..].split_once(':')?;
    let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(hours) || !two_digits(minutes) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))?;
    Some((head, offset))
}

fn parse_clock(text: &str) -> Option<NaiveTime> {
    CLOCK_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
}

impl FromStr for TimeOfDay {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self> {
        parse_time_of_day(s)
    }
}

impl fmt::Display for TimeOfDay {
    /// `HH:MM:SS[.fraction]` then `Z`, `±hh:mm`, or a space and the zone name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour(), self.minute(), self.second())?;
        if self.nanosecond() != 0 {
            let digits = format!("{:09}", self.nanosecond());
            write!(f, ".{}", digits.trim_end_matches('0'))?;
        }
        match self.zone {
            Zone::Utc => f.write_str("Z"),
            Zone::Fixed(offset) if offset.local_minus_utc() == 0 => f.write_str("Z"),
            Zone::Fixed(offset) => write!(f, "{offset}"),
            Zone::Named(tz) => write!(f, " {}", tz.name()),
        }
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct TimeOfDayVisitor;

impl Visitor<'_> for TimeOfDayVisitor {
    type Value = TimeOfDay;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a time of day such as \"13:45:59Z\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<TimeOfDay, E> {
        parse_time_of_day(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_str(TimeOfDayVisitor)
    }
}

// ── TimeOfDays ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeOfDays(Vec<TimeOfDay>);

impl TimeOfDays {
    pub fn new(times: Vec<TimeOfDay>) -> Self {
        Self(times)
    }

    pub fn contains(&self, time: &TimeOfDay) -> bool {
        self.0.contains(time)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeOfDay> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<TimeOfDay> for TimeOfDays {
    fn from_iter<I: IntoIterator<Item = TimeOfDay>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
