//! Calendar dates.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, TimeError};
use crate::instant::{midnight, AsInstant, Instant};
use crate::layout::Layout;
use crate::macros::{instant_wrapper, TimeTextVisitor};
use crate::parse::parse_time_with;
use crate::zone::Zone;

/// Midnight of a calendar day, in the zone the date was taken from.
///
/// Equality, ordering and hashing look at the calendar date only, so
/// `2023-06-19` in Berlin equals `2023-06-19` in UTC.
#[derive(Debug, Clone, Copy)]
pub struct Date(Instant);

instant_wrapper!(Date, parse_time_with);

impl Date {
    /// Midnight UTC of the given day.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::InvalidDatetime`] for days that do not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            TimeError::InvalidDatetime(format!("'{year:04}-{month:02}-{day:02}': no such date"))
        })?;
        Ok(Self(midnight(date, Zone::Utc)))
    }

    pub fn naive(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// The same calendar date at midnight UTC.
    pub fn utc(&self) -> Self {
        Self(midnight(self.naive(), Zone::Utc))
    }
}

impl From<Instant> for Date {
    fn from(t: Instant) -> Self {
        Self(midnight(t.date_naive(), t.timezone()))
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self(midnight(date, Zone::Utc))
    }
}

impl PartialEq for Date {
    fn eq(&self, other: &Self) -> bool {
        self.naive() == other.naive()
    }
}

impl Eq for Date {}

impl PartialOrd for Date {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Date {
    fn cmp(&self, other: &Self) -> Ordering {
        self.naive().cmp(&other.naive())
    }
}

impl Hash for Date {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.naive().hash(state);
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&Layout::Date.format(&self.0))
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.is_zero() {
            serializer.serialize_none()
        } else {
            serializer.collect_str(self)
        }
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(TimeTextVisitor::new("a YYYY-MM-DD date or null"))
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
