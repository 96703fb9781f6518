//! Days of the week, numbered from Sunday = 0.

use std::fmt;
use std::str::FromStr;

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::error::{Result, TimeError};
use crate::value::Value;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize_repr, Deserialize_repr,
)]
#[repr(u8)]
pub enum Weekday {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }
}

impl TryFrom<i64> for Weekday {
    type Error = TimeError;

    fn try_from(n: i64) -> Result<Self> {
        usize::try_from(n)
            .ok()
            .and_then(|i| Weekday::ALL.get(i).copied())
            .ok_or(TimeError::InvalidWeekday(n))
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Weekday::ALL[day.num_days_from_sunday() as usize]
    }
}

impl From<Weekday> for chrono::Weekday {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Sunday => chrono::Weekday::Sun,
            Weekday::Monday => chrono::Weekday::Mon,
            Weekday::Tuesday => chrono::Weekday::Tue,
            Weekday::Wednesday => chrono::Weekday::Wed,
            Weekday::Thursday => chrono::Weekday::Thu,
            Weekday::Friday => chrono::Weekday::Fri,
            Weekday::Saturday => chrono::Weekday::Sat,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Weekday {
    type Err = TimeError;

    /// Accepts `0`–`6`, full English names and three-letter abbreviations, any case.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(n) = s.parse::<i64>() {
            return Weekday::try_from(n);
        }
        Weekday::ALL
            .into_iter()
            .find(|day| {
                let name = day.name();
                name.eq_ignore_ascii_case(s) || name[..3].eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| TimeError::InvalidDatetime(format!("'{s}': not a weekday")))
    }
}

/// Parse a weekday from a number or a name.
pub fn parse_weekday(value: impl Into<Value>) -> Result<Weekday> {
    match value.into() {
        Value::Integer(n) => Weekday::try_from(n),
        value => value.into_text()?.parse(),
    }
}

// ── Weekdays ────────────────────────────────────────────────────────────────

/// A set of weekdays, e.g. the days a schedule applies to.
///
/// Every element is valid by construction; out-of-range numbers are rejected
/// when the list is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Weekdays(Vec<Weekday>);

impl Weekdays {
    pub fn new(days: Vec<Weekday>) -> Self {
        Self(days)
    }

    /// All seven days, Sunday first.
    pub fn all() -> Self {
        Self(Weekday::ALL.to_vec())
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0.contains(&day)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Weekday> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_chrono(&self) -> Vec<chrono::Weekday> {
        self.0.iter().copied().map(chrono::Weekday::from).collect()
    }
}

impl FromIterator<Weekday> for Weekdays {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl TryFrom<&[i64]> for Weekdays {
    type Error = TimeError;

    fn try_from(values: &[i64]) -> Result<Self> {
        values.iter().map(|&n| Weekday::try_from(n)).collect()
    }
}

/// Parse a list of weekdays from a JSON array of numbers or names.
pub fn parse_weekdays(value: serde_json::Value) -> Result<Weekdays> {
    match value {
        serde_json::Value::Array(items) => {
            items.into_iter().map(|item| parse_weekday(item)).collect()
        }
        other => Err(TimeError::UnsupportedType(format!(
            "expected an array of weekdays, got {}",
            Value::from(other).type_name()
        ))),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_range() {
        for n in 0..7 {
            assert_eq!(Weekday::try_from(n).unwrap().number() as i64, n);
        }
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        for n in [-1, 7, 100, i64::MIN] {
            assert_eq!(Weekday::try_from(n), Err(TimeError::InvalidWeekday(n)));
        }
    }

    #[test]
    fn test_chrono_conversion() {
        assert_eq!(Weekday::from(chrono::Weekday::Sun), Weekday::Sunday);
        assert_eq!(Weekday::from(chrono::Weekday::Sat), Weekday::Saturday);
        for day in Weekday::ALL {
            assert_eq!(Weekday::from(chrono::Weekday::from(day)), day);
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Monday".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!("fri".parse::<Weekday>().unwrap(), Weekday::Friday);
        assert_eq!("3".parse::<Weekday>().unwrap(), Weekday::Wednesday);
        assert!("7".parse::<Weekday>().is_err());
        assert!("Caturday".parse::<Weekday>().is_err());
    }

    #[test]
    fn test_json_is_integer() {
        assert_eq!(serde_json::to_string(&Weekday::Tuesday).unwrap(), "2");
        assert_eq!(serde_json::from_str::<Weekday>("6").unwrap(), Weekday::Saturday);
        assert!(serde_json::from_str::<Weekday>("7").is_err());
        assert_eq!(
            serde_json::to_string(&Weekdays::new(vec![Weekday::Monday, Weekday::Friday])).unwrap(),
            "[1,5]"
        );
    }

    #[test]
    fn test_weekdays_contains() {
        let workdays = Weekdays::try_from(&[1i64, 2, 3, 4, 5][..]).unwrap();
        assert!(workdays.contains(Weekday::Wednesday));
        assert!(!workdays.contains(Weekday::Sunday));
        assert_eq!(Weekdays::all().len(), 7);
        assert!(Weekdays::try_from(&[1i64, 9][..]).is_err());
    }

    #[test]
    fn test_parse_weekdays() {
        let days = parse_weekdays(json!([0, "Saturday", "2"])).unwrap();
        assert_eq!(
            days,
            Weekdays::new(vec![Weekday::Sunday, Weekday::Saturday, Weekday::Tuesday])
        );
        assert!(parse_weekdays(json!([true])).is_err());
        assert!(parse_weekdays(json!(1)).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Weekday::Thursday.to_string(), "Thursday");
    }
}
