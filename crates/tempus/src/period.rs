//! Calendar period boundaries.
//!
//! Every function here keeps the input's zone. Beginnings are local midnight of
//! the first day of the period; ends are one nanosecond before the next
//! period's beginning, so consecutive periods are adjacent with no gap.
//!
//! Functions are generic over [`chrono::TimeZone`], so they work for
//! `DateTime<Utc>`, `DateTime<FixedOffset>`, `DateTime<chrono_tz::Tz>`, and
//! [`Instant`](crate::Instant) alike.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone,
};

use crate::error::{Result, TimeError};
use crate::zone::resolve_local;

/// The period kinds that have boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Day,
    /// ISO 8601 week, Monday through Sunday.
    Week,
    Month,
    /// Jan–Mar, Apr–Jun, Jul–Sep, Oct–Dec.
    Quarter,
    Year,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::Day,
        Period::Week,
        Period::Month,
        Period::Quarter,
        Period::Year,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Quarter => "quarter",
            Period::Year => "year",
        }
    }

    /// First instant of the period containing `t`.
    pub fn beginning<Tz: TimeZone>(&self, t: &DateTime<Tz>) -> DateTime<Tz> {
        local_midnight(&t.timezone(), self.first_day(t.date_naive()))
    }

    /// Last instant (to the nanosecond) of the period containing `t`.
    pub fn end<Tz: TimeZone>(&self, t: &DateTime<Tz>) -> DateTime<Tz> {
        let first = self.first_day(t.date_naive());
        let next = match self {
            Period::Day => first.succ_opt(),
            Period::Week => first.checked_add_days(Days::new(7)),
            Period::Month => first.checked_add_months(Months::new(1)),
            Period::Quarter => first.checked_add_months(Months::new(3)),
            Period::Year => first.checked_add_months(Months::new(12)),
        };
        last_nanosecond_before(&t.timezone(), next)
    }

    fn first_day(&self, date: NaiveDate) -> NaiveDate {
        let first = match self {
            Period::Day => Some(date),
            Period::Week => {
                // Sunday counts as day 7, so it belongs to the preceding Monday.
                let back = u64::from(date.weekday().num_days_from_monday());
                date.checked_sub_days(Days::new(back))
            }
            Period::Month => date.with_day(1),
            Period::Quarter => {
                let month = date.month0() / 3 * 3 + 1;
                NaiveDate::from_ymd_opt(date.year(), month, 1)
            }
            Period::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
        };
        first.unwrap_or(date)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Period {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.to_ascii_lowercase();
        Period::ALL
            .into_iter()
            .find(|period| period.name() == wanted)
            .ok_or_else(|| {
                TimeError::InvalidRange(format!(
                    "'{s}': unknown period, expected day, week, month, quarter or year"
                ))
            })
    }
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    resolve_local(tz, date.and_time(NaiveTime::MIN))
}

fn last_nanosecond_before<Tz: TimeZone>(tz: &Tz, next: Option<NaiveDate>) -> DateTime<Tz> {
    match next {
        Some(date) => {
            let start = local_midnight(tz, date);
            start
                .clone()
                .checked_sub_signed(TimeDelta::nanoseconds(1))
                .unwrap_or(start)
        }
        None => resolve_local(tz, NaiveDateTime::MAX),
    }
}

// ── Free functions ──────────────────────────────────────────────────────────

pub fn beginning_of_day<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    Period::Day.beginning(t)
}

pub fn end_of_day<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    Period::Day.end(t)
}

/// Monday 00:00 of the ISO week containing `t`.
pub fn beginning_of_week<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    Period::Week.beginning(t)
}

pub fn end_of_week<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    Period::Week.end(t)
}

pub fn beginning_of_month<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    Period::Month.beginning(t)
}

pub fn end_of_month<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    Period::Month.end(t)
}

pub fn beginning_of_quarter<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    Period::Quarter.beginning(t)
}

pub fn end_of_quarter<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    Period::Quarter.end(t)
}

pub fn beginning_of_year<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    Period::Year.beginning(t)
}

/// Dec 31 23:59:59.999999999 of the year containing `t`.
pub fn end_of_year<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    Period::Year.end(t)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Offset, Utc};
    use chrono_tz::Tz;

    use crate::zone::Zone;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn rfc<Tz: TimeZone>(t: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        t.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true)
    }

    #[test]
    fn test_day_boundaries() {
        let t = utc("2023-06-20T15:30:45.5Z");
        assert_eq!(rfc(&beginning_of_day(&t)), "2023-06-20T00:00:00.000000000Z");
        assert_eq!(rfc(&end_of_day(&t)), "2023-06-20T23:59:59.999999999Z");
    }

    #[test]
    fn test_week_starts_monday() {
        // Tuesday
        let t = utc("2023-06-20T15:30:45Z");
        assert_eq!(rfc(&beginning_of_week(&t)), "2023-06-19T00:00:00.000000000Z");
        assert_eq!(rfc(&end_of_week(&t)), "2023-06-25T23:59:59.999999999Z");
        // Sunday maps back to the preceding Monday
        let sunday = utc("2023-06-25T08:00:00Z");
        assert_eq!(rfc(&beginning_of_week(&sunday)), "2023-06-19T00:00:00.000000000Z");
        // Monday maps to itself
        let monday = utc("2023-06-26T00:00:00Z");
        assert_eq!(beginning_of_week(&monday), monday);
    }

    #[test]
    fn test_month_boundaries_handle_lengths() {
        let leap = utc("2024-02-10T12:00:00Z");
        assert_eq!(rfc(&beginning_of_month(&leap)), "2024-02-01T00:00:00.000000000Z");
        assert_eq!(rfc(&end_of_month(&leap)), "2024-02-29T23:59:59.999999999Z");
        let common = utc("2023-02-10T12:00:00Z");
        assert_eq!(rfc(&end_of_month(&common)), "2023-02-28T23:59:59.999999999Z");
        let april = utc("2023-04-30T23:59:59Z");
        assert_eq!(rfc(&end_of_month(&april)), "2023-04-30T23:59:59.999999999Z");
        let december = utc("2023-12-31T10:00:00Z");
        assert_eq!(rfc(&end_of_month(&december)), "2023-12-31T23:59:59.999999999Z");
    }

    #[test]
    fn test_quarter_table() {
        let cases = [
            ("2023-01-15T00:00:00Z", "2023-01-01", "2023-03-31"),
            ("2023-03-31T23:00:00Z", "2023-01-01", "2023-03-31"),
            ("2023-04-01T00:00:00Z", "2023-04-01", "2023-06-30"),
            ("2023-06-15T00:00:00Z", "2023-04-01", "2023-06-30"),
            ("2023-08-01T00:00:00Z", "2023-07-01", "2023-09-30"),
            ("2023-11-30T00:00:00Z", "2023-10-01", "2023-12-31"),
        ];
        for (input, first, last) in cases {
            let t = utc(input);
            assert_eq!(
                rfc(&beginning_of_quarter(&t)),
                format!("{first}T00:00:00.000000000Z"),
                "beginning for {input}"
            );
            assert_eq!(
                rfc(&end_of_quarter(&t)),
                format!("{last}T23:59:59.999999999Z"),
                "end for {input}"
            );
        }
    }

    #[test]
    fn test_year_boundaries() {
        let t = utc("2023-06-20T15:30:45Z");
        assert_eq!(rfc(&beginning_of_year(&t)), "2023-01-01T00:00:00.000000000Z");
        assert_eq!(rfc(&end_of_year(&t)), "2023-12-31T23:59:59.999999999Z");
    }

    #[test]
    fn test_fixed_offset_is_preserved() {
        let t = DateTime::parse_from_rfc3339("2023-06-20T01:30:00+02:00").unwrap();
        let start = beginning_of_day(&t);
        assert_eq!(start.offset(), &FixedOffset::east_opt(7200).unwrap());
        assert_eq!(rfc(&start), "2023-06-20T00:00:00.000000000+02:00");
        // the same instant is still the 19th in UTC
        assert_eq!(
            rfc(&beginning_of_day(&t.with_timezone(&Utc))),
            "2023-06-19T00:00:00.000000000Z"
        );
    }

    #[test]
    fn test_named_zone_uses_local_offsets() {
        let berlin = Zone::Named(Tz::Europe__Berlin);
        let t = berlin.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        let start = beginning_of_day(&t);
        let end = end_of_day(&t);
        assert_eq!(start.offset().fix().local_minus_utc(), 3600);
        assert_eq!(end.offset().fix().local_minus_utc(), 7200);
        // the DST switch day has 23 hours
        assert_eq!((end - start).num_hours(), 22);
        assert_eq!(start.timezone(), berlin);
    }

    #[test]
    fn test_adjacency() {
        let t = utc("2023-12-31T18:00:00Z");
        for period in Period::ALL {
            let end = period.end(&t);
            let next = end + TimeDelta::nanoseconds(1);
            assert_eq!(period.beginning(&next), next, "{period}");
            assert!(period.beginning(&t) <= t && t <= end, "{period}");
        }
    }

    #[test]
    fn test_period_from_str() {
        assert_eq!("Quarter".parse::<Period>().unwrap(), Period::Quarter);
        assert!("fortnight".parse::<Period>().is_err());
    }
}
