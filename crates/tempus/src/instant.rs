//! The canonical instant every semantic type wraps, and the capability they share.

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta,
    TimeZone, Utc,
};

use crate::duration::Duration;
use crate::error::{Result, TimeError};
use crate::layout::Layout;
use crate::weekday::Weekday;
use crate::zone::{self, Zone};

/// A point in time with nanosecond resolution and the zone it is expressed in.
pub type Instant = DateTime<Zone>;

/// Unix seconds of 0001-01-01T00:00:00Z.
const ZERO_UNIX: i64 = -62_135_596_800;

/// The zero instant, 0001-01-01T00:00:00Z. Treated as "undefined" by the
/// JSON encodings and by `validate`.
pub fn zero_instant() -> Instant {
    let naive = NaiveDate::from_ymd_opt(1, 1, 1)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN);
    Zone::Utc.from_utc_datetime(&naive)
}

/// Build a UTC instant from Unix seconds and a nanosecond adjustment.
///
/// `nanos` may be negative or exceed one second; it is normalized.
///
/// # Errors
///
/// Returns [`TimeError::Overflow`] when the result is outside chrono's range.
pub fn from_unix(secs: i64, nanos: i64) -> Result<Instant> {
    let secs = secs
        .checked_add(nanos.div_euclid(1_000_000_000))
        .ok_or_else(|| TimeError::Overflow(format!("'{secs}' seconds out of range")))?;
    let nanos = nanos.rem_euclid(1_000_000_000) as u32;
    DateTime::from_timestamp(secs, nanos)
        .map(|dt| dt.with_timezone(&Zone::Utc))
        .ok_or_else(|| TimeError::Overflow(format!("'{secs}' seconds out of range")))
}

/// Current system time, in UTC.
pub fn system_now() -> Instant {
    Utc::now().with_timezone(&Zone::Utc)
}

/// Re-express a chrono datetime with a fixed offset as an [`Instant`].
pub fn from_fixed(dt: DateTime<FixedOffset>) -> Instant {
    dt.with_timezone(&Zone::from(*dt.offset()))
}

/// Build an instant from wall-clock components in `zone`.
///
/// Months, days and clock fields outside their usual range are rejected.
#[allow(clippy::too_many_arguments)]
pub fn from_components(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    nanosecond: u32,
    zone: Zone,
) -> Result<Instant> {
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        TimeError::InvalidDatetime(format!("'{year:04}-{month:02}-{day:02}': no such date"))
    })?;
    let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanosecond).ok_or_else(|| {
        TimeError::InvalidDatetime(format!(
            "'{hour:02}:{minute:02}:{second:02}.{nanosecond}': no such time"
        ))
    })?;
    Ok(zone::resolve_local(&zone, date.and_time(time)))
}

/// True iff both instants fall on the same calendar day, each in its own zone.
pub fn has_equal_date(a: &impl AsInstant, b: &impl AsInstant) -> bool {
    a.as_instant().date_naive() == b.as_instant().date_naive()
}

/// Shift by calendar years, months and days, keeping the wall-clock time.
///
/// Overflowing days roll into the next month, so Jan 31 plus one month is
/// March 2 or 3. Returns the input unchanged if the result is out of range.
pub fn add_date(t: &Instant, years: i32, months: i32, days: i32) -> Instant {
    let local = t.naive_local();
    let total_months = i64::from(local.year()) * 12 + i64::from(local.month0())
        + i64::from(years) * 12
        + i64::from(months);
    let year = total_months.div_euclid(12);
    let month0 = total_months.rem_euclid(12);
    let shifted = i32::try_from(year)
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, month0 as u32 + 1, 1))
        .and_then(|first| {
            let offset = i64::from(local.day0()) + i64::from(days);
            first.checked_add_signed(TimeDelta::try_days(offset)?)
        });
    match shifted {
        Some(date) => zone::resolve_local(&t.timezone(), date.and_time(local.time())),
        None => *t,
    }
}

/// Round down to a multiple of `step` since the zero instant.
///
/// Non-positive steps return the input unchanged.
pub fn truncate(t: &Instant, step: Duration) -> Instant {
    let step = i128::from(step.as_nanos());
    if step <= 0 {
        return *t;
    }
    let since_zero = (i128::from(t.timestamp()) - i128::from(ZERO_UNIX)) * 1_000_000_000
        + i128::from(t.timestamp_subsec_nanos());
    let excess = since_zero.rem_euclid(step);
    // excess < step <= i64::MAX
    t.checked_sub_signed(TimeDelta::nanoseconds(excess as i64))
        .unwrap_or(*t)
}

// ── Binary form ─────────────────────────────────────────────────────────────

const BINARY_VERSION: u8 = 1;
const BINARY_LEN: usize = 18;
const KIND_UTC: u8 = 0;
const KIND_FIXED: u8 = 1;

/// Encode as `[version][kind][i64 unix secs][u32 nanos][i32 offset secs]`, big endian.
pub fn to_binary(t: &Instant) -> Vec<u8> {
    let kind = match t.timezone() {
        Zone::Utc => KIND_UTC,
        _ => KIND_FIXED,
    };
    let offset = t.offset().fix().local_minus_utc();
    let mut out = Vec::with_capacity(BINARY_LEN);
    out.push(BINARY_VERSION);
    out.push(kind);
    out.extend_from_slice(&t.timestamp().to_be_bytes());
    out.extend_from_slice(&t.timestamp_subsec_nanos().to_be_bytes());
    out.extend_from_slice(&offset.to_be_bytes());
    out
}

/// Decode the form written by [`to_binary`].
///
/// # Errors
///
/// Returns [`TimeError::InvalidBinary`] on a wrong length, version, kind or offset.
pub fn from_binary(bytes: &[u8]) -> Result<Instant> {
    let invalid = |reason: &str| TimeError::InvalidBinary(reason.to_string());
    if bytes.len() != BINARY_LEN {
        return Err(TimeError::InvalidBinary(format!(
            "expected {BINARY_LEN} bytes, got {}",
            bytes.len()
        )));
    }
    if bytes[0] != BINARY_VERSION {
        return Err(TimeError::InvalidBinary(format!(
            "unsupported version {}",
            bytes[0]
        )));
    }
    let secs = i64::from_be_bytes(bytes[2..10].try_into().map_err(|_| invalid("seconds"))?);
    let nanos = u32::from_be_bytes(bytes[10..14].try_into().map_err(|_| invalid("nanos"))?);
    let offset = i32::from_be_bytes(bytes[14..18].try_into().map_err(|_| invalid("offset"))?);
    let utc = DateTime::from_timestamp(secs, nanos).ok_or_else(|| invalid("out of range"))?;
    let zone = match bytes[1] {
        KIND_UTC => Zone::Utc,
        KIND_FIXED => Zone::from(FixedOffset::east_opt(offset).ok_or_else(|| invalid("offset"))?),
        other => return Err(TimeError::InvalidBinary(format!("unknown zone kind {other}"))),
    };
    Ok(utc.with_timezone(&zone))
}

// ── Shared capability ───────────────────────────────────────────────────────

/// Anything that carries an [`Instant`].
///
/// Implemented by the raw instant and by every semantic wrapper, so ranges,
/// boundaries and comparisons work uniformly across them.
pub trait AsInstant {
    fn as_instant(&self) -> Instant;

    fn unix(&self) -> i64 {
        self.as_instant().timestamp()
    }

    fn unix_milli(&self) -> i64 {
        self.as_instant().timestamp_millis()
    }

    fn unix_micro(&self) -> i64 {
        self.as_instant().timestamp_micros()
    }

    fn weekday(&self) -> Weekday {
        Weekday::from(Datelike::weekday(&self.as_instant()))
    }

    fn format(&self, layout: Layout) -> String {
        layout.format(&self.as_instant())
    }

    fn is_zero(&self) -> bool {
        self.as_instant() == zero_instant()
    }

    fn is_before(&self, other: &impl AsInstant) -> bool
    where
        Self: Sized,
    {
        self.as_instant() < other.as_instant()
    }

    fn is_after(&self, other: &impl AsInstant) -> bool
    where
        Self: Sized,
    {
        self.as_instant() > other.as_instant()
    }

    /// Elapsed time from `other` to `self`, saturating at the i64 nanosecond range.
    fn since(&self, other: &impl AsInstant) -> Duration
    where
        Self: Sized,
    {
        let delta = self.as_instant() - other.as_instant();
        Duration::try_from(delta).unwrap_or(if delta < TimeDelta::zero() {
            Duration::from_nanos(i64::MIN)
        } else {
            Duration::from_nanos(i64::MAX)
        })
    }
}

impl AsInstant for Instant {
    fn as_instant(&self) -> Instant {
        *self
    }
}

/// Local midnight of `date` in `zone`, resolving DST the same way boundaries do.
pub(crate) fn midnight(date: NaiveDate, zone: Zone) -> Instant {
    zone::resolve_local(&zone, NaiveDateTime::new(date, NaiveTime::MIN))
}

// ── Tests ───────────────────────────────────────────────────────────────────
