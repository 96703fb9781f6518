//! Time zones attached to instants, and the zone-name loader.
//!
//! [`Zone`] is a [`chrono::TimeZone`] that is either UTC, a fixed offset
//! (what an RFC 3339 string carries), or a named IANA zone with daylight-saving
//! rules from `chrono-tz`. Period boundaries and [`TimeOfDay`] re-resolve a
//! named zone's offset for each calendar date they land on.
//!
//! [`ZoneCache`] memoizes name lookups in a concurrent map.
//!
//! [`TimeOfDay`]: crate::TimeOfDay

use std::fmt;

use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta,
    TimeZone, Utc,
};
use chrono_tz::Tz;
use dashmap::DashMap;
use lazy_static::lazy_static;

use crate::error::{Result, TimeError};
use crate::value::Value;

/// The zone an [`Instant`](crate::Instant) is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Zone {
    #[default]
    Utc,
    Fixed(FixedOffset),
    Named(Tz),
}

/// The offset of a [`Zone`] at a particular instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoneOffset {
    zone: Zone,
    fixed: FixedOffset,
}

impl ZoneOffset {
    pub fn zone(&self) -> Zone {
        self.zone
    }
}

impl Offset for ZoneOffset {
    fn fix(&self) -> FixedOffset {
        self.fixed
    }
}

impl fmt::Display for ZoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.fixed, f)
    }
}

impl Zone {
    fn tag(self, fixed: FixedOffset) -> ZoneOffset {
        ZoneOffset { zone: self, fixed }
    }

    /// The IANA name for named zones, `None` otherwise.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Zone::Named(tz) => Some(tz.name()),
            _ => None,
        }
    }
}

impl TimeZone for Zone {
    type Offset = ZoneOffset;

    fn from_offset(offset: &ZoneOffset) -> Self {
        offset.zone
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<ZoneOffset> {
        self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<ZoneOffset> {
        match self {
            Zone::Utc => LocalResult::Single(self.tag(Utc.fix())),
            Zone::Fixed(offset) => LocalResult::Single(self.tag(*offset)),
            Zone::Named(tz) => tz
                .offset_from_local_datetime(local)
                .map(|offset| self.tag(offset.fix())),
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> ZoneOffset {
        self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> ZoneOffset {
        match self {
            Zone::Utc => self.tag(Utc.fix()),
            Zone::Fixed(offset) => self.tag(*offset),
            Zone::Named(tz) => self.tag(tz.offset_from_utc_datetime(utc).fix()),
        }
    }
}

impl fmt::Display for Zone {
    /// `Z` for UTC, `±hh:mm` for fixed offsets, the IANA name otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Utc => f.write_str("Z"),
            Zone::Fixed(offset) => write!(f, "{offset}"),
            Zone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

impl From<Utc> for Zone {
    fn from(_: Utc) -> Self {
        Zone::Utc
    }
}

impl From<FixedOffset> for Zone {
    fn from(offset: FixedOffset) -> Self {
        if offset.local_minus_utc() == 0 {
            Zone::Utc
        } else {
            Zone::Fixed(offset)
        }
    }
}

impl From<Tz> for Zone {
    fn from(tz: Tz) -> Self {
        Zone::Named(tz)
    }
}

/// Resolve a wall-clock reading in `tz` to a concrete instant.
///
/// Folds (the reading happens twice) take the earlier instant. Gaps (the
/// reading never happens) use the offset in effect just before the transition,
/// which moves the result forward by the size of the gap.
pub(crate) fn resolve_local<Tz2: TimeZone>(tz: &Tz2, local: NaiveDateTime) -> DateTime<Tz2> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let probe = local
                .checked_sub_signed(TimeDelta::days(1))
                .unwrap_or(local);
            let offset = tz.offset_from_utc_datetime(&probe).fix();
            let utc = local
                .checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))
                .unwrap_or(local);
            tz.from_utc_datetime(&utc)
        }
    }
}

// ── Zone loading ────────────────────────────────────────────────────────────

/// A read-through cache from zone names to [`Zone`]s.
///
/// Lookups of the same or different names may run concurrently.
#[derive(Debug, Default)]
pub struct ZoneCache {
    zones: DashMap<String, Zone>,
}

impl ZoneCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a zone name, consulting the cache first.
    ///
    /// Accepts `"UTC"`, `"Z"`, and any IANA name known to `chrono-tz`
    /// (`"Europe/Berlin"`, `"America/New_York"`, ...).
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::InvalidTimezone`] for unknown names.
    pub fn load(&self, name: &str) -> Result<Zone> {
        if let Some(zone) = self.zones.get(name) {
            return Ok(*zone);
        }
        let zone = match name {
            "UTC" | "Z" => Zone::Named(Tz::UTC),
            _ => name
                .parse::<Tz>()
                .map(Zone::Named)
                .map_err(|_| TimeError::InvalidTimezone(format!("'{name}'")))?,
        };
        tracing::debug!(name, "zone cache miss");
        self.zones.insert(name.to_string(), zone);
        Ok(zone)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

lazy_static! {
    static ref ZONES: ZoneCache = ZoneCache::new();
}

/// The process-wide zone cache used by [`load_zone`].
pub fn zone_cache() -> &'static ZoneCache {
    &ZONES
}

/// Resolve a zone name through the process-wide cache.
///
/// # Examples
///
/// ```
/// use tempus::load_zone;
///
/// assert_eq!(load_zone("Europe/Berlin").unwrap().to_string(), "Europe/Berlin");
/// assert!(load_zone("Banana").is_err());
/// ```
pub fn load_zone(name: &str) -> Result<Zone> {
    ZONES.load(name)
}

/// Coerce a scalar to text and resolve it as a zone name.
pub fn parse_zone(value: impl Into<Value>) -> Result<Zone> {
    let text = value.into().into_text()?;
    load_zone(&text)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_load_known_zones() {
        let cache = ZoneCache::new();
        assert_eq!(cache.load("UTC").unwrap(), Zone::Named(Tz::UTC));
        assert_eq!(
            cache.load("Europe/Berlin").unwrap(),
            Zone::Named(Tz::Europe__Berlin)
        );
    }

    #[test]
    fn test_load_unknown_zone_returns_error() {
        let err = ZoneCache::new().load("Banana").unwrap_err();
        assert!(err.to_string().contains("Invalid timezone"), "got: {err}");
        assert!(err.to_string().contains("Banana"), "got: {err}");
    }

    #[test]
    fn test_cache_memoizes() {
        let cache = ZoneCache::new();
        assert!(cache.is_empty());
        cache.load("Asia/Tokyo").unwrap();
        cache.load("Asia/Tokyo").unwrap();
        assert_eq!(cache.len(), 1);
        let _ = cache.load("Nowhere/Special");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_loads() {
        let cache = ZoneCache::new();
        std::thread::scope(|scope| {
            for name in ["Europe/Berlin", "America/New_York", "Europe/Berlin", "UTC"] {
                let cache = &cache;
                scope.spawn(move || cache.load(name).unwrap());
            }
        });
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_parse_zone_from_value() {
        assert_eq!(
            parse_zone("Europe/Berlin").unwrap(),
            Zone::Named(Tz::Europe__Berlin)
        );
        assert!(parse_zone(42).is_err());
    }

    #[test]
    fn test_named_zone_offset_follows_dst() {
        let berlin = Zone::Named(Tz::Europe__Berlin);
        let winter = berlin.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let summer = berlin.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        assert_eq!(winter.offset().fix().local_minus_utc(), 3600);
        assert_eq!(summer.offset().fix().local_minus_utc(), 7200);
        assert_eq!(winter.to_rfc3339(), "2024-01-01T12:00:00+01:00");
    }

    #[test]
    fn test_fixed_zone_from_zero_offset_is_utc() {
        assert_eq!(Zone::from(FixedOffset::east_opt(0).unwrap()), Zone::Utc);
    }

    #[test]
    fn test_display() {
        assert_eq!(Zone::Utc.to_string(), "Z");
        assert_eq!(
            Zone::Fixed(FixedOffset::west_opt(5 * 3600).unwrap()).to_string(),
            "-05:00"
        );
        assert_eq!(Zone::Named(Tz::Europe__Berlin).to_string(), "Europe/Berlin");
    }

    #[test]
    fn test_resolve_local_gap_moves_forward() {
        // 2024-03-31 02:30 does not exist in Berlin (clocks jump 02:00 → 03:00).
        let berlin = Zone::Named(Tz::Europe__Berlin);
        let local = NaiveDate::from_ymd_opt(2024, 3, 31)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let resolved = resolve_local(&berlin, local);
        assert_eq!(resolved.day(), 31);
        assert_eq!(resolved.hour(), 3);
        assert_eq!(resolved.minute(), 30);
    }

    #[test]
    fn test_resolve_local_fold_takes_earliest() {
        // 2024-10-27 02:30 happens twice in Berlin; the first is still +02:00.
        let berlin = Zone::Named(Tz::Europe__Berlin);
        let local = NaiveDate::from_ymd_opt(2024, 10, 27)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let resolved = resolve_local(&berlin, local);
        assert_eq!(resolved.offset().fix().local_minus_utc(), 7200);
    }
}
