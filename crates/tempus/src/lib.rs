//! # tempus
//!
//! Semantic date/time values for services that exchange timestamps as text,
//! JSON and bytes.
//!
//! Every value is an instant on the timeline paired with the zone it was
//! expressed in, so formatting reproduces the input offset and calendar
//! arithmetic happens on the local wall clock.
//!
//! ## Modules
//!
//! - [`duration`]: Signed nanosecond durations with `1h30m`-style text
//! - [`layout`]: Named text and epoch layouts, and ordered layout lists
//! - [`parse`]: Flexible parsing: `NOW`, `NOW±duration`, RFC 3339 variants, dates, epochs
//! - [`period`]: Day/week/month/quarter/year boundaries
//! - [`range`]: Closed ranges with union and intersection over collections
//! - [`date_time`], [`date`], [`unix_time`]: Instant wrappers with distinct JSON forms
//! - [`time_of_day`]: Wall-clock times resolved onto calendar dates across DST
//! - [`weekday`]: Sunday-based weekday numbers and names
//! - [`zone`]: UTC, fixed offsets and IANA zones behind one type, with a shared cache
//! - [`clock`]: Mockable "now"
//! - [`waiter`]: Async sleeps driven by durations and clocks
//! - [`error`]: Error types
//!
//! ## Example
//!
//! ```
//! use tempus::{AsInstant, CurrentTime, DateTime, DateTimeRange, Duration};
//!
//! let clock = CurrentTime::fixed(tempus::from_unix(1_686_419_205, 0).unwrap());
//! let t = DateTime::parse_with("NOW-1h30m", &clock).unwrap();
//! assert_eq!(t.to_string(), "2023-06-10T16:16:45Z");
//!
//! let quarter = DateTimeRange::quarter(&t);
//! assert_eq!(quarter.from.to_string(), "2023-04-01T00:00:00Z");
//! assert!(t.since(&quarter.from) > Duration::DAY);
//! ```

mod macros;

pub mod clock;
pub mod date;
pub mod date_time;
pub mod duration;
pub mod error;
pub mod instant;
pub mod layout;
pub mod parse;
pub mod period;
pub mod range;
pub mod time_of_day;
pub mod unix_time;
pub mod value;
pub mod waiter;
pub mod weekday;
pub mod zone;

pub use clock::{default_clock, Clock, CurrentTime, SystemClock};
pub use date::Date;
pub use date_time::{parse_date_time, DateTime};
pub use duration::{parse_duration, Duration};
pub use error::{Result, TimeError};
pub use instant::{from_unix, has_equal_date, system_now, zero_instant, AsInstant, Instant};
pub use layout::{Layout, Layouts};
pub use parse::{
    parse_time, parse_time_or, parse_time_with, parse_unix_time, parse_unix_time_with, NOW,
};
pub use period::{
    beginning_of_day, beginning_of_month, beginning_of_quarter, beginning_of_week,
    beginning_of_year, end_of_day, end_of_month, end_of_quarter, end_of_week, end_of_year,
    Period,
};
pub use range::{
    DateRange, DateRanges, DateTimeRange, DateTimeRanges, Range, Ranges, TimeRange, TimeRanges,
    UnixTimeRange, UnixTimeRanges,
};
pub use time_of_day::{parse_time_of_day, parse_time_of_day_with, TimeOfDay, TimeOfDays};
pub use unix_time::UnixTime;
pub use value::Value;
pub use waiter::{wait_for, wait_until};
pub use weekday::{parse_weekday, parse_weekdays, Weekday, Weekdays};
pub use zone::{load_zone, parse_zone, zone_cache, Zone, ZoneCache};
