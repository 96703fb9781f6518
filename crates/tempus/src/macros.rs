//! Shared surface of the instant wrappers (`Date`, `DateTime`, `UnixTime`).

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Visitor};

use crate::instant::{zero_instant, Instant};
use crate::parse::parse_time;

/// Implements construction, calendar arithmetic, conversions and parsing for a
/// newtype over [`Instant`].
///
/// The type must provide `From<Instant>` itself; that impl is where `Date`
/// truncates to midnight. `$parser` is the function backing `parse_with`.
macro_rules! instant_wrapper {
    ($name:ident, $parser:path) => {
        impl $name {
            /// The zero value, 0001-01-01T00:00:00Z.
            pub fn zero() -> Self {
                Self::from($crate::instant::zero_instant())
            }

            /// Build from wall-clock components in `zone`.
            ///
            /// # Errors
            ///
            /// Returns [`TimeError::InvalidDatetime`](crate::TimeError::InvalidDatetime)
            /// for out-of-range components such as February 30.
            #[allow(clippy::too_many_arguments)]
            pub fn new(
                year: i32,
                month: u32,
                day: u32,
                hour: u32,
                minute: u32,
                second: u32,
                nanosecond: u32,
                zone: $crate::Zone,
            ) -> $crate::Result<Self> {
                $crate::instant::from_components(
                    year, month, day, hour, minute, second, nanosecond, zone,
                )
                .map(Self::from)
            }

            pub fn from_unix(secs: i64) -> $crate::Result<Self> {
                $crate::instant::from_unix(secs, 0).map(Self::from)
            }

            pub fn from_unix_micro(micros: i64) -> $crate::Result<Self> {
                $crate::instant::from_unix(
                    micros.div_euclid(1_000_000),
                    micros.rem_euclid(1_000_000) * 1_000,
                )
                .map(Self::from)
            }

            /// Parse against the process-wide clock.
            pub fn parse(value: impl Into<$crate::Value>) -> $crate::Result<Self> {
                Self::parse_with(value, $crate::clock::default_clock())
            }

            pub fn parse_with(
                value: impl Into<$crate::Value>,
                clock: &dyn $crate::Clock,
            ) -> $crate::Result<Self> {
                $parser(value, clock).map(Self::from)
            }

            /// Parse, falling back to `default` on any error.
            pub fn parse_or(value: impl Into<$crate::Value>, default: Self) -> Self {
                Self::parse(value).unwrap_or(default)
            }

            pub fn year(&self) -> i32 {
                chrono::Datelike::year(&self.0)
            }

            pub fn month(&self) -> u32 {
                chrono::Datelike::month(&self.0)
            }

            pub fn day(&self) -> u32 {
                chrono::Datelike::day(&self.0)
            }

            pub fn zone(&self) -> $crate::Zone {
                self.0.timezone()
            }

            pub fn checked_add(&self, d: $crate::Duration) -> Option<Self> {
                self.0
                    .checked_add_signed(d.to_time_delta())
                    .map(Self::from)
            }

            /// Shift by calendar years, months and days.
            pub fn add_date(&self, years: i32, months: i32, days: i32) -> Self {
                Self::from($crate::instant::add_date(
                    &self.0,
                    years,
                    months,
                    days,
                ))
            }

            pub fn truncate(&self, step: $crate::Duration) -> Self {
                Self::from($crate::instant::truncate(&self.0, step))
            }

            /// Fails for the zero value.
            pub fn validate(&self) -> $crate::Result<()> {
                if $crate::AsInstant::is_zero(self) {
                    return Err($crate::TimeError::Zero(format!(
                        "{} is zero",
                        stringify!($name)
                    )));
                }
                Ok(())
            }

            pub fn to_binary(&self) -> Vec<u8> {
                $crate::instant::to_binary(&self.0)
            }

            pub fn from_binary(bytes: &[u8]) -> $crate::Result<Self> {
                $crate::instant::from_binary(bytes).map(Self::from)
            }
        }

        impl $crate::AsInstant for $name {
            fn as_instant(&self) -> $crate::Instant {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::zero()
            }
        }

        impl From<$name> for $crate::Instant {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::TimeError;

            fn from_str(s: &str) -> $crate::Result<Self> {
                Self::parse(s)
            }
        }

        /// A result outside the supported range leaves the value unchanged.
        impl std::ops::Add<$crate::Duration> for $name {
            type Output = $name;

            fn add(self, d: $crate::Duration) -> $name {
                self.checked_add(d).unwrap_or(self)
            }
        }

        impl std::ops::Sub<$crate::Duration> for $name {
            type Output = $name;

            fn sub(self, d: $crate::Duration) -> $name {
                self.checked_add(-d).unwrap_or(self)
            }
        }

        impl std::ops::Sub for $name {
            type Output = $crate::Duration;

            fn sub(self, other: $name) -> $crate::Duration {
                $crate::AsInstant::since(&self, &other)
            }
        }
    };
}

/// Adds hour/minute/second/nanosecond getters.
macro_rules! clock_getters {
    ($name:ident) => {
        impl $name {
            pub fn hour(&self) -> u32 {
                chrono::Timelike::hour(&self.0)
            }

            pub fn minute(&self) -> u32 {
                chrono::Timelike::minute(&self.0)
            }

            pub fn second(&self) -> u32 {
                chrono::Timelike::second(&self.0)
            }

            pub fn nanosecond(&self) -> u32 {
                chrono::Timelike::nanosecond(&self.0)
            }
        }
    };
}

pub(crate) use {clock_getters, instant_wrapper};

/// Deserializes a textual time through the flexible parser.
///
/// `""`, `"null"`, `null` and a missing value give the zero instant.
pub(crate) struct TimeTextVisitor<T> {
    expecting: &'static str,
    marker: PhantomData<T>,
}

impl<T> TimeTextVisitor<T> {
    pub(crate) fn new(expecting: &'static str) -> Self {
        Self {
            expecting,
            marker: PhantomData,
        }
    }
}

impl<'de, T: From<Instant>> Visitor<'de> for TimeTextVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.expecting)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
        match v {
            "" | "null" => Ok(T::from(zero_instant())),
            _ => parse_time(v).map(T::from).map_err(E::custom),
        }
    }

    fn visit_none<E: de::Error>(self) -> Result<T, E> {
        Ok(T::from(zero_instant()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<T, E> {
        Ok(T::from(zero_instant()))
    }

    fn visit_some<D: de::Deserializer<'de>>(self, deserializer: D) -> Result<T, D::Error> {
        deserializer.deserialize_any(self)
    }
}
