//! Closed time ranges and their union/intersection across collections.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::date::Date;
use crate::date_time::DateTime;
use crate::duration::Duration;
use crate::error::{Result, TimeError};
use crate::instant::{AsInstant, Instant};
use crate::period::Period;
use crate::unix_time::UnixTime;

/// A closed range `[from, until]`. Valid when `from <= until`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range<T> {
    pub from: T,
    pub until: T,
}

pub type TimeRange = Range<Instant>;
pub type DateRange = Range<Date>;
pub type DateTimeRange = Range<DateTime>;
pub type UnixTimeRange = Range<UnixTime>;

impl<T: Ord + Copy> Range<T> {
    pub fn new(from: T, until: T) -> Self {
        Self { from, until }
    }

    pub fn is_valid(&self) -> bool {
        self.from <= self.until
    }

    pub fn contains(&self, t: &T) -> bool {
        self.from <= *t && *t <= self.until
    }

    /// The overlap of two ranges, or `None` when they share no instant.
    ///
    /// Ranges are closed, so two ranges that touch at a single instant
    /// intersect in that instant.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let from = self.from.max(other.from);
        let until = self.until.min(other.until);
        (from <= until).then_some(Self { from, until })
    }

    /// The smallest range containing both.
    pub fn span(&self, other: &Self) -> Self {
        Self {
            from: self.from.min(other.from),
            until: self.until.max(other.until),
        }
    }
}

impl<T: Ord + Copy + fmt::Display> Range<T> {
    /// # Errors
    ///
    /// Returns [`TimeError::InvalidRange`] when `from` is after `until`.
    pub fn validate(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(TimeError::InvalidRange(format!(
                "'{self}': from is after until"
            )))
        }
    }
}

impl<T: AsInstant + From<Instant>> Range<T> {
    /// The period of kind `period` containing `t`.
    pub fn period(period: Period, t: &impl AsInstant) -> Self {
        let t = t.as_instant();
        Self {
            from: T::from(period.beginning(&t)),
            until: T::from(period.end(&t)),
        }
    }

    pub fn day(t: &impl AsInstant) -> Self {
        Self::period(Period::Day, t)
    }

    /// Monday 00:00 through Sunday 23:59:59.999999999.
    pub fn week(t: &impl AsInstant) -> Self {
        Self::period(Period::Week, t)
    }

    pub fn month(t: &impl AsInstant) -> Self {
        Self::period(Period::Month, t)
    }

    pub fn quarter(t: &impl AsInstant) -> Self {
        Self::period(Period::Quarter, t)
    }

    pub fn year(t: &impl AsInstant) -> Self {
        Self::period(Period::Year, t)
    }
}

impl<T: AsInstant> Range<T> {
    /// Re-express both ends as another flavor, e.g. `DateTimeRange` to `DateRange`.
    pub fn convert<U: From<Instant>>(&self) -> Range<U> {
        Range {
            from: U::from(self.from.as_instant()),
            until: U::from(self.until.as_instant()),
        }
    }

    /// Length of the range; negative for invalid ranges.
    pub fn duration(&self) -> Duration {
        self.until.since(&self.from)
    }
}

impl<T: fmt::Display> fmt::Display for Range<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from, self.until)
    }
}

// ── Ranges ──────────────────────────────────────────────────────────────────

/// A list of ranges, reduced with [`max`](Ranges::max) (union) and
/// [`min`](Ranges::min) (intersection).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ranges<T>(Vec<Range<T>>);

pub type TimeRanges = Ranges<Instant>;
pub type DateRanges = Ranges<Date>;
pub type DateTimeRanges = Ranges<DateTime>;
pub type UnixTimeRanges = Ranges<UnixTime>;

impl<T: Ord + Copy> Ranges<T> {
    pub fn new(ranges: Vec<Range<T>>) -> Self {
        Self(ranges)
    }

    /// The smallest range enclosing every element: earliest `from`, latest `until`.
    ///
    /// `None` for an empty list.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempus::{Range, Ranges};
    ///
    /// let ranges = Ranges::new(vec![Range::new(10, 15), Range::new(5, 12), Range::new(8, 20)]);
    /// assert_eq!(ranges.max(), Some(Range::new(5, 20)));
    /// assert_eq!(Ranges::<i32>::default().max(), None);
    /// ```
    pub fn max(&self) -> Option<Range<T>> {
        let (first, rest) = self.0.split_first()?;
        Some(rest.iter().fold(*first, |acc, r| acc.span(r)))
    }

    /// The largest range inside every element: latest `from`, earliest `until`.
    ///
    /// `None` for an empty list, and `None` when the elements share no instant.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempus::{Range, Ranges};
    ///
    /// let ranges = Ranges::new(vec![Range::new(10, 20), Range::new(12, 25), Range::new(8, 18)]);
    /// assert_eq!(ranges.min(), Some(Range::new(12, 18)));
    /// let disjoint = Ranges::new(vec![Range::new(10, 15), Range::new(20, 25)]);
    /// assert_eq!(disjoint.min(), None);
    /// ```
    pub fn min(&self) -> Option<Range<T>> {
        let (first, rest) = self.0.split_first()?;
        let folded = rest.iter().fold(*first, |acc, r| Range {
            from: acc.from.max(r.from),
            until: acc.until.min(r.until),
        });
        folded.is_valid().then_some(folded)
    }

    pub fn push(&mut self, range: Range<T>) {
        self.0.push(range);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Range<T>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Ord + Copy + fmt::Display> Ranges<T> {
    /// Validates every element.
    pub fn validate(&self) -> Result<()> {
        self.0.iter().try_for_each(Range::validate)
    }
}

impl<T> From<Vec<Range<T>>> for Ranges<T> {
    fn from(ranges: Vec<Range<T>>) -> Self {
        Self(ranges)
    }
}

impl<T> FromIterator<Range<T>> for Ranges<T> {
    fn from_iter<I: IntoIterator<Item = Range<T>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for Ranges<T> {
    type Item = Range<T>;
    type IntoIter = std::vec::IntoIter<Range<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
