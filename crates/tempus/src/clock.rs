//! Sources of "now".
//!
//! Everything that resolves `NOW` takes a [`Clock`]. Production code uses the
//! process-wide [`default_clock`], which follows the system clock until a test
//! pins it with [`CurrentTime::set_now`]. Tests that want isolation build their
//! own [`CurrentTime`] or pass a closure.

use parking_lot::{const_mutex, Mutex};

use crate::instant::{self, Instant};

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        instant::system_now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> Instant + Send + Sync,
{
    fn now(&self) -> Instant {
        self()
    }
}

/// A clock that follows the system clock until overridden.
///
/// Reads and writes are serialized by a mutex, so concurrent readers always
/// see either the old or the new override, never a torn value.
#[derive(Debug)]
pub struct CurrentTime {
    pinned: Mutex<Option<Instant>>,
}

impl CurrentTime {
    pub const fn new() -> Self {
        Self {
            pinned: const_mutex(None),
        }
    }

    /// A clock pinned to `now` from the start.
    pub fn fixed(now: Instant) -> Self {
        let clock = Self::new();
        clock.set_now(now);
        clock
    }

    /// Pin the clock. Every later `now()` returns this instant until changed.
    pub fn set_now(&self, now: Instant) {
        *self.pinned.lock() = Some(now);
        tracing::debug!(now = %now.to_rfc3339(), "clock pinned");
    }

    /// Drop the override and follow the system clock again.
    pub fn reset(&self) {
        *self.pinned.lock() = None;
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned.lock().is_some()
    }
}

impl Default for CurrentTime {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for CurrentTime {
    fn now(&self) -> Instant {
        match *self.pinned.lock() {
            Some(now) => now,
            None => instant::system_now(),
        }
    }
}

static DEFAULT_CLOCK: CurrentTime = CurrentTime::new();

/// The process-wide clock consulted by the convenience parsers.
pub fn default_clock() -> &'static CurrentTime {
    &DEFAULT_CLOCK
}

// ── Tests ───────────────────────────────────────────────────────────────────
