//! Async helpers that sleep for a [`Duration`] or until an instant on a [`Clock`].

use tokio::time::sleep;
use tracing::trace;

use crate::clock::Clock;
use crate::duration::Duration;
use crate::instant::AsInstant;

/// Sleep for `duration`. Zero and negative durations return immediately.
pub async fn wait_for(duration: Duration) {
    let Some(std) = duration.to_std().filter(|d| !d.is_zero()) else {
        trace!(%duration, "nothing to wait for");
        return;
    };
    trace!(%duration, "waiting");
    sleep(std).await;
}

/// Sleep until `until` as seen by `clock`.
///
/// Returns immediately when `until` is not in the future. The remaining time
/// is read from the clock once, so a clock that is moved while waiting does
/// not shorten or extend the sleep.
pub async fn wait_until(clock: &dyn Clock, until: &impl AsInstant) {
    let remaining = until.since(&clock.now());
    wait_for(remaining).await;
}

// ── Tests ───────────────────────────────────────────────────────────────────
