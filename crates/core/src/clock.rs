// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction so timing-sensitive logic (minimum-run gates, heartbeat
//! timeouts, scheduler deadlines) can be driven by a fake clock in tests
//! instead of real sleeps.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Source of time for the core. Implementations must be cheap to clone and
/// safe to share across tasks.
pub trait Clock: Clone + Send + Sync + 'static {
    /// A monotonic instant, used for deadlines and elapsed-time measurements.
    fn now(&self) -> Instant;

    /// Wall-clock milliseconds since the Unix epoch, used for persisted timestamps.
    fn epoch_ms(&self) -> u64;
}

/// Real wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Deterministic, manually-advanced clock for tests.
#[derive(Clone)]
pub struct FakeClock {
    inner: Arc<Mutex<FakeClockState>>,
}

struct FakeClockState {
    now: Instant,
    epoch_ms: u64,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeClockState {
                now: Instant::now(),
                epoch_ms: 0,
            })),
        }
    }

    /// Advance both the monotonic instant and the epoch clock by `d`.
    pub fn advance(&self, d: Duration) {
        let mut state = self.inner.lock();
        state.now += d;
        state.epoch_ms += d.as_millis() as u64;
    }

    pub fn set_epoch_ms(&self, epoch_ms: u64) {
        self.inner.lock().epoch_ms = epoch_ms;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.inner.lock().now
    }

    fn epoch_ms(&self) -> u64 {
        self.inner.lock().epoch_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_clock_advances_monotonic_and_epoch_together() {
        let clock = FakeClock::new();
        let start = clock.now();
        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.now(), start + Duration::from_secs(5));
        assert_eq!(clock.epoch_ms(), 5_000);
    }

    #[test]
    fn system_clock_epoch_ms_is_nonzero() {
        assert!(SystemClock.epoch_ms() > 0);
    }
}
