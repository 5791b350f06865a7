//! Frame pacing for the capture loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Display refresh interval emulated by [`RefreshClock`].
pub const DEFAULT_REFRESH_HZ: u32 = 60;

/// Monotonic time source plus a "wait for the next refresh" primitive.
pub trait FrameClock: Send {
    /// Time since the clock's origin.
    fn now(&self) -> Duration;

    /// Block until the next refresh tick.
    fn wait_for_next_frame(&mut self);
}

/// Wall-clock pacing at a fixed refresh rate.
#[derive(Debug)]
pub struct RefreshClock {
    origin: Instant,
    interval: Duration,
    next_deadline: Instant,
}

impl Default for RefreshClock {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_HZ)
    }
}

impl RefreshClock {
    /// Tick `hz` times per second (minimum 1).
    pub fn new(hz: u32) -> Self {
        let origin = Instant::now();
        let interval = Duration::from_secs(1) / hz.max(1);
        Self {
            origin,
            interval,
            next_deadline: origin + interval,
        }
    }
}

impl FrameClock for RefreshClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn wait_for_next_frame(&mut self) {
        let now = Instant::now();
        if self.next_deadline > now {
            std::thread::sleep(self.next_deadline - now);
            self.next_deadline += self.interval;
        } else {
            // Fell behind; resync instead of bursting.
            self.next_deadline = now + self.interval;
        }
    }
}

/// Deterministic clock that advances by a fixed step on every wait.
///
/// Clones share the same time, so a test can keep one handle and move time forward while the
/// composer owns another.
#[derive(Clone, Debug)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
    step: Duration,
}

impl ManualClock {
    /// Start at zero, advancing by `step` per wait.
    pub fn new(step: Duration) -> Self {
        Self {
            nanos: Arc::new(AtomicU64::new(0)),
            step,
        }
    }

    /// Step of one frame at `fps` frames per second.
    pub fn per_frame(fps: u32) -> Self {
        Self::new(Duration::from_secs(1) / fps.max(1))
    }

    /// Move time forward by `by`.
    pub fn advance(&self, by: Duration) {
        let by = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.fetch_add(by, Ordering::SeqCst);
    }

    /// Jump to an absolute time.
    pub fn set(&self, at: Duration) {
        let at = u64::try_from(at.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.store(at, Ordering::SeqCst);
    }
}

impl FrameClock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }

    fn wait_for_next_frame(&mut self) {
        self.advance(self.step);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/clock.rs"]
mod tests;
