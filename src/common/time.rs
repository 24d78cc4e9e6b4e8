//! Time-related utilities with clock abstraction for testability.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chrono::Utc;

/// Monotonic clock trait for dependency injection and testing.
///
/// The session timer accounts elapsed time from monotonic readings, so a
/// reading is a `Duration` since a fixed (per-clock) origin rather than a
/// wall-clock timestamp.
pub trait Clock: Send + Sync {
    /// Current monotonic reading since this clock's origin.
    fn now(&self) -> Duration;
}

/// System clock implementation, anchored at construction.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced clock for tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    micros: AtomicU64,
}

impl ManualClock {
    /// Create a new manual clock starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, delta: Duration) {
        self.micros
            .fetch_add(delta.as_micros() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_micros(self.micros.load(Ordering::SeqCst))
    }
}

/// Generate a wall-clock workout id, e.g. `wod_20260823143000`.
pub fn workout_id() -> String {
    format!("wod_{}", Utc::now().format("%Y%m%d%H%M%S"))
}

/// Current date as `YYYY-MM-DD` (UTC).
pub fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Current wall-clock timestamp in RFC 3339 format (UTC).
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}
