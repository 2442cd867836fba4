//! Clock and timing utilities for recording sessions.
//!
//! Live capture backends stamp raw events with milliseconds from a
//! monotonic epoch. The recorder only ever subtracts two stamps taken
//! from the same clock, so the epoch itself is arbitrary.

use std::time::Instant;

/// A monotonic clock anchored to a fixed epoch.
#[derive(Debug, Clone)]
pub struct RecordingClock {
    /// The instant the clock was created.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl RecordingClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Milliseconds elapsed since the epoch.
    pub fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// Wall-clock time at epoch.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Convert milliseconds to fractional seconds.
    pub fn ms_to_secs(ms: u64) -> f64 {
        ms as f64 / 1_000.0
    }
}

/// Minimum-interval gate for pointer-move sampling.
///
/// Unlike a free-running rate limiter, readiness and acceptance are
/// separate steps: a sample that passes the interval check can still be
/// rejected by a later filter without consuming the slot.
#[derive(Debug, Clone)]
pub struct MoveThrottle {
    interval_ms: u64,
    last_accepted_ms: Option<u64>,
}

impl MoveThrottle {
    /// Create a throttle with the given minimum interval.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_accepted_ms: None,
        }
    }

    /// Whether enough time has passed since the last accepted sample.
    /// Always true before the first acceptance.
    pub fn is_ready(&self, now_ms: u64) -> bool {
        match self.last_accepted_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
        }
    }

    /// Record that a sample was accepted at `now_ms`.
    pub fn mark(&mut self, now_ms: u64) {
        self.last_accepted_ms = Some(now_ms);
    }

    /// Forget the last accepted sample.
    pub fn reset(&mut self) {
        self.last_accepted_ms = None;
    }

    /// Change the interval without forgetting the last sample.
    pub fn set_interval_ms(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    /// Minimum interval in milliseconds.
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}
