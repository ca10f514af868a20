//! Time sources for the frame loop.

use std::time::Instant;

/// Monotonic seconds since the clock was created.
pub trait FrameClock {
    fn elapsed(&mut self) -> f64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy)]
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

impl FrameClock for SystemClock {
    fn elapsed(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Deterministic clock: every reading is one `interval` after the previous.
///
/// The first reading is 0. Used for headless runs and tests so that a replay
/// produces identical frames regardless of machine load.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    interval: f64,
    readings: u64,
}

impl FixedClock {
    /// Negative or non-finite intervals are treated as 0.
    pub fn new(interval: f64) -> Self {
        let interval = if interval.is_finite() {
            interval.max(0.0)
        } else {
            0.0
        };
        Self {
            interval,
            readings: 0,
        }
    }

    /// Clock ticking at `fps` frames per second.
    pub fn from_fps(fps: f64) -> Self {
        if fps > 0.0 {
            Self::new(1.0 / fps)
        } else {
            Self::new(0.0)
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }
}

impl FrameClock for FixedClock {
    fn elapsed(&mut self) -> f64 {
        let t = self.readings as f64 * self.interval;
        self.readings += 1;
        t
    }
}
