//! Frame timing.
//!
//! The shell owns one [`TimeClock`], started when the shell is constructed,
//! and hands a [`Time`] snapshot to every hook.  `elapsed` is measured on the
//! monotonic clock so it never decreases between frames.

use std::time::{Duration, Instant};

/// Largest delta reported for a single frame, in seconds.
pub const MAX_DELTA: f32 = 0.1;

/// Timing information for the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Time {
    /// Seconds since the previous frame, clamped to [`MAX_DELTA`].
    pub delta: f32,

    /// Seconds since the clock was started.
    pub elapsed: f64,

    /// Index of the current frame, starting at 0.
    pub frame_count: u64,

    /// Instantaneous frames-per-second derived from `delta`.
    pub fps: f32,
}

/// Monotonic clock that produces [`Time`] snapshots.
#[derive(Debug)]
pub struct TimeClock {
    start: Instant,
    last_tick: Instant,
    frame_count: u64,
}

impl TimeClock {
    /// Start a new clock now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            frame_count: 0,
        }
    }

    /// Time since the clock was started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Current snapshot without advancing the frame counter.
    ///
    /// Used for the input hooks, which run between frames.
    pub fn peek(&self) -> Time {
        self.snapshot(Instant::now())
    }

    /// Advance by one frame and return the snapshot for it.
    pub fn tick(&mut self) -> Time {
        let now = Instant::now();
        let time = self.snapshot(now);
        self.last_tick = now;
        self.frame_count += 1;
        time
    }

    fn snapshot(&self, now: Instant) -> Time {
        let delta = now
            .saturating_duration_since(self.last_tick)
            .as_secs_f32()
            .min(MAX_DELTA);
        let fps = if delta > 0.0 { 1.0 / delta } else { 0.0 };
        Time {
            delta,
            elapsed: now.saturating_duration_since(self.start).as_secs_f64(),
            frame_count: self.frame_count,
            fps,
        }
    }
}

impl Default for TimeClock {
    fn default() -> Self {
        Self::new()
    }
}
