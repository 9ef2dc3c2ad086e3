//! # Frame timing
//!
//! [`FrameClock`] turns wall-clock ticks into the per-frame elapsed time the
//! camera integrates and the total run time the lights orbit with. It also
//! keeps a short window of frame times for an FPS estimate.
//!
//! ```rust
//! use vantage::performance::FrameClock;
//!
//! let mut clock = FrameClock::new();
//! let frame = clock.tick();
//! assert!(frame.elapsed_seconds >= 0.0);
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const DEFAULT_SAMPLES: usize = 120;
const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Timing snapshot handed to per-frame updates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous tick, capped. Zero when no time passed.
    pub elapsed_seconds: f32,
    /// Seconds since the clock started, accumulated from unclamped ticks
    pub total_seconds: f32,
    pub frame_index: u64,
}

/// Per-window frame clock.
///
/// Elapsed time is capped so a debugger pause or a minimized window does not
/// fling the camera across the scene on the next frame. There is no lower
/// bound: a tick at the same instant reports zero and the camera stays put.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    last_report: Instant,
    frame_index: u64,
    dt_max: Duration,
    frame_times: VecDeque<Duration>,
    max_samples: usize,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        Self {
            start: now,
            last: now,
            last_report: now,
            frame_index: 0,
            dt_max: Duration::from_millis(250),
            frame_times: VecDeque::with_capacity(DEFAULT_SAMPLES),
            max_samples: DEFAULT_SAMPLES,
        }
    }

    /// Moves the baseline to now without counting a frame, e.g. after resume.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .min(self.dt_max);
        self.last = now;

        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(dt);

        if now.saturating_duration_since(self.last_report) >= REPORT_INTERVAL {
            log::debug!(
                "frame {}: {:.1} fps average",
                self.frame_index,
                self.average_fps()
            );
            self.last_report = now;
        }

        let frame = FrameTime {
            elapsed_seconds: dt.as_secs_f32(),
            total_seconds: now.saturating_duration_since(self.start).as_secs_f32(),
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        frame
    }

    /// Average frames per second over the recent sample window.
    pub fn average_fps(&self) -> f32 {
        let total: Duration = self.frame_times.iter().sum();
        if total.is_zero() {
            return 0.0;
        }
        self.frame_times.len() as f32 / total.as_secs_f32()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
