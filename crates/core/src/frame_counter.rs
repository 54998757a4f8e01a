//! Frame counters: a plain monotonic counter plus two timed variants.
//!
//! Timed counters report completion through the return value of `step()`
//! instead of holding a callback, so the owner (usually a sprite driving a
//! small state machine) can react with full mutable access to itself.
//!
//! A timed counter completes on the step where `count` first exceeds
//! `duration`, i.e. on the `duration + 1`-th active step.

use serde::{Deserialize, Serialize};

/// Monotonic frame counter with modulo queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameCounter {
    count: u32,
}

impl FrameCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Sets the count back to `count` (usually 0).
    pub fn reset_count(&mut self, count: u32) -> &mut Self {
        self.count = count;
        self
    }

    pub fn step(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    /// `count % divisor`.
    ///
    /// # Panics
    ///
    /// Panics if `divisor` is 0.
    pub fn modulo(&self, divisor: u32) -> u32 {
        self.count % divisor
    }
}

/// Shared state of the timed counters: a count, a duration, and an on/off switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Timer {
    counter: FrameCounter,
    duration: u32,
    is_on: bool,
}

impl Timer {
    fn new(duration: u32) -> Self {
        Self {
            counter: FrameCounter::new(),
            duration,
            is_on: true,
        }
    }

    fn on(&mut self, duration: Option<u32>) {
        self.is_on = true;
        if let Some(d) = duration.filter(|&d| d > 0) {
            self.duration = d;
        }
    }

    /// Advances while on; returns `true` when the duration boundary is crossed.
    fn advance(&mut self) -> bool {
        if !self.is_on {
            return false;
        }
        self.counter.step();
        self.counter.count() > self.duration
    }

    fn ratio(&self) -> f64 {
        if self.duration == 0 {
            return 1.0;
        }
        (f64::from(self.counter.count()) / f64::from(self.duration)).min(1.0)
    }
}

/// Counter that fires once after `duration` frames, then stops.
///
/// States: running (`is_on`), paused (`!is_on && !is_completed`), and
/// completed (`!is_on && is_completed`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonLoopedFrameCounter {
    timer: Timer,
    is_completed: bool,
}

impl NonLoopedFrameCounter {
    /// Creates a running counter.
    pub fn new(duration: u32) -> Self {
        Self {
            timer: Timer::new(duration),
            is_completed: false,
        }
    }

    /// Creates a paused counter.
    pub fn paused(duration: u32) -> Self {
        let mut counter = Self::new(duration);
        counter.off();
        counter
    }

    pub fn count(&self) -> u32 {
        self.timer.counter.count()
    }

    pub fn duration(&self) -> u32 {
        self.timer.duration
    }

    pub fn is_on(&self) -> bool {
        self.timer.is_on
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Resumes counting, optionally replacing the duration (zero is ignored).
    /// The count is left as is.
    pub fn on(&mut self, duration: Option<u32>) -> &mut Self {
        self.timer.on(duration);
        self
    }

    pub fn off(&mut self) -> &mut Self {
        self.timer.is_on = false;
        self
    }

    /// Zeroes the count and clears completion. Does not touch `is_on`.
    pub fn reset_count(&mut self) -> &mut Self {
        self.timer.counter.reset_count(0);
        self.is_completed = false;
        self
    }

    /// Advances one frame. Returns `true` exactly once: on the step that
    /// completes the counter.
    #[must_use = "the return value reports completion"]
    pub fn step(&mut self) -> bool {
        if !self.timer.advance() {
            return false;
        }
        self.is_completed = true;
        self.timer.is_on = false;
        true
    }

    /// `count / duration`, clamped to 1; exactly 1 once completed.
    pub fn progress_ratio(&self) -> f64 {
        if self.is_completed {
            1.0
        } else {
            self.timer.ratio()
        }
    }
}

/// Counter that fires every `duration + 1` frames and restarts from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopedFrameCounter {
    timer: Timer,
}

impl LoopedFrameCounter {
    pub fn new(duration: u32) -> Self {
        Self {
            timer: Timer::new(duration),
        }
    }

    pub fn paused(duration: u32) -> Self {
        let mut counter = Self::new(duration);
        counter.off();
        counter
    }

    pub fn count(&self) -> u32 {
        self.timer.counter.count()
    }

    pub fn duration(&self) -> u32 {
        self.timer.duration
    }

    pub fn is_on(&self) -> bool {
        self.timer.is_on
    }

    pub fn on(&mut self, duration: Option<u32>) -> &mut Self {
        self.timer.on(duration);
        self
    }

    pub fn off(&mut self) -> &mut Self {
        self.timer.is_on = false;
        self
    }

    pub fn reset_count(&mut self) -> &mut Self {
        self.timer.counter.reset_count(0);
        self
    }

    /// Advances one frame. Returns `true` on every step that completes a
    /// cycle; the count restarts at zero.
    #[must_use = "the return value reports cycle completion"]
    pub fn step(&mut self) -> bool {
        if !self.timer.advance() {
            return false;
        }
        self.timer.counter.reset_count(0);
        true
    }

    /// Progress through the current cycle in [0, 1].
    pub fn progress_ratio(&self) -> f64 {
        self.timer.ratio()
    }
}
