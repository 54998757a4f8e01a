//! Per-frame unit quantities derived from the target frame rate.
//!
//! Sketches express speeds "per second" and convert them with these units,
//! so a sketch tuned at 60 fps keeps its look at other rates.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameRate {
    ideal_fps: f64,
}

impl Default for FrameRate {
    fn default() -> Self {
        Self { ideal_fps: 60.0 }
    }
}

impl FrameRate {
    /// Non-positive or non-finite rates fall back to 60.
    pub fn new(ideal_fps: f64) -> Self {
        if ideal_fps.is_finite() && ideal_fps > 0.0 {
            Self { ideal_fps }
        } else {
            Self::default()
        }
    }

    pub fn ideal_fps(&self) -> f64 {
        self.ideal_fps
    }

    /// One full turn per second, in radians per frame.
    pub fn unit_angle_speed(&self) -> f64 {
        TAU / self.ideal_fps
    }

    /// One unit per second, in units per frame.
    pub fn unit_speed(&self) -> f64 {
        1.0 / self.ideal_fps
    }

    /// One unit per second per second, in units per frame².
    pub fn unit_acceleration_magnitude(&self) -> f64 {
        self.unit_speed() / self.ideal_fps
    }
}
