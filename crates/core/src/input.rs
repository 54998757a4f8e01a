//! Per-frame input snapshot handed to [`Sketch::frame`](crate::sketch::Sketch::frame).

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// What the host observed before this frame. Pointer coordinates are in
/// physical pixels; convert with
/// [`ScalableCanvas::non_scaled_point`](crate::canvas::ScalableCanvas::non_scaled_point).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Input {
    pub frame_count: u64,
    pub pointer: DVec2,
    /// Pointer button held down.
    pub pressed: bool,
    /// Button went down since the last frame.
    pub clicked: bool,
    /// Button went up since the last frame.
    pub released: bool,
    /// Keys typed since the last frame.
    pub typed_keys: Vec<char>,
    /// Physical canvas size.
    pub canvas_size: DVec2,
}

impl Input {
    /// Idle input for `frame_count` on a canvas of `canvas_size`.
    pub fn idle(frame_count: u64, canvas_size: DVec2) -> Self {
        Self {
            frame_count,
            canvas_size,
            ..Self::default()
        }
    }

    pub fn pointer_in_canvas(&self) -> bool {
        self.pointer.x >= 0.0
            && self.pointer.x <= self.canvas_size.x
            && self.pointer.y >= 0.0
            && self.pointer.y <= self.canvas_size.y
    }

    pub fn typed(&self, key: char) -> bool {
        self.typed_keys.contains(&key)
    }
}
