//! Axis-aligned rectangular region in logical canvas coordinates.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Rectangle given by its left/top and right/bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangleRegion {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl RectangleRegion {
    /// Region spanning `(x1, y1)`–`(x2, y2)`, grown by `margin` on every side.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, margin: f64) -> Self {
        Self {
            left: x1 - margin,
            top: y1 - margin,
            right: x2 + margin,
            bottom: y2 + margin,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Whether `position` lies inside the region grown by `margin` (edges inclusive).
    pub fn contains(&self, position: DVec2, margin: f64) -> bool {
        position.x >= self.left - margin
            && position.x <= self.right + margin
            && position.y >= self.top - margin
            && position.y <= self.bottom + margin
    }

    /// Moves `position` onto the region grown by `margin` if it lies outside.
    pub fn constrain(&self, position: &mut DVec2, margin: f64) {
        position.x = position.x.clamp(self.left - margin, self.right + margin);
        position.y = position.y.clamp(self.top - margin, self.bottom + margin);
    }
}
