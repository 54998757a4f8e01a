//! Scalable canvas: maps a fixed logical design resolution onto whatever
//! physical pixel size the host provides.
//!
//! All sketch geometry lives in *non-scaled* (logical) coordinates. The
//! canvas derives a uniform `scale_factor` from the physical short side and
//! the declared logical short side; drawing code applies it once per frame.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::SketchError;
use crate::region::RectangleRegion;
use crate::surface::Surface;

/// How a drawn shape is composited onto the pixels already on the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Burn,
    Difference,
}

/// Physical size and logical short side of a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalableCanvasParameters {
    pub scaled_width: f64,
    pub scaled_height: f64,
    pub non_scaled_short_side_length: f64,
}

/// Preset canvas shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalableCanvasType {
    /// Largest square that fits, logical 640×640.
    #[default]
    Square640x640,
    /// Width is the available short side, height 75% of it; logical 640×480.
    Rect640x480,
    /// The whole available region; logical short side 640.
    Full,
    /// Caller-provided parameters.
    Custom(ScalableCanvasParameters),
}

impl ScalableCanvasType {
    /// Resolves the preset against the available physical region.
    pub fn parameters(self, max_width: f64, max_height: f64) -> ScalableCanvasParameters {
        let short_side = max_width.min(max_height);
        match self {
            ScalableCanvasType::Square640x640 => ScalableCanvasParameters {
                scaled_width: short_side,
                scaled_height: short_side,
                non_scaled_short_side_length: 640.0,
            },
            ScalableCanvasType::Rect640x480 => ScalableCanvasParameters {
                scaled_width: short_side,
                scaled_height: 0.75 * short_side,
                non_scaled_short_side_length: 480.0,
            },
            ScalableCanvasType::Full => ScalableCanvasParameters {
                scaled_width: max_width,
                scaled_height: max_height,
                non_scaled_short_side_length: 640.0,
            },
            ScalableCanvasType::Custom(parameters) => parameters,
        }
    }
}

/// Derived scale state for one physical canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalableCanvas {
    width: f64,
    height: f64,
    non_scaled_short_side_length: f64,
    scale_factor: f64,
    non_scaled_width: f64,
    non_scaled_height: f64,
}

impl ScalableCanvas {
    /// Creates a canvas from resolved parameters.
    ///
    /// Returns `SketchError::InvalidDimensions` if any size is zero,
    /// negative, or not finite.
    pub fn new(parameters: ScalableCanvasParameters) -> Result<Self, SketchError> {
        let mut canvas = Self {
            width: 0.0,
            height: 0.0,
            non_scaled_short_side_length: 0.0,
            scale_factor: 1.0,
            non_scaled_width: 0.0,
            non_scaled_height: 0.0,
        };
        canvas.resize(parameters)?;
        Ok(canvas)
    }

    /// Convenience for a preset resolved against a `width × height` region.
    pub fn from_type(
        canvas_type: ScalableCanvasType,
        width: f64,
        height: f64,
    ) -> Result<Self, SketchError> {
        Self::new(canvas_type.parameters(width, height))
    }

    /// Recomputes every derived value for new parameters.
    pub fn resize(&mut self, parameters: ScalableCanvasParameters) -> Result<(), SketchError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(parameters.scaled_width)
            || !valid(parameters.scaled_height)
            || !valid(parameters.non_scaled_short_side_length)
        {
            return Err(SketchError::InvalidDimensions);
        }
        self.width = parameters.scaled_width;
        self.height = parameters.scaled_height;
        self.non_scaled_short_side_length = parameters.non_scaled_short_side_length;
        self.scale_factor = self.width.min(self.height) / self.non_scaled_short_side_length;
        self.non_scaled_width = self.width / self.scale_factor;
        self.non_scaled_height = self.height / self.scale_factor;
        Ok(())
    }

    /// Physical width in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Physical height in pixels.
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn non_scaled_width(&self) -> f64 {
        self.non_scaled_width
    }

    pub fn non_scaled_height(&self) -> f64 {
        self.non_scaled_height
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Logical center of the canvas.
    pub fn center(&self) -> DVec2 {
        DVec2::new(0.5 * self.non_scaled_width, 0.5 * self.non_scaled_height)
    }

    /// Region covering the logical canvas.
    pub fn region(&self) -> RectangleRegion {
        RectangleRegion::new(0.0, 0.0, self.non_scaled_width, self.non_scaled_height, 0.0)
    }

    /// Converts a physical length (e.g. a pointer coordinate) to logical units.
    pub fn non_scaled_value_of(&self, scaled_length: f64) -> f64 {
        scaled_length / self.scale_factor
    }

    /// Converts a physical point to logical coordinates.
    pub fn non_scaled_point(&self, scaled: DVec2) -> DVec2 {
        scaled / self.scale_factor
    }

    /// Applies the scale to the surface's current transform. Pair with
    /// `surface.push()` / `surface.pop()` to cancel it.
    pub fn apply_scale(&self, surface: &mut dyn Surface) {
        surface.scale(self.scale_factor);
    }
}
