//! Reproducible description of a sketch run.
//!
//! A [`RunSeed`] captures everything needed to replay a render: sketch
//! name, canvas preset and physical size, parameters, PRNG seed, and the
//! number of frames to advance.

use crate::canvas::{ScalableCanvas, ScalableCanvasType};
use crate::error::SketchError;
use serde::{Deserialize, Serialize};

/// Two identical `RunSeed`s fed to the same binary produce identical frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSeed {
    pub sketch: String,
    #[serde(default)]
    pub canvas: ScalableCanvasType,
    pub width: u32,
    pub height: u32,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    pub seed: u64,
    #[serde(default)]
    pub frames: u32,
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl RunSeed {
    /// Square canvas, empty params, zero frames.
    pub fn new(sketch: &str, width: u32, height: u32, seed: u64) -> Self {
        Self {
            sketch: sketch.to_string(),
            canvas: ScalableCanvasType::default(),
            width,
            height,
            params: empty_params(),
            seed,
            frames: 0,
        }
    }

    /// Rejects zero dimensions and pixel counts that overflow `u32`.
    pub fn validate(&self) -> Result<(), SketchError> {
        if self.width == 0 || self.height == 0 {
            return Err(SketchError::InvalidDimensions);
        }
        self.width
            .checked_mul(self.height)
            .ok_or(SketchError::InvalidDimensions)?;
        Ok(())
    }

    /// Resolves the canvas preset against the physical size.
    pub fn scalable_canvas(&self) -> Result<ScalableCanvas, SketchError> {
        self.validate()?;
        ScalableCanvas::from_type(self.canvas, f64::from(self.width), f64::from(self.height))
    }
}
