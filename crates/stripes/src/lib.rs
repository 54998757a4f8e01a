#![deny(unsafe_code)]
//! Stripes sketch.
//!
//! A still composition: a few sets of rounded vertical bars, one set per hue
//! of a randomly chosen hue pattern, laid over each other with the multiply
//! or burn blend mode. Clicking composes a new picture.

use glam::DVec2;
use serde_json::{json, Value};
use sketchbook_core::params::{param_f64_in, param_u32};
use sketchbook_core::{
    cielch, BlendMode, Container, Drawable, Input, Rgba, ScalableCanvas, Sketch, SketchRng,
    Surface,
};

/// Hue offsets in degrees; each entry yields one stripe set.
pub const HUE_PATTERNS: [&[f64]; 4] = [
    &[0.0, 120.0, 240.0],
    &[0.0, 30.0, 60.0],
    &[0.0, 150.0, 210.0],
    &[0.0, 90.0, 180.0, 270.0],
];

const DEFAULT_MIN_THICKNESS: f64 = 5.0;
const DEFAULT_MAX_THICKNESS: f64 = 70.0;
const DEFAULT_MIN_GAP: f64 = 10.0;
const DEFAULT_MAX_GAP: f64 = 50.0;
const DEFAULT_TEXTURE_ALPHA: u32 = 16;
const CORNER_RADIUS: f64 = 3.0;
const STRIPE_ALPHA: u8 = 128;
/// Vertical and horizontal jitter of a set's center.
const MAX_OFFSET: f64 = 100.0;

/// Tunable constants of the stripes sketch.
#[derive(Debug, Clone, Copy)]
pub struct StripesParams {
    pub min_thickness: f64,
    pub max_thickness: f64,
    /// Gap between two bars, on top of the thickness.
    pub min_gap: f64,
    pub max_gap: f64,
    /// Strength of the background speckle, 0–255.
    pub texture_alpha: u8,
}

impl Default for StripesParams {
    fn default() -> Self {
        Self {
            min_thickness: DEFAULT_MIN_THICKNESS,
            max_thickness: DEFAULT_MAX_THICKNESS,
            min_gap: DEFAULT_MIN_GAP,
            max_gap: DEFAULT_MAX_GAP,
            texture_alpha: DEFAULT_TEXTURE_ALPHA as u8,
        }
    }
}

impl StripesParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    /// Swapped bounds are put back in order.
    pub fn from_json(params: &Value) -> Self {
        let a = param_f64_in(params, "min_thickness", DEFAULT_MIN_THICKNESS, 1.0, 320.0);
        let b = param_f64_in(params, "max_thickness", DEFAULT_MAX_THICKNESS, 1.0, 320.0);
        let c = param_f64_in(params, "min_gap", DEFAULT_MIN_GAP, 0.0, 320.0);
        let d = param_f64_in(params, "max_gap", DEFAULT_MAX_GAP, 0.0, 320.0);
        let texture_alpha = param_u32(params, "texture_alpha", DEFAULT_TEXTURE_ALPHA).min(255);
        Self {
            min_thickness: a.min(b),
            max_thickness: a.max(b),
            min_gap: c.min(d),
            max_gap: c.max(d),
            texture_alpha: texture_alpha as u8,
        }
    }
}

/// One set of equally spaced bars sharing a color and blend mode.
///
/// Coordinates are relative to the canvas center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripeSet {
    pub color: Rgba,
    pub blend: BlendMode,
    pub thickness: f64,
    /// Distance between the centers of two neighboring bars.
    pub interval: f64,
    pub length: f64,
    pub y: f64,
    /// Bars are placed from `start_x` up to (excluding) `-start_x`.
    pub start_x: f64,
    pub x_offset: f64,
}

impl StripeSet {
    /// Rolls a set of the given color for a `size` logical canvas.
    pub fn random(rng: &mut SketchRng, params: &StripesParams, color: Rgba, size: DVec2) -> Self {
        let blend = if rng.chance(0.5) {
            BlendMode::Multiply
        } else {
            BlendMode::Burn
        };
        let thickness = rng.range(params.min_thickness, params.max_thickness);
        let interval = thickness + rng.range(params.min_gap, params.max_gap);
        let length = rng.range(0.4, 0.6) * size.y;
        let y = rng.signed() * MAX_OFFSET;
        let start_x = -rng.range(0.2, 0.3) * size.x;
        let x_offset = rng.signed() * MAX_OFFSET;
        Self {
            color,
            blend,
            thickness,
            interval,
            length,
            y,
            start_x,
            x_offset,
        }
    }

    /// Center of every bar.
    pub fn centers(&self) -> Vec<DVec2> {
        let mut centers = Vec::new();
        if self.interval <= 0.0 {
            return centers;
        }
        let mut x = self.start_x;
        while x < -self.start_x {
            centers.push(DVec2::new(x + self.x_offset, self.y));
            x += self.interval;
        }
        centers
    }

    fn size(&self) -> DVec2 {
        DVec2::new(self.thickness, self.length)
    }
}

impl Drawable for StripeSet {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.blend_mode(self.blend);
        surface.stroke(None);
        surface.fill(Some(self.color));
        let size = self.size();
        for center in self.centers() {
            surface.rounded_rect(center - 0.5 * size, size, CORNER_RADIUS);
        }
    }
}

/// Color of one stripe set: a random lightness/chroma pair on a fixed arc
/// and a random hue shifted by `hue_offset` degrees.
pub fn stripe_color(rng: &mut SketchRng, hue_offset: f64) -> Rgba {
    let theta = rng.range(40.0, 60.0).to_radians();
    cielch(
        100.0 * theta.sin(),
        60.0 + 70.0 * theta.cos(),
        rng.angle() + hue_offset.to_radians(),
        STRIPE_ALPHA,
    )
}

/// The stripes sketch state.
pub struct Stripes {
    canvas: ScalableCanvas,
    params: StripesParams,
    rng: SketchRng,
    stripe_sets: Container<StripeSet>,
}

impl Stripes {
    pub fn new(canvas: ScalableCanvas, seed: u64, params: StripesParams) -> Self {
        log::debug!("stripes: {params:?}");
        Self {
            canvas,
            params,
            rng: SketchRng::new(seed),
            stripe_sets: Container::new(),
        }
    }

    pub fn from_json(canvas: ScalableCanvas, seed: u64, params: &Value) -> Self {
        Self::new(canvas, seed, StripesParams::from_json(params))
    }

    /// Stripe sets of the current composition.
    pub fn stripe_sets(&self) -> &Container<StripeSet> {
        &self.stripe_sets
    }

    /// Rolls a new composition.
    pub fn recompose(&mut self) {
        let size = DVec2::new(self.canvas.non_scaled_width(), self.canvas.non_scaled_height());
        let pattern = self
            .rng
            .pick(&HUE_PATTERNS)
            .copied()
            .unwrap_or(HUE_PATTERNS[0]);
        self.stripe_sets.clear();
        for &hue in pattern {
            let color = stripe_color(&mut self.rng, hue);
            let set = StripeSet::random(&mut self.rng, &self.params, color, size);
            self.stripe_sets.push(set);
        }
        log::debug!("stripes: composed {} stripe sets", self.stripe_sets.len());
    }

    fn paint(&mut self, surface: &mut dyn Surface) {
        self.recompose();
        surface.blend_mode(BlendMode::Normal);
        surface.background(Rgba::WHITE);
        surface.noise_texture(self.params.texture_alpha, Rgba::BLACK, self.rng.next_u64());

        surface.push();
        self.canvas.apply_scale(surface);
        surface.translate(self.canvas.center());
        self.stripe_sets.draw(surface);
        surface.pop();
        surface.blend_mode(BlendMode::Normal);
    }
}

impl Sketch for Stripes {
    fn setup(&mut self, surface: &mut dyn Surface) {
        self.paint(surface);
    }

    /// Only a click changes the picture.
    fn frame(&mut self, input: &Input, surface: &mut dyn Surface) {
        if input.clicked {
            self.paint(surface);
        }
    }

    fn canvas(&self) -> &ScalableCanvas {
        &self.canvas
    }

    fn params(&self) -> Value {
        json!({
            "min_thickness": self.params.min_thickness,
            "max_thickness": self.params.max_thickness,
            "min_gap": self.params.min_gap,
            "max_gap": self.params.max_gap,
            "texture_alpha": self.params.texture_alpha,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "min_thickness": {
                "type": "number",
                "default": DEFAULT_MIN_THICKNESS,
                "min": 1.0,
                "max": 320.0,
                "description": "Narrowest bar width"
            },
            "max_thickness": {
                "type": "number",
                "default": DEFAULT_MAX_THICKNESS,
                "min": 1.0,
                "max": 320.0,
                "description": "Widest bar width"
            },
            "min_gap": {
                "type": "number",
                "default": DEFAULT_MIN_GAP,
                "min": 0.0,
                "max": 320.0,
                "description": "Smallest gap between bars"
            },
            "max_gap": {
                "type": "number",
                "default": DEFAULT_MAX_GAP,
                "min": 0.0,
                "max": 320.0,
                "description": "Largest gap between bars"
            },
            "texture_alpha": {
                "type": "integer",
                "default": DEFAULT_TEXTURE_ALPHA,
                "min": 0,
                "max": 255,
                "description": "Strength of the background speckle"
            }
        })
    }
}
