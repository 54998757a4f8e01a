//! The drawing surface sketches render onto.
//!
//! [`Surface`] is a small immediate-mode API in the style of a 2D canvas:
//! style state (fill, stroke, stroke weight, blend mode) and an affine
//! transform that `push`/`pop` save and restore, plus shape primitives.
//! All coordinates are in the current transform's space.
//!
//! [`RecordingSurface`] captures every call as a [`DrawCommand`] so tests can
//! assert on what a sprite drew without rasterising anything.

use glam::DVec2;

use crate::canvas::BlendMode;
use crate::color::Rgba;

/// Immediate-mode 2D drawing target.
///
/// This trait is **object-safe**; sprites draw through `&mut dyn Surface`.
pub trait Surface {
    /// Fills the whole surface, ignoring the transform and blend mode.
    fn background(&mut self, color: Rgba);

    /// Sets the fill color; `None` disables filling.
    fn fill(&mut self, color: Option<Rgba>);

    /// Sets the stroke color; `None` disables stroking.
    fn stroke(&mut self, color: Option<Rgba>);

    fn stroke_weight(&mut self, weight: f64);

    fn blend_mode(&mut self, mode: BlendMode);

    /// Saves style and transform state.
    fn push(&mut self);

    /// Restores the state saved by the matching `push`. Unbalanced pops are ignored.
    fn pop(&mut self);

    fn translate(&mut self, offset: DVec2);

    /// Rotates subsequent drawing by `angle` radians (clockwise in screen space).
    fn rotate(&mut self, angle: f64);

    fn scale(&mut self, factor: f64);

    fn rect(&mut self, top_left: DVec2, size: DVec2);

    fn rounded_rect(&mut self, top_left: DVec2, size: DVec2, radius: f64);

    fn line(&mut self, from: DVec2, to: DVec2);

    fn ellipse(&mut self, center: DVec2, diameter: DVec2);

    /// Draws `text` centered on `center` with glyph height `size`.
    fn text(&mut self, text: &str, center: DVec2, size: f64);

    /// Fills the whole surface with a top-to-bottom gradient.
    fn vertical_gradient(&mut self, top: Rgba, bottom: Rgba);

    /// Overlays per-pixel random specks of `tint` with alpha up to `max_alpha`.
    fn noise_texture(&mut self, max_alpha: u8, tint: Rgba, seed: u64);

    /// Snapshots the current pixels.
    fn save_pixels(&mut self);

    /// Restores the last snapshot; does nothing if none was saved.
    fn restore_pixels(&mut self);
}

/// One recorded [`Surface`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Background(Rgba),
    Fill(Option<Rgba>),
    Stroke(Option<Rgba>),
    StrokeWeight(f64),
    BlendMode(BlendMode),
    Push,
    Pop,
    Translate(DVec2),
    Rotate(f64),
    Scale(f64),
    Rect { top_left: DVec2, size: DVec2 },
    RoundedRect { top_left: DVec2, size: DVec2, radius: f64 },
    Line { from: DVec2, to: DVec2 },
    Ellipse { center: DVec2, diameter: DVec2 },
    Text { text: String, center: DVec2, size: f64 },
    VerticalGradient { top: Rgba, bottom: Rgba },
    NoiseTexture { max_alpha: u8, tint: Rgba, seed: u64 },
    SavePixels,
    RestorePixels,
}

/// Surface that records calls instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drops everything recorded so far.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of shape primitives recorded (rects, lines, ellipses, text).
    pub fn shape_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    DrawCommand::Rect { .. }
                        | DrawCommand::RoundedRect { .. }
                        | DrawCommand::Line { .. }
                        | DrawCommand::Ellipse { .. }
                        | DrawCommand::Text { .. }
                )
            })
            .count()
    }

    /// Concatenation of every recorded text call.
    pub fn drawn_text(&self) -> String {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn background(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Background(color));
    }

    fn fill(&mut self, color: Option<Rgba>) {
        self.commands.push(DrawCommand::Fill(color));
    }

    fn stroke(&mut self, color: Option<Rgba>) {
        self.commands.push(DrawCommand::Stroke(color));
    }

    fn stroke_weight(&mut self, weight: f64) {
        self.commands.push(DrawCommand::StrokeWeight(weight));
    }

    fn blend_mode(&mut self, mode: BlendMode) {
        self.commands.push(DrawCommand::BlendMode(mode));
    }

    fn push(&mut self) {
        self.commands.push(DrawCommand::Push);
    }

    fn pop(&mut self) {
        self.commands.push(DrawCommand::Pop);
    }

    fn translate(&mut self, offset: DVec2) {
        self.commands.push(DrawCommand::Translate(offset));
    }

    fn rotate(&mut self, angle: f64) {
        self.commands.push(DrawCommand::Rotate(angle));
    }

    fn scale(&mut self, factor: f64) {
        self.commands.push(DrawCommand::Scale(factor));
    }

    fn rect(&mut self, top_left: DVec2, size: DVec2) {
        self.commands.push(DrawCommand::Rect { top_left, size });
    }

    fn rounded_rect(&mut self, top_left: DVec2, size: DVec2, radius: f64) {
        self.commands.push(DrawCommand::RoundedRect {
            top_left,
            size,
            radius,
        });
    }

    fn line(&mut self, from: DVec2, to: DVec2) {
        self.commands.push(DrawCommand::Line { from, to });
    }

    fn ellipse(&mut self, center: DVec2, diameter: DVec2) {
        self.commands.push(DrawCommand::Ellipse { center, diameter });
    }

    fn text(&mut self, text: &str, center: DVec2, size: f64) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            center,
            size,
        });
    }

    fn vertical_gradient(&mut self, top: Rgba, bottom: Rgba) {
        self.commands
            .push(DrawCommand::VerticalGradient { top, bottom });
    }

    fn noise_texture(&mut self, max_alpha: u8, tint: Rgba, seed: u64) {
        self.commands.push(DrawCommand::NoiseTexture {
            max_alpha,
            tint,
            seed,
        });
    }

    fn save_pixels(&mut self) {
        self.commands.push(DrawCommand::SavePixels);
    }

    fn restore_pixels(&mut self) {
        self.commands.push(DrawCommand::RestorePixels);
    }
}
