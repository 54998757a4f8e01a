#![deny(unsafe_code)]
//! CMYK sketch.
//!
//! Holding the pointer down sprays pairs of red, green, or blue squares in
//! opposite directions. Squares bounce once off the canvas edge and drift
//! out. When two grown-up objects with no color in common meet, they merge
//! into a composite that carries both. Everything is drawn with the
//! difference blend mode over a white background, so overlaps mix toward
//! the subtractive primaries.
//!
//! Releasing the pointer advances to the next spray color.

mod color_object;

pub use color_object::ColorObject;

use std::f64::consts::{PI, TAU};

use glam::DVec2;
use serde_json::{json, Value};
use sketchbook_core::params::{param_f64_in, param_u32};
use sketchbook_core::{
    BlendMode, CleanableContainer, Container, Drawable, Input, Rgba, ScalableCanvas, ShapeColor,
    Sketch, SketchRng, Steppable, Surface,
};

const DEFAULT_SPAWN_SPEED: f64 = 8.0;
const DEFAULT_MERGE_DISTANCE: f64 = 10.0;
const DEFAULT_UNIT_SIZE: f64 = 12.0;
const DEFAULT_POST_BIRTH_FRAMES: u32 = 30;
/// Spawn headings cycle through this many directions.
const SPAWN_DIRECTIONS: u64 = 31;
const CURSOR_HALF_LENGTH: f64 = 10.0;

/// Tunable constants of the CMYK sketch.
#[derive(Debug, Clone, Copy)]
pub struct CmykParams {
    /// Initial speed of sprayed squares, in logical pixels per frame.
    pub spawn_speed: f64,
    /// Objects closer than this on both axes may merge.
    pub merge_distance: f64,
    pub unit_size: f64,
    /// Frames after birth during which an object cannot merge.
    pub post_birth_frames: u32,
}

impl Default for CmykParams {
    fn default() -> Self {
        Self {
            spawn_speed: DEFAULT_SPAWN_SPEED,
            merge_distance: DEFAULT_MERGE_DISTANCE,
            unit_size: DEFAULT_UNIT_SIZE,
            post_birth_frames: DEFAULT_POST_BIRTH_FRAMES,
        }
    }
}

impl CmykParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            spawn_speed: param_f64_in(params, "spawn_speed", DEFAULT_SPAWN_SPEED, 0.0, 64.0),
            merge_distance: param_f64_in(
                params,
                "merge_distance",
                DEFAULT_MERGE_DISTANCE,
                0.0,
                640.0,
            ),
            unit_size: param_f64_in(params, "unit_size", DEFAULT_UNIT_SIZE, 1.0, 128.0),
            post_birth_frames: param_u32(params, "post_birth_frames", DEFAULT_POST_BIRTH_FRAMES),
        }
    }
}

/// The CMYK sketch state.
pub struct Cmyk {
    canvas: ScalableCanvas,
    params: CmykParams,
    rng: SketchRng,
    objects: CleanableContainer<ColorObject>,
    new_objects: Container<ColorObject>,
    palette: [ShapeColor; 3],
    current_color: usize,
    pointer: DVec2,
}

impl Cmyk {
    pub fn new(canvas: ScalableCanvas, seed: u64, params: CmykParams) -> Self {
        log::debug!("cmyk: {params:?}");
        Self {
            pointer: canvas.center(),
            canvas,
            params,
            rng: SketchRng::new(seed),
            objects: CleanableContainer::with_capacity(1024),
            new_objects: Container::new(),
            palette: [
                ShapeColor::filled(Rgba::rgb(255, 0, 0)),
                ShapeColor::filled(Rgba::rgb(0, 255, 0)),
                ShapeColor::filled(Rgba::rgb(0, 0, 255)),
            ],
            current_color: 0,
        }
    }

    pub fn from_json(canvas: ScalableCanvas, seed: u64, params: &Value) -> Self {
        Self::new(canvas, seed, CmykParams::from_json(params))
    }

    pub fn objects(&self) -> &CleanableContainer<ColorObject> {
        &self.objects
    }

    /// Index into the red, green, blue palette used by the next spray.
    pub fn current_color(&self) -> usize {
        self.current_color
    }

    fn bounds(&self) -> DVec2 {
        DVec2::new(self.canvas.non_scaled_width(), self.canvas.non_scaled_height())
    }

    fn spawn(&mut self, angle: f64) {
        let bounds = self.bounds();
        let object = ColorObject::unit(
            &mut self.rng,
            self.pointer,
            DVec2::from_angle(angle) * self.params.spawn_speed,
            self.current_color,
            self.palette[self.current_color],
            self.params.unit_size,
            self.params.post_birth_frames,
            bounds,
        );
        self.new_objects.push(object);
    }

    /// Merges every eligible pair. Each object merges at most once per frame.
    fn process_collisions(&mut self) {
        let distance = self.params.merge_distance;
        let frames = self.params.post_birth_frames;
        let rng = &mut self.rng;
        let new_objects = &mut self.new_objects;
        self.objects.elements_mut().round_robin(|a, b| {
            if a.can_merge_with(b, distance) {
                a.flag_for_removal();
                b.flag_for_removal();
                new_objects.push(ColorObject::composite(rng, a, b, frames));
                log::debug!("cmyk: merged objects at {:?}", (a.position() + b.position()) * 0.5);
            }
        });
    }

    fn draw_cursor(&self, surface: &mut dyn Surface) {
        let p = self.pointer;
        surface.stroke(Some(Rgba::gray(160)));
        surface.stroke_weight(3.0);
        surface.line(
            p - DVec2::X * CURSOR_HALF_LENGTH,
            p + DVec2::X * CURSOR_HALF_LENGTH,
        );
        surface.line(
            p - DVec2::Y * CURSOR_HALF_LENGTH,
            p + DVec2::Y * CURSOR_HALF_LENGTH,
        );
    }
}

impl Sketch for Cmyk {
    fn setup(&mut self, surface: &mut dyn Surface) {
        surface.blend_mode(BlendMode::Normal);
        surface.background(Rgba::WHITE);
        surface.noise_texture(8, Rgba::rgb(0, 0, 32), self.rng.next_u64());
        surface.save_pixels();
        surface.blend_mode(BlendMode::Difference);
    }

    fn frame(&mut self, input: &Input, surface: &mut dyn Surface) {
        if input.released {
            self.current_color = (self.current_color + 1) % self.palette.len();
        }

        surface.restore_pixels();
        self.pointer = self.canvas.non_scaled_point(input.pointer);

        surface.push();
        self.canvas.apply_scale(surface);
        self.objects.step();
        self.objects.clean();
        self.objects.draw(surface);
        self.draw_cursor(surface);
        surface.pop();

        self.process_collisions();

        if input.pointer_in_canvas() && input.pressed && input.frame_count % 2 == 0 {
            let angle = TAU * (input.frame_count % SPAWN_DIRECTIONS) as f64 / SPAWN_DIRECTIONS as f64;
            self.spawn(angle);
            self.spawn(angle + PI);
        }

        self.objects.push_all(&mut self.new_objects);
    }

    fn canvas(&self) -> &ScalableCanvas {
        &self.canvas
    }

    fn params(&self) -> Value {
        json!({
            "spawn_speed": self.params.spawn_speed,
            "merge_distance": self.params.merge_distance,
            "unit_size": self.params.unit_size,
            "post_birth_frames": self.params.post_birth_frames,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "spawn_speed": {
                "type": "number",
                "default": DEFAULT_SPAWN_SPEED,
                "min": 0.0,
                "max": 64.0,
                "description": "Initial speed of sprayed squares (logical px per frame)"
            },
            "merge_distance": {
                "type": "number",
                "default": DEFAULT_MERGE_DISTANCE,
                "min": 0.0,
                "max": 640.0,
                "description": "Objects closer than this on both axes may merge"
            },
            "unit_size": {
                "type": "number",
                "default": DEFAULT_UNIT_SIZE,
                "min": 1.0,
                "max": 128.0,
                "description": "Side length of a single square"
            },
            "post_birth_frames": {
                "type": "integer",
                "default": DEFAULT_POST_BIRTH_FRAMES,
                "min": 0,
                "max": 600,
                "description": "Frames after birth during which an object cannot merge"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchbook_core::{DrawCommand, RecordingSurface, ScalableCanvasType};

    fn canvas() -> ScalableCanvas {
        ScalableCanvas::from_type(ScalableCanvasType::Square640x640, 640.0, 640.0).unwrap()
    }

    fn cmyk() -> Cmyk {
        Cmyk::new(canvas(), 42, CmykParams::default())
    }

    fn pressed_at(frame: u64, pointer: DVec2) -> Input {
        let mut input = Input::idle(frame, DVec2::splat(640.0));
        input.pointer = pointer;
        input.pressed = true;
        input
    }

    // ---- Parameters ----

    #[test]
    fn from_json_reads_and_clamps() {
        let p = CmykParams::from_json(&json!({"spawn_speed": 500.0, "post_birth_frames": 10}));
        assert_eq!(p.spawn_speed, 64.0);
        assert_eq!(p.post_birth_frames, 10);
        assert_eq!(p.unit_size, DEFAULT_UNIT_SIZE);
    }

    #[test]
    fn params_match_schema_keys() {
        let sketch = cmyk();
        let params = sketch.params();
        let schema = sketch.param_schema();
        for key in schema.as_object().unwrap().keys() {
            assert!(params.get(key).is_some(), "missing {key}");
        }
    }

    // ---- Setup ----

    #[test]
    fn setup_paints_background_then_switches_to_difference() {
        let mut sketch = cmyk();
        let mut surface = RecordingSurface::new();
        sketch.setup(&mut surface);
        let commands = surface.commands();
        assert_eq!(commands[1], DrawCommand::Background(Rgba::WHITE));
        assert!(commands.contains(&DrawCommand::SavePixels));
        assert_eq!(
            commands.last(),
            Some(&DrawCommand::BlendMode(BlendMode::Difference))
        );
    }

    // ---- Spawning ----

    #[test]
    fn pressing_spawns_pairs_on_even_frames() {
        let mut sketch = cmyk();
        let mut surface = RecordingSurface::new();
        sketch.frame(&pressed_at(1, DVec2::splat(320.0)), &mut surface);
        assert_eq!(sketch.objects().len(), 0);
        sketch.frame(&pressed_at(2, DVec2::splat(320.0)), &mut surface);
        assert_eq!(sketch.objects().len(), 2);

        let a = sketch.objects().get(0).unwrap();
        let b = sketch.objects().get(1).unwrap();
        assert!((a.velocity() + b.velocity()).length() < 1e-9, "opposite directions");
        assert!((a.velocity().length() - DEFAULT_SPAWN_SPEED).abs() < 1e-9);
    }

    #[test]
    fn no_spawn_outside_canvas_or_when_not_pressed() {
        let mut sketch = cmyk();
        let mut surface = RecordingSurface::new();
        sketch.frame(&pressed_at(2, DVec2::new(-10.0, 320.0)), &mut surface);
        sketch.frame(&Input::idle(4, DVec2::splat(640.0)), &mut surface);
        assert!(sketch.objects().is_empty());
    }

    #[test]
    fn pointer_is_converted_to_logical_coordinates() {
        let big = ScalableCanvas::from_type(ScalableCanvasType::Square640x640, 1280.0, 1280.0)
            .unwrap();
        let mut sketch = Cmyk::new(big, 1, CmykParams::default());
        let mut surface = RecordingSurface::new();
        let mut input = pressed_at(2, DVec2::new(640.0, 320.0));
        input.canvas_size = DVec2::splat(1280.0);
        sketch.frame(&input, &mut surface);
        assert_eq!(sketch.objects().get(0).unwrap().position(), DVec2::new(320.0, 160.0));
    }

    #[test]
    fn release_cycles_color() {
        let mut sketch = cmyk();
        let mut surface = RecordingSurface::new();
        let mut input = Input::idle(1, DVec2::splat(640.0));
        input.released = true;
        for expected in [1, 2, 0] {
            sketch.frame(&input, &mut surface);
            assert_eq!(sketch.current_color(), expected);
        }
    }

    // ---- Merging ----

    #[test]
    fn opposite_colors_merge_after_post_birth_period() {
        // slow spawns start in random directions; a wide merge distance
        // keeps the drifting pairs in range
        let params = CmykParams {
            spawn_speed: 0.0,
            merge_distance: 100.0,
            post_birth_frames: 2,
            ..CmykParams::default()
        };
        let mut sketch = Cmyk::new(canvas(), 7, params);
        let mut surface = RecordingSurface::new();
        let center = DVec2::splat(320.0);

        // red pair, then release to switch to green, then a green pair
        sketch.frame(&pressed_at(2, center), &mut surface);
        let mut release = Input::idle(3, DVec2::splat(640.0));
        release.released = true;
        release.pointer = center;
        sketch.frame(&release, &mut surface);
        sketch.frame(&pressed_at(4, center), &mut surface);
        assert_eq!(sketch.objects().len(), 4);

        let mut merged = false;
        for frame in 5..12 {
            sketch.frame(&Input::idle(frame, DVec2::splat(640.0)), &mut surface);
            if sketch.objects().iter().any(ColorObject::is_composite) {
                merged = true;
                break;
            }
        }
        assert!(merged, "expected a composite to form");
        let composite = sketch
            .objects()
            .iter()
            .find(|o| o.is_composite())
            .unwrap();
        assert!(composite.has_color(0) && composite.has_color(1));
    }

    #[test]
    fn same_color_never_merges() {
        let params = CmykParams {
            spawn_speed: 0.0,
            post_birth_frames: 0,
            ..CmykParams::default()
        };
        let mut sketch = Cmyk::new(canvas(), 3, params);
        let mut surface = RecordingSurface::new();
        sketch.frame(&pressed_at(2, DVec2::splat(320.0)), &mut surface);
        for frame in 3..8 {
            sketch.frame(&Input::idle(frame, DVec2::splat(640.0)), &mut surface);
        }
        assert!(sketch.objects().iter().all(|o| !o.is_composite()));
    }

    // ---- Drawing ----

    #[test]
    fn frame_restores_background_and_draws_cursor() {
        let mut sketch = cmyk();
        let mut surface = RecordingSurface::new();
        sketch.frame(&Input::idle(1, DVec2::splat(640.0)), &mut surface);
        let commands = surface.commands();
        assert_eq!(commands[0], DrawCommand::RestorePixels);
        let lines = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        assert_eq!(lines, 2);
    }
}
