//! Colored sprites of the CMYK sketch.
//!
//! A [`ColorObject`] is either a single rotating square of one primary
//! color, or a composite of two objects that met. Colors are tracked as a
//! bit set so "do these two share a color" is one AND, however deeply the
//! composites nest.

use std::f64::consts::TAU;

use glam::DVec2;
use sketchbook_core::easing::ease_out_quart;
use sketchbook_core::{
    AngleQuantity, Cleanable, ColorUnit, Drawable, NonLoopedFrameCounter, PhysicsBody, Rgba,
    ShapeColor, SketchRng, Steppable, Surface,
};

/// Speeds below this are replaced by a random heading at this speed.
const MIN_INITIAL_SPEED: f64 = 1.1;
/// Squared speed band the objects relax into.
const MAX_SPEED_SQUARED: f64 = 8.0;
const MIN_SPEED_SQUARED: f64 = 2.0;
/// Diameter the merge ring expands to.
const RING_DIAMETER: f64 = 60.0;
const RING_MAX_WEIGHT: f64 = 4.0;

#[derive(Debug, Clone)]
enum Shape {
    Unit {
        color: ShapeColor,
        rotation: AngleQuantity,
    },
    Composite(Box<[ColorObject; 2]>),
}

/// A moving colored sprite.
#[derive(Debug, Clone)]
pub struct ColorObject {
    body: PhysicsBody,
    /// Inactive objects are parts of a composite: they neither move nor
    /// translate when drawn.
    is_active: bool,
    is_to_be_removed: bool,
    remaining_bounces: i32,
    post_birth_timer: NonLoopedFrameCounter,
    size: f64,
    colors: u8,
    bounds: DVec2,
    shape: Shape,
}

impl ColorObject {
    fn with_motion(
        rng: &mut SketchRng,
        position: DVec2,
        velocity: DVec2,
        post_birth_frames: u32,
        bounds: DVec2,
        shape: Shape,
    ) -> Self {
        let velocity = if velocity.length_squared() < MIN_INITIAL_SPEED * MIN_INITIAL_SPEED {
            rng.unit_vector() * MIN_INITIAL_SPEED
        } else {
            velocity
        };
        Self {
            body: PhysicsBody::at(position).with_velocity(velocity),
            is_active: true,
            is_to_be_removed: false,
            remaining_bounces: 1,
            post_birth_timer: NonLoopedFrameCounter::new(post_birth_frames),
            size: 0.0,
            colors: 0,
            bounds,
            shape,
        }
    }

    /// A single square of palette color `color_index`.
    #[allow(clippy::too_many_arguments)]
    pub fn unit(
        rng: &mut SketchRng,
        position: DVec2,
        velocity: DVec2,
        color_index: usize,
        color: ShapeColor,
        size: f64,
        post_birth_frames: u32,
        bounds: DVec2,
    ) -> Self {
        let rotation = AngleQuantity::new(rng.angle(), rng.signed() * 0.01 * TAU);
        let mut object = Self::with_motion(
            rng,
            position,
            velocity,
            post_birth_frames,
            bounds,
            Shape::Unit { color, rotation },
        );
        object.size = size;
        object.colors = 1u8 << (color_index % 8);
        object
    }

    /// Merges two objects at their midpoint with their averaged velocity.
    ///
    /// The parts are copied in, parked at the composite's origin and made
    /// inactive; the caller flags the originals for removal.
    pub fn composite(
        rng: &mut SketchRng,
        a: &ColorObject,
        b: &ColorObject,
        post_birth_frames: u32,
    ) -> Self {
        let position = (a.body.position + b.body.position) * 0.5;
        let velocity = (a.body.velocity + b.body.velocity) * 0.5;
        let size = a.size.max(b.size) * 1.2;
        let park = |part: &ColorObject| {
            let mut part = part.clone();
            part.body.position = DVec2::ZERO;
            part.is_active = false;
            part
        };
        let mut object = Self::with_motion(
            rng,
            position,
            velocity,
            post_birth_frames,
            a.bounds,
            Shape::Composite(Box::new([park(a), park(b)])),
        );
        object.colors = a.colors | b.colors;
        object.set_size(size);
        object
    }

    pub fn position(&self) -> DVec2 {
        self.body.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.body.velocity
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.shape, Shape::Composite(_))
    }

    /// Whether the post-birth grace period is over.
    pub fn is_mature(&self) -> bool {
        self.post_birth_timer.is_completed()
    }

    pub fn flag_for_removal(&mut self) {
        self.is_to_be_removed = true;
    }

    pub fn has_color(&self, color_index: usize) -> bool {
        self.colors & (1u8 << (color_index % 8)) != 0
    }

    pub fn has_common_color(&self, other: &ColorObject) -> bool {
        self.colors & other.colors != 0
    }

    /// Whether `self` and `other` may merge: both mature, neither flagged,
    /// no shared color, and closer than `distance` on both axes.
    pub fn can_merge_with(&self, other: &ColorObject, distance: f64) -> bool {
        let offset = (self.body.position - other.body.position).abs();
        self.is_mature()
            && other.is_mature()
            && !self.is_to_be_removed
            && !other.is_to_be_removed
            && !self.has_common_color(other)
            && offset.x < distance
            && offset.y < distance
    }

    fn set_size(&mut self, size: f64) {
        self.size = size;
        if let Shape::Composite(parts) = &mut self.shape {
            for part in parts.iter_mut() {
                part.set_size(size);
            }
        }
    }

    fn draw_ring(&self, surface: &mut dyn Surface) {
        if self.post_birth_timer.is_completed() {
            return;
        }
        let ratio = self.post_birth_timer.progress_ratio();
        if ratio >= 1.0 {
            return;
        }
        let effect = ShapeColor::new(ColorUnit::Solid(Rgba::WHITE), ColorUnit::NoColor)
            .with_alpha_enabled();
        effect.apply(surface, Some(((1.0 - ratio) * 255.0) as u8));
        surface.stroke_weight((1.0 - ratio) * RING_MAX_WEIGHT);
        surface.ellipse(DVec2::ZERO, DVec2::splat(RING_DIAMETER * ease_out_quart(ratio)));
    }
}

impl Steppable for ColorObject {
    fn step(&mut self) {
        if self.is_active {
            let _ = self.post_birth_timer.step();
            let speed_squared = self.body.velocity.length_squared();
            if speed_squared > MAX_SPEED_SQUARED {
                self.body.velocity *= 0.95;
            } else if speed_squared < MIN_SPEED_SQUARED {
                self.body.velocity *= 1.1;
            }
            self.body.step();
        }
        match &mut self.shape {
            Shape::Unit { rotation, .. } => rotation.step(),
            Shape::Composite(parts) => parts.iter_mut().for_each(Steppable::step),
        }
    }
}

impl Cleanable for ColorObject {
    /// Bounces once off each wall it reaches, then is removed once fully
    /// outside the canvas.
    fn clean(&mut self) {
        let position = self.body.position;
        if self.remaining_bounces > 0 {
            if position.x < 0.0 || position.x > self.bounds.x {
                self.body.position.x = position.x.clamp(0.0, self.bounds.x);
                self.body.bounce(DVec2::X, 1.0);
                self.remaining_bounces -= 1;
            }
            if position.y < 0.0 || position.y > self.bounds.y {
                self.body.position.y = position.y.clamp(0.0, self.bounds.y);
                self.body.bounce(DVec2::Y, 1.0);
                self.remaining_bounces -= 1;
            }
            return;
        }
        let margin = self.size;
        if position.x < -margin
            || position.x > self.bounds.x + margin
            || position.y < -margin
            || position.y > self.bounds.y + margin
        {
            self.is_to_be_removed = true;
        }
    }

    fn is_to_be_removed(&self) -> bool {
        self.is_to_be_removed
    }
}

impl Drawable for ColorObject {
    fn draw(&self, surface: &mut dyn Surface) {
        match &self.shape {
            Shape::Unit { color, rotation } => {
                surface.push();
                if self.is_active {
                    surface.translate(self.body.position);
                }
                surface.rotate(rotation.angle);
                color.apply(surface, None);
                surface.rect(DVec2::splat(-0.4 * self.size), DVec2::splat(self.size));
                surface.pop();
            }
            Shape::Composite(parts) => {
                surface.push();
                surface.translate(self.body.position);
                for part in parts.iter() {
                    part.draw(surface);
                }
                self.draw_ring(surface);
                surface.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchbook_core::{DrawCommand, RecordingSurface};

    const BOUNDS: DVec2 = DVec2::new(640.0, 640.0);

    fn unit_at(rng: &mut SketchRng, position: DVec2, velocity: DVec2, color: usize) -> ColorObject {
        ColorObject::unit(
            rng,
            position,
            velocity,
            color,
            ShapeColor::filled(Rgba::rgb(255, 0, 0)),
            12.0,
            30,
            BOUNDS,
        )
    }

    fn mature(mut object: ColorObject) -> ColorObject {
        for _ in 0..31 {
            let _ = object.post_birth_timer.step();
        }
        object
    }

    // ---- Construction ----

    #[test]
    fn slow_start_gets_minimum_speed() {
        let mut rng = SketchRng::new(1);
        let o = unit_at(&mut rng, DVec2::splat(100.0), DVec2::ZERO, 0);
        assert!((o.velocity().length() - MIN_INITIAL_SPEED).abs() < 1e-9);
    }

    #[test]
    fn unit_has_exactly_its_color() {
        let mut rng = SketchRng::new(1);
        let o = unit_at(&mut rng, DVec2::ZERO, DVec2::X * 8.0, 2);
        assert!(o.has_color(2));
        assert!(!o.has_color(0));
    }

    // ---- Stepping ----

    #[test]
    fn fast_objects_slow_down_and_slow_ones_speed_up() {
        let mut rng = SketchRng::new(1);
        let mut fast = unit_at(&mut rng, DVec2::splat(300.0), DVec2::new(8.0, 0.0), 0);
        fast.step();
        assert!((fast.velocity().x - 7.6).abs() < 1e-9);

        let mut slow = unit_at(&mut rng, DVec2::splat(300.0), DVec2::new(1.2, 0.0), 0);
        slow.step();
        assert!((slow.velocity().x - 1.32).abs() < 1e-9);
    }

    #[test]
    fn speed_settles_inside_band() {
        let mut rng = SketchRng::new(4);
        let mut o = unit_at(&mut rng, DVec2::splat(300.0), DVec2::new(0.0, 8.0), 1);
        o.remaining_bounces = 100;
        for _ in 0..200 {
            o.step();
            o.clean();
        }
        let s2 = o.velocity().length_squared();
        assert!((MIN_SPEED_SQUARED * 0.9..=MAX_SPEED_SQUARED * 1.1).contains(&s2), "{s2}");
    }

    // ---- Cleaning ----

    #[test]
    fn bounces_once_then_leaves() {
        let mut rng = SketchRng::new(1);
        let mut o = unit_at(&mut rng, DVec2::new(1.0, 300.0), DVec2::new(-2.0, 0.0), 0);
        o.step();
        o.clean();
        assert_eq!(o.remaining_bounces, 0);
        assert!(o.velocity().x > 0.0);
        assert_eq!(o.position().x, 0.0);

        o.body.position.x = -13.0;
        o.clean();
        assert!(o.is_to_be_removed());
    }

    #[test]
    fn stays_while_within_margin() {
        let mut rng = SketchRng::new(1);
        let mut o = unit_at(&mut rng, DVec2::new(-5.0, 300.0), DVec2::new(-2.0, 0.0), 0);
        o.remaining_bounces = 0;
        o.clean();
        assert!(!o.is_to_be_removed());
    }

    // ---- Merging ----

    #[test]
    fn different_colors_close_together_can_merge() {
        let mut rng = SketchRng::new(1);
        let a = mature(unit_at(&mut rng, DVec2::new(100.0, 100.0), DVec2::X * 2.0, 0));
        let b = mature(unit_at(&mut rng, DVec2::new(105.0, 95.0), DVec2::Y * 2.0, 1));
        assert!(a.can_merge_with(&b, 10.0));

        let c = mature(unit_at(&mut rng, DVec2::new(100.0, 100.0), DVec2::X * 2.0, 0));
        assert!(!a.can_merge_with(&c, 10.0), "same color");

        let far = mature(unit_at(&mut rng, DVec2::new(111.0, 100.0), DVec2::X * 2.0, 2));
        assert!(!a.can_merge_with(&far, 10.0), "too far");

        let young = unit_at(&mut rng, DVec2::new(100.0, 100.0), DVec2::X * 2.0, 2);
        assert!(!a.can_merge_with(&young, 10.0), "still in post-birth period");
    }

    #[test]
    fn composite_averages_and_unions_colors() {
        let mut rng = SketchRng::new(1);
        let a = unit_at(&mut rng, DVec2::new(100.0, 100.0), DVec2::new(4.0, 0.0), 0);
        let b = unit_at(&mut rng, DVec2::new(110.0, 90.0), DVec2::new(0.0, 4.0), 1);
        let c = ColorObject::composite(&mut rng, &a, &b, 30);
        assert_eq!(c.position(), DVec2::new(105.0, 95.0));
        assert_eq!(c.velocity(), DVec2::new(2.0, 2.0));
        assert!((c.size() - 14.4).abs() < 1e-9);
        assert!(c.has_color(0) && c.has_color(1) && !c.has_color(2));
        assert!(c.is_composite());
        assert!(c.has_common_color(&a));
    }

    #[test]
    fn composite_parts_stay_parked() {
        let mut rng = SketchRng::new(1);
        let a = unit_at(&mut rng, DVec2::new(100.0, 100.0), DVec2::new(4.0, 0.0), 0);
        let b = unit_at(&mut rng, DVec2::new(110.0, 90.0), DVec2::new(0.0, 4.0), 1);
        let mut c = ColorObject::composite(&mut rng, &a, &b, 30);
        for _ in 0..5 {
            c.step();
        }
        if let Shape::Composite(parts) = &c.shape {
            assert!(parts.iter().all(|p| p.position() == DVec2::ZERO && !p.is_active));
        } else {
            panic!("expected composite");
        }
    }

    // ---- Drawing ----

    #[test]
    fn young_composite_draws_ring() {
        let mut rng = SketchRng::new(1);
        let a = unit_at(&mut rng, DVec2::ZERO, DVec2::X * 2.0, 0);
        let b = unit_at(&mut rng, DVec2::ZERO, DVec2::Y * 2.0, 1);
        let mut c = ColorObject::composite(&mut rng, &a, &b, 30);
        c.step();
        let mut surface = RecordingSurface::new();
        c.draw(&mut surface);
        let rects = surface
            .commands()
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Rect { .. }))
            .count();
        let rings = surface
            .commands()
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Ellipse { .. }))
            .count();
        assert_eq!(rects, 2);
        assert_eq!(rings, 1);
    }

    #[test]
    fn mature_composite_has_no_ring() {
        let mut rng = SketchRng::new(1);
        let a = unit_at(&mut rng, DVec2::ZERO, DVec2::X * 2.0, 0);
        let b = unit_at(&mut rng, DVec2::ZERO, DVec2::Y * 2.0, 1);
        let c = mature(ColorObject::composite(&mut rng, &a, &b, 30));
        let mut surface = RecordingSurface::new();
        c.draw(&mut surface);
        assert!(!surface
            .commands()
            .iter()
            .any(|cmd| matches!(cmd, DrawCommand::Ellipse { .. })));
    }

    #[test]
    fn inactive_unit_does_not_translate() {
        let mut rng = SketchRng::new(1);
        let mut o = unit_at(&mut rng, DVec2::splat(50.0), DVec2::X * 2.0, 0);
        o.is_active = false;
        let mut surface = RecordingSurface::new();
        o.draw(&mut surface);
        assert!(!surface
            .commands()
            .iter()
            .any(|cmd| matches!(cmd, DrawCommand::Translate(_))));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn composite_carries_both_colors(a in 0usize..3, b in 0usize..3, seed in 1u64..1000) {
                let mut rng = SketchRng::new(seed);
                let x = unit_at(&mut rng, DVec2::splat(100.0), DVec2::X * 2.0, a);
                let y = unit_at(&mut rng, DVec2::splat(105.0), DVec2::Y * 2.0, b);
                prop_assert_eq!(x.has_common_color(&y), a == b);
                prop_assert_eq!(x.has_common_color(&y), y.has_common_color(&x));

                let merged = ColorObject::composite(&mut rng, &x, &y, 30);
                prop_assert!(merged.has_color(a) && merged.has_color(b));
                prop_assert!(merged.has_common_color(&x) && merged.has_common_color(&y));
            }
        }
    }
}
