//! A single character that fades in, holds, then drifts away.

use std::f64::consts::{FRAC_PI_4, TAU};

use glam::DVec2;
use sketchbook_core::easing::ease_out_quad;
use sketchbook_core::{
    AngleQuantity, Cleanable, Drawable, NonLoopedFrameCounter, PhysicsBody, RectangleRegion,
    ShapeColor, SketchRng, Steppable, Surface,
};

const BIRTH_FRAMES: u32 = 30;
/// Counted from birth, not from the end of the fade-in.
const DEATH_DELAY_FRAMES: u32 = 120;
const DEATH_FRAMES: u32 = 120;
const DRIFT_ACCELERATION: f64 = 0.05;
const ROTATION_ACCELERATION: f64 = TAU * 0.0001;
/// Characters this far outside the canvas are removed.
const REMOVAL_MARGIN: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Birth,
    Stop,
    Death,
}

/// One glyph of the text being read.
#[derive(Debug, Clone)]
pub struct CharacterSprite {
    character: char,
    body: PhysicsBody,
    acceleration: DVec2,
    rotation: AngleQuantity,
    rotation_acceleration: f64,
    /// Drift applied once dying, rolled at creation.
    death_acceleration: DVec2,
    death_rotation_acceleration: f64,
    phase: Phase,
    birth_timer: NonLoopedFrameCounter,
    death_delay_timer: NonLoopedFrameCounter,
    death_timer: NonLoopedFrameCounter,
    alpha: u8,
    font_size: f64,
    color: ShapeColor,
    region: RectangleRegion,
    is_to_be_removed: bool,
}

impl CharacterSprite {
    pub fn new(
        rng: &mut SketchRng,
        character: char,
        position: DVec2,
        font_size: f64,
        color: ShapeColor,
        region: RectangleRegion,
    ) -> Self {
        let direction = rng.signed() * FRAC_PI_4;
        Self {
            character,
            body: PhysicsBody::at(position),
            acceleration: DVec2::ZERO,
            rotation: AngleQuantity::default(),
            rotation_acceleration: 0.0,
            death_acceleration: DVec2::from_angle(direction) * DRIFT_ACCELERATION,
            death_rotation_acceleration: rng.signed() * ROTATION_ACCELERATION,
            phase: Phase::Birth,
            birth_timer: NonLoopedFrameCounter::new(BIRTH_FRAMES),
            death_delay_timer: NonLoopedFrameCounter::new(DEATH_DELAY_FRAMES),
            death_timer: NonLoopedFrameCounter::paused(DEATH_FRAMES),
            alpha: 0,
            font_size,
            color,
            region,
            is_to_be_removed: false,
        }
    }

    pub fn character(&self) -> char {
        self.character
    }

    pub fn position(&self) -> DVec2 {
        self.body.position
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }
}

fn alpha_of(ratio: f64) -> u8 {
    (255.0 * ratio).ceil().clamp(0.0, 255.0) as u8
}

impl Steppable for CharacterSprite {
    fn step(&mut self) {
        self.body.accelerate(self.acceleration);
        self.body.step();
        self.rotation.angle_velocity += self.rotation_acceleration;
        self.rotation.step();

        if self.birth_timer.step() {
            self.phase = Phase::Stop;
            self.death_delay_timer.on(None);
        }
        if self.death_delay_timer.step() {
            self.phase = Phase::Death;
            self.death_timer.on(None);
            self.acceleration = self.death_acceleration;
            self.rotation_acceleration = self.death_rotation_acceleration;
        }
        if self.death_timer.step() {
            self.is_to_be_removed = true;
        }

        self.alpha = match self.phase {
            Phase::Birth => alpha_of(self.birth_timer.progress_ratio()),
            Phase::Stop => 255,
            Phase::Death => alpha_of(1.0 - ease_out_quad(self.death_timer.progress_ratio())),
        };
    }
}

impl Drawable for CharacterSprite {
    fn draw(&self, surface: &mut dyn Surface) {
        if self.alpha == 0 {
            return;
        }
        self.color.apply(surface, Some(self.alpha));
        surface.push();
        surface.translate(self.body.position);
        surface.rotate(self.rotation.angle);
        surface.text(
            self.character.encode_utf8(&mut [0; 4]),
            DVec2::ZERO,
            self.font_size,
        );
        surface.pop();
    }
}

impl Cleanable for CharacterSprite {
    fn clean(&mut self) {
        if !self.region.contains(self.body.position, REMOVAL_MARGIN) {
            self.is_to_be_removed = true;
        }
    }

    fn is_to_be_removed(&self) -> bool {
        self.is_to_be_removed
    }
}
