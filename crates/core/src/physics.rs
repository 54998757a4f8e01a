//! 2D kinematics for sprites: position, velocity, friction, forces, bounces.
//!
//! Each sprite owns exactly one [`PhysicsBody`]; bodies only interact through
//! explicit calls such as [`PhysicsBody::attract_each_other`].

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Parameters of an inverse-square attraction (or repulsion).
///
/// The raw magnitude is `|magnitude_factor| / distance²`. It is dropped
/// entirely when below `cutoff_magnitude`, then clamped to
/// `[min_magnitude, max_magnitude]` (only floored when no maximum is set).
/// A negative `magnitude_factor` turns attraction into repulsion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    pub magnitude_factor: f64,
    pub min_magnitude: f64,
    pub max_magnitude: Option<f64>,
    pub cutoff_magnitude: Option<f64>,
}

impl Attraction {
    /// Unclamped attraction with the given factor.
    pub fn new(magnitude_factor: f64) -> Self {
        Self {
            magnitude_factor,
            min_magnitude: 0.0,
            max_magnitude: None,
            cutoff_magnitude: None,
        }
    }

    pub fn with_min(mut self, min_magnitude: f64) -> Self {
        self.min_magnitude = min_magnitude;
        self
    }

    pub fn with_max(mut self, max_magnitude: f64) -> Self {
        self.max_magnitude = Some(max_magnitude);
        self
    }

    pub fn with_cutoff(mut self, cutoff_magnitude: f64) -> Self {
        self.cutoff_magnitude = Some(cutoff_magnitude);
        self
    }

    /// Force pulling a body at `from` toward `to`, or `None` when no force applies.
    ///
    /// No force is produced for a zero factor, for coincident points (the
    /// direction is undefined), or when the magnitude falls under the cutoff.
    pub fn force(&self, from: DVec2, to: DVec2) -> Option<DVec2> {
        if self.magnitude_factor == 0.0 {
            return None;
        }
        let offset = to - from;
        let distance_squared = offset.length_squared();
        if distance_squared == 0.0 {
            return None;
        }

        let mut magnitude = self.magnitude_factor.abs() / distance_squared;
        if let Some(cutoff) = self.cutoff_magnitude {
            if magnitude < cutoff {
                return None;
            }
        }
        magnitude = match self.max_magnitude {
            Some(max) => magnitude.max(self.min_magnitude).min(max),
            None => magnitude.max(self.min_magnitude),
        };

        let force = offset / distance_squared.sqrt() * magnitude;
        Some(if self.magnitude_factor < 0.0 { -force } else { force })
    }
}

/// Position and velocity of a sprite, with mass, collision radius, and friction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub position: DVec2,
    pub velocity: DVec2,
    pub mass: f64,
    pub collision_radius: f64,
    deceleration_factor: Option<f64>,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            position: DVec2::ZERO,
            velocity: DVec2::ZERO,
            mass: 1.0,
            collision_radius: 0.0,
            deceleration_factor: None,
        }
    }
}

impl PhysicsBody {
    /// Creates a body at rest at `position` with unit mass.
    pub fn at(position: DVec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_velocity(mut self, velocity: DVec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_collision_radius(mut self, radius: f64) -> Self {
        self.collision_radius = radius;
        self
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Heading of the velocity in radians.
    pub fn direction(&self) -> f64 {
        self.velocity.y.atan2(self.velocity.x)
    }

    pub fn has_friction(&self) -> bool {
        self.deceleration_factor.is_some()
    }

    /// Sets the per-frame friction constant; velocity is scaled by
    /// `1 - constant` after each step. Zero disables friction.
    pub fn set_friction(&mut self, constant: f64) {
        self.deceleration_factor = (constant != 0.0).then_some(1.0 - constant);
    }

    /// Moves by one frame of velocity, then applies friction.
    pub fn step(&mut self) {
        self.position += self.velocity;
        if let Some(factor) = self.deceleration_factor {
            self.velocity *= factor;
        }
    }

    pub fn accelerate(&mut self, delta: DVec2) {
        self.velocity += delta;
    }

    /// `velocity += force / mass`.
    pub fn apply_force(&mut self, force: DVec2) {
        self.velocity += force / self.mass;
    }

    /// Changes the speed by `delta` (never below zero), keeping the direction.
    /// A body at rest has no direction and is left untouched.
    pub fn add_speed(&mut self, delta: f64) {
        let speed = self.velocity.length();
        if speed == 0.0 {
            return;
        }
        self.velocity *= (speed + delta).max(0.0) / speed;
    }

    /// Clamps the speed to `max_speed`.
    pub fn constrain_speed(&mut self, max_speed: f64) {
        if self.velocity.length_squared() > max_speed * max_speed {
            self.velocity = self.velocity.normalize_or_zero() * max_speed;
        }
    }

    /// Whether the squared distance is below the *sum of squared radii*.
    ///
    /// This is looser than true circle overlap (`(r1 + r2)²`); sketches
    /// are tuned against this threshold.
    pub fn collides(&self, other: &PhysicsBody) -> bool {
        self.position.distance_squared(other.position)
            < self.collision_radius * self.collision_radius
                + other.collision_radius * other.collision_radius
    }

    /// Reflects the velocity off a surface with unit `normal`.
    ///
    /// `restitution` of 1 is a perfectly elastic bounce, 0 cancels the normal
    /// component.
    pub fn bounce(&mut self, normal: DVec2, restitution: f64) {
        self.velocity += normal * ((1.0 + restitution) * self.velocity.dot(-normal));
    }

    /// Applies an attraction toward `target` to this body only.
    pub fn attract_to_point(&mut self, target: DVec2, attraction: &Attraction) {
        if let Some(force) = attraction.force(self.position, target) {
            self.apply_force(force);
        }
    }

    /// Applies equal and opposite attraction forces to both bodies.
    pub fn attract_each_other(&mut self, other: &mut PhysicsBody, attraction: &Attraction) {
        if let Some(force) = attraction.force(self.position, other.position) {
            self.apply_force(force);
            other.apply_force(-force);
        }
    }
}

/// Hooke spring between two bodies.
///
/// Pulls the bodies together when stretched beyond `equilibrium_length`
/// and pushes them apart when compressed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    pub equilibrium_length: f64,
    pub spring_constant: f64,
}

impl Spring {
    pub fn new(equilibrium_length: f64, spring_constant: f64) -> Self {
        Self {
            equilibrium_length,
            spring_constant,
        }
    }

    /// Force on `a` for the current separation; `b` receives its negation.
    /// Coincident bodies have no defined direction and get no force.
    pub fn force(&self, a: DVec2, b: DVec2) -> DVec2 {
        let offset = b - a;
        let distance = offset.length();
        if distance == 0.0 {
            return DVec2::ZERO;
        }
        offset / distance * (self.spring_constant * (distance - self.equilibrium_length))
    }

    /// Applies the spring force to both bodies.
    pub fn apply(&self, a: &mut PhysicsBody, b: &mut PhysicsBody) {
        let force = self.force(a.position, b.position);
        a.apply_force(force);
        b.apply_force(-force);
    }
}

/// Angle with an angular velocity.
///
/// Where a sprite may or may not rotate, hold an `Option<AngleQuantity>`
/// rather than a shared zero placeholder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AngleQuantity {
    pub angle: f64,
    pub angle_velocity: f64,
}

impl AngleQuantity {
    pub fn new(angle: f64, angle_velocity: f64) -> Self {
        Self {
            angle,
            angle_velocity,
        }
    }

    pub fn step(&mut self) {
        self.angle += self.angle_velocity;
    }
}
