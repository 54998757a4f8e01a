#![deny(unsafe_code)]
//! Core kernel for the sketchbook generative-art sketches.
//!
//! Provides the sprite lifecycle machinery (`Container`, `CleanableContainer`,
//! the `Steppable`/`Drawable`/`Cleanable` traits), frame counters, 2D physics
//! bodies, the scalable canvas, colors, the drawing `Surface` trait, the
//! `Sketch` trait, a seedable PRNG, and parameter helpers.

pub mod canvas;
pub mod cleanable;
pub mod color;
pub mod container;
pub mod easing;
pub mod error;
pub mod frame_counter;
pub mod frame_rate;
pub mod input;
pub mod lifecycle;
pub mod params;
pub mod physics;
pub mod prng;
pub mod region;
pub mod seed;
pub mod sketch;
pub mod surface;

pub use canvas::{BlendMode, ScalableCanvas, ScalableCanvasParameters, ScalableCanvasType};
pub use cleanable::CleanableContainer;
pub use color::{cielch, ColorUnit, Rgba, ShapeColor};
pub use container::{Container, DEFAULT_CAPACITY};
pub use error::SketchError;
pub use frame_counter::{FrameCounter, LoopedFrameCounter, NonLoopedFrameCounter};
pub use frame_rate::FrameRate;
pub use input::Input;
pub use lifecycle::{Cleanable, CleanableSprite, Drawable, Sprite, Steppable};
pub use physics::{AngleQuantity, Attraction, PhysicsBody, Spring};
pub use prng::SketchRng;
pub use region::RectangleRegion;
pub use seed::RunSeed;
pub use sketch::Sketch;
pub use surface::{DrawCommand, RecordingSurface, Surface};
