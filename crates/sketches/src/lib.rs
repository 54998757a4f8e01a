#![deny(unsafe_code)]
//! Sketch registry: maps sketch names to implementations, and renders them
//! headlessly onto a software raster.
//!
//! This crate sits between `sketchbook-core` (which defines the `Sketch`
//! trait) and the individual sketch crates. The CLI depends on it to avoid
//! duplicating dispatch logic.

pub mod raster;
pub mod script;

#[cfg(feature = "png")]
pub mod snapshot;

pub use raster::Raster;
pub use script::ScriptedInput;

use serde_json::Value;
use sketchbook_cmyk::Cmyk;
use sketchbook_core::{Input, RunSeed, ScalableCanvas, Sketch, SketchError, Surface};
use sketchbook_kanji_network::KanjiNetwork;
use sketchbook_no_longer_human::NoLongerHuman;
use sketchbook_stripes::Stripes;

/// All available sketch names.
const SKETCH_NAMES: &[&str] = &["cmyk", "kanji-network", "no-longer-human", "stripes"];

/// Enumeration of all available sketches.
///
/// Wraps each sketch implementation and delegates `Sketch` trait methods.
/// Use [`SketchKind::from_name`] for string-based construction.
pub enum SketchKind {
    /// Merging red, green, and blue squares.
    Cmyk(Cmyk),
    /// Spring graph of kanji components.
    KanjiNetwork(KanjiNetwork),
    /// Vertical text reader.
    NoLongerHuman(NoLongerHuman),
    /// Still stripe compositions.
    Stripes(Stripes),
}

impl SketchKind {
    /// Constructs a sketch by name. `text` replaces the built-in text of
    /// the sketches that read one and is ignored by the others.
    ///
    /// Returns `SketchError::UnknownSketch` if the name is not recognized,
    /// or `SketchError::InvalidText` if the text is unusable.
    pub fn from_name(
        name: &str,
        canvas: ScalableCanvas,
        seed: u64,
        params: &Value,
        text: Option<&str>,
    ) -> Result<Self, SketchError> {
        match name {
            "cmyk" => Ok(SketchKind::Cmyk(Cmyk::from_json(canvas, seed, params))),
            "kanji-network" => Ok(SketchKind::KanjiNetwork(KanjiNetwork::from_json(
                canvas, seed, params, text,
            )?)),
            "no-longer-human" => Ok(SketchKind::NoLongerHuman(NoLongerHuman::from_json(
                canvas, seed, params, text,
            )?)),
            "stripes" => Ok(SketchKind::Stripes(Stripes::from_json(canvas, seed, params))),
            _ => Err(SketchError::UnknownSketch(name.to_string())),
        }
    }

    /// Constructs the sketch a [`RunSeed`] describes.
    pub fn from_seed(seed: &RunSeed, text: Option<&str>) -> Result<Self, SketchError> {
        let canvas = seed.scalable_canvas()?;
        Self::from_name(&seed.sketch, canvas, seed.seed, &seed.params, text)
    }

    /// Returns a slice of all recognized sketch names.
    pub fn list_sketches() -> &'static [&'static str] {
        SKETCH_NAMES
    }

    fn inner(&self) -> &dyn Sketch {
        match self {
            SketchKind::Cmyk(s) => s,
            SketchKind::KanjiNetwork(s) => s,
            SketchKind::NoLongerHuman(s) => s,
            SketchKind::Stripes(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Sketch {
        match self {
            SketchKind::Cmyk(s) => s,
            SketchKind::KanjiNetwork(s) => s,
            SketchKind::NoLongerHuman(s) => s,
            SketchKind::Stripes(s) => s,
        }
    }
}

impl Sketch for SketchKind {
    fn setup(&mut self, surface: &mut dyn Surface) {
        self.inner_mut().setup(surface);
    }

    fn frame(&mut self, input: &Input, surface: &mut dyn Surface) {
        self.inner_mut().frame(input, surface);
    }

    fn canvas(&self) -> &ScalableCanvas {
        self.inner().canvas()
    }

    fn params(&self) -> Value {
        self.inner().params()
    }

    fn param_schema(&self) -> Value {
        self.inner().param_schema()
    }

    fn is_paused(&self) -> bool {
        self.inner().is_paused()
    }
}

/// Runs `setup` and then `frames` frames, taking one input per frame.
/// Stops early if `inputs` runs dry. Returns the number of frames run.
pub fn run_frames<I>(
    sketch: &mut dyn Sketch,
    surface: &mut dyn Surface,
    inputs: I,
    frames: u32,
) -> u32
where
    I: IntoIterator<Item = Input>,
{
    sketch.setup(surface);
    let mut count = 0;
    for input in inputs.into_iter().take(frames as usize) {
        sketch.frame(&input, surface);
        count += 1;
    }
    log::debug!("ran {count} frames");
    count
}
