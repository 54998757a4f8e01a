#![deny(unsafe_code)]
//! Kanji network sketch.
//!
//! Reads lines of tab-separated characters, where each line lists the
//! components of its last character, and lays the resulting graph out with
//! springs along the edges and inverse-square repulsion between every pair
//! of nodes.

mod graph;

pub use graph::{GraphPhysics, KanjiEdge, KanjiGraph, KanjiNode};

use serde_json::{json, Value};
use sketchbook_core::params::{param_f64, param_f64_in};
use sketchbook_core::{
    Attraction, Drawable, FrameRate, Input, Rgba, ScalableCanvas, Sketch, SketchError, SketchRng,
    Spring, Steppable, Surface,
};

const DEFAULT_FRICTION: f64 = 0.07;
const DEFAULT_EQUILIBRIUM_LENGTH: f64 = 70.0;
const DEFAULT_SPRING_CONSTANT: f64 = 0.001;
/// Repulsion strength in unit accelerations.
const DEFAULT_REPULSION: f64 = 7.0e6;
const DEFAULT_VIEW_SCALE: f64 = 0.5;
/// Repulsion is capped at this many unit accelerations.
const REPULSION_MAX: f64 = 1.0e4;
/// Repulsion weaker than this many unit accelerations is ignored.
const REPULSION_CUTOFF: f64 = 200.0;

/// Data used when no text is supplied.
pub const DEFAULT_DATA: &str = "\
木\t木\t林
木\t林\t森
日\t月\t明
人\t木\t休
女\t子\t好
田\t力\t男
日\t生\t星
木\t目\t相
相\t心\t想
口\t口\t口\t品
言\t五\t口\t語
糸\t会\t絵
人\t言\t信
日\t寺\t時
木\t寸\t村
";

/// Tunable constants of the kanji network.
#[derive(Debug, Clone, Copy)]
pub struct KanjiNetworkParams {
    pub friction: f64,
    pub equilibrium_length: f64,
    pub spring_constant: f64,
    /// Repulsion strength between every two nodes, in unit accelerations.
    pub repulsion: f64,
    /// Extra zoom applied around the canvas center.
    pub view_scale: f64,
}

impl Default for KanjiNetworkParams {
    fn default() -> Self {
        Self {
            friction: DEFAULT_FRICTION,
            equilibrium_length: DEFAULT_EQUILIBRIUM_LENGTH,
            spring_constant: DEFAULT_SPRING_CONSTANT,
            repulsion: DEFAULT_REPULSION,
            view_scale: DEFAULT_VIEW_SCALE,
        }
    }
}

impl KanjiNetworkParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            friction: param_f64_in(params, "friction", DEFAULT_FRICTION, 0.0, 1.0),
            equilibrium_length: param_f64(params, "equilibrium_length", DEFAULT_EQUILIBRIUM_LENGTH),
            spring_constant: param_f64(params, "spring_constant", DEFAULT_SPRING_CONSTANT),
            repulsion: param_f64(params, "repulsion", DEFAULT_REPULSION),
            view_scale: param_f64_in(params, "view_scale", DEFAULT_VIEW_SCALE, 0.05, 4.0),
        }
    }

    /// Physical constants at the given frame rate.
    pub fn physics(&self, frame_rate: FrameRate) -> GraphPhysics {
        let u = frame_rate.unit_acceleration_magnitude();
        GraphPhysics {
            friction: self.friction,
            spring: Spring::new(self.equilibrium_length, self.spring_constant),
            repulsion: Attraction::new(-self.repulsion * u)
                .with_max(REPULSION_MAX * u)
                .with_cutoff(REPULSION_CUTOFF * u),
        }
    }
}

/// The kanji network sketch state.
pub struct KanjiNetwork {
    canvas: ScalableCanvas,
    params: KanjiNetworkParams,
    graph: KanjiGraph,
}

impl KanjiNetwork {
    /// Builds the graph from `text`, or from [`DEFAULT_DATA`] when `None`.
    ///
    /// Returns `SketchError::InvalidText` if the text yields no edge.
    pub fn new(
        canvas: ScalableCanvas,
        seed: u64,
        params: KanjiNetworkParams,
        text: Option<&str>,
    ) -> Result<Self, SketchError> {
        let mut rng = SketchRng::new(seed);
        let graph = KanjiGraph::parse(
            text.unwrap_or(DEFAULT_DATA),
            &mut rng,
            params.physics(FrameRate::default()),
        )?;
        log::debug!("kanji-network: {params:?}");
        Ok(Self {
            canvas,
            params,
            graph,
        })
    }

    pub fn from_json(
        canvas: ScalableCanvas,
        seed: u64,
        params: &Value,
        text: Option<&str>,
    ) -> Result<Self, SketchError> {
        Self::new(canvas, seed, KanjiNetworkParams::from_json(params), text)
    }

    pub fn graph(&self) -> &KanjiGraph {
        &self.graph
    }
}

impl Sketch for KanjiNetwork {
    fn setup(&mut self, surface: &mut dyn Surface) {
        surface.background(Rgba::gray(248));
    }

    fn frame(&mut self, _input: &Input, surface: &mut dyn Surface) {
        surface.background(Rgba::gray(248));
        surface.push();
        self.canvas.apply_scale(surface);
        surface.translate(self.canvas.center());
        surface.scale(self.params.view_scale);
        self.graph.step();
        self.graph.draw(surface);
        surface.pop();
    }

    fn canvas(&self) -> &ScalableCanvas {
        &self.canvas
    }

    fn params(&self) -> Value {
        json!({
            "friction": self.params.friction,
            "equilibrium_length": self.params.equilibrium_length,
            "spring_constant": self.params.spring_constant,
            "repulsion": self.params.repulsion,
            "view_scale": self.params.view_scale,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "friction": {
                "type": "number",
                "default": DEFAULT_FRICTION,
                "min": 0.0,
                "max": 1.0,
                "description": "Fraction of velocity lost per frame"
            },
            "equilibrium_length": {
                "type": "number",
                "default": DEFAULT_EQUILIBRIUM_LENGTH,
                "min": 0.0,
                "max": 640.0,
                "description": "Rest length of edge springs"
            },
            "spring_constant": {
                "type": "number",
                "default": DEFAULT_SPRING_CONSTANT,
                "min": 0.0,
                "max": 0.1,
                "description": "Stiffness of edge springs"
            },
            "repulsion": {
                "type": "number",
                "default": DEFAULT_REPULSION,
                "min": 0.0,
                "max": 1.0e8,
                "description": "Pairwise node repulsion in unit accelerations"
            },
            "view_scale": {
                "type": "number",
                "default": DEFAULT_VIEW_SCALE,
                "min": 0.05,
                "max": 4.0,
                "description": "Zoom around the canvas center"
            }
        })
    }
}
