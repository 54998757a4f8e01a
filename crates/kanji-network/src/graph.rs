//! Directed graph of characters held together by springs.
//!
//! Nodes live in one [`Container`]; edges refer to them by index, so a
//! spring step borrows its two endpoints through [`Container::pair_mut`].

use std::collections::HashMap;

use glam::DVec2;
use sketchbook_core::{
    Attraction, Container, Drawable, PhysicsBody, Rgba, SketchError, SketchRng, Spring, Steppable,
    Surface,
};

/// Side of the framed tile a character is drawn on.
const TILE_SIZE: f64 = 40.0;
const TILE_CORNER_RADIUS: f64 = 4.0;
/// Random start positions are drawn from `[-START_SPREAD, START_SPREAD]²`.
const START_SPREAD: f64 = 320.0;

/// A character and its body.
#[derive(Debug, Clone)]
pub struct KanjiNode {
    character: String,
    body: PhysicsBody,
}

impl KanjiNode {
    fn new(character: &str, rng: &mut SketchRng, friction: f64) -> Self {
        let mut body = PhysicsBody::at(DVec2::new(
            rng.range(-START_SPREAD, START_SPREAD),
            rng.range(-START_SPREAD, START_SPREAD),
        ));
        body.set_friction(friction);
        Self {
            character: character.to_owned(),
            body,
        }
    }

    pub fn character(&self) -> &str {
        &self.character
    }

    pub fn position(&self) -> DVec2 {
        self.body.position
    }
}

impl Steppable for KanjiNode {
    fn step(&mut self) {
        self.body.step();
    }
}

impl Drawable for KanjiNode {
    fn draw(&self, surface: &mut dyn Surface) {
        let inner = TILE_SIZE - 2.0;
        surface.push();
        surface.translate(self.body.position);
        surface.stroke(Some(Rgba::gray(128)));
        surface.stroke_weight(2.0);
        surface.fill(Some(Rgba::WHITE));
        surface.rounded_rect(DVec2::splat(-0.5 * inner), DVec2::splat(inner), TILE_CORNER_RADIUS);
        surface.stroke(None);
        surface.fill(Some(Rgba::gray(32)));
        surface.text(
            &self.character,
            DVec2::new(0.0, -0.1 * TILE_SIZE),
            0.75 * TILE_SIZE,
        );
        surface.pop();
    }
}

/// Directed edge from a component to the character it builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KanjiEdge {
    pub from: usize,
    pub to: usize,
}

/// Physical constants of the graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphPhysics {
    pub friction: f64,
    pub spring: Spring,
    /// Pairwise repulsion between every two nodes.
    pub repulsion: Attraction,
}

/// The character graph.
#[derive(Debug, Clone)]
pub struct KanjiGraph {
    nodes: Container<KanjiNode>,
    edges: Container<KanjiEdge>,
    node_map: HashMap<String, usize>,
    physics: GraphPhysics,
}

impl KanjiGraph {
    /// Builds the graph from tab-separated lines: every entry but the last
    /// gets an edge to the last. Blank entries are skipped and duplicate
    /// edges ignored.
    ///
    /// Returns `SketchError::InvalidText` if no line yields an edge.
    pub fn parse(
        text: &str,
        rng: &mut SketchRng,
        physics: GraphPhysics,
    ) -> Result<Self, SketchError> {
        let mut graph = Self {
            nodes: Container::new(),
            edges: Container::new(),
            node_map: HashMap::new(),
            physics,
        };
        for line in text.lines() {
            let characters: Vec<&str> = line
                .split('\t')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .collect();
            if let Some((last, components)) = characters.split_last() {
                for component in components {
                    graph.add_edge(component, last, rng);
                }
            }
        }
        if graph.edges.is_empty() {
            return Err(SketchError::InvalidText(
                "no line has two or more tab-separated entries".into(),
            ));
        }
        log::debug!(
            "kanji graph: {} nodes, {} edges",
            graph.nodes.len(),
            graph.edges.len()
        );
        Ok(graph)
    }

    pub fn nodes(&self) -> &Container<KanjiNode> {
        &self.nodes
    }

    pub fn edges(&self) -> &Container<KanjiEdge> {
        &self.edges
    }

    pub fn node(&self, character: &str) -> Option<&KanjiNode> {
        self.node_map
            .get(character)
            .and_then(|&index| self.nodes.get(index))
    }

    /// Mean node position (the origin for an empty graph).
    pub fn average_position(&self) -> DVec2 {
        let sum = self
            .nodes
            .iter()
            .fold(DVec2::ZERO, |acc, node| acc + node.body.position);
        sum / self.nodes.len().max(1) as f64
    }

    /// One line per edge, `"from -> to"`.
    pub fn describe(&self) -> String {
        self.edges
            .iter()
            .filter_map(|edge| {
                let from = self.nodes.get(edge.from)?;
                let to = self.nodes.get(edge.to)?;
                Some(format!("{} -> {}\n", from.character, to.character))
            })
            .collect()
    }

    fn add_edge(&mut self, from: &str, to: &str, rng: &mut SketchRng) {
        let from = self.node_index(from, rng);
        let to = self.node_index(to, rng);
        let edge = KanjiEdge { from, to };
        if !self.edges.iter().any(|existing| *existing == edge) {
            self.edges.push(edge);
        }
    }

    fn node_index(&mut self, character: &str, rng: &mut SketchRng) -> usize {
        if let Some(&index) = self.node_map.get(character) {
            return index;
        }
        let index = self.nodes.len();
        self.nodes
            .push(KanjiNode::new(character, rng, self.physics.friction));
        self.node_map.insert(character.to_owned(), index);
        index
    }
}

impl Steppable for KanjiGraph {
    /// Springs first, then motion, then pairwise repulsion.
    fn step(&mut self) {
        let spring = self.physics.spring;
        for edge in self.edges.iter() {
            // a self-loop has no length to correct
            if let Some((a, b)) = self.nodes.pair_mut(edge.from, edge.to) {
                spring.apply(&mut a.body, &mut b.body);
            }
        }
        self.nodes.step();
        let repulsion = self.physics.repulsion;
        self.nodes
            .round_robin(|a, b| a.body.attract_each_other(&mut b.body, &repulsion));
    }
}

impl Drawable for KanjiGraph {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.stroke(Some(Rgba::BLACK));
        surface.stroke_weight(1.0);
        for edge in self.edges.iter() {
            if let (Some(a), Some(b)) = (self.nodes.get(edge.from), self.nodes.get(edge.to)) {
                surface.line(a.body.position, b.body.position);
            }
        }
        self.nodes.draw(surface);
    }
}
