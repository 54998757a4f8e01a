#![deny(unsafe_code)]
//! No Longer Human sketch.
//!
//! Reads a text one page at a time. Each page is typeset in vertical
//! columns running right to left, one character every few frames; every
//! character fades in, holds, then drifts off while fading out. The next
//! page starts a while after the last character of the current one.
//!
//! Typing `p` pauses and resumes.

mod character;
mod layout;

pub use character::{CharacterSprite, Phase};
pub use layout::{divide_evenly, format_sentence, paginate, split_keeping, Page};

use glam::DVec2;
use serde_json::{json, Value};
use sketchbook_core::params::{param_f64_in, param_u32, param_usize};
use sketchbook_core::{
    CleanableContainer, Drawable, Input, LoopedFrameCounter, NonLoopedFrameCounter, Rgba,
    ScalableCanvas, ShapeColor, Sketch, SketchError, SketchRng, Steppable, Surface,
};

const DEFAULT_FONT_SIZE: f64 = 32.0;
const DEFAULT_MIN_LINE_LENGTH: usize = 13;
const DEFAULT_MAX_LINE_LENGTH: usize = 17;
const DEFAULT_LINES_PER_PAGE: usize = 12;
const DEFAULT_FIRST_PAGE_DELAY: u32 = 30;
const DEFAULT_PAGE_INTERVAL: u32 = 180;
const DEFAULT_EMIT_INTERVAL: u32 = 2;
/// Column spacing as a multiple of the font size.
const LINE_INTERVAL_RATIO: f64 = 1.5;
/// Columns start this far down, as a fraction of the canvas height.
const TOP_MARGIN_RATIO: f64 = 0.09;
const BACKGROUND_TOP: Rgba = Rgba::rgb(252, 252, 253);
const BACKGROUND_BOTTOM: Rgba = Rgba::rgb(208, 208, 216);
const TEXTURE_ALPHA: u8 = 13;
const PAUSE_KEY: char = 'p';

/// Text read when none is supplied: the opening of Osamu Dazai's novel.
pub const DEFAULT_TEXT: &str = "\
恥の多い生涯を送って来ました。
自分には、人間の生活というものが、見当つかないのです。自分は東北の田舎に生れましたので、汽車をはじめて見たのは、よほど大きくなってからでした。
自分は停車場のブリッジを、上って、降りて、そうしてそれが線路をまたぎ越えるために造られたものだという事には全然気づかず、ただそれは停車場の構内を外国の遊戯場みたいに、複雑に楽しく、ハイカラにするためにのみ、設備せられてあるものだとばかり思っていました。
";

/// Tunable constants of the reader.
#[derive(Debug, Clone, Copy)]
pub struct NoLongerHumanParams {
    pub font_size: f64,
    pub min_line_length: usize,
    pub max_line_length: usize,
    pub lines_per_page: usize,
    /// Frames before the first page.
    pub first_page_delay: u32,
    /// Frames between the last character of a page and the next page.
    pub page_interval: u32,
    /// Frames between two characters.
    pub emit_interval: u32,
}

impl Default for NoLongerHumanParams {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            min_line_length: DEFAULT_MIN_LINE_LENGTH,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            lines_per_page: DEFAULT_LINES_PER_PAGE,
            first_page_delay: DEFAULT_FIRST_PAGE_DELAY,
            page_interval: DEFAULT_PAGE_INTERVAL,
            emit_interval: DEFAULT_EMIT_INTERVAL,
        }
    }
}

impl NoLongerHumanParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            font_size: param_f64_in(params, "font_size", DEFAULT_FONT_SIZE, 4.0, 128.0),
            min_line_length: param_usize(params, "min_line_length", DEFAULT_MIN_LINE_LENGTH),
            max_line_length: param_usize(params, "max_line_length", DEFAULT_MAX_LINE_LENGTH)
                .max(1),
            lines_per_page: param_usize(params, "lines_per_page", DEFAULT_LINES_PER_PAGE).max(1),
            first_page_delay: param_u32(params, "first_page_delay", DEFAULT_FIRST_PAGE_DELAY),
            page_interval: param_u32(params, "page_interval", DEFAULT_PAGE_INTERVAL),
            emit_interval: param_u32(params, "emit_interval", DEFAULT_EMIT_INTERVAL),
        }
    }

    fn line_interval(&self) -> f64 {
        self.font_size * LINE_INTERVAL_RATIO
    }
}

/// The text reader sketch state.
pub struct NoLongerHuman {
    canvas: ScalableCanvas,
    params: NoLongerHumanParams,
    rng: SketchRng,
    pages: Vec<Page>,
    next_page: usize,
    lines: Vec<Vec<char>>,
    line_index: usize,
    char_index: usize,
    cursor: DVec2,
    reader: NonLoopedFrameCounter,
    generator: LoopedFrameCounter,
    characters: CleanableContainer<CharacterSprite>,
    color: ShapeColor,
    paused: bool,
}

impl NoLongerHuman {
    /// Typesets `text`, or [`DEFAULT_TEXT`] when `None`.
    ///
    /// Returns `SketchError::InvalidText` if the text has no sentence.
    pub fn new(
        canvas: ScalableCanvas,
        seed: u64,
        params: NoLongerHumanParams,
        text: Option<&str>,
    ) -> Result<Self, SketchError> {
        let pages = paginate(
            text.unwrap_or(DEFAULT_TEXT),
            params.min_line_length,
            params.max_line_length,
            params.lines_per_page,
        );
        if pages.is_empty() {
            return Err(SketchError::InvalidText("text has no sentence".into()));
        }
        log::debug!("no-longer-human: {} pages, {params:?}", pages.len());
        Ok(Self {
            canvas,
            params,
            rng: SketchRng::new(seed),
            pages,
            next_page: 0,
            lines: Vec::new(),
            line_index: 0,
            char_index: 0,
            cursor: DVec2::ZERO,
            reader: NonLoopedFrameCounter::new(params.first_page_delay),
            generator: LoopedFrameCounter::paused(params.emit_interval),
            characters: CleanableContainer::with_capacity(512),
            color: ShapeColor::filled(Rgba::gray(32)).with_alpha_enabled(),
            paused: false,
        })
    }

    pub fn from_json(
        canvas: ScalableCanvas,
        seed: u64,
        params: &Value,
        text: Option<&str>,
    ) -> Result<Self, SketchError> {
        Self::new(canvas, seed, NoLongerHumanParams::from_json(params), text)
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn characters(&self) -> &CleanableContainer<CharacterSprite> {
        &self.characters
    }

    /// Index of the page the reader loads next.
    pub fn next_page(&self) -> usize {
        self.next_page
    }

    fn top(&self) -> f64 {
        self.canvas.non_scaled_height() * TOP_MARGIN_RATIO
    }

    /// Loads the next page, wrapping to the first after the last.
    fn turn_page(&mut self) {
        let index = if self.next_page < self.pages.len() {
            self.next_page
        } else {
            0
        };
        self.next_page = (index + 1) % self.pages.len();
        let Some(page) = self.pages.get(index) else {
            return;
        };
        log::debug!("no-longer-human: page {index} ({} lines)", page.lines.len());

        self.lines = page.lines.iter().map(|line| line.chars().collect()).collect();
        self.line_index = 0;
        self.char_index = 0;
        let columns = self.lines.len().saturating_sub(1) as f64;
        self.cursor = DVec2::new(
            0.5 * self.canvas.non_scaled_width() + 0.5 * columns * self.params.line_interval(),
            self.top(),
        );
        self.generator.reset_count().on(None);
    }

    /// Places one character and moves the cursor down, or to the next
    /// column. Hands back to the reader after the last character.
    fn emit_character(&mut self) {
        if let Some(line) = self.lines.get(self.line_index) {
            if let Some(&character) = line.get(self.char_index) {
                self.characters.push(CharacterSprite::new(
                    &mut self.rng,
                    character,
                    self.cursor,
                    self.params.font_size,
                    self.color,
                    self.canvas.region(),
                ));
            }
            self.char_index += 1;
            self.cursor.y += self.params.font_size;
            if self.char_index >= line.len() {
                self.char_index = 0;
                self.line_index += 1;
                self.cursor = DVec2::new(self.cursor.x - self.params.line_interval(), self.top());
            }
        }

        if self.line_index >= self.lines.len() {
            self.generator.off();
            self.reader
                .reset_count()
                .on(Some(self.params.page_interval));
        }
    }
}

impl Sketch for NoLongerHuman {
    fn setup(&mut self, surface: &mut dyn Surface) {
        surface.vertical_gradient(BACKGROUND_TOP, BACKGROUND_BOTTOM);
        surface.noise_texture(TEXTURE_ALPHA, Rgba::BLACK, self.rng.next_u64());
        surface.save_pixels();
    }

    fn frame(&mut self, input: &Input, surface: &mut dyn Surface) {
        if input.typed(PAUSE_KEY) {
            self.paused = !self.paused;
        }
        if self.paused {
            return;
        }

        if self.reader.step() {
            self.turn_page();
        }
        if self.generator.step() {
            self.emit_character();
        }

        self.characters.step();
        self.characters.clean();

        surface.restore_pixels();
        surface.push();
        self.canvas.apply_scale(surface);
        self.characters.draw(surface);
        surface.pop();
    }

    fn canvas(&self) -> &ScalableCanvas {
        &self.canvas
    }

    fn params(&self) -> Value {
        json!({
            "font_size": self.params.font_size,
            "min_line_length": self.params.min_line_length,
            "max_line_length": self.params.max_line_length,
            "lines_per_page": self.params.lines_per_page,
            "first_page_delay": self.params.first_page_delay,
            "page_interval": self.params.page_interval,
            "emit_interval": self.params.emit_interval,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "font_size": {
                "type": "number",
                "default": DEFAULT_FONT_SIZE,
                "min": 4.0,
                "max": 128.0,
                "description": "Glyph height; also sets the column spacing"
            },
            "min_line_length": {
                "type": "integer",
                "default": DEFAULT_MIN_LINE_LENGTH,
                "min": 0,
                "max": 64,
                "description": "Shorter lines only end where the next phrase would not fit"
            },
            "max_line_length": {
                "type": "integer",
                "default": DEFAULT_MAX_LINE_LENGTH,
                "min": 1,
                "max": 64,
                "description": "Characters per column"
            },
            "lines_per_page": {
                "type": "integer",
                "default": DEFAULT_LINES_PER_PAGE,
                "min": 1,
                "max": 64,
                "description": "Maximum columns on one page"
            },
            "first_page_delay": {
                "type": "integer",
                "default": DEFAULT_FIRST_PAGE_DELAY,
                "min": 0,
                "max": 600,
                "description": "Frames before the first page"
            },
            "page_interval": {
                "type": "integer",
                "default": DEFAULT_PAGE_INTERVAL,
                "min": 0,
                "max": 600,
                "description": "Frames between the end of a page and the next"
            },
            "emit_interval": {
                "type": "integer",
                "default": DEFAULT_EMIT_INTERVAL,
                "min": 0,
                "max": 60,
                "description": "Frames between two characters"
            }
        })
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchbook_core::{DrawCommand, RecordingSurface, ScalableCanvasType};

    const SIZE: DVec2 = DVec2::splat(640.0);

    fn canvas() -> ScalableCanvas {
        ScalableCanvas::from_type(ScalableCanvasType::Square640x640, 640.0, 640.0).unwrap()
    }

    fn reader(text: &str) -> NoLongerHuman {
        NoLongerHuman::new(canvas(), 3, NoLongerHumanParams::default(), Some(text)).unwrap()
    }

    fn run(sketch: &mut NoLongerHuman, frames: std::ops::RangeInclusive<u64>) -> RecordingSurface {
        let mut surface = RecordingSurface::new();
        for frame in frames {
            sketch.frame(&Input::idle(frame, SIZE), &mut surface);
        }
        surface
    }

    // ---- Construction ----

    #[test]
    fn default_text_paginates() {
        let sketch =
            NoLongerHuman::new(canvas(), 1, NoLongerHumanParams::default(), None).unwrap();
        assert_eq!(sketch.pages().len(), 4);
    }

    #[test]
    fn blank_text_is_an_error() {
        let result =
            NoLongerHuman::new(canvas(), 1, NoLongerHumanParams::default(), Some(" \n"));
        assert!(matches!(result, Err(SketchError::InvalidText(_))));
    }

    // ---- Reading ----

    #[test]
    fn first_character_appears_after_the_delay() {
        let mut sketch = reader("一二三。");
        run(&mut sketch, 1..=31);
        // the reader fires on frame 31 and the generator on its third step
        assert!(sketch.characters().is_empty());
        run(&mut sketch, 32..=34);
        assert_eq!(sketch.characters().len(), 1);
        let first = &sketch.characters().elements()[0];
        assert_eq!(first.character(), '一');
        assert_eq!(first.position(), DVec2::new(320.0, 640.0 * 0.09));
    }

    #[test]
    fn characters_run_down_then_right_to_left() {
        let params = NoLongerHumanParams {
            max_line_length: 2,
            min_line_length: 0,
            first_page_delay: 0,
            emit_interval: 0,
            ..NoLongerHumanParams::default()
        };
        let mut sketch = NoLongerHuman::new(canvas(), 1, params, Some("一二三。")).unwrap();
        run(&mut sketch, 1..=5);
        let placed: Vec<(char, DVec2)> = sketch
            .characters()
            .iter()
            .map(|c| (c.character(), c.position()))
            .collect();
        let top = 640.0 * 0.09;
        // two columns, centered: x = 320 ± 24
        assert_eq!(
            placed,
            vec![
                ('一', DVec2::new(344.0, top)),
                ('二', DVec2::new(344.0, top + 32.0)),
                ('三', DVec2::new(296.0, top)),
                ('。', DVec2::new(296.0, top + 32.0)),
            ]
        );
    }

    #[test]
    fn pages_wrap_around() {
        let params = NoLongerHumanParams {
            first_page_delay: 0,
            page_interval: 1,
            emit_interval: 0,
            ..NoLongerHumanParams::default()
        };
        let mut sketch = NoLongerHuman::new(canvas(), 1, params, Some("一。二。")).unwrap();
        assert_eq!(sketch.pages().len(), 2);
        run(&mut sketch, 1..=1);
        assert_eq!(sketch.next_page(), 1);
        run(&mut sketch, 2..=4);
        assert_eq!(sketch.next_page(), 0);
        run(&mut sketch, 5..=8);
        let read: String = sketch.characters().iter().map(|c| c.character()).collect();
        assert_eq!(read, "一。二。一。");
    }

    // ---- Drawing and input ----

    #[test]
    fn setup_saves_the_background() {
        let mut sketch = reader("一。");
        let mut surface = RecordingSurface::new();
        sketch.setup(&mut surface);
        let commands = surface.commands();
        assert_eq!(
            commands[0],
            DrawCommand::VerticalGradient {
                top: BACKGROUND_TOP,
                bottom: BACKGROUND_BOTTOM
            }
        );
        assert_eq!(commands.last(), Some(&DrawCommand::SavePixels));
    }

    #[test]
    fn every_frame_restores_the_background() {
        let mut sketch = reader("一。");
        let surface = run(&mut sketch, 1..=3);
        let restores = surface
            .commands()
            .iter()
            .filter(|c| **c == DrawCommand::RestorePixels)
            .count();
        assert_eq!(restores, 3);
    }

    #[test]
    fn p_toggles_pause() {
        let mut sketch = reader("一。");
        let mut surface = RecordingSurface::new();
        let mut input = Input::idle(1, SIZE);
        input.typed_keys.push('p');
        sketch.frame(&input, &mut surface);
        assert!(sketch.is_paused());
        assert!(surface.commands().is_empty());

        run(&mut sketch, 2..=40);
        assert!(sketch.characters().is_empty());

        let mut input = Input::idle(41, SIZE);
        input.typed_keys.push('p');
        sketch.frame(&input, &mut surface);
        assert!(!sketch.is_paused());
        assert!(!surface.commands().is_empty());
    }

    #[test]
    fn params_fall_back_to_defaults() {
        let params =
            NoLongerHumanParams::from_json(&json!({"font_size": "big", "lines_per_page": 0}));
        assert_eq!(params.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(params.lines_per_page, 1);
    }
}
