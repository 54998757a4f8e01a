//! CPU software rasteriser implementing [`Surface`].
//!
//! Shapes are rasterised by sampling each pixel center in the shape's
//! device-space bounding box, mapping it back through the inverse of the
//! current transform, and testing a signed distance in local space.
//! Coverage is binary (no anti-aliasing). Text has no font: each glyph is a
//! filled cell.

use glam::{DAffine2, DVec2};
use sketchbook_core::{BlendMode, Rgba, SketchError, SketchRng, Surface};

/// Fraction of a glyph cell left empty on each side.
const GLYPH_INSET: f64 = 0.1;

#[derive(Debug, Clone, Copy)]
struct DrawState {
    fill: Option<Rgba>,
    stroke: Option<Rgba>,
    stroke_weight: f64,
    blend: BlendMode,
    transform: DAffine2,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            fill: Some(Rgba::WHITE),
            stroke: Some(Rgba::BLACK),
            stroke_weight: 1.0,
            blend: BlendMode::Normal,
            transform: DAffine2::IDENTITY,
        }
    }
}

/// RGBA8 pixel buffer with canvas-style drawing state.
#[derive(Debug, Clone)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
    saved: Option<Vec<Rgba>>,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl Raster {
    /// Creates a transparent black raster.
    ///
    /// Returns `SketchError::InvalidDimensions` if either side is zero or
    /// the pixel count overflows.
    pub fn new(width: usize, height: usize) -> Result<Self, SketchError> {
        if width == 0 || height == 0 {
            return Err(SketchError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .ok_or(SketchError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            pixels: vec![Rgba::rgba(0, 0, 0, 0); len],
            saved: None,
            state: DrawState::default(),
            stack: Vec::new(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Color at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Row-major RGBA8 bytes, four per pixel.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| [p.r, p.g, p.b, p.a])
            .collect()
    }

    fn blend_pixel(&mut self, index: usize, src: Rgba, mode: BlendMode) {
        let Some(dst) = self.pixels.get_mut(index) else {
            return;
        };
        *dst = blend(*dst, src, mode);
    }

    /// Paints every pixel whose center maps into the shape described by
    /// `distance` (negative inside), within local bounds `min..max`.
    fn paint_shape<F>(&mut self, min: DVec2, max: DVec2, fill: bool, distance: F)
    where
        F: Fn(DVec2) -> f64,
    {
        let fill = if fill { self.state.fill } else { None };
        let stroke = self.state.stroke;
        if fill.is_none() && stroke.is_none() {
            return;
        }
        let transform = self.state.transform;
        if transform.matrix2.determinant() == 0.0 {
            return;
        }
        let inverse = transform.inverse();
        let half_weight = 0.5 * self.state.stroke_weight.max(0.0);
        let mode = self.state.blend;

        let pad = DVec2::splat(half_weight + 1.0);
        let corners = [
            DVec2::new(min.x, min.y) - pad,
            DVec2::new(max.x, min.y) + DVec2::new(pad.x, -pad.y),
            DVec2::new(min.x, max.y) + DVec2::new(-pad.x, pad.y),
            DVec2::new(max.x, max.y) + pad,
        ]
        .map(|c| transform.transform_point2(c));
        let lo = corners.iter().fold(DVec2::INFINITY, |a, c| a.min(*c));
        let hi = corners.iter().fold(DVec2::NEG_INFINITY, |a, c| a.max(*c));
        if !lo.is_finite() || !hi.is_finite() {
            return;
        }
        let x0 = lo.x.floor().max(0.0) as usize;
        let y0 = lo.y.floor().max(0.0) as usize;
        let x1 = (hi.x.ceil().max(0.0) as usize).min(self.width);
        let y1 = (hi.y.ceil().max(0.0) as usize).min(self.height);

        for y in y0..y1 {
            for x in x0..x1 {
                let local = inverse.transform_point2(DVec2::new(x as f64 + 0.5, y as f64 + 0.5));
                let d = distance(local);
                let color = match (stroke, fill) {
                    (Some(s), _) if d.abs() <= half_weight => Some(s),
                    (_, Some(f)) if d <= 0.0 => Some(f),
                    _ => None,
                };
                if let Some(color) = color {
                    self.blend_pixel(y * self.width + x, color, mode);
                }
            }
        }
    }

    fn fill_all<F>(&mut self, color_at_row: F)
    where
        F: Fn(usize) -> Rgba,
    {
        for (y, row) in self.pixels.chunks_mut(self.width).enumerate() {
            row.fill(color_at_row(y));
        }
    }
}

/// Signed distance from `p` to a box with corner radius `r`.
fn rounded_box_distance(p: DVec2, center: DVec2, half: DVec2, r: f64) -> f64 {
    let r = r.min(half.x.abs()).min(half.y.abs()).max(0.0);
    let q = (p - center).abs() - half.abs() + DVec2::splat(r);
    q.max(DVec2::ZERO).length() + q.x.max(q.y).min(0.0) - r
}

/// Approximate signed distance to an axis-aligned ellipse.
fn ellipse_distance(p: DVec2, center: DVec2, radii: DVec2) -> f64 {
    let radii = radii.abs();
    if radii.x == 0.0 || radii.y == 0.0 {
        return f64::INFINITY;
    }
    let k = ((p - center) / radii).length();
    (k - 1.0) * radii.min_element()
}

fn segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let t = if len_sq == 0.0 {
        0.0
    } else {
        ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    };
    p.distance(a + ab * t)
}

fn channel(f: impl Fn(f64, f64) -> f64, s: u8, d: u8) -> f64 {
    f(f64::from(s), f64::from(d)).clamp(0.0, 255.0)
}

/// Composites `src` over `dst` with `src.a` as opacity.
pub fn blend(dst: Rgba, src: Rgba, mode: BlendMode) -> Rgba {
    let mix: fn(f64, f64) -> f64 = match mode {
        BlendMode::Normal => |s, _| s,
        BlendMode::Multiply => |s, d| s * d / 255.0,
        BlendMode::Burn => |s, d| {
            if s <= 0.0 {
                0.0
            } else {
                255.0 - ((255.0 - d) * 255.0 / s).min(255.0)
            }
        },
        BlendMode::Difference => |s, d| (s - d).abs(),
    };
    let a = f64::from(src.a) / 255.0;
    let over = |s: u8, d: u8| {
        let blended = channel(mix, s, d);
        (blended * a + f64::from(d) * (1.0 - a)).round() as u8
    };
    let out_alpha = f64::from(src.a) + f64::from(dst.a) * (1.0 - a);
    Rgba::rgba(
        over(src.r, dst.r),
        over(src.g, dst.g),
        over(src.b, dst.b),
        out_alpha.round().clamp(0.0, 255.0) as u8,
    )
}

impl Surface for Raster {
    fn background(&mut self, color: Rgba) {
        self.fill_all(|_| color);
    }

    fn fill(&mut self, color: Option<Rgba>) {
        self.state.fill = color;
    }

    fn stroke(&mut self, color: Option<Rgba>) {
        self.state.stroke = color;
    }

    fn stroke_weight(&mut self, weight: f64) {
        self.state.stroke_weight = weight;
    }

    fn blend_mode(&mut self, mode: BlendMode) {
        self.state.blend = mode;
    }

    fn push(&mut self) {
        self.stack.push(self.state);
    }

    fn pop(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, offset: DVec2) {
        self.state.transform = self.state.transform * DAffine2::from_translation(offset);
    }

    fn rotate(&mut self, angle: f64) {
        self.state.transform = self.state.transform * DAffine2::from_angle(angle);
    }

    fn scale(&mut self, factor: f64) {
        self.state.transform = self.state.transform * DAffine2::from_scale(DVec2::splat(factor));
    }

    fn rect(&mut self, top_left: DVec2, size: DVec2) {
        self.rounded_rect(top_left, size, 0.0);
    }

    fn rounded_rect(&mut self, top_left: DVec2, size: DVec2, radius: f64) {
        let a = top_left;
        let b = top_left + size;
        let center = 0.5 * (a + b);
        let half = 0.5 * size;
        self.paint_shape(a.min(b), a.max(b), true, |p| {
            rounded_box_distance(p, center, half, radius)
        });
    }

    fn line(&mut self, from: DVec2, to: DVec2) {
        self.paint_shape(from.min(to), from.max(to), false, |p| {
            segment_distance(p, from, to)
        });
    }

    fn ellipse(&mut self, center: DVec2, diameter: DVec2) {
        let radii = 0.5 * diameter.abs();
        self.paint_shape(center - radii, center + radii, true, |p| {
            ellipse_distance(p, center, radii)
        });
    }

    fn text(&mut self, text: &str, center: DVec2, size: f64) {
        let glyphs: Vec<char> = text.chars().collect();
        let saved_stroke = self.state.stroke.take();
        let start = center.x - 0.5 * size * glyphs.len() as f64;
        let half = DVec2::splat(0.5 * size * (1.0 - 2.0 * GLYPH_INSET));
        for (i, glyph) in glyphs.iter().enumerate() {
            if glyph.is_whitespace() {
                continue;
            }
            let cell_center = DVec2::new(start + size * (i as f64 + 0.5), center.y);
            self.paint_shape(cell_center - half, cell_center + half, true, |p| {
                rounded_box_distance(p, cell_center, half, 0.0)
            });
        }
        self.state.stroke = saved_stroke;
    }

    fn vertical_gradient(&mut self, top: Rgba, bottom: Rgba) {
        let last_row = (self.height - 1).max(1) as f64;
        self.fill_all(|y| top.lerp(bottom, y as f64 / last_row));
    }

    fn noise_texture(&mut self, max_alpha: u8, tint: Rgba, seed: u64) {
        let mut rng = SketchRng::new(seed);
        let levels = u64::from(max_alpha) + 1;
        for index in 0..self.pixels.len() {
            let alpha = (rng.next_u64() % levels) as u8;
            self.blend_pixel(index, tint.with_alpha(alpha), BlendMode::Normal);
        }
    }

    fn save_pixels(&mut self) {
        self.saved = Some(self.pixels.clone());
    }

    fn restore_pixels(&mut self) {
        if let Some(saved) = &self.saved {
            self.pixels.clone_from(saved);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::rgb(255, 0, 0);

    fn white(size: usize) -> Raster {
        let mut r = Raster::new(size, size).unwrap();
        r.background(Rgba::WHITE);
        r
    }

    fn count(r: &Raster, color: Rgba) -> usize {
        r.pixels.iter().filter(|&&p| p == color).count()
    }

    // ---- Construction ----

    #[test]
    fn zero_dimensions_rejected() {
        assert!(matches!(
            Raster::new(0, 4),
            Err(SketchError::InvalidDimensions)
        ));
        assert!(matches!(
            Raster::new(usize::MAX, 2),
            Err(SketchError::InvalidDimensions)
        ));
    }

    #[test]
    fn rgba8_has_four_bytes_per_pixel() {
        let r = white(8);
        let bytes = r.to_rgba8();
        assert_eq!(bytes.len(), 8 * 8 * 4);
        assert!(bytes.iter().all(|&b| b == 255));
    }

    // ---- Shapes ----

    #[test]
    fn rect_covers_its_area() {
        let mut r = white(16);
        r.stroke(None);
        r.fill(Some(RED));
        r.rect(DVec2::new(2.0, 2.0), DVec2::new(4.0, 3.0));
        assert_eq!(count(&r, RED), 12);
        assert_eq!(r.pixel(2, 2), Some(RED));
        assert_eq!(r.pixel(6, 2), Some(Rgba::WHITE));
    }

    #[test]
    fn transforms_compose() {
        let mut r = white(16);
        r.stroke(None);
        r.fill(Some(RED));
        r.push();
        r.translate(DVec2::new(8.0, 8.0));
        r.scale(2.0);
        r.rect(DVec2::ZERO, DVec2::splat(2.0));
        r.pop();
        assert_eq!(count(&r, RED), 16);
        assert_eq!(r.pixel(8, 8), Some(RED));
        assert_eq!(r.pixel(7, 7), Some(Rgba::WHITE));

        // pop restored the identity transform
        r.fill(Some(Rgba::BLACK));
        r.rect(DVec2::ZERO, DVec2::ONE);
        assert_eq!(r.pixel(0, 0), Some(Rgba::BLACK));
    }

    #[test]
    fn rotation_maps_shapes_around_origin() {
        let mut r = white(16);
        r.stroke(None);
        r.fill(Some(RED));
        r.translate(DVec2::new(8.0, 8.0));
        r.rotate(std::f64::consts::FRAC_PI_2);
        // a bar along +x becomes a bar along +y
        r.rect(DVec2::new(0.0, -1.0), DVec2::new(6.0, 2.0));
        assert_eq!(r.pixel(7, 11), Some(RED));
        assert_eq!(r.pixel(11, 8), Some(Rgba::WHITE));
    }

    #[test]
    fn ellipse_is_round() {
        let mut r = white(32);
        r.stroke(None);
        r.fill(Some(RED));
        r.ellipse(DVec2::splat(16.0), DVec2::splat(20.0));
        let area = count(&r, RED) as f64;
        let expected = std::f64::consts::PI * 100.0;
        assert!((area - expected).abs() < 0.1 * expected, "{area}");
        assert_eq!(r.pixel(16, 16), Some(RED));
        assert_eq!(r.pixel(1, 1), Some(Rgba::WHITE));
    }

    #[test]
    fn line_uses_stroke_only() {
        let mut r = white(16);
        r.fill(Some(Rgba::BLACK));
        r.stroke(Some(RED));
        r.stroke_weight(2.0);
        r.line(DVec2::new(2.0, 8.0), DVec2::new(14.0, 8.0));
        assert_eq!(r.pixel(8, 7), Some(RED));
        assert_eq!(r.pixel(8, 8), Some(RED));
        assert_eq!(r.pixel(8, 11), Some(Rgba::WHITE));
        assert_eq!(count(&r, Rgba::BLACK), 0);
    }

    #[test]
    fn no_fill_no_stroke_draws_nothing() {
        let mut r = white(8);
        r.fill(None);
        r.stroke(None);
        r.rect(DVec2::ZERO, DVec2::splat(8.0));
        assert_eq!(count(&r, Rgba::WHITE), 64);
    }

    #[test]
    fn text_fills_one_cell_per_glyph() {
        let mut r = white(40);
        r.stroke(Some(RED));
        r.fill(Some(Rgba::BLACK));
        r.text("人 間", DVec2::new(20.0, 20.0), 10.0);
        assert!(count(&r, Rgba::BLACK) > 0);
        assert_eq!(count(&r, RED), 0);
        // the space leaves the middle cell empty
        assert_eq!(r.pixel(20, 20), Some(Rgba::WHITE));
        assert_eq!(r.pixel(10, 20), Some(Rgba::BLACK));
    }

    // ---- Blending ----

    #[test]
    fn blend_modes_match_formulas() {
        let dst = Rgba::rgb(200, 100, 0);
        let src = Rgba::rgb(100, 100, 255);
        assert_eq!(blend(dst, src, BlendMode::Normal), src);
        assert_eq!(blend(dst, src, BlendMode::Multiply), Rgba::rgb(78, 39, 0));
        assert_eq!(blend(dst, src, BlendMode::Difference), Rgba::rgb(100, 0, 255));
        assert_eq!(blend(dst, src, BlendMode::Burn), Rgba::rgb(115, 0, 0));
    }

    #[test]
    fn half_alpha_mixes() {
        let out = blend(Rgba::WHITE, Rgba::rgba(0, 0, 0, 128), BlendMode::Normal);
        assert_eq!(out, Rgba::rgb(127, 127, 127));
    }

    #[test]
    fn difference_of_white_on_white_is_black() {
        let mut r = white(4);
        r.blend_mode(BlendMode::Difference);
        r.stroke(None);
        r.fill(Some(Rgba::WHITE));
        r.rect(DVec2::ZERO, DVec2::splat(4.0));
        assert_eq!(count(&r, Rgba::BLACK), 16);
    }

    // ---- Full-surface operations ----

    #[test]
    fn gradient_runs_top_to_bottom() {
        let mut r = Raster::new(2, 3).unwrap();
        r.vertical_gradient(Rgba::BLACK, Rgba::WHITE);
        assert_eq!(r.pixel(0, 0), Some(Rgba::BLACK));
        assert_eq!(r.pixel(1, 2), Some(Rgba::WHITE));
    }

    #[test]
    fn restore_brings_back_saved_pixels() {
        let mut r = white(4);
        r.restore_pixels();
        assert_eq!(count(&r, Rgba::WHITE), 16);

        r.save_pixels();
        r.background(RED);
        r.restore_pixels();
        assert_eq!(count(&r, Rgba::WHITE), 16);
    }

    #[test]
    fn noise_is_seeded_and_bounded() {
        let mut a = white(8);
        let mut b = white(8);
        a.noise_texture(16, Rgba::BLACK, 5);
        b.noise_texture(16, Rgba::BLACK, 5);
        assert_eq!(a.to_rgba8(), b.to_rgba8());
        assert!(a.pixels.iter().all(|p| p.r >= 255 - 16));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        const MODES: [BlendMode; 4] = [
            BlendMode::Normal,
            BlendMode::Multiply,
            BlendMode::Burn,
            BlendMode::Difference,
        ];

        proptest! {
            #[test]
            fn transparent_source_leaves_destination(
                d in any::<[u8; 4]>(),
                s in any::<[u8; 3]>(),
                mode in 0usize..4,
            ) {
                let dst = Rgba::rgba(d[0], d[1], d[2], d[3]);
                let src = Rgba::rgba(s[0], s[1], s[2], 0);
                prop_assert_eq!(blend(dst, src, MODES[mode]), dst);
            }

            #[test]
            fn opaque_difference_with_itself_is_black(c in any::<[u8; 3]>()) {
                let color = Rgba::rgb(c[0], c[1], c[2]);
                prop_assert_eq!(blend(color, color, BlendMode::Difference), Rgba::BLACK);
            }
        }
    }
}
