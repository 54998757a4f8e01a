//! Color types for sketches: 8-bit RGBA, CIE LCh construction, and
//! [`ShapeColor`], a stroke/fill pair applied to a surface in one call.

use crate::error::SketchError;
use crate::surface::Surface;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 8-bit sRGB color with straight (non-premultiplied) alpha.
///
/// Serializes as a hex string: `"#rrggbb"` when opaque, `"#rrggbbaa"` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Per-channel linear interpolation, `t` clamped to [0, 1].
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f64::from(a) + t * (f64::from(b) - f64::from(a))).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Parses `"#rrggbb"` or `"#rrggbbaa"` (leading `#` optional, case insensitive).
    pub fn from_hex(hex: &str) -> Result<Rgba, SketchError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 && hex.len() != 8 {
            return Err(SketchError::InvalidColor(format!(
                "expected 6 or 8 hex digits, got {}",
                hex.len()
            )));
        }
        let channel = |i: usize, name: &str| {
            hex.get(i..i + 2)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| SketchError::InvalidColor(format!("invalid {name} component")))
        };
        let a = if hex.len() == 8 {
            channel(6, "alpha")?
        } else {
            255
        };
        Ok(Rgba {
            r: channel(0, "red")?,
            g: channel(2, "green")?,
            b: channel(4, "blue")?,
            a,
        })
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Applies sRGB gamma to convert a single linear component to sRGB.
fn linear_component_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Inverse of the CIE Lab companding function.
fn lab_f_inverse(t: f64) -> f64 {
    const DELTA: f64 = 6.0 / 29.0;
    if t > DELTA {
        t * t * t
    } else {
        3.0 * DELTA * DELTA * (t - 4.0 / 29.0)
    }
}

/// Converts CIE LCh (D65 white, hue in radians) to an 8-bit sRGB color.
///
/// Out-of-gamut results are clamped per channel.
pub fn cielch(lightness: f64, chroma: f64, hue: f64, alpha: u8) -> Rgba {
    let a = chroma * hue.cos();
    let b = chroma * hue.sin();

    let fy = (lightness + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;
    let x = 0.95047 * lab_f_inverse(fx);
    let y = lab_f_inverse(fy);
    let z = 1.08883 * lab_f_inverse(fz);

    let r = 3.2404542 * x - 1.5371385 * y - 0.4985314 * z;
    let g = -0.9692660 * x + 1.8760108 * y + 0.0415560 * z;
    let bl = 0.0556434 * x - 0.2040259 * y + 1.0572252 * z;

    let to_u8 = |c: f64| (linear_component_to_srgb(c).clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba::rgba(to_u8(r), to_u8(g), to_u8(bl), alpha)
}

/// One half of a [`ShapeColor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorUnit {
    /// Leave the surface state untouched.
    #[default]
    Unset,
    /// Disable the stroke or fill.
    NoColor,
    /// Always this color.
    Solid(Rgba),
    /// This color with alpha scaled by a 0–255 value, quantised to
    /// `resolution` steps.
    Alpha { color: Rgba, resolution: u16 },
}

impl ColorUnit {
    /// Resolves to the color to set, `Some(None)` to disable, or `None` to skip.
    fn resolve(&self, alpha: Option<u8>) -> Option<Option<Rgba>> {
        match *self {
            ColorUnit::Unset => None,
            ColorUnit::NoColor => Some(None),
            ColorUnit::Solid(color) => Some(Some(color)),
            ColorUnit::Alpha { color, resolution } => {
                let max_index = u32::from(resolution.max(2)) - 1;
                let index = match alpha {
                    Some(v) => u32::from(v) * max_index / 255,
                    None => max_index,
                };
                let a = u32::from(color.a) * index / max_index;
                Some(Some(color.with_alpha(a as u8)))
            }
        }
    }
}

/// Stroke and fill colors applied together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub stroke: ColorUnit,
    pub fill: ColorUnit,
}

impl ShapeColor {
    pub fn new(stroke: ColorUnit, fill: ColorUnit) -> Self {
        Self { stroke, fill }
    }

    /// Fill only, no stroke.
    pub fn filled(color: Rgba) -> Self {
        Self::new(ColorUnit::NoColor, ColorUnit::Solid(color))
    }

    /// Wraps both halves in alpha-capable units with 256 steps.
    pub fn with_alpha_enabled(self) -> Self {
        let enable = |unit: ColorUnit| match unit {
            ColorUnit::Solid(color) => ColorUnit::Alpha {
                color,
                resolution: 256,
            },
            other => other,
        };
        Self::new(enable(self.stroke), enable(self.fill))
    }

    /// Sets stroke and fill on the surface. `alpha` of `None` means fully
    /// opaque for alpha-capable units; it is ignored by the others.
    pub fn apply(&self, surface: &mut dyn Surface, alpha: Option<u8>) {
        if let Some(stroke) = self.stroke.resolve(alpha) {
            surface.stroke(stroke);
        }
        if let Some(fill) = self.fill.resolve(alpha) {
            surface.fill(fill);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    // ---- Hex parsing ----

    #[test]
    fn from_hex_parses_rgb_and_rgba() {
        assert_eq!(Rgba::from_hex("#ff8000").unwrap(), Rgba::rgb(255, 128, 0));
        assert_eq!(
            Rgba::from_hex("FF800040").unwrap(),
            Rgba::rgba(255, 128, 0, 64)
        );
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(Rgba::from_hex("#fff").is_err());
        assert!(Rgba::from_hex("#gg0000").is_err());
        assert!(Rgba::from_hex("#ff00ééé").is_err());
    }

    #[test]
    fn hex_serde_round_trip() {
        for c in [Rgba::rgb(1, 2, 3), Rgba::rgba(250, 128, 0, 7)] {
            let json = serde_json::to_string(&c).unwrap();
            let restored: Rgba = serde_json::from_str(&json).unwrap();
            assert_eq!(c, restored);
        }
        assert_eq!(serde_json::to_string(&Rgba::WHITE).unwrap(), "\"#ffffff\"");
    }

    // ---- Interpolation ----

    #[test]
    fn lerp_hits_endpoints_and_midpoint() {
        let a = Rgba::BLACK;
        let b = Rgba::rgb(200, 100, 50);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgba::rgb(100, 50, 25));
        assert_eq!(a.lerp(b, 7.0), b);
    }

    // ---- CIE LCh ----

    #[test]
    fn cielch_extremes_are_black_and_white() {
        assert_eq!(cielch(0.0, 0.0, 0.0, 255), Rgba::BLACK);
        let white = cielch(100.0, 0.0, 0.0, 255);
        assert!(white.r >= 254 && white.g >= 254 && white.b >= 254, "{white:?}");
    }

    #[test]
    fn cielch_hue_zero_is_reddish() {
        let c = cielch(60.0, 80.0, 0.0, 128);
        assert!(c.r > c.g && c.r > c.b, "{c:?}");
        assert_eq!(c.a, 128);
    }

    // ---- ShapeColor ----

    #[test]
    fn unset_units_emit_nothing() {
        let mut surface = RecordingSurface::new();
        ShapeColor::default().apply(&mut surface, None);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn filled_disables_stroke_and_sets_fill() {
        let mut surface = RecordingSurface::new();
        ShapeColor::filled(Rgba::rgb(255, 0, 0)).apply(&mut surface, Some(10));
        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::Stroke(None),
                DrawCommand::Fill(Some(Rgba::rgb(255, 0, 0)))
            ]
        );
    }

    #[test]
    fn alpha_unit_scales_alpha() {
        let shape = ShapeColor::new(ColorUnit::Unset, ColorUnit::Solid(Rgba::gray(32)))
            .with_alpha_enabled();
        let mut surface = RecordingSurface::new();
        shape.apply(&mut surface, Some(0));
        shape.apply(&mut surface, Some(255));
        shape.apply(&mut surface, None);
        shape.apply(&mut surface, Some(128));
        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::Fill(Some(Rgba::gray(32).with_alpha(0))),
                DrawCommand::Fill(Some(Rgba::gray(32))),
                DrawCommand::Fill(Some(Rgba::gray(32))),
                DrawCommand::Fill(Some(Rgba::gray(32).with_alpha(128))),
            ]
        );
    }

    #[test]
    fn coarse_alpha_resolution_quantises() {
        let unit = ColorUnit::Alpha {
            color: Rgba::WHITE,
            resolution: 3,
        };
        let shape = ShapeColor::new(ColorUnit::Unset, unit);
        let mut surface = RecordingSurface::new();
        shape.apply(&mut surface, Some(100));
        assert_eq!(
            surface.commands(),
            &[DrawCommand::Fill(Some(Rgba::WHITE.with_alpha(0)))]
        );
    }
}
