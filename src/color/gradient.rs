//! RGB colors and piecewise-linear color gradients.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Linear RGB color with channels in [0, 1].
///
/// Deserializes from `0xRRGGBB` integers, `"#rrggbb"` strings or `[r, g, b]`
/// float triples. Serializes as a float triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "[f32; 3]")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    /// Packs the color into `0xRRGGBB`, rounding each channel.
    pub fn to_hex(self) -> u32 {
        let [r, g, b] = self.to_rgb8();
        (r as u32) << 16 | (g as u32) << 8 | b as u32
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [quantize(self.r), quantize(self.g), quantize(self.b)]
    }

    /// Per-channel linear interpolation; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        Color::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<Color> for [f32; 3] {
    fn from(color: Color) -> Self {
        color.to_array()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(u32),
    Text(String),
    Rgb([f32; 3]),
}

impl TryFrom<ColorRepr> for Color {
    type Error = String;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Hex(hex) if hex <= 0xff_ffff => Ok(Color::from_hex(hex)),
            ColorRepr::Hex(hex) => Err(format!("color 0x{:x} exceeds 0xffffff", hex)),
            ColorRepr::Text(text) => {
                let digits = text
                    .strip_prefix('#')
                    .or_else(|| text.strip_prefix("0x"))
                    .unwrap_or(&text);
                if digits.len() != 6 {
                    return Err(format!("expected 6 hex digits in color '{}'", text));
                }
                u32::from_str_radix(digits, 16)
                    .map(Color::from_hex)
                    .map_err(|e| format!("invalid color '{}': {}", text, e))
            }
            ColorRepr::Rgb([r, g, b]) => {
                if [r, g, b].iter().all(|c| c.is_finite() && (0.0..=1.0).contains(c)) {
                    Ok(Color::new(r, g, b))
                } else {
                    Err(format!("color channels must lie in [0, 1]: [{}, {}, {}]", r, g, b))
                }
            }
        }
    }
}

/// A `(threshold, color)` control point. Serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f32, Color)", into = "(f32, Color)")]
pub struct GradientStop {
    pub threshold: f32,
    pub color: Color,
}

impl GradientStop {
    pub fn new(threshold: f32, color: Color) -> Self {
        Self { threshold, color }
    }
}

impl From<(f32, Color)> for GradientStop {
    fn from((threshold, color): (f32, Color)) -> Self {
        Self { threshold, color }
    }
}

impl From<GradientStop> for (f32, Color) {
    fn from(stop: GradientStop) -> Self {
        (stop.threshold, stop.color)
    }
}

/// Maps scalar values to colors through sorted gradient stops.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGradient {
    stops: Vec<GradientStop>,
}

impl ColorGradient {
    /// Builds a gradient, sorting the stops ascending by threshold.
    ///
    /// `label` names the gradient in the error when `stops` is empty.
    pub fn new(label: &'static str, stops: &[GradientStop]) -> Result<Self, ConfigError> {
        if stops.is_empty() {
            return Err(ConfigError::EmptyGradient(label));
        }
        if stops.iter().any(|s| !s.threshold.is_finite()) {
            return Err(ConfigError::NonFinite(label));
        }
        let mut stops = stops.to_vec();
        stops.sort_by(|a, b| a.threshold.total_cmp(&b.threshold));
        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Returns the interpolated color at `value`, clamping outside the stops.
    pub fn get(&self, value: f32) -> Color {
        let last = self.stops.len() - 1;
        let high = self
            .stops
            .iter()
            .position(|s| s.threshold > value)
            .unwrap_or(last);
        let low = high.saturating_sub(1);

        if low == high || value >= self.stops[last].threshold {
            return self.stops[high].color;
        }

        let lo = self.stops[low];
        let hi = self.stops[high];
        let t = (value - lo.threshold) / (hi.threshold - lo.threshold);
        lo.color.lerp(hi.color, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black_white() -> ColorGradient {
        ColorGradient::new(
            "test",
            &[GradientStop::new(1.0, Color::WHITE), GradientStop::new(0.0, Color::BLACK)],
        )
        .unwrap()
    }

    fn close(a: Color, b: Color) -> bool {
        (a.r - b.r).abs() < 1e-6 && (a.g - b.g).abs() < 1e-6 && (a.b - b.b).abs() < 1e-6
    }

    #[test]
    fn test_stops_sorted_on_construction() {
        let gradient = black_white();
        assert_eq!(gradient.stops()[0].threshold, 0.0);
        assert_eq!(gradient.stops()[1].threshold, 1.0);
    }

    #[test]
    fn test_midpoint_is_gray() {
        let mid = black_white().get(0.5);
        assert!(close(mid, Color::new(0.5, 0.5, 0.5)), "got {:?}", mid);
    }

    #[test]
    fn test_clamps_outside_range() {
        let gradient = black_white();
        assert_eq!(gradient.get(-1e-3), Color::BLACK);
        assert_eq!(gradient.get(-50.0), Color::BLACK);
        assert_eq!(gradient.get(1.0 + 1e-3), Color::WHITE);
        assert_eq!(gradient.get(1.0), Color::WHITE);
    }

    #[test]
    fn test_repeatable() {
        let gradient = black_white();
        for i in 0..=20 {
            let v = i as f32 / 20.0;
            assert_eq!(gradient.get(v), gradient.get(v));
        }
    }

    #[test]
    fn test_three_stop_interpolation() {
        let red = Color::new(1.0, 0.0, 0.0);
        let blue = Color::new(0.0, 0.0, 1.0);
        let gradient = ColorGradient::new(
            "test",
            &[
                GradientStop::new(-1.0, Color::BLACK),
                GradientStop::new(0.0, red),
                GradientStop::new(2.0, blue),
            ],
        )
        .unwrap();
        assert!(close(gradient.get(-0.5), Color::new(0.5, 0.0, 0.0)));
        assert!(close(gradient.get(1.0), Color::new(0.5, 0.0, 0.5)));
        assert_eq!(gradient.get(0.0), red);
    }

    #[test]
    fn test_single_stop() {
        let gradient = ColorGradient::new("test", &[GradientStop::new(0.3, Color::WHITE)]).unwrap();
        assert_eq!(gradient.get(-5.0), Color::WHITE);
        assert_eq!(gradient.get(5.0), Color::WHITE);
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(
            ColorGradient::new("colors", &[]),
            Err(ConfigError::EmptyGradient("colors"))
        );
    }

    #[test]
    fn test_hex_roundtrip() {
        let color = Color::from_hex(0x3366cc);
        assert_eq!(color.to_hex(), 0x3366cc);
        assert_eq!(Color::from_hex(0xffffff), Color::WHITE);
    }

    #[test]
    fn test_deserialize_forms() {
        let stops: Vec<GradientStop> =
            serde_json::from_str(r##"[[-1, 0], [0.5, "#ffffff"], [1, [0.0, 0.5, 1.0]]]"##).unwrap();
        assert_eq!(stops[0].color, Color::BLACK);
        assert_eq!(stops[1].color, Color::WHITE);
        assert_eq!(stops[2].color, Color::new(0.0, 0.5, 1.0));
        assert!(serde_json::from_str::<Color>(r##""#12345""##).is_err());
        assert!(serde_json::from_str::<Color>("[2.0, 0.0, 0.0]").is_err());
    }
}
