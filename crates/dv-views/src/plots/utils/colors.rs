//! Color utilities for plots

use palette::{Hsl, IntoColor, Srgb};
use plotters::style::{RGBColor, BLACK, WHITE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    #[default]
    Viridis,
    Plasma,
    Diverging,
}

impl ColorScheme {
    /// Color for a position `t` in `[0, 1]`
    pub fn color(&self, t: f64) -> RGBColor {
        match self {
            ColorScheme::Viridis => viridis_color(t),
            ColorScheme::Plasma => plasma_color(t),
            ColorScheme::Diverging => diverging_color(t),
        }
    }
}

/// Get a categorical color from the ten-color qualitative palette
pub fn categorical_color(index: usize) -> RGBColor {
    const PALETTE: &[RGBColor] = &[
        RGBColor(31, 119, 180),  // Blue
        RGBColor(255, 127, 14),  // Orange
        RGBColor(44, 160, 44),   // Green
        RGBColor(214, 39, 40),   // Red
        RGBColor(148, 103, 189), // Purple
        RGBColor(140, 86, 75),   // Brown
        RGBColor(227, 119, 194), // Pink
        RGBColor(127, 127, 127), // Gray
        RGBColor(188, 189, 34),  // Olive
        RGBColor(23, 190, 207),  // Cyan
    ];
    PALETTE[index % PALETTE.len()]
}

fn lerp(a: f64, b: f64, s: f64) -> u8 {
    (a * (1.0 - s) + b * s).round().clamp(0.0, 255.0) as u8
}

/// Viridis color map
pub fn viridis_color(t: f64) -> RGBColor {
    const STOPS: [(f64, f64, f64); 5] = [
        (68.0, 1.0, 84.0),
        (53.0, 91.0, 125.0),
        (42.0, 117.0, 142.0),
        (86.0, 163.0, 92.0),
        (253.0, 231.0, 36.0),
    ];
    let t = t.clamp(0.0, 1.0) * 4.0;
    let segment = (t.floor() as usize).min(3);
    let s = t - segment as f64;
    let (a, b) = (STOPS[segment], STOPS[segment + 1]);
    RGBColor(lerp(a.0, b.0, s), lerp(a.1, b.1, s), lerp(a.2, b.2, s))
}

/// Plasma color map
pub fn plasma_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);

    if t < 0.5 {
        let s = t * 2.0;
        RGBColor(lerp(13.0, 253.0, s), lerp(8.0, 65.0, s), lerp(135.0, 148.0, s))
    } else {
        let s = (t - 0.5) * 2.0;
        RGBColor(253, lerp(65.0, 251.0, s), lerp(148.0, 36.0, s))
    }
}

/// Diverging color map (blue-white-red)
pub fn diverging_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);

    if t < 0.5 {
        let s = t * 2.0;
        RGBColor(lerp(50.0, 255.0, s), lerp(50.0, 255.0, s), lerp(200.0, 255.0, s))
    } else {
        let s = (t - 0.5) * 2.0;
        RGBColor(255, lerp(255.0, 50.0, s), lerp(255.0, 50.0, s))
    }
}

/// Lighten a color by scaling its distance to white in HLS space.
///
/// `amount` is shifted by 0.5, so 0.5 leaves the color unchanged and smaller
/// values move it towards white.
pub fn lighten_color(color: RGBColor, amount: f64) -> RGBColor {
    let amount = (amount + 0.5) as f32;
    let rgb = Srgb::new(
        color.0 as f32 / 255.0,
        color.1 as f32 / 255.0,
        color.2 as f32 / 255.0,
    );
    let mut hsl: Hsl = rgb.into_color();
    hsl.lightness = (1.0 - amount * (1.0 - hsl.lightness)).clamp(0.0, 1.0);
    let rgb: Srgb = hsl.into_color();

    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    RGBColor(channel(rgb.red), channel(rgb.green), channel(rgb.blue))
}

/// Black on light backgrounds, white on dark ones
pub fn text_color_for(background: RGBColor) -> RGBColor {
    let mean = (background.0 as f64 + background.1 as f64 + background.2 as f64) / (3.0 * 255.0);
    if mean > 0.5 {
        BLACK
    } else {
        WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: RGBColor, b: RGBColor) -> bool {
        (a.0 as i32 - b.0 as i32).abs() <= 1
            && (a.1 as i32 - b.1 as i32).abs() <= 1
            && (a.2 as i32 - b.2 as i32).abs() <= 1
    }

    #[test]
    fn test_lighten_half_is_identity() {
        let blue = categorical_color(0);
        assert!(close(lighten_color(blue, 0.5), blue));
    }

    #[test]
    fn test_lighten_moves_towards_white() {
        let red = categorical_color(3);
        let light = lighten_color(red, 0.0);
        assert!(light.0 >= red.0 && light.1 > red.1 && light.2 > red.2);
        assert!(close(lighten_color(red, -0.5), RGBColor(255, 255, 255)));
    }

    #[test]
    fn test_colormap_endpoints() {
        assert_eq!(viridis_color(0.0), RGBColor(68, 1, 84));
        assert_eq!(viridis_color(1.0), RGBColor(253, 231, 36));
        assert_eq!(diverging_color(0.5), RGBColor(255, 255, 255));
    }

    #[test]
    fn test_text_color_contrast() {
        assert_eq!(text_color_for(viridis_color(1.0)), BLACK);
        assert_eq!(text_color_for(viridis_color(0.0)), WHITE);
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(categorical_color(10), categorical_color(0));
    }
}
