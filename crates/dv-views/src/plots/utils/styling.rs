//! Scatter styling that adapts to the number of samples

use serde::{Deserialize, Serialize};

/// Point transparency, either picked from the sample count or fixed
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScatterAlpha {
    #[default]
    Auto,
    Fixed(f64),
}

/// Point size (marker area), either picked from the sample count or fixed
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScatterSize {
    #[default]
    Auto,
    Fixed(f64),
}

/// Fewer samples get more opaque points
pub fn scatter_alpha(alpha: ScatterAlpha, n_samples: usize) -> f64 {
    match alpha {
        ScatterAlpha::Fixed(alpha) => alpha,
        ScatterAlpha::Auto => match n_samples {
            0..=99 => 0.9,
            100..=999 => 0.5,
            1000..=9999 => 0.2,
            _ => 0.1,
        },
    }
}

/// Fewer samples get larger points
pub fn scatter_size(size: ScatterSize, n_samples: usize) -> f64 {
    match size {
        ScatterSize::Fixed(size) => size,
        ScatterSize::Auto => match n_samples {
            0..=999 => 30.0,
            1000..=1999 => 10.0,
            2000..=9999 => 2.0,
            _ => 1.0,
        },
    }
}

/// Marker radius in pixels for a marker area
pub(crate) fn marker_radius(size: f64) -> i32 {
    (size.max(0.0).sqrt() / 2.0).round().max(1.0) as i32
}
