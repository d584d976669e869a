//! Shared plot configuration

use serde::{Deserialize, Serialize};

use crate::plots::GridShape;
use crate::Result;

/// Layout and sizing defaults for plot grids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Maximum number of subplot columns
    pub max_cols: usize,

    /// Width of one subplot column, in figure units
    pub col_width: u32,

    /// Height of one subplot row, in figure units
    pub row_height: u32,

    /// Pixels per figure unit when rendering
    pub pixels_per_unit: u32,

    /// Background color as RGB
    pub background: [u8; 3],
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            max_cols: 5,
            col_width: 4,
            row_height: 3,
            pixels_per_unit: 100,
            background: [255, 255, 255],
        }
    }
}

impl PlotConfig {
    /// Parse a configuration from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Figure size in units for a grid of subplots
    pub fn figure_size(&self, shape: GridShape) -> (u32, u32) {
        (
            self.col_width * shape.cols as u32,
            self.row_height * shape.rows as u32,
        )
    }

    /// Pixel size of the figure holding `n_plots` subplots
    pub fn pixel_size(&self, n_plots: usize) -> Result<(u32, u32)> {
        let shape = crate::plots::find_pretty_grid(n_plots, self.max_cols)?;
        let (width, height) = self.figure_size(shape);
        Ok((width * self.pixels_per_unit, height * self.pixels_per_unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PlotConfig::from_json(r#"{ "max_cols": 3 }"#).unwrap();
        assert_eq!(config.max_cols, 3);
        assert_eq!(config.row_height, 3);
        assert_eq!(config.background, [255, 255, 255]);
    }

    #[test]
    fn test_pixel_size_follows_grid() {
        let config = PlotConfig::default();
        // 11 plots on at most 5 columns is a 3x4 grid
        assert_eq!(config.pixel_size(11).unwrap(), (1600, 900));
        assert!(config.pixel_size(0).is_err());
    }
}
