//! Plot export functionality

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::PlotConfig;
use crate::Result;

/// Export options for plots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Width of the exported image
    pub width: u32,
    /// Height of the exported image
    pub height: u32,
    /// Background color as RGB
    pub background: [u8; 3],
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            background: [255, 255, 255],
        }
    }
}

impl ExportOptions {
    /// Options sized for a grid of `n_plots` subplots
    pub fn for_subplots(config: &PlotConfig, n_plots: usize) -> Result<Self> {
        let (width, height) = config.pixel_size(n_plots)?;
        Ok(Self {
            width,
            height,
            background: config.background,
        })
    }

    fn background_color(&self) -> RGBColor {
        let [r, g, b] = self.background;
        RGBColor(r, g, b)
    }
}

/// Render a drawing closure into an SVG document
pub fn render_svg<F>(options: &ExportOptions, draw: F) -> Result<String>
where
    F: FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> Result<()>,
{
    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (options.width, options.height)).into_drawing_area();
        root.fill(&options.background_color())?;
        draw(&root)?;
        root.present()?;
    }
    Ok(svg)
}

/// Render a drawing closure into an SVG file
pub fn save_svg<P, F>(path: P, options: &ExportOptions, draw: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> Result<()>,
{
    let path = path.as_ref();
    {
        let root = SVGBackend::new(path, (options.width, options.height)).into_drawing_area();
        root.fill(&options.background_color())?;
        draw(&root)?;
        root.present()?;
    }
    info!("Exported plot to: {:?}", path);
    Ok(())
}

/// Render a drawing closure into a PNG file
pub fn save_png<P, F>(path: P, options: &ExportOptions, draw: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()>,
{
    let path = path.as_ref();
    {
        let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
        root.fill(&options.background_color())?;
        draw(&root)?;
        root.present()?;
    }
    info!("Exported plot to: {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_svg_sets_size() {
        let options = ExportOptions {
            width: 320,
            height: 240,
            ..Default::default()
        };
        let svg = render_svg(&options, |_| Ok(())).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("width=\"320\""));
        assert!(svg.contains("height=\"240\""));
    }

    #[test]
    fn test_draw_errors_propagate() {
        let err = render_svg(&ExportOptions::default(), |_| {
            Err(crate::PlotError::Drawing("boom".to_string()))
        })
        .unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_options_for_subplots() {
        let options = ExportOptions::for_subplots(&PlotConfig::default(), 10).unwrap();
        // 2 rows of 5 columns
        assert_eq!((options.width, options.height), (2000, 600));
    }
}
