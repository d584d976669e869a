//! Annotated heatmap

use ndarray::ArrayView2;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::{Deserialize, Serialize};

use super::utils::{text_color_for, ColorScheme};
use crate::{PlotError, Result};

/// Configuration for heatmap rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Color scheme for the cells
    pub color_scheme: ColorScheme,

    /// Value mapped to the low end of the scheme; data minimum if unset
    pub vmin: Option<f64>,

    /// Value mapped to the high end of the scheme; data maximum if unset
    pub vmax: Option<f64>,

    /// Decimal places of the cell annotations
    pub precision: usize,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            color_scheme: ColorScheme::Viridis,
            vmin: None,
            vmax: None,
            precision: 2,
        }
    }
}

fn segment_end(i: u32, n: u32) -> SegmentValue<u32> {
    if i + 1 == n {
        SegmentValue::Last
    } else {
        SegmentValue::Exact(i + 1)
    }
}

/// Draw `values` as colored cells, row 0 at the bottom, with each cell
/// annotated by its value.
pub fn heatmap<DB: DrawingBackend, S: AsRef<str>>(
    area: &DrawingArea<DB, Shift>,
    values: ArrayView2<'_, f64>,
    xlabel: &str,
    ylabel: &str,
    xticklabels: &[S],
    yticklabels: &[S],
    config: &HeatmapConfig,
) -> Result<()> {
    let (n_rows, n_cols) = values.dim();
    if n_rows == 0 || n_cols == 0 {
        return Err(PlotError::invalid("values", "heatmap needs at least one cell"));
    }
    if xticklabels.len() != n_cols {
        return Err(PlotError::invalid(
            "xticklabels",
            format!("expected {} labels, got {}", n_cols, xticklabels.len()),
        ));
    }
    if yticklabels.len() != n_rows {
        return Err(PlotError::invalid(
            "yticklabels",
            format!("expected {} labels, got {}", n_rows, yticklabels.len()),
        ));
    }

    let finite = values.iter().copied().filter(|v| v.is_finite());
    let vmin = config.vmin.unwrap_or_else(|| finite.clone().fold(f64::INFINITY, f64::min));
    let vmax = config.vmax.unwrap_or_else(|| finite.fold(f64::NEG_INFINITY, f64::max));
    let span = if vmax > vmin { vmax - vmin } else { 1.0 };

    let (n_rows, n_cols) = (n_rows as u32, n_cols as u32);
    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(
            (0u32..n_cols - 1).into_segmented(),
            (0u32..n_rows - 1).into_segmented(),
        )?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n_cols as usize + 1)
        .y_labels(n_rows as usize + 1)
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => xticklabels
                .get(*i as usize)
                .map(|l| l.as_ref().to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .y_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => yticklabels
                .get(*i as usize)
                .map(|l| l.as_ref().to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc(xlabel)
        .y_desc(ylabel)
        .draw()?;

    let mut cells = Vec::with_capacity((n_rows * n_cols) as usize);
    for ((row, col), value) in values.indexed_iter() {
        let fill = config.color_scheme.color((value - vmin) / span);
        cells.push((row as u32, col as u32, *value, fill));
    }

    chart.draw_series(cells.iter().map(|(row, col, _, fill)| {
        Rectangle::new(
            [
                (SegmentValue::Exact(*col), SegmentValue::Exact(*row)),
                (segment_end(*col, n_cols), segment_end(*row, n_rows)),
            ],
            fill.filled(),
        )
    }))?;

    let anchor = Pos::new(HPos::Center, VPos::Center);
    chart.draw_series(cells.iter().map(|(row, col, value, fill)| {
        let style = ("sans-serif", 12)
            .into_font()
            .color(&text_color_for(*fill))
            .pos(anchor);
        Text::new(
            format!("{:.*}", config.precision, value),
            (SegmentValue::CenterOf(*col), SegmentValue::CenterOf(*row)),
            style,
        )
    }))?;

    Ok(())
}
