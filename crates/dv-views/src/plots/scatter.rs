//! Scatter plot grouped by a discrete variable

use std::collections::BTreeMap;
use std::ops::Range;

use dv_data::inlier_range;
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::utils::styling::marker_radius;
use super::utils::{categorical_color, scatter_alpha, scatter_size, ScatterAlpha, ScatterSize};
use crate::{PlotError, Result};

/// When a scatter plot gets a legend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowLegend {
    Always,
    Never,
    /// Only on the first subplot of a grid
    IfFirst { subplot: usize },
}

impl ShowLegend {
    pub fn is_shown(&self) -> bool {
        match self {
            ShowLegend::Always => true,
            ShowLegend::Never => false,
            ShowLegend::IfFirst { subplot } => *subplot == 0,
        }
    }
}

impl Default for ShowLegend {
    fn default() -> Self {
        ShowLegend::IfFirst { subplot: 0 }
    }
}

/// Configuration for discrete scatter plots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscreteScatterOptions {
    pub legend: ShowLegend,

    /// Restrict the axes to the inlier range of the data
    pub clip_outliers: bool,

    pub alpha: ScatterAlpha,

    pub size: ScatterSize,
}

impl Default for DiscreteScatterOptions {
    fn default() -> Self {
        Self {
            legend: ShowLegend::default(),
            clip_outliers: true,
            alpha: ScatterAlpha::Auto,
            size: ScatterSize::Auto,
        }
    }
}

/// Finite data range padded by 5% on both sides
fn padded_range(values: &[f64]) -> Range<f64> {
    let (low, high) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    if low > high {
        return 0.0..1.0;
    }
    let pad = if high > low { (high - low) * 0.05 } else { 0.5 };
    (low - pad)..(high + pad)
}

/// Axis range for `values`, narrowed to their inlier range when clipping
pub(crate) fn axis_range(values: &[f64], clip_outliers: bool) -> Range<f64> {
    let range = padded_range(values);
    if !clip_outliers {
        return range;
    }
    let values: Vec<Option<f64>> = values.iter().map(|v| v.is_finite().then_some(*v)).collect();
    match inlier_range(&values) {
        Ok(inliers) => {
            let low = range.start.max(inliers.low);
            let high = range.end.min(inliers.high);
            if low < high {
                low..high
            } else {
                range
            }
        }
        Err(e) => {
            debug!("Not clipping axis: {}", e);
            range
        }
    }
}

/// Points of each group, groups in sorted order
fn group_points<S: AsRef<str>>(x: &[f64], y: &[f64], c: &[S]) -> BTreeMap<String, Vec<(f64, f64)>> {
    let mut groups: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();
    for ((x, y), label) in x.iter().zip(y).zip(c) {
        groups.entry(label.as_ref().to_string()).or_default().push((*x, *y));
    }
    groups
}

/// Scatter `x` against `y` with one color per distinct value of `c`.
///
/// Non-finite coordinates are skipped. With `clip_outliers` each axis is
/// limited to the inlier range of its values, so extreme points fall
/// outside the plot.
pub fn discrete_scatter<DB: DrawingBackend, S: AsRef<str>>(
    area: &DrawingArea<DB, Shift>,
    x: &[f64],
    y: &[f64],
    c: &[S],
    options: &DiscreteScatterOptions,
) -> Result<()> {
    if x.len() != y.len() || x.len() != c.len() {
        return Err(PlotError::invalid(
            "c",
            format!("x, y and c differ in length: {}, {}, {}", x.len(), y.len(), c.len()),
        ));
    }

    let x_range = axis_range(x, options.clip_outliers);
    let y_range = axis_range(y, options.clip_outliers);
    let alpha = scatter_alpha(options.alpha, x.len());
    let radius = marker_radius(scatter_size(options.size, x.len()));

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_range.clone(), y_range.clone())?;

    chart.configure_mesh().disable_mesh().draw()?;

    let legend = options.legend.is_shown();
    for (i, (label, points)) in group_points(x, y, c).into_iter().enumerate() {
        let color = categorical_color(i);
        let visible = points
            .into_iter()
            .filter(|(px, py)| x_range.contains(px) && y_range.contains(py));
        let series = chart.draw_series(
            visible.map(|p| Circle::new(p, radius, color.mix(alpha).filled())),
        )?;
        if legend {
            series
                .label(label)
                .legend(move |(lx, ly)| Circle::new((lx + 5, ly), 5, color.filled()));
        }
    }

    if legend {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    Ok(())
}
