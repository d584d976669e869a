//! Per-class histograms stacked on a shared axis

use arrow::record_batch::RecordBatch;
use dv_data::table::{column as get_column, numeric_values};
use dv_data::group_values;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::utils::{
    categorical_color, histogram_bin_edges, histogram_counts, short_axis_label, Bins,
};
use crate::Result;

/// Fewest bins a class histogram is drawn with
const MIN_BINS: usize = 10;

/// Shared bin edges and per-class counts, ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct ClassHistograms {
    pub edges: Vec<f64>,
    /// Class label and its count per bin, classes in sorted order
    pub groups: Vec<(String, Vec<usize>)>,
    /// Vertical distance between the baselines of consecutive classes
    pub offset: f64,
}

/// Bin `column` once over all rows and count each `target` class separately.
///
/// Edges giving fewer than ten bins are recomputed with ten equal-width bins.
pub fn class_histograms(
    data: &RecordBatch,
    column: &str,
    target: &str,
    bins: &Bins,
) -> Result<ClassHistograms> {
    let values: Vec<f64> = numeric_values(get_column(data, column)?.as_ref())?
        .into_iter()
        .flatten()
        .collect();

    let mut edges = histogram_bin_edges(&values, bins)?;
    if edges.len() < MIN_BINS + 1 {
        edges = histogram_bin_edges(&values, &Bins::Count(MIN_BINS))?;
    }

    let groups: Vec<(String, Vec<usize>)> = group_values(data, target, column)?
        .into_iter()
        .map(|(label, group)| {
            let counts = histogram_counts(&group, &edges);
            (label, counts)
        })
        .collect();

    let max_count = groups
        .iter()
        .flat_map(|(_, counts)| counts.iter().copied())
        .max()
        .unwrap_or(0);

    Ok(ClassHistograms {
        edges,
        groups,
        offset: max_count as f64 * 1.1,
    })
}

/// Draw one histogram of `column` per class of `target`, each on its own
/// baseline.
pub fn class_hists<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &RecordBatch,
    column: &str,
    target: &str,
    bins: &Bins,
    legend: bool,
) -> Result<()> {
    let hists = class_histograms(data, column, target, bins)?;
    let (first, last) = match (hists.edges.first(), hists.edges.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Ok(()),
    };
    let bar_width = (hists.edges[1] - hists.edges[0]) * 0.9;
    let offset = if hists.offset > 0.0 { hists.offset } else { 1.0 };
    let top = offset * hists.groups.len().max(1) as f64;

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(10)
        .build_cartesian_2d(first..last, 0.0f64..top)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .y_label_formatter(&|_| String::new())
        .x_desc(short_axis_label(column))
        .draw()?;

    for (i, (label, counts)) in hists.groups.iter().enumerate() {
        let color = categorical_color(i);
        let bottom = offset * i as f64;

        let bars = hists.edges.iter().zip(counts).map(|(left, count)| {
            Rectangle::new(
                [(*left, bottom), (*left + bar_width, bottom + *count as f64)],
                color.filled(),
            )
        });
        let series = chart.draw_series(bars)?;
        if legend {
            series
                .label(label.as_str())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
        }

        chart.draw_series(std::iter::once(PathElement::new(
            vec![(first, bottom), (last, bottom)],
            BLACK.stroke_width(1),
        )))?;
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
