//! Horizontal mosaic plot of two categorical columns

use arrow::record_batch::RecordBatch;
use dv_data::crosstab;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::utils::{categorical_color, lighten_color, shortname};
use crate::Result;

/// One rectangle of the mosaic, in data coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicTile {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: RGBColor,
}

/// Tiles plus the label and vertical center of each tile row
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicLayout {
    pub tiles: Vec<MosaicTile>,
    pub labels: Vec<(String, f64)>,
    pub total: f64,
}

/// Indices sorting `values` ascending; equal values keep their order
fn argsort(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|a, b| values[*a].total_cmp(&values[*b]));
    order
}

/// Lay out the mosaic of `rows` subpartitioned by `cols`.
///
/// Each category of `rows` becomes a horizontal band as tall as its count.
/// Bands are ordered by the share the first `cols` category holds in them
/// and split left to right by the proportions of the `cols` categories.
pub fn mosaic_layout(
    data: &RecordBatch,
    rows: &str,
    cols: &str,
    vary_lightness: bool,
) -> Result<MosaicLayout> {
    let table = crosstab(data, cols, rows)?;
    let order = argsort(&table.first_row_shares());
    let n_bands = order.len();

    let mut tiles = Vec::with_capacity(n_bands * table.index.len());
    let mut labels = Vec::with_capacity(n_bands);
    let mut pos_y = 0.0;
    for (i, &band) in order.iter().enumerate() {
        let height = table.column_total(band) as f64;
        labels.push((table.columns[band].clone(), pos_y + height / 2.0));

        let mut pos_x = 0.0;
        for (j, count) in table.column_counts(band).into_iter().enumerate() {
            let width = count as f64 / height;
            let mut color = categorical_color(j);
            if vary_lightness {
                color = lighten_color(color, (i + 1) as f64 / (n_bands + 1) as f64);
            }
            tiles.push(MosaicTile {
                x: pos_x,
                y: pos_y,
                width,
                height,
                color,
            });
            pos_x += width;
        }
        pos_y += height;
    }

    Ok(MosaicLayout {
        tiles,
        labels,
        total: pos_y,
    })
}

/// Draw a mosaic plot of `rows` against `cols`.
///
/// Tile-row labels sit at the vertical center of their band.
pub fn mosaic_plot<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &RecordBatch,
    rows: &str,
    cols: &str,
    vary_lightness: bool,
) -> Result<()> {
    let layout = mosaic_layout(data, rows, cols, vary_lightness)?;
    let total = if layout.total > 0.0 { layout.total } else { 1.0 };

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(80)
        .build_cartesian_2d(0.0f64..1.0, 0.0f64..total)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .y_label_formatter(&|_| String::new())
        .x_desc(cols)
        .draw()?;

    for tile in &layout.tiles {
        let corners = [(tile.x, tile.y), (tile.x + tile.width, tile.y + tile.height)];
        chart.draw_series(std::iter::once(Rectangle::new(corners, tile.color.filled())))?;
        chart.draw_series(std::iter::once(Rectangle::new(corners, BLACK.stroke_width(1))))?;
    }

    let (base_x, base_y) = area.get_base_pixel();
    let style = ("sans-serif", 12)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));
    for (label, center) in &layout.labels {
        let (x, y) = chart.backend_coord(&(0.0, *center));
        area.draw(&Text::new(
            shortname(label, 10),
            (x - base_x - 5, y - base_y),
            style.clone(),
        ))?;
    }

    Ok(())
}
