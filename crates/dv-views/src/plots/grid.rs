//! Subplot grid layout

use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::prelude::DrawingBackend;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{PlotError, Result};

/// Rows and columns of a subplot grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }
}

/// Find a grid for `n_plots` subplots with at most `max_cols` columns.
///
/// Fills as many cells as possible while keeping the number of rows low.
/// Among column counts leaving the same number of empty cells, the widest
/// grid wins.
///
/// ```
/// use dv_views::plots::{find_pretty_grid, GridShape};
///
/// assert_eq!(find_pretty_grid(16, 5).unwrap(), GridShape { rows: 4, cols: 4 });
/// assert_eq!(find_pretty_grid(11, 5).unwrap(), GridShape { rows: 3, cols: 4 });
/// assert_eq!(find_pretty_grid(10, 5).unwrap(), GridShape { rows: 2, cols: 5 });
/// ```
pub fn find_pretty_grid(n_plots: usize, max_cols: usize) -> Result<GridShape> {
    if n_plots == 0 {
        return Err(PlotError::invalid("n_plots", "need at least one plot"));
    }
    if max_cols == 0 {
        return Err(PlotError::invalid("max_cols", "need at least one column"));
    }

    if n_plots % max_cols == 0 {
        return Ok(GridShape {
            rows: n_plots / max_cols,
            cols: max_cols,
        });
    }

    let min_rows = n_plots.div_ceil(max_cols);
    let mut best_empty = max_cols;
    let mut best_cols = max_cols;
    // never narrower than the minimum row count
    for cols in (min_rows..=max_cols).rev() {
        let remainder = n_plots % cols;
        let empty = if remainder != 0 { cols - remainder } else { 0 };
        if empty == 0 {
            return Ok(GridShape {
                rows: n_plots / cols,
                cols,
            });
        }
        if empty < best_empty {
            best_empty = empty;
            best_cols = cols;
        }
    }

    Ok(GridShape {
        rows: n_plots.div_ceil(best_cols),
        cols: best_cols,
    })
}

/// Split `area` into a pretty grid for `n_plots` subplots, row by row.
///
/// The returned vector holds every cell of the grid, so it can be longer
/// than `n_plots`.
pub fn make_subplots<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    n_plots: usize,
    max_cols: usize,
) -> Result<Vec<DrawingArea<DB, Shift>>> {
    let shape = find_pretty_grid(n_plots, max_cols)?;
    debug!(n_plots, rows = shape.rows, cols = shape.cols, "subplot grid");
    Ok(area.split_evenly((shape.rows, shape.cols)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_cells(n: usize, cols: usize) -> usize {
        n.div_ceil(cols) * cols - n
    }

    #[test]
    fn test_documented_examples() {
        assert_eq!(find_pretty_grid(16, 5).unwrap(), GridShape { rows: 4, cols: 4 });
        assert_eq!(find_pretty_grid(11, 5).unwrap(), GridShape { rows: 3, cols: 4 });
        assert_eq!(find_pretty_grid(10, 5).unwrap(), GridShape { rows: 2, cols: 5 });
    }

    #[test]
    fn test_exact_multiple_uses_all_columns() {
        for max_cols in 1..8 {
            for rows in 1..6 {
                let shape = find_pretty_grid(rows * max_cols, max_cols).unwrap();
                assert_eq!(shape, GridShape { rows, cols: max_cols });
            }
        }
    }

    #[test]
    fn test_grid_is_feasible_and_tight() {
        for n in 1..80 {
            for max_cols in 1..9 {
                let shape = find_pretty_grid(n, max_cols).unwrap();
                assert!(shape.cells() >= n, "{} plots in {:?}", n, shape);
                assert!(shape.cols <= max_cols);
                assert_eq!(shape.rows, n.div_ceil(shape.cols));

                let min_rows = n.div_ceil(max_cols);
                if min_rows > max_cols {
                    assert_eq!(shape.cols, max_cols);
                    continue;
                }
                let best = (min_rows..=max_cols).map(|c| empty_cells(n, c)).min().unwrap();
                assert_eq!(empty_cells(n, shape.cols), best, "{} plots, {} cols", n, max_cols);
                let widest = (min_rows..=max_cols)
                    .rev()
                    .find(|c| empty_cells(n, *c) == best)
                    .unwrap();
                assert_eq!(shape.cols, widest);
            }
        }
    }

    #[test]
    fn test_degenerate_input_is_rejected() {
        assert!(matches!(
            find_pretty_grid(0, 5),
            Err(PlotError::InvalidArgument { argument: "n_plots", .. })
        ));
        assert!(matches!(
            find_pretty_grid(3, 0),
            Err(PlotError::InvalidArgument { argument: "max_cols", .. })
        ));
    }
}
