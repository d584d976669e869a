//! Plot helpers for exploratory data analysis
//!
//! Every plot draws into a caller supplied plotters [`DrawingArea`]; see
//! [`export`] for rendering straight to SVG or PNG.
//!
//! [`DrawingArea`]: plotters::drawing::DrawingArea

pub mod config;
pub mod export;
pub mod plots;

pub use config::PlotConfig;
pub use export::{render_svg, save_png, save_svg, ExportOptions};
pub use plots::{
    class_hists, discrete_scatter, find_pretty_grid, find_scatter_plots_classification, heatmap,
    make_subplots, mosaic_plot, plot_coefficients, Bins, DiscreteScatterOptions, GridShape,
    ScatterPairScore, ShowLegend,
};

use dv_data::DataError;
use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

/// Errors raised while preparing or drawing a plot
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Invalid {argument}: {reason}")]
    InvalidArgument { argument: &'static str, reason: String },

    #[error("Drawing error: {0}")]
    Drawing(String),

    #[error("Model error: {0}")]
    Model(String),
}

impl PlotError {
    pub(crate) fn invalid(argument: &'static str, reason: impl Into<String>) -> Self {
        PlotError::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(error: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Drawing(error.to_string())
    }
}

pub type Result<T, E = PlotError> = std::result::Result<T, E>;
