//! Plot implementations

// Layout
pub mod grid;

// Model inspection
pub mod coefficients;
pub mod ranking;

// Categorical and grouped plots
pub mod heatmap;
pub mod histogram;
pub mod mosaic;
pub mod scatter;

// Utilities
pub mod utils;

// Re-exports
pub use coefficients::{plot_coefficients, top_coefficients};
pub use grid::{find_pretty_grid, make_subplots, GridShape};
pub use heatmap::{heatmap, HeatmapConfig};
pub use histogram::{class_histograms, class_hists, ClassHistograms};
pub use mosaic::{mosaic_layout, mosaic_plot, MosaicLayout, MosaicTile};
pub use ranking::{find_scatter_plots_classification, ScatterPairScore};
pub use scatter::{discrete_scatter, DiscreteScatterOptions, ShowLegend};
pub use utils::{Bins, ColorScheme, ScatterAlpha, ScatterSize};
