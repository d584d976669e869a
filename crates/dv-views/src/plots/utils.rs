//! Utilities for plot views

pub mod colors;
pub mod names;
pub mod stats;
pub mod styling;

// Re-export commonly used items
pub use colors::{categorical_color, lighten_color, text_color_for, ColorScheme};
pub use names::{get_n_top, short_axis_label, short_tick_names, shortname};
pub use stats::{histogram_bin_edges, histogram_counts, Bins};
pub use styling::{scatter_alpha, scatter_size, ScatterAlpha, ScatterSize};
