//! Label shortening

use tracing::info;

/// Feature count above which only the top features are shown
const MAX_SHOWN_FEATURES: usize = 20;

/// Shorten a string to at most `maxlen` characters, marking cuts with "..."
pub fn shortname(some_string: &str, maxlen: usize) -> String {
    if some_string.chars().count() > maxlen {
        let kept: String = some_string.chars().take(maxlen.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        some_string.to_string()
    }
}

/// Tick labels cut to ten characters
pub fn short_tick_names<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    labels.iter().map(|l| shortname(l.as_ref(), 10)).collect()
}

/// Axis labels cut to twenty characters
pub fn short_axis_label(label: &str) -> String {
    shortname(label, 20)
}

/// How many of `n_features` features of the given kind to show
pub fn get_n_top(n_features: usize, name: &str) -> usize {
    if n_features > MAX_SHOWN_FEATURES {
        info!("Showing only top 10 of {} {} features", n_features, name);
        10
    } else {
        n_features
    }
}
