//! Coefficient bar plot for linear models

use ndarray::ArrayViewD;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::warn;

use crate::{PlotError, Result};

/// Nonzero coefficients with the largest magnitudes, ordered from most
/// negative to most positive
pub fn top_coefficients<S: AsRef<str>>(
    coefficients: ArrayViewD<'_, f64>,
    feature_names: &[S],
    n_top_features: usize,
) -> Result<Vec<(String, f64)>> {
    let non_unit: Vec<usize> = coefficients.shape().iter().copied().filter(|d| *d != 1).collect();
    if non_unit.len() > 1 {
        return Err(PlotError::invalid(
            "coefficients",
            format!("must be 1d array or column vector, got shape {:?}", coefficients.shape()),
        ));
    }
    let values: Vec<f64> = coefficients.iter().copied().collect();

    if values.len() != feature_names.len() {
        return Err(PlotError::invalid(
            "feature_names",
            format!(
                "number of coefficients {} doesn't match number of feature names {}",
                values.len(),
                feature_names.len()
            ),
        ));
    }

    let mut selected: Vec<(String, f64)> = feature_names
        .iter()
        .zip(values)
        .filter(|(_, coef)| *coef != 0.0)
        .map(|(name, coef)| (name.as_ref().to_string(), coef))
        .collect();

    selected.sort_by(|a, b| a.1.abs().total_cmp(&b.1.abs()));
    let keep_from = selected.len().saturating_sub(n_top_features);
    let mut selected = selected.split_off(keep_from);
    selected.sort_by(|a, b| a.1.total_cmp(&b.1));
    Ok(selected)
}

/// Bar plot of the `n_top_features` largest-magnitude coefficients.
///
/// `coefficients` may carry extra unit axes (row or column vectors); any
/// other shape is rejected, as is a name list of different length.
/// Negative coefficients are drawn red, positive ones blue.
pub fn plot_coefficients<DB: DrawingBackend, S: AsRef<str>>(
    area: &DrawingArea<DB, Shift>,
    coefficients: ArrayViewD<'_, f64>,
    feature_names: &[S],
    n_top_features: usize,
    classname: Option<&str>,
) -> Result<()> {
    let top = top_coefficients(coefficients, feature_names, n_top_features)?;
    if top.is_empty() {
        warn!("No nonzero coefficients to plot");
        return Ok(());
    }

    let n = top.len() as u32;
    let low = top.iter().map(|(_, c)| *c).fold(0.0f64, f64::min);
    let high = top.iter().map(|(_, c)| *c).fold(0.0f64, f64::max);
    let pad = ((high - low) * 0.05).max(1e-9);

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(10)
        .x_label_area_size(80)
        .y_label_area_size(60);
    if let Some(title) = classname {
        builder.caption(title, ("sans-serif", 20));
    }
    let mut chart =
        builder.build_cartesian_2d((0u32..n - 1).into_segmented(), (low - pad)..(high + pad))?;

    let labels: Vec<&str> = top.iter().map(|(name, _)| name.as_str()).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(top.len() + 1)
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => {
                labels.get(*i as usize).map(|l| l.to_string()).unwrap_or_default()
            }
            _ => String::new(),
        })
        .x_label_style(("sans-serif", 12).into_font().transform(FontTransform::Rotate90))
        .y_desc("Coefficient magnitude")
        .x_desc("Feature")
        .draw()?;

    chart.draw_series(top.iter().enumerate().map(|(i, (_, coef))| {
        let i = i as u32;
        let color = if *coef < 0.0 { RED } else { BLUE };
        let right = if i + 1 == n {
            SegmentValue::Last
        } else {
            SegmentValue::Exact(i + 1)
        };
        Rectangle::new([(SegmentValue::Exact(i), 0.0), (right, *coef)], color.filled())
    }))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2, Array3};

    #[test]
    fn test_top_coefficients_order() {
        let coef = arr1(&[0.5, -3.0, 0.0, 2.0, -0.1, 1.0]);
        let names = ["a", "b", "c", "d", "e", "f"];
        let top = top_coefficients(coef.view().into_dyn(), &names, 4).unwrap();
        let names: Vec<&str> = top.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "f", "d"]);
        assert_eq!(top[0].1, -3.0);
        assert_eq!(top[3].1, 2.0);
    }

    #[test]
    fn test_zero_coefficients_are_dropped() {
        let coef = arr1(&[0.0, 0.0, 4.0]);
        let top = top_coefficients(coef.view().into_dyn(), &["x", "y", "z"], 10).unwrap();
        assert_eq!(top, vec![("z".to_string(), 4.0)]);
    }

    #[test]
    fn test_column_vector_is_squeezed() {
        let coef = arr2(&[[1.0], [-2.0], [3.0]]);
        let top = top_coefficients(coef.view().into_dyn(), &["x", "y", "z"], 2).unwrap();
        assert_eq!(top, vec![("y".to_string(), -2.0), ("z".to_string(), 3.0)]);
    }

    #[test]
    fn test_rejects_bad_input() {
        let matrix = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        let err = top_coefficients(matrix.view().into_dyn(), &["a", "b", "c", "d"], 3).unwrap_err();
        assert!(matches!(err, PlotError::InvalidArgument { argument: "coefficients", .. }));

        let cube = Array3::<f64>::zeros((2, 1, 2));
        assert!(top_coefficients(cube.view().into_dyn(), &["a", "b", "c", "d"], 3).is_err());

        let coef = arr1(&[1.0, 2.0]);
        let err = top_coefficients(coef.view().into_dyn(), &["a"], 3).unwrap_err();
        assert!(matches!(err, PlotError::InvalidArgument { argument: "feature_names", .. }));
    }
}
