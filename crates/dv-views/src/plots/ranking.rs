//! Ranking feature pairs by how well they separate classes

use itertools::Itertools;
use linfa::prelude::*;
use linfa::Dataset;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{PlotError, Result};

const N_SPLITS: usize = 5;
const MAX_DEPTH: usize = 3;
const N_TOP_PAIRS: usize = 3;

/// Cross-validated score of a decision tree on two features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPairScore {
    pub feature0: usize,
    pub feature1: usize,
    pub score: f64,
}

/// Encode labels as indices into their sorted unique values
fn encode_labels<S: AsRef<str>>(target: &[S]) -> Vec<usize> {
    let classes: Vec<&str> = target.iter().map(|t| t.as_ref()).sorted().dedup().collect();
    target
        .iter()
        .map(|t| classes.binary_search(&t.as_ref()).unwrap_or_default())
        .collect()
}

/// Assign every sample to one of `n_splits` test folds, spreading each
/// class as evenly as possible over the folds.
fn stratified_folds(labels: &[usize], n_splits: usize) -> Vec<usize> {
    let n_classes = labels.iter().max().map_or(0, |m| m + 1);

    // classes renumbered by first appearance
    let mut first_seen = vec![usize::MAX; n_classes];
    let mut n_seen = 0;
    for &label in labels {
        if first_seen[label] == usize::MAX {
            first_seen[label] = n_seen;
            n_seen += 1;
        }
    }
    let encoded: Vec<usize> = labels.iter().map(|l| first_seen[*l]).collect();

    // deal the sorted labels round robin to get per-fold class counts
    let sorted: Vec<usize> = encoded.iter().copied().sorted().collect();
    let mut allocation = vec![vec![0usize; n_seen]; n_splits];
    for (i, class) in sorted.into_iter().enumerate() {
        allocation[i % n_splits][class] += 1;
    }

    let mut next_fold: Vec<std::vec::IntoIter<usize>> = (0..n_seen)
        .map(|class| {
            (0..n_splits)
                .flat_map(|fold| std::iter::repeat(fold).take(allocation[fold][class]))
                .collect::<Vec<_>>()
                .into_iter()
        })
        .collect();

    encoded
        .iter()
        .map(|class| next_fold[*class].next().unwrap_or_default())
        .collect()
}

/// Unweighted mean of per-class recall over all labels seen in either input
fn macro_recall(truth: &[usize], predicted: &[usize]) -> f64 {
    let labels: Vec<usize> = truth.iter().chain(predicted).copied().sorted().dedup().collect();
    if labels.is_empty() {
        return 0.0;
    }
    let total: f64 = labels
        .iter()
        .map(|label| {
            let support = truth.iter().filter(|t| *t == label).count();
            let hits = truth
                .iter()
                .zip(predicted)
                .filter(|(t, p)| *t == label && *p == label)
                .count();
            if support == 0 {
                0.0
            } else {
                hits as f64 / support as f64
            }
        })
        .sum();
    total / labels.len() as f64
}

/// Mean macro recall of a shallow decision tree over stratified folds
fn cross_val_recall(records: &Array2<f64>, labels: &[usize], folds: &[usize]) -> Result<f64> {
    let mut scores = Vec::with_capacity(N_SPLITS);
    for fold in 0..N_SPLITS {
        let (valid, train): (Vec<usize>, Vec<usize>) =
            (0..labels.len()).partition(|i| folds[*i] == fold);
        if valid.is_empty() || train.is_empty() {
            continue;
        }

        let train_set = Dataset::new(
            records.select(Axis(0), &train),
            Array1::from_iter(train.iter().map(|i| labels[*i])),
        );
        let model = DecisionTree::params()
            .max_depth(Some(MAX_DEPTH))
            .fit(&train_set)
            .map_err(|e: linfa::Error| PlotError::Model(e.to_string()))?;

        let predicted: Array1<usize> = model.predict(&records.select(Axis(0), &valid));
        let truth: Vec<usize> = valid.iter().map(|i| labels[*i]).collect();
        scores.push(macro_recall(&truth, &predicted.to_vec()));
    }

    if scores.is_empty() {
        return Err(PlotError::Model("no usable cross-validation fold".to_string()));
    }
    Ok(scores.iter().sum::<f64>() / scores.len() as f64)
}

/// Find the three feature pairs whose scatter plots best separate `target`.
///
/// Every pair of columns of `x` is scored by fitting a decision tree of
/// depth at most three and taking its five-fold stratified cross-validated
/// macro recall. Pairs are returned best first.
pub fn find_scatter_plots_classification<S: AsRef<str>>(
    x: ArrayView2<'_, f64>,
    target: &[S],
) -> Result<Vec<ScatterPairScore>> {
    let (n_samples, n_features) = x.dim();
    if target.len() != n_samples {
        return Err(PlotError::invalid(
            "target",
            format!("expected {} labels, got {}", n_samples, target.len()),
        ));
    }
    if n_samples < N_SPLITS {
        return Err(PlotError::invalid(
            "x",
            format!("need at least {} samples for cross-validation, got {}", N_SPLITS, n_samples),
        ));
    }

    let labels = encode_labels(target);
    let folds = stratified_folds(&labels, N_SPLITS);

    let mut scores = Vec::new();
    for (i, j) in (0..n_features).tuple_combinations() {
        let records = x.select(Axis(1), &[i, j]);
        let score = cross_val_recall(&records, &labels, &folds)?;
        debug!(feature0 = i, feature1 = j, score, "scored feature pair");
        scores.push(ScatterPairScore {
            feature0: i,
            feature1: j,
            score,
        });
    }

    scores.sort_by(|a, b| a.score.total_cmp(&b.score));
    let keep_from = scores.len().saturating_sub(N_TOP_PAIRS);
    let mut top = scores.split_off(keep_from);
    top.reverse();
    Ok(top)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_labels_sorted() {
        assert_eq!(encode_labels(&["dog", "cat", "emu", "cat"]), vec![1, 0, 2, 0]);
    }

    #[test]
    fn test_stratified_folds_balance_classes() {
        let labels: Vec<usize> = (0..20).map(|i| if i < 12 { 0 } else { 1 }).collect();
        let folds = stratified_folds(&labels, 5);
        for fold in 0..5 {
            let zeros = (0..20).filter(|i| folds[*i] == fold && labels[*i] == 0).count();
            let ones = (0..20).filter(|i| folds[*i] == fold && labels[*i] == 1).count();
            assert!((2..=3).contains(&zeros), "fold {} has {} zeros", fold, zeros);
            assert!((1..=2).contains(&ones), "fold {} has {} ones", fold, ones);
        }
    }

    #[test]
    fn test_macro_recall() {
        assert_eq!(macro_recall(&[0, 0, 1, 1], &[0, 0, 1, 1]), 1.0);
        assert_eq!(macro_recall(&[0, 0, 1, 1], &[0, 1, 1, 1]), 0.75);
        // a predicted label absent from the truth counts as zero recall
        assert!((macro_recall(&[0, 0], &[0, 2]) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_informative_pair_ranks_first() {
        let n = 60;
        let target: Vec<&str> = (0..n).map(|i| if i % 2 == 0 { "a" } else { "b" }).collect();
        let x = Array2::from_shape_fn((n, 4), |(i, j)| match j {
            // separates the classes on its own
            0 => (if i % 2 == 0 { -1.0 } else { 1.0 }) + i as f64 * 1e-3,
            1 => ((i * 7) % 11) as f64,
            2 => ((i * 5) % 13) as f64,
            _ => ((i * 3) % 17) as f64,
        });

        let top = find_scatter_plots_classification(x.view(), &target).unwrap();
        assert_eq!(top.len(), 3);
        assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(top[0].feature0, 0);
        assert!(top[0].score > 0.95);
    }

    #[test]
    fn test_rejects_bad_input() {
        let x = Array2::<f64>::zeros((4, 2));
        assert!(find_scatter_plots_classification(x.view(), &["a", "b", "a", "b"]).is_err());
        let x = Array2::<f64>::zeros((6, 2));
        assert!(find_scatter_plots_classification(x.view(), &["a", "b"]).is_err());
    }
}
