//! Isolation Forest - unsupervised outlier scoring
//!
//! An ensemble of random axis-aligned partition trees. Points that are
//! isolated after few splits are anomalous: the anomaly score is
//! `s(x) = 2^(-E[h(x)] / c(ψ))` where `E[h(x)]` is the mean path length over
//! the ensemble and `c(ψ)` the expected path length of an unsuccessful BST
//! search over the sub-sample size ψ.
//!
//! ## Build
//! - ψ = min(max_samples, n) rows drawn without replacement per tree
//! - Height limit ceil(log2 ψ)
//! - Split feature uniform among the features with non-zero range in the
//!   node, split value uniform between that feature's min and max
//!
//! ## Prediction
//! A row is an outlier (-1) when its score is strictly above the
//! (1 - contamination) quantile of the scores of the fitted batch; otherwise
//! it is an inlier (1).
//!
//! All randomness comes from a `StdRng` seeded from [`DetectorConfig::seed`],
//! so a fit is fully reproducible.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::defaults::EULER_GAMMA;
use crate::config::DetectorConfig;

/// Prediction label for an outlier.
pub const OUTLIER: i8 = -1;
/// Prediction label for an inlier.
pub const INLIER: i8 = 1;

/// Average path length of an unsuccessful BST search over `n` points.
///
/// `c(n) = 2H(n-1) - 2(n-1)/n` with `H(i) ≈ ln(i) + γ`; `c(2) = 1`,
/// `c(n <= 1) = 0`.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Linear-interpolation quantile of an unsorted slice (`q` in [0, 1]).
///
/// NaN entries sort last. Returns NaN for an empty slice.
pub fn linear_quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        value: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn path_length(&self, row: &[f64], depth: usize) -> f64 {
        match self {
            Node::Leaf { size } => depth as f64 + average_path_length(*size),
            Node::Split {
                feature,
                value,
                left,
                right,
            } => {
                let x = row.get(*feature).copied().unwrap_or(0.0);
                if x < *value {
                    left.path_length(row, depth + 1)
                } else {
                    right.path_length(row, depth + 1)
                }
            }
        }
    }
}

/// Fitted isolation forest.
#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<Node>,
    sample_size: usize,
    threshold: f64,
}

impl IsolationForest {
    /// Grow the ensemble on `data` (row-major, equal-width rows) and
    /// calibrate the outlier threshold on the same batch.
    pub fn fit(data: &[Vec<f64>], config: &DetectorConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let sample_size = config.max_samples.min(data.len());
        let height_limit = (sample_size.max(1) as f64).log2().ceil() as usize;

        let trees = if sample_size == 0 {
            Vec::new()
        } else {
            (0..config.n_trees)
                .map(|_| {
                    let rows = index::sample(&mut rng, data.len(), sample_size).into_vec();
                    build_tree(data, rows, 0, height_limit, &mut rng)
                })
                .collect()
        };

        let mut forest = Self {
            trees,
            sample_size,
            threshold: f64::INFINITY,
        };

        let scores = forest.score_samples(data);
        forest.threshold = linear_quantile(&scores, 1.0 - config.contamination);

        debug!(
            rows = data.len(),
            trees = forest.trees.len(),
            sample_size,
            height_limit,
            threshold = forest.threshold,
            "Isolation forest fitted"
        );

        forest
    }

    /// Anomaly score in (0, 1]. Higher is more anomalous; ~0.5 is ordinary.
    pub fn score(&self, row: &[f64]) -> f64 {
        let c = average_path_length(self.sample_size);
        if self.trees.is_empty() || c <= 0.0 {
            return 0.5;
        }
        let mean_path = self
            .trees
            .iter()
            .map(|tree| tree.path_length(row, 0))
            .sum::<f64>()
            / self.trees.len() as f64;
        2f64.powf(-mean_path / c)
    }

    pub fn score_samples(&self, data: &[Vec<f64>]) -> Vec<f64> {
        data.iter().map(|row| self.score(row)).collect()
    }

    /// Label each row [`OUTLIER`] or [`INLIER`].
    pub fn predict(&self, data: &[Vec<f64>]) -> Vec<i8> {
        data.iter()
            .map(|row| {
                if self.score(row) > self.threshold {
                    OUTLIER
                } else {
                    INLIER
                }
            })
            .collect()
    }

    /// Score above which a row is an outlier.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }
}

fn build_tree(
    data: &[Vec<f64>],
    rows: Vec<usize>,
    depth: usize,
    height_limit: usize,
    rng: &mut StdRng,
) -> Node {
    if depth >= height_limit || rows.len() <= 1 {
        return Node::Leaf { size: rows.len() };
    }

    // (feature, min, max) for every feature that still varies in this node
    let width = data[rows[0]].len();
    let splittable: Vec<(usize, f64, f64)> = (0..width)
        .filter_map(|f| {
            let (lo, hi) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| {
                let x = data[r][f];
                (lo.min(x), hi.max(x))
            });
            (hi > lo).then_some((f, lo, hi))
        })
        .collect();

    if splittable.is_empty() {
        return Node::Leaf { size: rows.len() };
    }

    let (feature, lo, hi) = splittable[rng.gen_range(0..splittable.len())];
    let value = rng.gen_range(lo..hi);

    let (left, right): (Vec<usize>, Vec<usize>) =
        rows.into_iter().partition(|&r| data[r][feature] < value);

    Node::Split {
        feature,
        value,
        left: Box::new(build_tree(data, left, depth + 1, height_limit, rng)),
        right: Box::new(build_tree(data, right, depth + 1, height_limit, rng)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u64) -> DetectorConfig {
        DetectorConfig {
            seed,
            ..DetectorConfig::default()
        }
    }

    fn cluster_with_outlier() -> Vec<Vec<f64>> {
        let mut data: Vec<Vec<f64>> = (0..30)
            .map(|i| {
                let t = i as f64 * 0.1;
                vec![t.sin() * 0.1, t.cos() * 0.1, (t * 2.0).sin() * 0.1]
            })
            .collect();
        data.push(vec![5.0, 5.0, 5.0]);
        data
    }

    #[test]
    fn test_average_path_length() {
        assert_eq!(average_path_length(0), 0.0);
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        // c(256) ≈ 10.24
        let c = average_path_length(256);
        assert!((c - 10.244).abs() < 0.01, "got {}", c);
    }

    #[test]
    fn test_linear_quantile() {
        let v = [4.0, 1.0, 3.0, 2.0, 5.0];
        assert_eq!(linear_quantile(&v, 0.0), 1.0);
        assert_eq!(linear_quantile(&v, 0.5), 3.0);
        assert_eq!(linear_quantile(&v, 1.0), 5.0);
        assert!((linear_quantile(&v, 0.9) - 4.6).abs() < 1e-12);
        assert!(linear_quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn test_isolated_point_scores_highest() {
        let data = cluster_with_outlier();
        let forest = IsolationForest::fit(&data, &config(42));
        let scores = forest.score_samples(&data);
        let outlier = scores[30];
        assert!(scores[..30].iter().all(|&s| s < outlier));
        assert!(outlier > 0.6, "outlier score should be high, got {}", outlier);
        assert_eq!(forest.predict(&data)[30], OUTLIER);
    }

    #[test]
    fn test_outlier_fraction_bounded_by_contamination() {
        let data = cluster_with_outlier();
        let forest = IsolationForest::fit(&data, &config(42));
        let outliers = forest.predict(&data).iter().filter(|&&l| l == OUTLIER).count();
        // Strictly above the 90th percentile: at most 10% of 31 rows
        assert!((1..=3).contains(&outliers), "got {} outliers", outliers);
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let data = cluster_with_outlier();
        let a = IsolationForest::fit(&data, &config(7));
        let b = IsolationForest::fit(&data, &config(7));
        assert_eq!(a.score_samples(&data), b.score_samples(&data));
        assert_eq!(a.predict(&data), b.predict(&data));
    }

    #[test]
    fn test_identical_rows_have_no_outliers() {
        let data = vec![vec![1.0, 2.0, 3.0]; 20];
        let forest = IsolationForest::fit(&data, &config(42));
        assert!(forest.predict(&data).iter().all(|&l| l == INLIER));
    }

    #[test]
    fn test_sample_size_capped_by_batch() {
        let data = cluster_with_outlier();
        let forest = IsolationForest::fit(&data, &config(1));
        assert_eq!(forest.sample_size(), 31);
        assert_eq!(forest.n_trees(), 100);
    }

    #[test]
    fn test_empty_batch() {
        let forest = IsolationForest::fit(&[], &config(1));
        assert_eq!(forest.n_trees(), 0);
        assert!(forest.predict(&[]).is_empty());
        assert_eq!(forest.score(&[0.0]), 0.5);
    }
}
