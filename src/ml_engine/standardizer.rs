//! Batch feature standardization (z-score per dimension).
//!
//! Each dimension is rescaled to zero mean and unit population variance
//! over the batch. A dimension with zero variance standardizes to 0
//! everywhere, and non-finite raw values are left out of the statistics and
//! map to 0 so a missing entropy or fractal estimate lands on the batch mean.

use statrs::statistics::Statistics;

/// Standard deviations below this are treated as zero variance.
const ZERO_VARIANCE_STD: f64 = 1e-12;

/// Per-dimension mean and population standard deviation fitted on a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Standardizer {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl Standardizer {
    /// Fit on a row-major feature matrix. Every row must have the same width.
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let dims = rows.first().map_or(0, Vec::len);
        let mut means = Vec::with_capacity(dims);
        let mut stds = Vec::with_capacity(dims);

        for d in 0..dims {
            let column: Vec<f64> = rows
                .iter()
                .filter_map(|row| row.get(d).copied())
                .filter(|v| v.is_finite())
                .collect();

            if column.is_empty() {
                means.push(0.0);
                stds.push(0.0);
                continue;
            }
            means.push(column.iter().mean());
            stds.push(column.iter().population_std_dev());
        }

        Self { means, stds }
    }

    /// Number of fitted dimensions.
    pub fn dims(&self) -> usize {
        self.means.len()
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn stds(&self) -> &[f64] {
        &self.stds
    }

    /// Whether dimension `d` had zero variance in the fitted batch.
    pub fn is_degenerate(&self, d: usize) -> bool {
        self.stds
            .get(d)
            .map_or(true, |s| !s.is_finite() || *s < ZERO_VARIANCE_STD)
    }

    /// Standardize one row with the fitted statistics.
    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .enumerate()
            .map(|(d, &x)| {
                if d >= self.dims() || !x.is_finite() || self.is_degenerate(d) {
                    0.0
                } else {
                    (x - self.means[d]) / self.stds[d]
                }
            })
            .collect()
    }

    pub fn transform(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter().map(|row| self.transform_row(row)).collect()
    }

    /// Fit on `rows` and standardize them in one pass.
    pub fn fit_transform(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        Self::fit(rows).transform(rows)
    }
}
