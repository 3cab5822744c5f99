//! Entropy of a porosity distribution
//!
//! Two estimators, selected by [`EntropyMethod`]:
//! - Histogram: Shannon entropy in bits over Sturges bins. Always >= 0.
//! - KDE: resubstitution estimate of differential entropy (nats) from a
//!   Gaussian kernel density with Scott's bandwidth.

use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

use crate::config::{EntropyMethod, MetricsConfig};

/// Entropy of `values` using the configured estimator.
///
/// Non-finite readings are ignored. Returns NaN when fewer than
/// `config.entropy_min_samples` finite readings remain.
pub fn entropy(values: &[f64], config: &MetricsConfig) -> f64 {
    match config.entropy_method {
        EntropyMethod::Histogram => shannon_entropy(values, config.entropy_min_samples),
        EntropyMethod::Kde => kde_entropy(values, config.entropy_min_samples),
    }
}

/// Number of histogram bins by Sturges' rule: `ceil(log2 n) + 1`.
pub fn sturges_bins(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    (n as f64).log2().ceil() as usize + 1
}

/// Shannon entropy (bits) of the histogram of `values`.
///
/// ## Expected Values
/// - Constant series: 0.0 (every reading in one bin)
/// - Readings spread evenly over k bins: log2(k)
///
/// ## Returns
/// NaN if fewer than `min_samples` finite readings.
pub fn shannon_entropy(values: &[f64], min_samples: usize) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || finite.len() < min_samples {
        return f64::NAN;
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range <= 0.0 {
        return 0.0;
    }

    let bins = sturges_bins(finite.len());
    let mut counts = vec![0usize; bins];
    for v in &finite {
        // Right edge belongs to the last bin
        let idx = (((v - min) / range) * bins as f64) as usize;
        counts[idx.min(bins - 1)] += 1;
    }

    let n = finite.len() as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.log2()
        })
        .sum()
}

/// Differential entropy (nats) of a Gaussian KDE fitted to `values`.
///
/// `H = -1/n Σ ln f̂(xᵢ)` where `f̂` is the kernel density with bandwidth
/// `h = σ·n^(-1/5)` (Scott) and σ the sample standard deviation.
///
/// ## Returns
/// NaN if fewer than `min_samples` finite readings or σ = 0.
pub fn kde_entropy(values: &[f64], min_samples: usize) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() < min_samples.max(2) {
        return f64::NAN;
    }

    let sigma = finite.iter().std_dev();
    if !sigma.is_finite() || sigma <= 0.0 {
        return f64::NAN;
    }

    let n = finite.len() as f64;
    let bandwidth = sigma * n.powf(-0.2);
    let Ok(kernel) = Normal::new(0.0, 1.0) else {
        return f64::NAN;
    };

    let log_density_sum: f64 = finite
        .iter()
        .map(|&xi| {
            let density = finite
                .iter()
                .map(|&xj| kernel.pdf((xi - xj) / bandwidth))
                .sum::<f64>()
                / (n * bandwidth);
            density.ln()
        })
        .sum();

    -log_density_sum / n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sturges_bins() {
        assert_eq!(sturges_bins(1), 1);
        assert_eq!(sturges_bins(5), 4);
        assert_eq!(sturges_bins(8), 4);
        assert_eq!(sturges_bins(100), 8);
    }

    #[test]
    fn test_entropy_below_min_samples_is_nan() {
        assert!(shannon_entropy(&[1.0, 2.0, 3.0], 5).is_nan());
        assert!(shannon_entropy(&[], 0).is_nan());
        assert!(kde_entropy(&[1.0, 2.0, 3.0], 5).is_nan());
    }

    #[test]
    fn test_constant_series_has_zero_entropy() {
        let h = shannon_entropy(&[20.0; 8], 5);
        assert_eq!(h, 0.0);
    }

    #[test]
    fn test_uniform_spread_entropy() {
        // 8 readings -> 4 bins, two readings per bin -> log2(4) = 2 bits
        let values = [0.0, 1.0, 2.5, 3.5, 4.5, 5.5, 7.0, 8.0];
        let h = shannon_entropy(&values, 5);
        assert!((h - 2.0).abs() < 1e-12, "Expected 2 bits, got {}", h);
    }

    #[test]
    fn test_entropy_non_negative() {
        let values = [10.0, 10.5, 30.0, 11.0, 10.2, 9.9];
        assert!(shannon_entropy(&values, 5) >= 0.0);
    }

    #[test]
    fn test_non_finite_readings_ignored() {
        let values = [1.0, 2.0, f64::NAN, 3.0, 4.0, f64::INFINITY, 5.0];
        let h = shannon_entropy(&values, 5);
        assert!(h.is_finite() && h > 0.0);
    }

    #[test]
    fn test_kde_constant_series_is_nan() {
        assert!(kde_entropy(&[15.0; 10], 5).is_nan());
    }

    #[test]
    fn test_kde_wider_spread_has_higher_entropy() {
        let narrow: Vec<f64> = (0..50).map(|i| 20.0 + (i as f64 * 0.37).sin()).collect();
        let wide: Vec<f64> = narrow.iter().map(|v| 20.0 + (v - 20.0) * 10.0).collect();
        let h_narrow = kde_entropy(&narrow, 5);
        let h_wide = kde_entropy(&wide, 5);
        // Scaling by 10 adds ln(10) nats
        assert!((h_wide - h_narrow - 10f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_dispatch_follows_config() {
        let values = [0.0, 1.0, 2.5, 3.5, 5.0, 6.0, 7.5, 8.0];
        let mut config = MetricsConfig::default();
        assert_eq!(entropy(&values, &config), shannon_entropy(&values, 5));
        config.entropy_method = EntropyMethod::Kde;
        assert_eq!(entropy(&values, &config), kde_entropy(&values, 5));
    }
}
