//! Fractal dimension of a porosity depth series
//!
//! Higuchi's method is the default; box counting over the unit-normalised
//! series is available as an alternative. Both fit a log-log slope by least
//! squares and return NaN when fewer than two usable scales exist.

use std::collections::HashSet;

use crate::config::{FractalMethod, MetricsConfig};

/// Fractal dimension of `series` using the configured estimator.
///
/// NaN when the series is shorter than `config.fractal_min_samples`,
/// contains non-finite readings, or is constant.
pub fn fractal_dimension(series: &[f64], config: &MetricsConfig) -> f64 {
    if series.len() < config.fractal_min_samples || series.iter().any(|v| !v.is_finite()) {
        return f64::NAN;
    }
    match config.fractal_method {
        FractalMethod::Higuchi => higuchi_dimension(series, config.higuchi_k_max),
        FractalMethod::BoxCounting => box_counting_dimension(series),
    }
}

/// Higuchi fractal dimension.
///
/// For each interval `k` in `1..=min(k_max, n/2)` the normalised curve length
/// `L(k)` is averaged over the `k` offsets; the dimension is `|slope|` of
/// `ln L(k)` against `ln(1/k)`.
///
/// ## Expected Values
/// - Straight line: 1.0
/// - Alternating sequence: 2.0
pub fn higuchi_dimension(series: &[f64], k_max: usize) -> f64 {
    let n = series.len();
    let k_max = k_max.min(n / 2);
    if k_max < 2 {
        return f64::NAN;
    }

    let mut points = Vec::with_capacity(k_max);
    for k in 1..=k_max {
        let mut total = 0.0;
        let mut offsets = 0usize;
        for m in 0..k {
            let steps = (n - 1 - m) / k;
            if steps == 0 {
                continue;
            }
            let length: f64 = (1..=steps)
                .map(|i| (series[m + i * k] - series[m + (i - 1) * k]).abs())
                .sum();
            let norm = (n - 1) as f64 / (steps * k) as f64;
            total += length * norm / k as f64;
            offsets += 1;
        }
        if offsets == 0 {
            continue;
        }
        let curve_length = total / offsets as f64;
        // Zero-length curves (flat at this scale) carry no slope information
        if curve_length > 0.0 {
            points.push(((1.0 / k as f64).ln(), curve_length.ln()));
        }
    }

    least_squares_slope(&points).map_or(f64::NAN, f64::abs)
}

/// Box-counting dimension of the series plotted in the unit square.
///
/// Box sizes are `1/2^j` for `j = 1..=floor(log2(n-1))`; the dimension is the
/// slope of `ln N(ε)` against `ln(1/ε)`.
pub fn box_counting_dimension(series: &[f64]) -> f64 {
    let n = series.len();
    if n < 3 {
        return f64::NAN;
    }

    let min = series.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if !range.is_finite() || range <= 0.0 {
        return f64::NAN;
    }

    let max_level = ((n - 1) as f64).log2().floor() as u32;
    let span = (n - 1) as f64;
    let mut points = Vec::with_capacity(max_level as usize);

    for level in 1..=max_level {
        let cells = 1usize << level;
        let cell_index = |unit: f64| ((unit * cells as f64) as usize).min(cells - 1);

        let occupied: HashSet<(usize, usize)> = series
            .iter()
            .enumerate()
            .map(|(i, v)| (cell_index(i as f64 / span), cell_index((v - min) / range)))
            .collect();

        points.push(((cells as f64).ln(), (occupied.len() as f64).ln()));
    }

    least_squares_slope(&points).unwrap_or(f64::NAN)
}

/// Ordinary least-squares slope of `(x, y)` points.
///
/// `None` with fewer than two points or when every `x` is equal.
pub fn least_squares_slope(points: &[(f64, f64)]) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx) = (0.0, 0.0);
    for &(x, y) in points {
        sxy += (x - mean_x) * (y - mean_y);
        sxx += (x - mean_x).powi(2);
    }

    if sxx <= f64::EPSILON {
        None
    } else {
        Some(sxy / sxx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn test_higuchi_straight_line_is_one() {
        let d = higuchi_dimension(&line(64), 10);
        assert!((d - 1.0).abs() < 1e-9, "Expected 1.0, got {}", d);
    }

    #[test]
    fn test_higuchi_alternating_is_two() {
        let series: Vec<f64> = (0..64).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let d = higuchi_dimension(&series, 10);
        assert!((d - 2.0).abs() < 1e-9, "Expected 2.0, got {}", d);
    }

    #[test]
    fn test_higuchi_constant_series_is_nan() {
        assert!(higuchi_dimension(&[5.0; 32], 10).is_nan());
    }

    #[test]
    fn test_higuchi_too_short_is_nan() {
        // n/2 = 1 leaves a single interval
        assert!(higuchi_dimension(&[1.0, 2.0, 4.0], 10).is_nan());
    }

    #[test]
    fn test_box_counting_diagonal_is_one() {
        let d = box_counting_dimension(&line(65));
        assert!((d - 1.0).abs() < 1e-9, "Expected 1.0, got {}", d);
    }

    #[test]
    fn test_box_counting_constant_is_nan() {
        assert!(box_counting_dimension(&[3.0; 20]).is_nan());
    }

    #[test]
    fn test_fractal_dimension_min_samples() {
        let config = MetricsConfig::default();
        assert!(fractal_dimension(&[1.0, 2.0, 3.0, 4.0], &config).is_nan());
        assert!(fractal_dimension(&[1.0, f64::NAN, 3.0, 4.0, 5.0, 6.0], &config).is_nan());
        let d = fractal_dimension(&line(20), &config);
        assert!((d - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fractal_dimension_dispatch() {
        let config = MetricsConfig {
            fractal_method: FractalMethod::BoxCounting,
            ..MetricsConfig::default()
        };
        let series = line(33);
        assert_eq!(fractal_dimension(&series, &config), box_counting_dimension(&series));
    }

    #[test]
    fn test_least_squares_slope() {
        let points = [(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)];
        assert!((least_squares_slope(&points).unwrap() - 2.0).abs() < 1e-12);
        assert!(least_squares_slope(&points[..1]).is_none());
        assert!(least_squares_slope(&[(1.0, 1.0), (1.0, 2.0)]).is_none());
    }
}
