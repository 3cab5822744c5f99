//! Quality Gate - resolves the zone detector's quality threshold
//!
//! Fixed mode takes the per-application threshold from config. Percentile
//! mode derives it from the batch itself, so a zone must rank in the upper
//! part of its own well rather than clear an absolute bar.

use tracing::{debug, warn};

use super::isolation_forest::linear_quantile;
use crate::config::{QualityGate, ThresholdConfig};
use crate::types::{AnalyzedSample, Application};

/// Resolve the quality threshold for a batch.
pub fn resolve_threshold(
    samples: &[AnalyzedSample],
    application: Application,
    thresholds: &ThresholdConfig,
) -> f64 {
    let fixed = thresholds.quality_threshold(application);

    match thresholds.quality_gate {
        QualityGate::Fixed => fixed,
        QualityGate::Percentile => {
            match batch_percentile(samples, application, thresholds.quality_percentile) {
                Some(threshold) => {
                    debug!(
                        %application,
                        percentile = thresholds.quality_percentile,
                        threshold,
                        "Quality threshold from batch percentile"
                    );
                    threshold
                }
                None => {
                    warn!(
                        %application,
                        fallback = fixed,
                        "No finite quality values in batch, using fixed threshold"
                    );
                    fixed
                }
            }
        }
    }
}

/// `p`-th percentile of the batch quality metric, ignoring non-finite values.
///
/// Linear interpolation between closest ranks: p75 of `1..=100` is 75.25.
pub fn batch_percentile(
    samples: &[AnalyzedSample],
    application: Application,
    p: usize,
) -> Option<f64> {
    let values: Vec<f64> = samples
        .iter()
        .map(|s| application.quality_metric(s))
        .filter(|v| v.is_finite())
        .collect();

    if values.is_empty() {
        return None;
    }
    Some(linear_quantile(&values, p.min(100) as f64 / 100.0))
}
