//! Zone Detector - high-quality statistical outliers
//!
//! A sample is a zone when it is BOTH an isolation-forest outlier in the
//! standardized `[entropy, quality, fractal_dim]` space AND its raw quality
//! metric exceeds the threshold. Either condition alone over-selects:
//! thresholds miss multivariate sweet spots, outliers include bad noise.
//!
//! Pipeline:
//! 1. Batches under 10 samples are skipped (empty result, not an error)
//! 2. Build the feature matrix, quality metric chosen by application
//! 3. Standardize per dimension (zero variance → 0)
//! 4. Fit the isolation forest and flag outliers
//! 5. Keep outliers above the quality threshold, in input order

use tracing::{debug, info};

use super::isolation_forest::{IsolationForest, OUTLIER};
use super::standardizer::Standardizer;
use crate::config::DetectorConfig;
use crate::types::{
    zone_constants::MIN_DETECTION_SAMPLES, AnalyzedSample, Application, DetectionSkipped,
    ZoneDetectionResult,
};

/// Feature names in column order.
pub const FEATURE_NAMES: [&str; 3] = ["entropy", "quality_metric", "fractal_dim"];

/// Zone detector over one batch of analyzed samples.
#[derive(Debug, Clone, Default)]
pub struct ZoneDetector {
    config: DetectorConfig,
}

impl ZoneDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Raw `[entropy, quality_metric, fractal_dim]` row per sample.
    pub fn feature_matrix(samples: &[AnalyzedSample], application: Application) -> Vec<Vec<f64>> {
        samples
            .iter()
            .map(|s| vec![s.entropy, application.quality_metric(s), s.fractal_dim])
            .collect()
    }

    /// Detect zones in `samples`.
    ///
    /// Never fails: a small batch yields an empty, skipped result; identical
    /// samples or a threshold above every quality value yield an empty one.
    pub fn detect(
        &self,
        samples: &[AnalyzedSample],
        application: Application,
        quality_threshold: f64,
    ) -> ZoneDetectionResult {
        if samples.len() < MIN_DETECTION_SAMPLES {
            debug!(
                samples = samples.len(),
                required = MIN_DETECTION_SAMPLES,
                "Zone detection skipped: insufficient data"
            );
            return ZoneDetectionResult::skipped(
                quality_threshold,
                DetectionSkipped::InsufficientData {
                    samples: samples.len(),
                    required: MIN_DETECTION_SAMPLES,
                },
            );
        }

        let features = Self::feature_matrix(samples, application);
        let scaler = Standardizer::fit(&features);
        let standardized = scaler.transform(&features);

        for (d, name) in FEATURE_NAMES.iter().enumerate() {
            if scaler.is_degenerate(d) {
                debug!(feature = *name, "Zero-variance feature standardized to 0");
            }
        }

        let forest = IsolationForest::fit(&standardized, &self.config);
        let labels = forest.predict(&standardized);
        let outlier_count = labels.iter().filter(|&&l| l == OUTLIER).count();

        let zones: Vec<AnalyzedSample> = samples
            .iter()
            .zip(&labels)
            .filter(|&(sample, &label)| {
                label == OUTLIER && application.quality_metric(sample) > quality_threshold
            })
            .map(|(sample, _)| sample.clone())
            .collect();

        info!(
            %application,
            samples = samples.len(),
            outliers = outlier_count,
            zones = zones.len(),
            quality_threshold,
            "Zone detection complete"
        );

        ZoneDetectionResult {
            zones,
            quality_threshold,
            outlier_count,
            skipped: None,
        }
    }
}
