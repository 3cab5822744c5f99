//! Trap / Likelihood Scorer
//!
//! Turns each analyzed sample into a bounded confidence that it is a trap,
//! leak pathway or thermal sweet spot:
//!
//! - Base likelihood: `entropy × scoring quality`
//! - Hydrocarbon: pressure above `0.15 × depth/1000` MPa → × 0.7
//! - Groundwater: × `(1 + 0.2 × quality)`
//! - Contamination: `entropy × 1.5` (base ignored)
//! - Geothermal: × `(1 + 0.3 × entropy)`
//! - Other: base unmodified
//!
//! Confidence is clipped to [0, 1] and only predictions strictly above the
//! cutoff survive. NaN confidence fails that comparison and is dropped.

use tracing::debug;

use crate::config::ThresholdConfig;
use crate::types::{zone_constants::*, AnalyzedSample, Application, TrapPrediction};

/// Scores samples and filters by a minimum confidence.
#[derive(Debug, Clone, Copy)]
pub struct TrapScorer {
    cutoff: f64,
}

impl Default for TrapScorer {
    fn default() -> Self {
        Self::from_thresholds(&ThresholdConfig::default())
    }
}

impl TrapScorer {
    pub fn new(cutoff: f64) -> Self {
        Self { cutoff }
    }

    /// Cutoff from the configured trap confidence threshold.
    pub fn from_thresholds(thresholds: &ThresholdConfig) -> Self {
        Self::new(thresholds.trap_confidence)
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Unclipped likelihood for one sample.
    pub fn likelihood(sample: &AnalyzedSample, application: Application) -> f64 {
        let entropy = sample.entropy;
        let quality = application.scoring_quality(sample);
        let base = entropy * quality;

        match application {
            Application::Hydrocarbon => {
                let capillary_threshold = CAPILLARY_PRESSURE_MPA_PER_KM * sample.depth / 1000.0;
                if sample.pressure > capillary_threshold {
                    base * PRESSURE_SEAL_DAMPENING
                } else {
                    base
                }
            }
            Application::Groundwater => base * (1.0 + GROUNDWATER_QUALITY_BOOST * quality),
            Application::Contamination => entropy * CONTAMINATION_ENTROPY_FACTOR,
            Application::Geothermal => base * (1.0 + GEOTHERMAL_ENTROPY_BOOST * entropy),
            Application::Other => base,
        }
    }

    /// Confidence in [0, 1], or NaN when an input is NaN.
    pub fn score(sample: &AnalyzedSample, application: Application) -> f64 {
        Self::likelihood(sample, application).clamp(0.0, 1.0)
    }

    /// Entropy-weighted hydraulic conductivity above the leak threshold.
    ///
    /// A sample without conductivity never flags.
    pub fn leak_risk(sample: &AnalyzedSample) -> bool {
        sample
            .hydraulic_conductivity
            .is_some_and(|k| sample.entropy * k > LEAK_RISK_THRESHOLD)
    }

    /// Score every sample and keep those above the cutoff, in input order.
    pub fn predict(
        &self,
        samples: &[AnalyzedSample],
        application: Application,
    ) -> Vec<TrapPrediction> {
        let predictions: Vec<TrapPrediction> = samples
            .iter()
            .filter_map(|sample| {
                let confidence = Self::score(sample, application);
                (confidence > self.cutoff).then(|| TrapPrediction {
                    depth: sample.depth,
                    lithology: sample.lithology.clone(),
                    confidence,
                    entropy: sample.entropy,
                    fractal_dim: sample.fractal_dim,
                    leak_risk: application
                        .reports_leak_risk()
                        .then(|| Self::leak_risk(sample)),
                })
            })
            .collect();

        debug!(
            %application,
            samples = samples.len(),
            predictions = predictions.len(),
            cutoff = self.cutoff,
            "Trap scoring complete"
        );

        predictions
    }

    /// Re-apply a `confidence > threshold` filter to existing predictions.
    pub fn refilter(predictions: &[TrapPrediction], threshold: f64) -> Vec<TrapPrediction> {
        predictions
            .iter()
            .filter(|p| p.confidence > threshold)
            .cloned()
            .collect()
    }
}
