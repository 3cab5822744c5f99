//! Zone engine types: detector results, trap predictions, batch reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{nan_f64, Application, AnalyzedSample, Lithology};

/// Fixed domain constants used by the zone detector and trap scorer.
pub mod zone_constants {
    /// Minimum batch size before the zone detector attempts detection
    pub const MIN_DETECTION_SAMPLES: usize = 10;
    /// Capillary seal pressure coefficient (MPa per km of depth)
    pub const CAPILLARY_PRESSURE_MPA_PER_KM: f64 = 0.15;
    /// Likelihood multiplier for pressure-sealed hydrocarbon intervals
    pub const PRESSURE_SEAL_DAMPENING: f64 = 0.7;
    /// Groundwater productivity boost per unit of mean quality
    pub const GROUNDWATER_QUALITY_BOOST: f64 = 0.2;
    /// Contamination likelihood = entropy × this factor
    pub const CONTAMINATION_ENTROPY_FACTOR: f64 = 1.5;
    /// Geothermal boost per unit of entropy (fracture-network heterogeneity)
    pub const GEOTHERMAL_ENTROPY_BOOST: f64 = 0.3;
    /// Entropy-weighted hydraulic conductivity above which a leak is flagged
    pub const LEAK_RISK_THRESHOLD: f64 = 1e-5;
}

/// Why the zone detector did not run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum DetectionSkipped {
    /// Batch smaller than the minimum viable size
    InsufficientData { samples: usize, required: usize },
}

impl std::fmt::Display for DetectionSkipped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientData { samples, required } => write!(
                f,
                "Insufficient data: {samples} samples (need at least {required})"
            ),
        }
    }
}

/// Samples that are both statistical outliers and above the quality
/// threshold, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDetectionResult {
    pub zones: Vec<AnalyzedSample>,
    /// Quality threshold the raw metric had to exceed
    pub quality_threshold: f64,
    /// Number of samples the isolation forest flagged as outliers
    pub outlier_count: usize,
    /// Set when detection was not attempted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<DetectionSkipped>,
}

impl ZoneDetectionResult {
    pub fn skipped(quality_threshold: f64, reason: DetectionSkipped) -> Self {
        Self {
            zones: Vec::new(),
            quality_threshold,
            outlier_count: 0,
            skipped: Some(reason),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }
}

/// Confidence-scored trap / leak / thermal prediction for one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrapPrediction {
    pub depth: f64,
    pub lithology: Lithology,
    /// Likelihood clipped to [0, 1]
    pub confidence: f64,
    #[serde(with = "nan_f64")]
    pub entropy: f64,
    #[serde(with = "nan_f64")]
    pub fractal_dim: f64,
    /// Only set for groundwater and contamination runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leak_risk: Option<bool>,
}

/// Complete output of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub application: Application,
    pub generated_at: DateTime<Utc>,
    /// Analysis memory: every successfully analyzed sample, in input order
    pub data_points: Vec<AnalyzedSample>,
    pub zones: ZoneDetectionResult,
    pub predictions: Vec<TrapPrediction>,
    /// Records rejected by boundary validation
    pub rejected_records: usize,
}

impl AnalysisReport {
    /// Predictions flagged with leak risk.
    pub fn leak_zones(&self) -> impl Iterator<Item = &TrapPrediction> {
        self.predictions.iter().filter(|p| p.leak_risk == Some(true))
    }
}
