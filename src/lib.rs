//! GEOZONE: Well-Log Zone Detection
//!
//! Flags interesting depth intervals (hydrocarbon traps, contaminant leak
//! pathways, aquifer sweet spots, thermal targets) by combining per-sample
//! geological metrics with unsupervised outlier detection and
//! application-specific quality thresholds.
//!
//! ## Architecture
//!
//! - **Physics Engine**: Entropy, fractal dimension, RQI and other metric providers
//! - **ML Engine**: Sample/dataset analyzers, isolation forest, zone detector, trap scorer
//! - **Config**: TOML configuration with defaults, validation and typo hints
//! - **Records**: JSON / JSON Lines input
//! - **Export**: CSV / JSON writers and a text summary

pub mod config;
pub mod error;
pub mod export;
pub mod ml_engine;
pub mod physics_engine;
pub mod records;
pub mod types;

// Re-export configuration
pub use config::{ConfigError, GeozoneConfig};

// Re-export errors
pub use error::{AnalysisError, ExportError};

// Re-export commonly used types
pub use types::{
    AnalysisMemory, AnalysisReport, AnalyzedSample, Application, DetectionSkipped, Lithology,
    Porosity, RawRecord, TrapPrediction, ZoneDetectionResult,
};

// Re-export input
pub use records::{parse_records, read_records};

// Re-export engine entry points
pub use ml_engine::{DatasetAnalyzer, IsolationForest, SampleAnalyzer, TrapScorer, ZoneDetector};
