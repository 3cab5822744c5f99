//! ML Engine for Well-Log Zone Detection
//!
//! Combines per-sample feature extraction, unsupervised outlier detection
//! and application-specific thresholds into one decision per depth interval.
//!
//! ## Key Features
//! - Application-aware quality metric (RQI, conductivity, risk, temperature)
//! - **Isolation forest** over standardized `[entropy, quality, fractal_dim]`
//! - Fixed or batch-percentile quality gate
//! - Bounded trap confidence with leak-risk flags for water applications
//! - Seeded, reproducible results
//!
//! ## Architecture
//! - `sample_analyzer`: Raw record → AnalyzedSample (metric providers, defaults)
//! - `standardizer`: Per-dimension z-score with zero-variance fallback
//! - `isolation_forest`: Seeded ensemble of random partition trees
//! - `quality_gate`: Fixed or percentile quality threshold
//! - `zone_detector`: Outlier AND above-threshold selection
//! - `trap_scorer`: Confidence scoring and cutoff filtering
//! - `analyzer`: Main orchestrator for a batch run

pub mod sample_analyzer;
pub mod standardizer;
pub mod isolation_forest;
pub mod quality_gate;
pub mod zone_detector;
pub mod trap_scorer;
pub mod analyzer;

// Re-export public types
pub use sample_analyzer::SampleAnalyzer;
pub use standardizer::Standardizer;
pub use isolation_forest::{IsolationForest, INLIER, OUTLIER};
pub use quality_gate::resolve_threshold;
pub use zone_detector::ZoneDetector;
pub use trap_scorer::TrapScorer;
pub use analyzer::DatasetAnalyzer;
