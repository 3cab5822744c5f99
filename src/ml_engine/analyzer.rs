//! Dataset Analyzer & Report Builder
//!
//! Main orchestrator for a batch run:
//! 1. Resolves the application (configured or auto-detected)
//! 2. Validates and analyzes every record into the analysis memory
//! 3. Resolves the quality threshold through the quality gate
//! 4. Runs the zone detector and the trap scorer over the full memory
//! 5. Builds an AnalysisReport

use chrono::Utc;
use tracing::{info, warn};

use super::{
    quality_gate::resolve_threshold, sample_analyzer::SampleAnalyzer, trap_scorer::TrapScorer,
    zone_detector::ZoneDetector,
};
use crate::config::GeozoneConfig;
use crate::error::AnalysisError;
use crate::types::{AnalysisMemory, AnalysisReport, Application, RawRecord};

/// Batch analyzer bound to one configuration.
#[derive(Debug, Clone, Default)]
pub struct DatasetAnalyzer {
    config: GeozoneConfig,
}

impl DatasetAnalyzer {
    pub fn new(config: GeozoneConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeozoneConfig {
        &self.config
    }

    /// Run the full pipeline with the configured (or auto-detected) application.
    pub fn analyze(&self, records: &[RawRecord]) -> Result<AnalysisReport, AnalysisError> {
        let application = self.config.application_for(records);
        self.analyze_as(records, application)
    }

    /// Run the full pipeline for an explicit application.
    ///
    /// # Errors
    /// - `EmptyBatch` when `records` is empty
    /// - `InvalidInput` for the first bad record when
    ///   `analysis.skip_invalid_records` is off
    pub fn analyze_as(
        &self,
        records: &[RawRecord],
        application: Application,
    ) -> Result<AnalysisReport, AnalysisError> {
        if records.is_empty() {
            return Err(AnalysisError::EmptyBatch);
        }

        let (memory, rejected_records) = self.build_memory(records, application)?;

        let quality_threshold = resolve_threshold(&memory, application, &self.config.thresholds);
        let zones = ZoneDetector::new(self.config.detector.clone()).detect(
            &memory,
            application,
            quality_threshold,
        );
        let predictions =
            TrapScorer::from_thresholds(&self.config.thresholds).predict(&memory, application);

        info!(
            %application,
            records = records.len(),
            analyzed = memory.len(),
            rejected = rejected_records,
            zones = zones.len(),
            predictions = predictions.len(),
            "Dataset analysis complete"
        );

        Ok(AnalysisReport {
            application,
            generated_at: Utc::now(),
            data_points: memory,
            zones,
            predictions,
            rejected_records,
        })
    }

    /// Analyze every record in order. Returns the memory and the number of
    /// records skipped by validation.
    fn build_memory(
        &self,
        records: &[RawRecord],
        application: Application,
    ) -> Result<(AnalysisMemory, usize), AnalysisError> {
        let sample_analyzer = SampleAnalyzer::new(application, &self.config);
        let mut memory = AnalysisMemory::with_capacity(records.len());
        let mut rejected = 0usize;

        for (index, record) in records.iter().enumerate() {
            match sample_analyzer.analyze(record, index) {
                Ok(sample) => memory.push(sample),
                Err(e) if self.config.analysis.skip_invalid_records => {
                    warn!(index, depth = record.depth, error = %e, "Skipping invalid record");
                    rejected += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok((memory, rejected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Porosity;

    fn records(n: usize) -> Vec<RawRecord> {
        (0..n)
            .map(|i| {
                let base = 15.0 + (i % 5) as f64;
                RawRecord {
                    depth: 1000.0 + 10.0 * i as f64,
                    porosity: Porosity::Series(
                        (0..8).map(|j| base + ((i + j) as f64 * 0.7).sin() * 3.0).collect(),
                    ),
                    permeability: Some(50.0 + 20.0 * (i % 7) as f64),
                    ..RawRecord::default()
                }
            })
            .collect()
    }

    #[test]
    fn test_empty_batch_is_error() {
        let analyzer = DatasetAnalyzer::default();
        assert!(matches!(analyzer.analyze(&[]), Err(AnalysisError::EmptyBatch)));
    }

    #[test]
    fn test_memory_preserves_order_and_length() {
        let input = records(15);
        let report = DatasetAnalyzer::default().analyze(&input).unwrap();
        assert_eq!(report.application, Application::Hydrocarbon);
        assert_eq!(report.data_points.len(), 15);
        for (sample, record) in report.data_points.iter().zip(&input) {
            assert_eq!(sample.depth, record.depth);
        }
        assert!(report.zones.skipped.is_none());
        assert_eq!(report.rejected_records, 0);
    }

    #[test]
    fn test_invalid_records_skipped_by_default() {
        let mut input = records(12);
        input[3].porosity = Porosity::Series(Vec::new());
        let report = DatasetAnalyzer::default().analyze(&input).unwrap();
        assert_eq!(report.data_points.len(), 11);
        assert_eq!(report.rejected_records, 1);
    }

    #[test]
    fn test_invalid_record_aborts_when_strict() {
        let mut config = GeozoneConfig::default();
        config.analysis.skip_invalid_records = false;
        let mut input = records(12);
        input[5].depth = f64::NAN;
        let result = DatasetAnalyzer::new(config).analyze(&input);
        assert!(matches!(result, Err(AnalysisError::InvalidInput { index: 5, .. })));
    }

    #[test]
    fn test_small_batch_reports_skipped_detection() {
        let report = DatasetAnalyzer::default().analyze(&records(4)).unwrap();
        assert!(report.zones.is_empty());
        assert!(report.zones.skipped.is_some());
    }

    #[test]
    fn test_predictions_respect_cutoff() {
        let report = DatasetAnalyzer::default().analyze(&records(20)).unwrap();
        assert!(report
            .predictions
            .iter()
            .all(|p| p.confidence > 0.15 && p.confidence <= 1.0));
    }

    #[test]
    fn test_auto_application() {
        let mut config = GeozoneConfig::default();
        config.analysis.application = "auto".to_string();
        let mut input = records(10);
        for r in &mut input {
            r.temperature = Some(160.0);
        }
        let report = DatasetAnalyzer::new(config).analyze(&input).unwrap();
        assert_eq!(report.application, Application::Geothermal);
        assert_eq!(report.zones.quality_threshold, 150.0);
    }
}
