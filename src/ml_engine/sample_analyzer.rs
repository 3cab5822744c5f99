//! Sample Analyzer - one raw record to one analyzed sample
//!
//! Fills defaults (sandstone, 100 mD), runs the metric providers over the
//! porosity readings, derives pressure when absent and adds the fields the
//! configured application needs:
//!
//! | Application   | Added fields                                              |
//! |---------------|-----------------------------------------------------------|
//! | Hydrocarbon   | rqi                                                       |
//! | Groundwater   | rqi, hydraulic_conductivity, flow_capacity_index          |
//! | Contamination | contaminant_risk (as provided), hydraulic_conductivity    |
//! | Geothermal    | temperature, heat_capacity_ratio, energy_potential_index  |
//! | Other         | none                                                      |

use statrs::statistics::Statistics;

use crate::config::defaults::DEFAULT_PERMEABILITY_MD;
use crate::config::{GeozoneConfig, MetricsConfig, PhysicsConfig};
use crate::error::AnalysisError;
use crate::physics_engine::{
    calculate_rqi, energy_potential_index, entropy, flow_capacity_index, fractal_dimension,
    geothermal_temperature, heat_capacity_ratio, hydraulic_conductivity, hydrostatic_pressure,
};
use crate::types::{AnalyzedSample, Application, RawRecord};

/// Per-record feature extraction for one application.
#[derive(Debug, Clone)]
pub struct SampleAnalyzer {
    application: Application,
    metrics: MetricsConfig,
    physics: PhysicsConfig,
}

impl SampleAnalyzer {
    pub fn new(application: Application, config: &GeozoneConfig) -> Self {
        Self {
            application,
            metrics: config.metrics.clone(),
            physics: config.physics.clone(),
        }
    }

    pub fn application(&self) -> Application {
        self.application
    }

    /// Validate `record` (reported as batch position `index`) and analyze it.
    pub fn analyze(&self, record: &RawRecord, index: usize) -> Result<AnalyzedSample, AnalysisError> {
        record.validate(index)?;
        Ok(self.analyze_unchecked(record))
    }

    /// Analyze a record that has already passed [`RawRecord::validate`].
    pub fn analyze_unchecked(&self, record: &RawRecord) -> AnalyzedSample {
        let porosity = record.porosity.values().to_vec();
        let permeability = record.permeability.unwrap_or(DEFAULT_PERMEABILITY_MD);
        let mean_porosity = porosity.iter().mean();
        let pressure = record
            .pressure
            .unwrap_or_else(|| hydrostatic_pressure(record.depth, &self.physics));

        let mut sample = AnalyzedSample {
            depth: record.depth,
            lithology: record.lithology.clone().unwrap_or_default(),
            entropy: entropy(&porosity, &self.metrics),
            fractal_dim: fractal_dimension(&porosity, &self.metrics),
            porosity,
            permeability,
            pressure,
            ..AnalyzedSample::default()
        };

        let conductivity = || {
            record
                .hydraulic_conductivity
                .unwrap_or_else(|| hydraulic_conductivity(permeability, &self.physics))
        };

        match self.application {
            Application::Hydrocarbon => {
                sample.rqi = Some(calculate_rqi(mean_porosity, permeability));
            }
            Application::Groundwater => {
                sample.rqi = Some(calculate_rqi(mean_porosity, permeability));
                sample.hydraulic_conductivity = Some(conductivity());
                sample.flow_capacity_index = Some(flow_capacity_index(mean_porosity, permeability));
            }
            Application::Contamination => {
                sample.contaminant_risk = record.contaminant_risk;
                sample.hydraulic_conductivity = Some(conductivity());
            }
            Application::Geothermal => {
                let temperature = record
                    .temperature
                    .unwrap_or_else(|| geothermal_temperature(record.depth, &self.physics));
                let gradient_c_per_km = self.physics.geothermal_gradient_c_per_m * 1000.0;
                sample.temperature = Some(temperature);
                sample.heat_capacity_ratio = Some(heat_capacity_ratio(temperature, pressure));
                sample.energy_potential_index = Some(energy_potential_index(
                    mean_porosity,
                    permeability,
                    gradient_c_per_km,
                ));
            }
            Application::Other => {}
        }

        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Lithology, Porosity};

    fn record() -> RawRecord {
        RawRecord {
            depth: 2000.0,
            porosity: Porosity::Series(vec![18.0, 22.0, 19.5, 25.0, 20.5, 21.0]),
            permeability: Some(100.0),
            ..RawRecord::default()
        }
    }

    fn analyzer(application: Application) -> SampleAnalyzer {
        SampleAnalyzer::new(application, &GeozoneConfig::default())
    }

    #[test]
    fn test_defaults_filled() {
        let r = RawRecord {
            permeability: None,
            ..record()
        };
        let s = analyzer(Application::Hydrocarbon).analyze(&r, 0).unwrap();
        assert_eq!(s.lithology, Lithology::Sandstone);
        assert_eq!(s.permeability, 100.0);
        // Hydrostatic: 2000 m × 0.0098 MPa/m
        assert!((s.pressure - 19.6).abs() < 1e-9);
    }

    #[test]
    fn test_hydrocarbon_fields() {
        let s = analyzer(Application::Hydrocarbon).analyze(&record(), 0).unwrap();
        assert!(s.rqi.is_some());
        assert!(s.entropy.is_finite());
        assert!(s.fractal_dim.is_finite());
        assert!(s.hydraulic_conductivity.is_none());
        assert!(s.temperature.is_none());
    }

    #[test]
    fn test_groundwater_derives_conductivity() {
        let s = analyzer(Application::Groundwater).analyze(&record(), 0).unwrap();
        let k = s.hydraulic_conductivity.unwrap();
        assert!((k - 9.6817e-7).abs() < 1e-10, "got {}", k);
        assert!(s.flow_capacity_index.is_some());
    }

    #[test]
    fn test_provided_conductivity_kept() {
        let r = RawRecord {
            hydraulic_conductivity: Some(3e-4),
            contaminant_risk: Some(0.6),
            ..record()
        };
        let s = analyzer(Application::Contamination).analyze(&r, 0).unwrap();
        assert_eq!(s.hydraulic_conductivity, Some(3e-4));
        assert_eq!(s.contaminant_risk, Some(0.6));
        assert!(s.rqi.is_none());
    }

    #[test]
    fn test_geothermal_temperature_derived() {
        let s = analyzer(Application::Geothermal).analyze(&record(), 0).unwrap();
        // 15 + 0.03 × 2000
        assert!((s.temperature.unwrap() - 75.0).abs() < 1e-9);
        assert!(s.heat_capacity_ratio.unwrap() >= 1.0);
        assert!(s.energy_potential_index.is_some());
    }

    #[test]
    fn test_few_readings_give_nan_metrics() {
        let r = RawRecord {
            porosity: Porosity::Single(20.0),
            ..record()
        };
        let s = analyzer(Application::Hydrocarbon).analyze(&r, 0).unwrap();
        assert!(s.entropy.is_nan());
        assert!(s.fractal_dim.is_nan());
        assert!(s.rqi.unwrap().is_finite());
    }

    #[test]
    fn test_invalid_record_rejected() {
        let r = RawRecord {
            porosity: Porosity::Series(Vec::new()),
            ..record()
        };
        assert!(matches!(
            analyzer(Application::Hydrocarbon).analyze(&r, 4),
            Err(AnalysisError::InvalidInput { index: 4, .. })
        ));
    }
}
