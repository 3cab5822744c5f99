//! Application tag: which geological question a batch is answering.
//!
//! The application decides which quality metric feeds the zone detector, how
//! the trap scorer adjusts its likelihood, and which threshold gates the
//! output. Keeping it a closed enum means every match over it is exhaustive.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{AnalyzedSample, RawRecord};

/// Target application for a zone-detection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Application {
    /// Hydrocarbon trap screening (quality metric: RQI)
    #[default]
    Hydrocarbon,
    /// Aquifer productivity (quality metric: hydraulic conductivity)
    Groundwater,
    /// Contaminant leak pathways (quality metric: contaminant risk)
    Contamination,
    /// Thermal sweet spots (quality metric: temperature)
    Geothermal,
    /// Unrecognized application; quality metric is always 0
    #[serde(other)]
    Other,
}

impl Application {
    /// All variants, in display order.
    pub const ALL: [Self; 5] = [
        Self::Hydrocarbon,
        Self::Groundwater,
        Self::Contamination,
        Self::Geothermal,
        Self::Other,
    ];

    /// Quality metric used as the second detector feature and as the
    /// quality gate input.
    ///
    /// A sample missing the field contributes 0.
    pub fn quality_metric(self, sample: &AnalyzedSample) -> f64 {
        let value = match self {
            Self::Hydrocarbon => sample.rqi,
            Self::Groundwater => sample.hydraulic_conductivity,
            Self::Contamination => sample.contaminant_risk,
            Self::Geothermal => sample.temperature,
            Self::Other => None,
        };
        value.unwrap_or(0.0)
    }

    /// Quality value the trap scorer multiplies entropy by.
    ///
    /// Differs from [`Self::quality_metric`] for groundwater (conductivity is
    /// too small to serve as a likelihood factor, RQI is used instead) and
    /// geothermal (temperature in °C would saturate every confidence).
    pub fn scoring_quality(self, sample: &AnalyzedSample) -> f64 {
        let value = match self {
            Self::Hydrocarbon | Self::Groundwater | Self::Other => sample.rqi,
            Self::Geothermal => sample.heat_capacity_ratio,
            Self::Contamination => sample.contaminant_risk,
        };
        value.unwrap_or(0.0)
    }

    /// Whether trap predictions carry a leak-risk flag.
    pub fn reports_leak_risk(self) -> bool {
        matches!(self, Self::Groundwater | Self::Contamination)
    }

    /// Infer the application from the fields present in the input records.
    ///
    /// Priority: temperature → geothermal, contaminant risk → contamination,
    /// hydraulic conductivity → groundwater, porosity + permeability →
    /// hydrocarbon, otherwise [`Application::Other`].
    pub fn detect(records: &[RawRecord]) -> Self {
        let any = |pred: fn(&RawRecord) -> bool| records.iter().any(pred);

        if any(|r| r.temperature.is_some()) {
            Self::Geothermal
        } else if any(|r| r.contaminant_risk.is_some()) {
            Self::Contamination
        } else if any(|r| r.hydraulic_conductivity.is_some()) {
            Self::Groundwater
        } else if !records.is_empty()
            && records
                .iter()
                .all(|r| !r.porosity.is_empty() && r.permeability.is_some())
        {
            Self::Hydrocarbon
        } else {
            Self::Other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hydrocarbon => "hydrocarbon",
            Self::Groundwater => "groundwater",
            Self::Contamination => "contamination",
            Self::Geothermal => "geothermal",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Parsing never fails: unknown tags fall back to [`Application::Other`].
impl FromStr for Application {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "hydrocarbon" | "oil_gas" | "oil-and-gas" => Self::Hydrocarbon,
            "groundwater" | "aquifer" => Self::Groundwater,
            "contamination" | "environmental" => Self::Contamination,
            "geothermal" => Self::Geothermal,
            _ => Self::Other,
        })
    }
}
