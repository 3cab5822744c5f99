//! Well-log sample types: raw input records and fully analyzed samples.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AnalysisError;

// ============================================================================
// Lithology
// ============================================================================

/// Rock type of a depth interval.
///
/// Named variants cover the lithologies the metric providers know about;
/// anything else is kept verbatim (lowercased) in [`Lithology::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Lithology {
    #[default]
    Sandstone,
    Shale,
    Carbonate,
    Granite,
    Basalt,
    Other(String),
}

impl Lithology {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sandstone => "sandstone",
            Self::Shale => "shale",
            Self::Carbonate => "carbonate",
            Self::Granite => "granite",
            Self::Basalt => "basalt",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for Lithology {
    fn from(value: String) -> Self {
        let lower = value.trim().to_lowercase();
        match lower.as_str() {
            "" | "sandstone" => Self::Sandstone,
            "shale" => Self::Shale,
            "carbonate" | "limestone" | "dolomite" => Self::Carbonate,
            "granite" => Self::Granite,
            "basalt" => Self::Basalt,
            _ => Self::Other(lower),
        }
    }
}

impl From<&str> for Lithology {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Lithology> for String {
    fn from(value: Lithology) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Lithology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ============================================================================
// Raw input record
// ============================================================================

/// Porosity readings for one interval (percent). Loaders may provide a single
/// value or a sequence; both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Porosity {
    Single(f64),
    Series(Vec<f64>),
}

impl Porosity {
    pub fn into_vec(self) -> Vec<f64> {
        match self {
            Self::Single(v) => vec![v],
            Self::Series(v) => v,
        }
    }

    pub fn values(&self) -> &[f64] {
        match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::Series(v) => v,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }
}

impl Default for Porosity {
    fn default() -> Self {
        Self::Series(Vec::new())
    }
}

/// One depth interval as delivered by the loader, already in metric units
/// (m, %, mD, °C, MPa, m/s).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RawRecord {
    pub depth: f64,
    #[serde(default)]
    pub lithology: Option<Lithology>,
    #[serde(default)]
    pub porosity: Porosity,
    #[serde(default)]
    pub permeability: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub contaminant_risk: Option<f64>,
    #[serde(default)]
    pub hydraulic_conductivity: Option<f64>,
}

impl RawRecord {
    /// Boundary validation. `index` is the record's position in the batch
    /// and is carried into the error for reporting.
    pub fn validate(&self, index: usize) -> Result<(), AnalysisError> {
        let invalid = |reason: String| AnalysisError::InvalidInput { index, reason };

        if !self.depth.is_finite() {
            return Err(invalid(format!("depth must be finite, got {}", self.depth)));
        }
        if self.porosity.is_empty() {
            return Err(invalid("porosity must contain at least one reading".to_string()));
        }
        if let Some(bad) = self.porosity.values().iter().find(|p| !p.is_finite()) {
            return Err(invalid(format!("porosity reading {bad} is not finite")));
        }
        if let Some(k) = self.permeability {
            if !k.is_finite() || k < 0.0 {
                return Err(invalid(format!("permeability must be >= 0, got {k}")));
            }
        }
        if let Some(p) = self.pressure {
            if !p.is_finite() {
                return Err(invalid(format!("pressure must be finite, got {p}")));
            }
        }
        if let Some(t) = self.temperature {
            if !t.is_finite() {
                return Err(invalid(format!("temperature must be finite, got {t}")));
            }
        }
        if let Some(risk) = self.contaminant_risk {
            if !risk.is_finite() || risk < 0.0 {
                return Err(invalid(format!("contaminant_risk must be >= 0, got {risk}")));
            }
        }
        if let Some(hc) = self.hydraulic_conductivity {
            if !hc.is_finite() || hc < 0.0 {
                return Err(invalid(format!(
                    "hydraulic_conductivity must be >= 0, got {hc}"
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Analyzed sample
// ============================================================================

/// Serde adapter for metrics that are legitimately NaN.
///
/// JSON has no NaN literal, so non-finite values are written as `null` and
/// `null` reads back as NaN.
pub mod nan_f64 {
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

/// Full feature record for one depth interval: the unit of analysis.
///
/// Application-conditional fields are `None` when the configured application
/// does not produce them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedSample {
    /// Depth (m)
    pub depth: f64,
    pub lithology: Lithology,
    /// Porosity readings (%)
    pub porosity: Vec<f64>,
    /// Permeability (mD)
    pub permeability: f64,
    /// Shannon entropy of the porosity distribution; NaN when too few readings
    #[serde(with = "nan_f64")]
    pub entropy: f64,
    /// Fractal dimension of the porosity series; NaN on degenerate input
    #[serde(with = "nan_f64")]
    pub fractal_dim: f64,
    /// Pore pressure (MPa)
    pub pressure: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rqi: Option<f64>,
    /// Hydraulic conductivity (m/s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hydraulic_conductivity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contaminant_risk: Option<f64>,
    /// Formation temperature (°C)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heat_capacity_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_capacity_index: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_potential_index: Option<f64>,
}

impl Default for AnalyzedSample {
    fn default() -> Self {
        Self {
            depth: 0.0,
            lithology: Lithology::default(),
            porosity: Vec::new(),
            permeability: 0.0,
            entropy: f64::NAN,
            fractal_dim: f64::NAN,
            pressure: 0.0,
            rqi: None,
            hydraulic_conductivity: None,
            contaminant_risk: None,
            temperature: None,
            heat_capacity_ratio: None,
            flow_capacity_index: None,
            energy_potential_index: None,
        }
    }
}

/// Ordered collection of analyzed samples for one batch run.
pub type AnalysisMemory = Vec<AnalyzedSample>;
