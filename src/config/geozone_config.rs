//! Run Configuration - application, thresholds and engine tuning as TOML values
//!
//! Each struct implements `Default` with the reference values, so an empty or
//! missing config file reproduces the standard behaviour exactly.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults::{CONFIG_ENV_VAR, LOCAL_CONFIG_FILE};
use crate::types::{Application, RawRecord};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a zone-detection run.
///
/// Load with `GeozoneConfig::load()` which searches:
/// 1. `$GEOZONE_CONFIG` env var
/// 2. `./geozone.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeozoneConfig {
    /// Application selection and batch handling
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Application-specific quality and confidence thresholds
    #[serde(default)]
    pub thresholds: ThresholdConfig,

    /// Isolation-forest parameters
    #[serde(default)]
    pub detector: DetectorConfig,

    /// Entropy and fractal-dimension estimator options
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Petrophysical constants for derived fields
    #[serde(default)]
    pub physics: PhysicsConfig,
}

impl GeozoneConfig {
    /// Load configuration using the standard search order:
    /// 1. `$GEOZONE_CONFIG` environment variable
    /// 2. `./geozone.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), application = %config.analysis.application, "Loaded config from {}", CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        // 2. Check ./geozone.toml
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(application = %config.analysis.application, "Loaded config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        // 3. Defaults
        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        // Unknown keys are warnings only
        for w in super::validation::validate_unknown_keys(&contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Resolve the configured application for a batch.
    ///
    /// `"auto"` infers it from the fields the records carry; any other
    /// unrecognized tag falls back to [`Application::Other`].
    pub fn application_for(&self, records: &[RawRecord]) -> Application {
        if self.analysis.application.trim().eq_ignore_ascii_case("auto") {
            let detected = Application::detect(records);
            info!(application = %detected, "Auto-detected application from record fields");
            detected
        } else {
            self.analysis
                .application
                .parse()
                .unwrap_or(Application::Other)
        }
    }

    /// Validate all values for internal consistency.
    ///
    /// Rules:
    /// - Thresholds must be finite and non-negative
    /// - Contamination must lie in (0, 0.5]
    /// - Tree count and sub-sample size must be > 0
    /// - Minimum sample counts must be >= 2
    /// - Percentile must be within 0-100
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let t = &self.thresholds;
        for (name, value) in [
            ("thresholds.trap_confidence", t.trap_confidence),
            ("thresholds.leak_risk", t.leak_risk),
            ("thresholds.temperature_c", t.temperature_c),
            ("thresholds.default_quality", t.default_quality),
        ] {
            Self::check_non_negative(value, name, &mut errors);
        }
        if t.quality_percentile > 100 {
            errors.push(format!(
                "thresholds.quality_percentile ({}) must be within 0-100",
                t.quality_percentile
            ));
        }

        let d = &self.detector;
        if d.contamination.is_nan() || d.contamination <= 0.0 || d.contamination > 0.5 {
            errors.push(format!(
                "detector.contamination ({}) must be in (0, 0.5]",
                d.contamination
            ));
        }
        if d.n_trees == 0 {
            errors.push("detector.n_trees must be > 0".to_string());
        }
        if d.max_samples < 2 {
            errors.push("detector.max_samples must be >= 2".to_string());
        }

        let m = &self.metrics;
        if m.entropy_min_samples < 2 {
            errors.push("metrics.entropy_min_samples must be >= 2".to_string());
        }
        if m.fractal_min_samples < 2 {
            errors.push("metrics.fractal_min_samples must be >= 2".to_string());
        }
        if m.higuchi_k_max < 2 {
            errors.push("metrics.higuchi_k_max must be >= 2".to_string());
        }

        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_non_negative(value: f64, name: &str, errors: &mut Vec<String>) {
        // NaN comparisons silently pass, so check finiteness first
        if !value.is_finite() {
            errors.push(format!("{name}: value must be finite (got {value})"));
        } else if value < 0.0 {
            errors.push(format!("{name}: value must be >= 0 (got {value:.3})"));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Analysis Settings
// ============================================================================

/// Application selection and batch handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// "hydrocarbon", "groundwater", "contamination", "geothermal" or "auto"
    #[serde(default = "default_application")]
    pub application: String,

    /// Skip records that fail boundary validation instead of aborting the batch
    #[serde(default = "default_skip_invalid")]
    pub skip_invalid_records: bool,
}

fn default_application() -> String {
    "hydrocarbon".to_string()
}
fn default_skip_invalid() -> bool {
    true
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            application: default_application(),
            skip_invalid_records: default_skip_invalid(),
        }
    }
}

// ============================================================================
// Thresholds
// ============================================================================

/// How the zone detector's quality threshold is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QualityGate {
    /// Per-application fixed threshold
    #[default]
    Fixed,
    /// Percentile of the batch quality metric
    Percentile,
}

/// Application thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Minimum trap confidence; also the hydrocarbon quality threshold
    #[serde(default = "default_trap_confidence")]
    pub trap_confidence: f64,

    /// Minimum contaminant risk for contamination leak zones
    #[serde(default = "default_leak_risk")]
    pub leak_risk: f64,

    /// Minimum temperature for geothermal potential (°C)
    #[serde(default = "default_temperature_c")]
    pub temperature_c: f64,

    /// Quality threshold for applications without a dedicated one
    #[serde(default = "default_quality")]
    pub default_quality: f64,

    /// Fixed per-application threshold, or batch percentile
    #[serde(default)]
    pub quality_gate: QualityGate,

    /// Percentile used when `quality_gate = "percentile"`
    #[serde(default = "default_quality_percentile")]
    pub quality_percentile: usize,
}

fn default_trap_confidence() -> f64 { 0.15 }
fn default_leak_risk() -> f64 { 0.3 }
fn default_temperature_c() -> f64 { 150.0 }
fn default_quality() -> f64 { 0.3 }
fn default_quality_percentile() -> usize { 75 }

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            trap_confidence: default_trap_confidence(),
            leak_risk: default_leak_risk(),
            temperature_c: default_temperature_c(),
            default_quality: default_quality(),
            quality_gate: QualityGate::default(),
            quality_percentile: default_quality_percentile(),
        }
    }
}

impl ThresholdConfig {
    /// Fixed quality threshold for an application.
    ///
    /// Hydrocarbon uses the trap confidence threshold, contamination the leak
    /// risk threshold, geothermal the temperature threshold; everything else
    /// the default quality threshold.
    pub fn quality_threshold(&self, application: Application) -> f64 {
        match application {
            Application::Hydrocarbon => self.trap_confidence,
            Application::Contamination => self.leak_risk,
            Application::Geothermal => self.temperature_c,
            Application::Groundwater | Application::Other => self.default_quality,
        }
    }
}

// ============================================================================
// Detector Config
// ============================================================================

/// Isolation-forest parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Expected outlier fraction
    #[serde(default = "default_contamination")]
    pub contamination: f64,

    /// Number of isolation trees
    #[serde(default = "default_n_trees")]
    pub n_trees: usize,

    /// Sub-sample size per tree (capped at batch size)
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,

    /// Seed for the forest's random source.
    ///
    /// Fixed by default so repeated runs on the same batch agree.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_contamination() -> f64 { 0.1 }
fn default_n_trees() -> usize { 100 }
fn default_max_samples() -> usize { 256 }
fn default_seed() -> u64 { 42 }

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            contamination: default_contamination(),
            n_trees: default_n_trees(),
            max_samples: default_max_samples(),
            seed: default_seed(),
        }
    }
}

// ============================================================================
// Metrics Config
// ============================================================================

/// Entropy estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntropyMethod {
    /// Shannon entropy (bits) of a Sturges-binned histogram
    #[default]
    Histogram,
    /// Differential entropy (nats) of a Gaussian KDE, Scott bandwidth
    Kde,
}

/// Fractal dimension estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FractalMethod {
    #[default]
    Higuchi,
    BoxCounting,
}

/// Metric-provider options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub entropy_method: EntropyMethod,

    /// Fewer porosity readings than this yield NaN entropy
    #[serde(default = "default_entropy_min_samples")]
    pub entropy_min_samples: usize,

    #[serde(default)]
    pub fractal_method: FractalMethod,

    /// Fewer porosity readings than this yield NaN fractal dimension
    #[serde(default = "default_fractal_min_samples")]
    pub fractal_min_samples: usize,

    /// Largest Higuchi interval (capped at half the series length)
    #[serde(default = "default_higuchi_k_max")]
    pub higuchi_k_max: usize,
}

fn default_entropy_min_samples() -> usize { 5 }
fn default_fractal_min_samples() -> usize { 5 }
fn default_higuchi_k_max() -> usize { 10 }

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            entropy_method: EntropyMethod::default(),
            entropy_min_samples: default_entropy_min_samples(),
            fractal_method: FractalMethod::default(),
            fractal_min_samples: default_fractal_min_samples(),
            higuchi_k_max: default_higuchi_k_max(),
        }
    }
}

// ============================================================================
// Physics Config
// ============================================================================

/// Petrophysical constants used to derive missing fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Hydrostatic pressure gradient (MPa/m)
    #[serde(default = "default_pressure_gradient")]
    pub pressure_gradient_mpa_per_m: f64,

    /// Mean surface temperature (°C)
    #[serde(default = "default_surface_temperature")]
    pub surface_temperature_c: f64,

    /// Geothermal gradient (°C/m)
    #[serde(default = "default_geothermal_gradient")]
    pub geothermal_gradient_c_per_m: f64,

    /// Pore fluid density (kg/m³)
    #[serde(default = "default_fluid_density")]
    pub fluid_density_kg_m3: f64,

    /// Pore fluid dynamic viscosity (Pa·s)
    #[serde(default = "default_fluid_viscosity")]
    pub fluid_viscosity_pa_s: f64,
}

fn default_pressure_gradient() -> f64 { 0.0098 }
fn default_surface_temperature() -> f64 { 15.0 }
fn default_geothermal_gradient() -> f64 { 0.03 }
fn default_fluid_density() -> f64 { 1000.0 }
fn default_fluid_viscosity() -> f64 { 1.0e-3 }

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            pressure_gradient_mpa_per_m: default_pressure_gradient(),
            surface_temperature_c: default_surface_temperature(),
            geothermal_gradient_c_per_m: default_geothermal_gradient(),
            fluid_density_kg_m3: default_fluid_density(),
            fluid_viscosity_pa_s: default_fluid_viscosity(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = GeozoneConfig::default();
        assert!(config.validate().is_ok(), "Default config must always validate");
    }

    #[test]
    fn test_empty_toml_produces_defaults() {
        let config: GeozoneConfig = toml::from_str("").expect("empty TOML should parse");
        assert_eq!(config.analysis.application, "hydrocarbon");
        assert_eq!(config.thresholds.trap_confidence, 0.15);
        assert_eq!(config.thresholds.leak_risk, 0.3);
        assert_eq!(config.thresholds.temperature_c, 150.0);
        assert_eq!(config.detector.contamination, 0.1);
        assert_eq!(config.detector.seed, 42);
        assert_eq!(config.metrics.entropy_method, EntropyMethod::Histogram);
    }

    #[test]
    fn test_partial_toml_override() {
        let toml_str = r#"
[analysis]
application = "geothermal"

[thresholds]
temperature_c = 120.0
quality_gate = "percentile"

[detector]
seed = 7
"#;
        let config: GeozoneConfig = toml::from_str(toml_str).expect("partial TOML should parse");
        assert_eq!(config.analysis.application, "geothermal");
        assert_eq!(config.thresholds.temperature_c, 120.0);
        assert_eq!(config.thresholds.quality_gate, QualityGate::Percentile);
        assert_eq!(config.detector.seed, 7);
        // Non-overridden values retain defaults
        assert_eq!(config.thresholds.trap_confidence, 0.15);
        assert_eq!(config.detector.n_trees, 100);
    }

    #[test]
    fn test_validation_catches_bad_contamination() {
        let mut config = GeozoneConfig::default();
        config.detector.contamination = 0.0;
        let result = config.validate();
        assert!(result.is_err());
        if let Err(ConfigError::Validation(errors)) = result {
            assert!(errors.iter().any(|e| e.contains("contamination")));
        }
    }

    #[test]
    fn test_validation_catches_negative_threshold() {
        let mut config = GeozoneConfig::default();
        config.thresholds.trap_confidence = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_catches_nan_threshold() {
        let mut config = GeozoneConfig::default();
        config.thresholds.leak_risk = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_catches_zero_trees() {
        let mut config = GeozoneConfig::default();
        config.detector.n_trees = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_roundtrip_toml() {
        let original = GeozoneConfig::default();
        let toml_str = original.to_toml().expect("serialization should work");
        let roundtripped: GeozoneConfig =
            toml::from_str(&toml_str).expect("deserialization should work");
        assert_eq!(original.detector.seed, roundtripped.detector.seed);
        assert_eq!(
            original.thresholds.trap_confidence,
            roundtripped.thresholds.trap_confidence
        );
        assert_eq!(
            original.physics.geothermal_gradient_c_per_m,
            roundtripped.physics.geothermal_gradient_c_per_m
        );
    }

    #[test]
    fn test_all_sections_serialize() {
        let toml_str = GeozoneConfig::default().to_toml().expect("serialization should work");
        assert!(toml_str.contains("[analysis]"), "Missing [analysis] section");
        assert!(toml_str.contains("[thresholds]"), "Missing [thresholds] section");
        assert!(toml_str.contains("[detector]"), "Missing [detector] section");
        assert!(toml_str.contains("[metrics]"), "Missing [metrics] section");
        assert!(toml_str.contains("[physics]"), "Missing [physics] section");
    }

    #[test]
    fn test_quality_threshold_per_application() {
        let t = ThresholdConfig::default();
        assert_eq!(t.quality_threshold(Application::Hydrocarbon), 0.15);
        assert_eq!(t.quality_threshold(Application::Contamination), 0.3);
        assert_eq!(t.quality_threshold(Application::Geothermal), 150.0);
        assert_eq!(t.quality_threshold(Application::Groundwater), 0.3);
        assert_eq!(t.quality_threshold(Application::Other), 0.3);
    }

    #[test]
    fn test_application_for_unknown_tag_is_other() {
        let mut config = GeozoneConfig::default();
        config.analysis.application = "mining".to_string();
        assert_eq!(config.application_for(&[]), Application::Other);
    }

    #[test]
    fn test_application_for_auto_detects() {
        let mut config = GeozoneConfig::default();
        config.analysis.application = "auto".to_string();
        let record = RawRecord {
            depth: 2000.0,
            temperature: Some(160.0),
            ..RawRecord::default()
        };
        assert_eq!(config.application_for(&[record]), Application::Geothermal);
    }
}
