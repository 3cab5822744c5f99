//! System-wide default constants.
//!
//! Centralises magic numbers used across the metric providers and the
//! zone engine. Grouped by subsystem for easy discovery.

// ============================================================================
// Config Loading
// ============================================================================

/// Environment variable holding an explicit config file path.
pub const CONFIG_ENV_VAR: &str = "GEOZONE_CONFIG";

/// Config file looked up in the current working directory.
pub const LOCAL_CONFIG_FILE: &str = "geozone.toml";

// ============================================================================
// Sample Analyzer
// ============================================================================

/// Permeability assumed when a record does not provide one (mD).
pub const DEFAULT_PERMEABILITY_MD: f64 = 100.0;

// ============================================================================
// Petrophysics
// ============================================================================

/// Amaefule RQI coefficient (µm, with k in mD and φ as a fraction).
pub const RQI_COEFFICIENT: f64 = 0.0314;

/// Millidarcy to square metres.
pub const MD_TO_M2: f64 = 9.869_233e-16;

/// Standard gravity (m/s²).
pub const GRAVITY_M_S2: f64 = 9.81;

/// Flow capacity index normalisation divisor.
///
/// `fci = k × φ% / FCI_DIVISOR`
pub const FCI_DIVISOR: f64 = 1_000.0;

/// Energy potential index normalisation divisor.
///
/// `epi = k × φ% × gradient(°C/km) / EPI_DIVISOR`
pub const EPI_DIVISOR: f64 = 1.0e6;

// ============================================================================
// Isolation Forest
// ============================================================================

/// Euler–Mascheroni constant, used in the harmonic-number approximation.
pub const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;
