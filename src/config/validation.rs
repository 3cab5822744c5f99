//! Config validation: unknown-key detection with "did you mean?" hints and
//! physical range checks on petrophysical constants.
//!
//! The raw TOML is first parsed into a `toml::Value` and its dotted key paths
//! are compared against the known field set. Unknown keys only warn, so a
//! config written for a newer release still loads.

use std::collections::HashSet;

use super::GeozoneConfig;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)?;
        match &self.suggestion {
            Some(s) => write!(f, " (did you mean '{s}'?)"),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Every valid dotted key path of [`GeozoneConfig`].
///
/// Must be kept in step with the structs in `geozone_config.rs`.
pub fn known_config_keys() -> HashSet<&'static str> {
    [
        // [analysis]
        "analysis",
        "analysis.application",
        "analysis.skip_invalid_records",
        // [thresholds]
        "thresholds",
        "thresholds.trap_confidence",
        "thresholds.leak_risk",
        "thresholds.temperature_c",
        "thresholds.default_quality",
        "thresholds.quality_gate",
        "thresholds.quality_percentile",
        // [detector]
        "detector",
        "detector.contamination",
        "detector.n_trees",
        "detector.max_samples",
        "detector.seed",
        // [metrics]
        "metrics",
        "metrics.entropy_method",
        "metrics.entropy_min_samples",
        "metrics.fractal_method",
        "metrics.fractal_min_samples",
        "metrics.higuchi_k_max",
        // [physics]
        "physics",
        "physics.pressure_gradient_mpa_per_m",
        "physics.surface_temperature_c",
        "physics.geothermal_gradient_c_per_m",
        "physics.fluid_density_kg_m3",
        "physics.fluid_viscosity_pa_s",
    ]
    .into_iter()
    .collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Collect the dotted path of every key in a TOML tree, tables included.
///
/// `{ a = { b = 1 } }` yields `["a", "a.b"]`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let Some(table) = value.as_table() else {
        return Vec::new();
    };

    let mut keys = Vec::with_capacity(table.len());
    for (name, child) in table {
        let path = match prefix {
            "" => name.clone(),
            p => format!("{p}.{name}"),
        };
        if child.is_table() {
            let nested = walk_toml_keys(child, &path);
            keys.push(path);
            keys.extend(nested);
        } else {
            keys.push(path);
        }
    }
    keys
}

// ============================================================================
// Edit Distance
// ============================================================================

/// Levenshtein edit distance over chars, single-row DP.
fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(row[j + 1] + 1);
        }
    }
    row[b.len()]
}

/// Closest known key within edit distance 3, if any.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|k| (levenshtein(unknown, k), *k))
        .filter(|(dist, _)| *dist <= 3)
        // Tie-break on the key itself so the result does not depend on hash order
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation
// ============================================================================

/// Warnings for every key in `raw_toml` that [`GeozoneConfig`] does not know.
///
/// Unparseable TOML yields no warnings; serde reports the parse error.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Range checks on the physics section.
///
/// Returns (errors, warnings). Errors are values that would make a derived
/// field meaningless; warnings are merely unusual for sedimentary basins.
pub fn validate_physical_ranges(config: &GeozoneConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let p = &config.physics;

    // Viscosity is a divisor in the conductivity conversion
    if !p.fluid_viscosity_pa_s.is_finite() || p.fluid_viscosity_pa_s <= 0.0 {
        errors.push(format!(
            "physics.fluid_viscosity_pa_s = {} must be > 0",
            p.fluid_viscosity_pa_s
        ));
    }
    if !p.fluid_density_kg_m3.is_finite() || p.fluid_density_kg_m3 <= 0.0 {
        errors.push(format!(
            "physics.fluid_density_kg_m3 = {} must be > 0",
            p.fluid_density_kg_m3
        ));
    }
    if !p.pressure_gradient_mpa_per_m.is_finite() || p.pressure_gradient_mpa_per_m < 0.0 {
        errors.push(format!(
            "physics.pressure_gradient_mpa_per_m = {} must be >= 0",
            p.pressure_gradient_mpa_per_m
        ));
    }
    if !p.geothermal_gradient_c_per_m.is_finite() || !p.surface_temperature_c.is_finite() {
        errors.push("physics temperature constants must be finite".to_string());
    }

    let mut suspicious = |field: &str, value: f64, lo: f64, hi: f64, unit: &str| {
        if value.is_finite() && (value < lo || value > hi) {
            warnings.push(ValidationWarning {
                field: field.to_string(),
                message: format!("{field} = {value} is outside typical range ({lo}-{hi} {unit})"),
                suggestion: None,
            });
        }
    };

    // Hydrostatic ~0.0098, lithostatic ~0.023
    suspicious(
        "physics.pressure_gradient_mpa_per_m",
        p.pressure_gradient_mpa_per_m,
        0.005,
        0.025,
        "MPa/m",
    );
    suspicious(
        "physics.geothermal_gradient_c_per_m",
        p.geothermal_gradient_c_per_m,
        0.01,
        0.1,
        "°C/m",
    );
    suspicious(
        "physics.surface_temperature_c",
        p.surface_temperature_c,
        -50.0,
        60.0,
        "°C",
    );
    suspicious(
        "thresholds.temperature_c",
        config.thresholds.temperature_c,
        20.0,
        400.0,
        "°C",
    );

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
