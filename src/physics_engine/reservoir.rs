//! Reservoir and aquifer quality indices, plus hydrostatic/geothermal
//! fallbacks for readings a record does not carry.
//!
//! Units: porosity in percent, permeability in mD, depth in m, pressure in
//! MPa, temperature in °C, conductivity in m/s.

use crate::config::defaults::{EPI_DIVISOR, FCI_DIVISOR, GRAVITY_M_S2, MD_TO_M2, RQI_COEFFICIENT};
use crate::config::PhysicsConfig;

/// Reservoir Quality Index (Amaefule et al.)
///
/// Formula: RQI = 0.0314 × √(k / φ), φ as a fraction
///
/// ## Returns
/// RQI in µm. NaN if porosity is not positive or permeability is negative.
pub fn calculate_rqi(porosity_pct: f64, permeability_md: f64) -> f64 {
    let phi = porosity_pct / 100.0;
    if !phi.is_finite() || phi <= 0.0 || permeability_md < 0.0 {
        return f64::NAN;
    }
    RQI_COEFFICIENT * (permeability_md / phi).sqrt()
}

/// Hydraulic conductivity from intrinsic permeability
///
/// Formula: K = k × ρg / μ, with k converted from mD to m²
pub fn hydraulic_conductivity(permeability_md: f64, physics: &PhysicsConfig) -> f64 {
    permeability_md * MD_TO_M2 * physics.fluid_density_kg_m3 * GRAVITY_M_S2
        / physics.fluid_viscosity_pa_s
}

/// Hydrostatic pore pressure at depth (MPa).
pub fn hydrostatic_pressure(depth_m: f64, physics: &PhysicsConfig) -> f64 {
    depth_m * physics.pressure_gradient_mpa_per_m
}

/// Formation temperature from a linear geothermal gradient (°C).
pub fn geothermal_temperature(depth_m: f64, physics: &PhysicsConfig) -> f64 {
    physics.surface_temperature_c + physics.geothermal_gradient_c_per_m * depth_m
}

/// Empirical heat capacity ratio of the pore fluid.
///
/// Rises with temperature and falls with pressure; floored at 1.0.
pub fn heat_capacity_ratio(temperature_c: f64, pressure_mpa: f64) -> f64 {
    (1.0 + 0.0007 * temperature_c - 0.0005 * pressure_mpa).max(1.0)
}

/// Flow Capacity Index for aquifers: `k × φ% / 1000`.
pub fn flow_capacity_index(porosity_pct: f64, permeability_md: f64) -> f64 {
    permeability_md * porosity_pct / FCI_DIVISOR
}

/// Energy Potential Index for geothermal targets.
///
/// `k × φ% × gradient / 1e6`, gradient in °C/km.
pub fn energy_potential_index(
    porosity_pct: f64,
    permeability_md: f64,
    gradient_c_per_km: f64,
) -> f64 {
    permeability_md * porosity_pct * gradient_c_per_km / EPI_DIVISOR
}
