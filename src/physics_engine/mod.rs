//! Physics Engine Module
//!
//! Deterministic per-sample metric providers for well-log analysis.
//! All math here is pure petrophysics/statistics - no ML involved.
//!
//! ## Metric Providers
//! - `entropy()` - Heterogeneity of the porosity distribution (histogram or KDE)
//! - `fractal_dimension()` - Roughness of the porosity depth series (Higuchi or box counting)
//! - `calculate_rqi()` - Reservoir Quality Index
//! - `hydraulic_conductivity()` - Darcy permeability to m/s
//! - `hydrostatic_pressure()` / `geothermal_temperature()` - Fallbacks for missing readings
//! - `heat_capacity_ratio()`, `flow_capacity_index()`, `energy_potential_index()`
//!
//! Every provider is a pure function. Insufficient or degenerate input yields
//! NaN instead of an error.

pub mod entropy;
pub mod fractal;
pub mod reservoir;

pub use entropy::{entropy, kde_entropy, shannon_entropy};
pub use fractal::{box_counting_dimension, fractal_dimension, higuchi_dimension, least_squares_slope};
pub use reservoir::{
    calculate_rqi, energy_potential_index, flow_capacity_index, geothermal_temperature,
    heat_capacity_ratio, hydraulic_conductivity, hydrostatic_pressure,
};
