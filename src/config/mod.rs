//! Analysis Configuration Module
//!
//! Provides run configuration loaded from TOML files: the target application,
//! application thresholds, isolation-forest parameters, metric-provider
//! options and petrophysical constants.
//!
//! ## Loading Order
//!
//! 1. `GEOZONE_CONFIG` environment variable (path to TOML file)
//! 2. `geozone.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The configuration is passed explicitly to the analyzers; there is no
//! process-wide config instance.

mod geozone_config;
pub mod defaults;
pub mod validation;

pub use geozone_config::*;
