//! Configuration module for heatgrid
//!
//! This module handles:
//! - User-level and project-level configuration (heatgrid.toml)
//! - Environment overrides
//! - Bucket rule, duplicate policy and output defaults

mod grid_config;

pub use grid_config::{
    GridConfig,
    HistoryConfig,
    IntensityConfig,
    OutputDefaults,
    CONFIG_FILENAME,
};
