//! Grid configuration support
//!
//! Loads settings from, in increasing priority:
//! - built-in defaults
//! - `~/.config/heatgrid/config.toml`
//! - `heatgrid.toml` in the working directory
//! - `HEATGRID_*` environment variables
//!
//! Command-line flags are applied on top by the CLI.
//!
//! # Configuration Format
//!
//! ```toml
//! # heatgrid.toml
//!
//! [intensity]
//! rule = "reached"        # or "ceiling"
//!
//! [history]
//! duplicates = "last-wins" # or "reject"
//!
//! [defaults]
//! format = "json"          # or "text"
//! unit = "commands"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::history::DuplicatePolicy;
use crate::intensity::BucketRule;

/// Project-level config file name
pub const CONFIG_FILENAME: &str = "heatgrid.toml";

const DEFAULT_FORMAT: &str = "json";
const DEFAULT_UNIT: &str = "commands";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GridConfig {
    #[serde(default)]
    pub intensity: IntensityConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub defaults: OutputDefaults,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct IntensityConfig {
    /// Bucket rule: "reached" (default) or "ceiling"
    pub rule: Option<BucketRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HistoryConfig {
    /// Duplicate dates: "last-wins" (default) or "reject"
    pub duplicates: Option<DuplicatePolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputDefaults {
    /// Output format: "json" (default) or "text"
    pub format: Option<String>,

    /// What the counts measure, used in captions (default: "commands")
    pub unit: Option<String>,
}

impl GridConfig {
    /// Load config from all sources for a run started in `dir`.
    pub fn load(dir: &Path) -> Self {
        let user_path = Self::user_config_path();
        let project_path = dir.join(CONFIG_FILENAME);
        Self::load_from(
            user_path.as_deref(),
            Some(project_path.as_path()),
            |key| std::env::var(key).ok(),
        )
    }

    /// Load config from explicit file locations and an environment lookup.
    pub fn load_from<F>(user_path: Option<&Path>, project_path: Option<&Path>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = GridConfig::default();

        for path in [user_path, project_path].into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            match load_toml_config(path) {
                Ok(file_config) => {
                    debug!("Loaded config from {}", path.display());
                    config.merge(file_config);
                }
                Err(e) => {
                    warn!("Failed to load {}: {:#}", path.display(), e);
                }
            }
        }

        // Environment variables override files
        if let Some(value) = env("HEATGRID_BUCKET_RULE") {
            match value.parse() {
                Ok(rule) => config.intensity.rule = Some(rule),
                Err(e) => warn!("Ignoring HEATGRID_BUCKET_RULE: {}", e),
            }
        }
        if let Some(value) = env("HEATGRID_DUPLICATES") {
            match value.parse() {
                Ok(policy) => config.history.duplicates = Some(policy),
                Err(e) => warn!("Ignoring HEATGRID_DUPLICATES: {}", e),
            }
        }
        if let Some(value) = env("HEATGRID_FORMAT") {
            config.defaults.format = Some(value);
        }

        config
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("heatgrid").join("config.toml"))
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: GridConfig) {
        if other.intensity.rule.is_some() {
            self.intensity.rule = other.intensity.rule;
        }
        if other.history.duplicates.is_some() {
            self.history.duplicates = other.history.duplicates;
        }
        if other.defaults.format.is_some() {
            self.defaults.format = other.defaults.format;
        }
        if other.defaults.unit.is_some() {
            self.defaults.unit = other.defaults.unit;
        }
    }

    pub fn bucket_rule(&self) -> BucketRule {
        self.intensity.rule.unwrap_or_default()
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.history.duplicates.unwrap_or_default()
    }

    pub fn format(&self) -> &str {
        self.defaults.format.as_deref().unwrap_or(DEFAULT_FORMAT)
    }

    pub fn unit(&self) -> &str {
        self.defaults.unit.as_deref().unwrap_or(DEFAULT_UNIT)
    }

    /// The same config with every default spelled out.
    pub fn effective(&self) -> GridConfig {
        GridConfig {
            intensity: IntensityConfig {
                rule: Some(self.bucket_rule()),
            },
            history: HistoryConfig {
                duplicates: Some(self.duplicate_policy()),
            },
            defaults: OutputDefaults {
                format: Some(self.format().to_string()),
                unit: Some(self.unit().to_string()),
            },
        }
    }

    /// Write an example `heatgrid.toml` into `dir` unless one exists.
    pub fn init_project_config(dir: &Path) -> Result<PathBuf> {
        let config_path = dir.join(CONFIG_FILENAME);
        if !config_path.exists() {
            let example = r#"# heatgrid configuration

[intensity]
# How log-scaled counts map to buckets 1-9:
#   "reached" - one bucket per percentile threshold reached (busiest day is always 9)
#   "ceiling" - first threshold at or above the day's value
# rule = "reached"

[history]
# Repeated dates in the input: "last-wins" or "reject"
# duplicates = "last-wins"

[defaults]
# Output format: "json" or "text"
# format = "json"
# What the counts measure, used in day captions
# unit = "commands"
"#;
            std::fs::write(&config_path, example)
                .with_context(|| format!("Failed to write {}", config_path.display()))?;
        }
        Ok(config_path)
    }
}

fn load_toml_config(path: &Path) -> Result<GridConfig> {
    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str(&content)?;
    Ok(config)
}
