use crate::profile::{PowerProfile, TimeoutOverride, TimeoutTable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Top-level powerplan configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    pub powercfg: PowerCfgConfig,
    pub apply: ApplyConfig,
    pub timeouts: TimeoutsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerCfgConfig {
    /// Program and leading arguments used to reach the platform tool.
    pub command: Vec<String>,
}

impl Default for PowerCfgConfig {
    fn default() -> Self {
        Self {
            command: vec!["powercfg".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyConfig {
    /// Treat a failed timeout setting as a failed apply.
    pub strict: bool,
}

/// Per-profile timeout overrides, layered on the built-in tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutsConfig {
    pub high_performance: TimeoutOverride,
    pub balanced: TimeoutOverride,
    pub power_saver: TimeoutOverride,
}

impl TimeoutsConfig {
    pub fn for_profile(&self, profile: PowerProfile) -> &TimeoutOverride {
        match profile {
            PowerProfile::HighPerformance => &self.high_performance,
            PowerProfile::Balanced => &self.balanced,
            PowerProfile::PowerSaver => &self.power_saver,
        }
    }

    /// Effective timeouts for a profile.
    pub fn table(&self, profile: PowerProfile) -> TimeoutTable {
        profile.timeouts().with_overrides(self.for_profile(profile))
    }
}

/// Machine-wide config under `%ProgramData%`, when that variable is set.
fn system_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("ProgramData")?;
    Some(PathBuf::from(base).join("powerplan").join("config.toml"))
}

fn read_value(path: &Path) -> Option<toml::Value> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), "ignoring unparsable config: {}", e);
            None
        }
    }
}

fn load_system() -> Option<toml::Value> {
    read_value(&system_config_path()?)
}

/// Load the user config file (`<config_dir>/powerplan/config.toml`) if it exists.
fn load_user() -> Option<toml::Value> {
    let dir = dirs::config_dir()?;
    read_value(&dir.join("powerplan").join("config.toml"))
}

/// Recursively merge two TOML values. Tables are merged key-by-key;
/// all other types in `overlay` replace `base`.
fn merge_values(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_values(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load config from a specific path, ignoring system/user files.
fn load_from_path(path: &Path) -> PlanConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), "failed to parse config: {}", e);
            PlanConfig::default()
        }),
        Err(e) => {
            warn!(path = %path.display(), "failed to read config: {}", e);
            PlanConfig::default()
        }
    }
}

/// Load the merged config: system defaults, then user overrides.
/// If `override_path` is provided, use only that file instead.
pub fn load(override_path: Option<&PathBuf>) -> PlanConfig {
    if let Some(path) = override_path {
        return load_from_path(path);
    }

    let merged = match (load_system(), load_user()) {
        (Some(s), Some(u)) => Some(merge_values(s, u)),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    };

    match merged {
        Some(value) => value.try_into().unwrap_or_else(|e| {
            warn!("failed to deserialize config: {}", e);
            PlanConfig::default()
        }),
        None => PlanConfig::default(),
    }
}
