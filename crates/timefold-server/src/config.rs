//! Host configuration loaded from `timefold-host.yaml`.
//!
//! Every field has a default, so the file is optional. The fold settings
//! themselves live in a separate file whose path is configured here and can
//! be overridden with the `TIMEFOLD_SETTINGS` environment variable.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use timefold_core::config::DEFAULT_SETTINGS_PATH;
use timefold_types::Environment;

use crate::error::HostError;

/// Default location of the host config, relative to the working directory.
pub const HOST_CONFIG_PATH: &str = "timefold-host.yaml";

/// Top-level host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostConfig {
    /// Real-time milliseconds per host tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Path of the fold settings file.
    #[serde(default = "default_settings_path")]
    pub settings_path: PathBuf,

    /// Log level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Worlds loaded at startup.
    #[serde(default = "default_worlds")]
    pub worlds: Vec<WorldSpec>,
}

/// A world to load at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldSpec {
    /// World name, used to look up its fold ratio.
    pub name: String,

    /// Environment of the world.
    #[serde(default)]
    pub environment: Environment,

    /// Initial clock value (wrapped into the cycle).
    #[serde(default)]
    pub time: u32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            settings_path: default_settings_path(),
            log_level: default_log_level(),
            worlds: default_worlds(),
        }
    }
}

impl HostConfig {
    /// Load the host config from `path`, or use defaults if it does not exist.
    ///
    /// `TIMEFOLD_SETTINGS` overrides `settings_path` when set.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Io`] if an existing file cannot be read, or
    /// [`HostError::Yaml`] if it is not valid YAML.
    pub fn load(path: &Path) -> Result<Self, HostError> {
        let mut config = if path.exists() {
            Self::parse(&std::fs::read_to_string(path)?)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse host config from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, HostError> {
        // An empty document deserializes as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Override the settings path with `TIMEFOLD_SETTINGS` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("TIMEFOLD_SETTINGS") {
            self.settings_path = PathBuf::from(val);
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_tick_interval_ms() -> u64 {
    50
}

fn default_settings_path() -> PathBuf {
    PathBuf::from(DEFAULT_SETTINGS_PATH)
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_worlds() -> Vec<WorldSpec> {
    vec![
        WorldSpec {
            name: "world".to_owned(),
            environment: Environment::Normal,
            time: 0,
        },
        WorldSpec {
            name: "world_nether".to_owned(),
            environment: Environment::Nether,
            time: 0,
        },
        WorldSpec {
            name: "world_the_end".to_owned(),
            environment: Environment::TheEnd,
            time: 0,
        },
    ]
}
