//! Fold settings: loading the `TimeFold.settings` file into an immutable
//! [`FoldConfig`].
//!
//! The file holds one record per line, `<world>:<days>:<nights>`, split from
//! the left into at most four fields. The special world name `[default]` sets
//! the fallback ratio for every world without its own line. A missing file is
//! created containing [`DEFAULT_SETTINGS`].
//!
//! Problems inside a line never abort loading: a malformed or negative count
//! becomes 1 with a warning, and a line without exactly three fields pins that
//! world to 1:1 with a warning. Only file I/O failures surface as
//! [`ConfigError`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use timefold_types::FoldRatio;
use tracing::{info, warn};

/// World name that sets the fallback ratio.
pub const DEFAULT_KEY: &str = "[default]";

/// Content written to a freshly created settings file.
pub const DEFAULT_SETTINGS: &str = "[default]:1:1";

/// Default location of the settings file, relative to the working directory.
pub const DEFAULT_SETTINGS_PATH: &str = "plugins/TimeFold/TimeFold.settings";

/// Errors that can occur while reading or creating the settings file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The settings file exists but could not be read.
    #[error("failed to read settings file {}: {source}", path.display())]
    Read {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The settings file was missing and could not be created.
    #[error("failed to create settings file {}: {source}", path.display())]
    Create {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Fold ratios for every configured world plus the fallback pair.
///
/// Immutable once loaded. A reload builds a new value and the owner swaps
/// the whole object, so readers never observe a half-applied file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FoldConfig {
    /// Ratio for worlds without their own line.
    defaults: FoldRatio,
    /// Per-world ratios keyed by world name.
    worlds: BTreeMap<String, FoldRatio>,
}

impl FoldConfig {
    /// Parse settings text. Never fails; bad lines are logged and replaced
    /// with safe values.
    pub fn parse(contents: &str) -> Self {
        let mut config = Self::default();
        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let (name, ratio) = parse_line(line);
            if name == DEFAULT_KEY {
                config.defaults = ratio;
            } else {
                config.worlds.insert(name.to_owned(), ratio);
            }
        }
        config
    }

    /// Load the settings file, creating it with [`DEFAULT_SETTINGS`] if it
    /// does not exist yet.
    ///
    /// A freshly created file yields the natural 1:1 configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Create`] if the missing file cannot be written,
    /// or [`ConfigError::Read`] if an existing file cannot be read.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            create_settings_file(path)?;
            info!(path = %path.display(), "TimeFold settings file created");
            return Ok(Self::parse(DEFAULT_SETTINGS));
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&contents);
        info!(
            path = %path.display(),
            worlds = config.worlds.len(),
            default = %config.defaults,
            "TimeFold settings loaded"
        );
        Ok(config)
    }

    /// Replace the fallback ratio.
    #[must_use]
    pub const fn with_defaults(mut self, ratio: FoldRatio) -> Self {
        self.defaults = ratio;
        self
    }

    /// Set the ratio of one world.
    #[must_use]
    pub fn with_world(mut self, name: &str, ratio: FoldRatio) -> Self {
        self.worlds.insert(name.to_owned(), ratio);
        self
    }

    /// The fold ratio in effect for a world name.
    pub fn ratio(&self, world: &str) -> FoldRatio {
        self.worlds.get(world).copied().unwrap_or(self.defaults)
    }

    /// The fallback ratio.
    pub const fn defaults(&self) -> FoldRatio {
        self.defaults
    }

    /// Number of worlds with their own line.
    pub fn world_count(&self) -> usize {
        self.worlds.len()
    }
}

/// Write [`DEFAULT_SETTINGS`] to `path`, creating parent directories.
fn create_settings_file(path: &Path) -> Result<(), ConfigError> {
    let create_err = |source| ConfigError::Create {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(create_err)?;
    }
    std::fs::write(path, DEFAULT_SETTINGS).map_err(create_err)
}

/// Parse one non-blank line into a world name and its ratio.
fn parse_line(line: &str) -> (&str, FoldRatio) {
    let fields: Vec<&str> = line.splitn(4, ':').collect();
    let &[name, days, nights] = fields.as_slice() else {
        let name = fields.first().copied().unwrap_or_default();
        warn!(world = name, "Misconfiguration found - Setting days:nights to 1:1");
        return (name, FoldRatio::NATURAL);
    };

    let days = parse_count(name, "days", days);
    let nights = parse_count(name, "nights", nights);
    if days <= 0.0 && nights <= 0.0 {
        warn!(world = name, "Misconfiguration found - Setting days:nights to 1:1");
        return (name, FoldRatio::NATURAL);
    }
    (name, FoldRatio::new(days, nights))
}

/// Parse a day or night count, falling back to 1 for anything unusable.
fn parse_count(world: &str, field: &str, raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        Ok(value) if value < 0.0 => {
            warn!(world, field, value, "Count is smaller than 0 - Setting it to 1");
            1.0
        }
        _ => {
            warn!(world, field, raw, "Couldn't parse count - Setting it to 1");
            1.0
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_worlds_and_default() {
        let config = FoldConfig::parse("[default]:2:1\nworld1:2:3\nworld2:0:5\n");
        assert_eq!(config.defaults(), FoldRatio::new(2.0, 1.0));
        assert_eq!(config.ratio("world1"), FoldRatio::new(2.0, 3.0));
        assert_eq!(config.ratio("world2"), FoldRatio::new(0.0, 5.0));
        assert_eq!(config.ratio("elsewhere"), FoldRatio::new(2.0, 1.0));
        assert_eq!(config.world_count(), 2);
    }

    #[test]
    fn empty_settings_are_natural() {
        let config = FoldConfig::parse("");
        assert!(config.ratio("world").is_natural());
    }

    #[test]
    fn malformed_days_default_to_one() {
        let config = FoldConfig::parse("badworld:abc:2");
        assert_eq!(config.ratio("badworld"), FoldRatio::new(1.0, 2.0));
    }

    #[test]
    fn negative_counts_clamp_to_one() {
        let config = FoldConfig::parse("w:-3:0.5");
        assert_eq!(config.ratio("w"), FoldRatio::new(1.0, 0.5));
    }

    #[test]
    fn non_finite_counts_are_malformed() {
        let config = FoldConfig::parse("w:NaN:inf");
        assert!(config.ratio("w").is_natural());
    }

    #[test]
    fn zero_zero_normalizes_to_natural() {
        let config = FoldConfig::parse("[default]:3:3\nvoid:0:0");
        assert!(config.ratio("void").is_natural());
    }

    #[test]
    fn wrong_field_count_pins_world_to_natural() {
        let config = FoldConfig::parse("[default]:4:4\nshort:2\nlong:1:2:3");
        assert!(config.ratio("short").is_natural());
        assert!(config.ratio("long").is_natural());
        assert_eq!(config.ratio("other"), FoldRatio::new(4.0, 4.0));
    }

    #[test]
    fn whitespace_and_fractions_are_accepted() {
        let config = FoldConfig::parse("  \nw: 2.5 : 0.25 \n");
        assert_eq!(config.ratio("w"), FoldRatio::new(2.5, 0.25));
    }

    #[test]
    fn later_lines_override_earlier_ones() {
        let config = FoldConfig::parse("w:2:2\nw:3:1");
        assert_eq!(config.ratio("w"), FoldRatio::new(3.0, 1.0));
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plugins").join("TimeFold").join("TimeFold.settings");

        let config = FoldConfig::load_or_create(&path).unwrap();

        assert!(config.defaults().is_natural());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_SETTINGS);
    }

    #[test]
    fn existing_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TimeFold.settings");
        std::fs::write(&path, "world1:2:3\n").unwrap();

        let config = FoldConfig::load_or_create(&path).unwrap();

        assert_eq!(config.ratio("world1"), FoldRatio::new(2.0, 3.0));
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory exists at the path but cannot be read as a file.
        let result = FoldConfig::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
