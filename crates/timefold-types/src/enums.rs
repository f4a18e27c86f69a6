//! Enumeration types for the TimeFold workspace.

use serde::{Deserialize, Serialize};

/// The coarse phase a time keeper is currently stretching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeldPhase {
    /// Holding or advancing through daylight.
    Day,
    /// Holding or advancing through darkness.
    Night,
}

impl HeldPhase {
    /// The phase that follows this one.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Day => Self::Night,
            Self::Night => Self::Day,
        }
    }
}

/// The four visible intervals of the cycle, used for status reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayTime {
    /// `[DAY_START, SUNSET_START)`.
    Day,
    /// `[SUNSET_START, NIGHT_START)`.
    Sunset,
    /// `[NIGHT_START, SUNRISE_START)`.
    Night,
    /// `[SUNRISE_START, 24000)` and `[0, DAY_START)`.
    Sunrise,
}

/// The environment of a world. Only [`Environment::Normal`] has a day/night cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Overworld with sun and moon.
    #[default]
    Normal,
    /// No sky, no time.
    Nether,
    /// No sky, no time.
    TheEnd,
}

impl Environment {
    /// Whether the environment has a day/night cycle at all.
    pub const fn has_daylight_cycle(self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Parse a console or config name (`normal`, `nether`, `the_end`/`end`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "normal" | "overworld" => Some(Self::Normal),
            "nether" => Some(Self::Nether),
            "the_end" | "end" => Some(Self::TheEnd),
            _ => None,
        }
    }
}

impl core::fmt::Display for Environment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Normal => "normal",
            Self::Nether => "nether",
            Self::TheEnd => "the_end",
        };
        f.write_str(name)
    }
}
