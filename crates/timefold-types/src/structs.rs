//! Core value structs: fold ratios and world descriptors.

use serde::{Deserialize, Serialize};

use crate::enums::{Environment, HeldPhase};
use crate::ids::WorldId;

/// How many natural days and nights one folded day and night last.
///
/// `(1, 1)` is the natural cycle. `days == 0` means permanent night and
/// `nights == 0` means permanent day. Both values are finite and non-negative
/// once they come out of the configuration loader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoldRatio {
    /// Natural day lengths per folded day.
    pub days: f64,
    /// Natural night lengths per folded night.
    pub nights: f64,
}

impl FoldRatio {
    /// The unfolded 1:1 cycle.
    pub const NATURAL: Self = Self {
        days: 1.0,
        nights: 1.0,
    };

    /// Create a ratio from explicit counts.
    pub const fn new(days: f64, nights: f64) -> Self {
        Self { days, nights }
    }

    /// Whether this is exactly the natural 1:1 cycle.
    pub fn is_natural(&self) -> bool {
        (self.days - 1.0).abs() < f64::EPSILON && (self.nights - 1.0).abs() < f64::EPSILON
    }

    /// No night ever falls.
    pub fn is_permanent_day(&self) -> bool {
        self.nights <= 0.0
    }

    /// The sun never rises.
    pub fn is_permanent_night(&self) -> bool {
        self.days <= 0.0
    }

    /// The configured repetition count for a phase.
    pub const fn repetitions(&self, phase: HeldPhase) -> f64 {
        match phase {
            HeldPhase::Day => self.days,
            HeldPhase::Night => self.nights,
        }
    }
}

impl Default for FoldRatio {
    fn default() -> Self {
        Self::NATURAL
    }
}

impl core::fmt::Display for FoldRatio {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.days, self.nights)
    }
}

/// A loaded world as seen by the keeper registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldInfo {
    /// Identity of this loaded instance.
    pub id: WorldId,
    /// Name used to look up the fold ratio.
    pub name: String,
    /// Environment; only normal worlds get a keeper.
    pub environment: Environment,
}

impl WorldInfo {
    /// Describe a freshly loaded world with a new identity.
    pub fn new(name: impl Into<String>, environment: Environment) -> Self {
        Self {
            id: WorldId::new(),
            name: name.into(),
            environment,
        }
    }
}
