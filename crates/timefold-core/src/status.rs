//! Human-readable cycle status for a world.
//!
//! The status combines the configured ratio, the keeper's countdown and the
//! four-way phase of the live clock. It never touches keeper state.

use timefold_types::{DayTime, Environment, HeldPhase, WorldInfo};

use crate::clock::CycleClock;
use crate::registry::KeeperRegistry;

/// What a world's day/night cycle is currently doing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleStatus {
    /// The environment has no sky.
    NoTime(Environment),
    /// Configured with zero nights.
    AlwaysDay,
    /// Configured with zero days.
    AlwaysNight,
    /// Configured 1:1.
    Natural,
    /// Folded by configuration, but no keeper is running for this world.
    Inactive,
    /// Inside a folded day.
    Day {
        /// Which of the configured days this is, starting at 1.
        current: u32,
        /// Configured days per folded day.
        of: f64,
    },
    /// Inside a folded night.
    Night {
        /// Which of the configured nights this is, starting at 1.
        current: u32,
        /// Configured nights per folded night.
        of: f64,
    },
    /// The sun is rising.
    Sunrise,
    /// The sun is setting.
    Sunset,
}

/// Number of the repetition in progress: `ceil(configured - remaining)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn current_repetition(configured: f64, remaining: f64) -> u32 {
    (configured - remaining).ceil().max(0.0) as u32
}

/// Describe the cycle of `world`.
pub fn cycle_status(
    world: &WorldInfo,
    registry: &KeeperRegistry,
    clock: &dyn CycleClock,
) -> CycleStatus {
    if !world.environment.has_daylight_cycle() {
        return CycleStatus::NoTime(world.environment);
    }

    let ratio = registry.config().ratio(&world.name);
    if ratio.is_permanent_day() {
        return CycleStatus::AlwaysDay;
    }
    if ratio.is_permanent_night() {
        return CycleStatus::AlwaysNight;
    }
    if ratio.is_natural() {
        return CycleStatus::Natural;
    }

    let Some(keeper) = registry.keeper(world.id) else {
        return CycleStatus::Inactive;
    };
    let Some(day_time) = keeper.day_time(clock) else {
        return CycleStatus::Inactive;
    };

    let remaining = keeper.remaining_repetitions();
    match day_time {
        DayTime::Day => CycleStatus::Day {
            current: current_repetition(ratio.repetitions(HeldPhase::Day), remaining),
            of: ratio.days,
        },
        DayTime::Night => CycleStatus::Night {
            current: current_repetition(ratio.repetitions(HeldPhase::Night), remaining),
            of: ratio.nights,
        },
        DayTime::Sunrise => CycleStatus::Sunrise,
        DayTime::Sunset => CycleStatus::Sunset,
    }
}

impl core::fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoTime(Environment::Nether) => f.write_str("There is no time in the Nether!"),
            Self::NoTime(Environment::TheEnd) => f.write_str("There is no time in the End!"),
            Self::NoTime(Environment::Normal) | Self::Natural => {
                f.write_str("Normal day/night cycle. Look up in the sky!")
            }
            Self::AlwaysDay => f.write_str("It's day all the time."),
            Self::AlwaysNight => f.write_str("It's always night."),
            Self::Inactive => f.write_str("No time keeper is active in this world."),
            Self::Day { current, of } => write!(f, "It's day {current} of {of}"),
            Self::Night { current, of } => write!(f, "It's night {current} of {of}"),
            Self::Sunrise => f.write_str("It's sunrise"),
            Self::Sunset => f.write_str("It's sunset"),
        }
    }
}
