//! Clock values and the fixed phase boundaries of the day/night cycle.
//!
//! The world clock is an integer tick in `[0, 24000)`. The boundaries below
//! are based on visible illumination rather than the nominal values
//! (0, 12000, 14000, 22000); they partition the cycle into four intervals:
//!
//! | Interval | Range                       |
//! |----------|-----------------------------|
//! | Day      | `[700, 11500)`              |
//! | Sunset   | `[11500, 13700)`            |
//! | Night    | `[13700, 21900)`            |
//! | Sunrise  | `[21900, 24000) ∪ [0, 700)` |

use serde::{Deserialize, Serialize};

use crate::enums::DayTime;

/// Number of ticks in one natural day/night cycle.
pub const CYCLE_LENGTH: u32 = 24_000;

/// First tick of full daylight.
pub const DAY_START: u32 = 700;

/// First tick of the sunset interval.
pub const SUNSET_START: u32 = 11_500;

/// First tick of full night.
pub const NIGHT_START: u32 = 13_700;

/// First tick of the sunrise interval.
pub const SUNRISE_START: u32 = 21_900;

/// Length of one natural day (`SUNSET_START - DAY_START`).
pub const DAY_DURATION: u32 = SUNSET_START - DAY_START;

/// Length of one natural night (`SUNRISE_START - NIGHT_START`).
pub const NIGHT_DURATION: u32 = SUNRISE_START - NIGHT_START;

/// A position on the day/night cycle, always in `[0, CYCLE_LENGTH)`.
///
/// Deserialized values are wrapped into the cycle like [`WorldTime::from`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u32")]
pub struct WorldTime(u32);

impl WorldTime {
    /// Wrap a raw tick value into the cycle. Negative values wrap backwards.
    pub fn new(raw: i64) -> Self {
        let wrapped = raw
            .checked_rem_euclid(i64::from(CYCLE_LENGTH))
            .unwrap_or(0);
        Self(u32::try_from(wrapped).unwrap_or(0))
    }

    /// Return the tick within the cycle.
    pub const fn ticks(self) -> u32 {
        self.0
    }

    /// Return the time one tick later, wrapping through 0.
    #[must_use]
    pub fn next(self) -> Self {
        Self::new(i64::from(self.0).saturating_add(1))
    }

    /// Number of ticks until the clock naturally reaches `target`.
    ///
    /// Returns 0 when already at `target`; wraps through 24000 otherwise.
    pub fn ticks_until(self, target: u32) -> u64 {
        let now = i64::from(self.0);
        let distance = i64::from(target)
            .saturating_sub(now)
            .checked_rem_euclid(i64::from(CYCLE_LENGTH))
            .unwrap_or(0);
        u64::try_from(distance).unwrap_or(0)
    }

    /// Classify the time into one of the four visible intervals.
    pub const fn day_time(self) -> DayTime {
        let time = self.0;
        if time >= DAY_START && time < SUNSET_START {
            DayTime::Day
        } else if time >= SUNSET_START && time < NIGHT_START {
            DayTime::Sunset
        } else if time >= NIGHT_START && time < SUNRISE_START {
            DayTime::Night
        } else {
            DayTime::Sunrise
        }
    }

    /// Whether the sky is lit: sunrise, day, or anything before sunset.
    pub const fn is_day(self) -> bool {
        self.0 >= SUNRISE_START || self.0 < SUNSET_START
    }
}

impl From<u32> for WorldTime {
    fn from(raw: u32) -> Self {
        Self::new(i64::from(raw))
    }
}

impl core::fmt::Display for WorldTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_match_boundaries() {
        assert_eq!(DAY_DURATION, 10_800);
        assert_eq!(NIGHT_DURATION, 8_200);
    }

    #[test]
    fn new_wraps_into_cycle() {
        assert_eq!(WorldTime::new(24_000).ticks(), 0);
        assert_eq!(WorldTime::new(24_700).ticks(), 700);
        assert_eq!(WorldTime::new(-1).ticks(), 23_999);
        assert_eq!(WorldTime::from(23_999).next().ticks(), 0);
    }

    #[test]
    fn ticks_until_wraps_through_zero() {
        assert_eq!(WorldTime::from(500).ticks_until(DAY_START), 200);
        assert_eq!(WorldTime::from(22_000).ticks_until(DAY_START), 2_700);
        assert_eq!(WorldTime::from(12_000).ticks_until(NIGHT_START), 1_700);
        assert_eq!(WorldTime::from(DAY_START).ticks_until(DAY_START), 0);
    }

    #[test]
    fn day_time_partitions_cycle() {
        assert_eq!(WorldTime::from(0).day_time(), DayTime::Sunrise);
        assert_eq!(WorldTime::from(699).day_time(), DayTime::Sunrise);
        assert_eq!(WorldTime::from(700).day_time(), DayTime::Day);
        assert_eq!(WorldTime::from(11_499).day_time(), DayTime::Day);
        assert_eq!(WorldTime::from(11_500).day_time(), DayTime::Sunset);
        assert_eq!(WorldTime::from(13_700).day_time(), DayTime::Night);
        assert_eq!(WorldTime::from(21_899).day_time(), DayTime::Night);
        assert_eq!(WorldTime::from(21_900).day_time(), DayTime::Sunrise);
    }

    #[test]
    fn is_day_covers_sunrise_and_day() {
        assert!(WorldTime::from(22_000).is_day());
        assert!(WorldTime::from(5_000).is_day());
        assert!(!WorldTime::from(11_500).is_day());
        assert!(!WorldTime::from(15_000).is_day());
    }

    #[test]
    fn deserialized_time_wraps_into_cycle() {
        let time: WorldTime = serde_yml::from_str("24700").unwrap_or_else(|_| WorldTime::from(1));
        assert_eq!(time.ticks(), 700);
    }
}
