//! Bed rule for worlds without daylight.
//!
//! Sleeping skips to the next morning. In a permanent-night world that
//! morning never comes, so entering a bed is refused there.

use crate::config::FoldConfig;

/// Message shown when a bed is refused.
pub const ENDLESS_NIGHT: &str =
    "There is nothing but night in this world. You would never wake up again!";

/// Outcome of trying to enter a bed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BedVerdict {
    /// Sleep proceeds normally.
    Allowed,
    /// Sleep is cancelled; the message explains why.
    Refused(&'static str),
}

/// Decide whether a bed may be entered in the named world.
pub fn bed_enter(config: &FoldConfig, world: &str) -> BedVerdict {
    if config.ratio(world).is_permanent_night() {
        BedVerdict::Refused(ENDLESS_NIGHT)
    } else {
        BedVerdict::Allowed
    }
}

#[cfg(test)]
mod tests {
    use timefold_types::FoldRatio;

    use super::*;

    #[test]
    fn permanent_night_refuses_beds() {
        let config = FoldConfig::default().with_world("dark", FoldRatio::new(0.0, 4.0));
        assert_eq!(bed_enter(&config, "dark"), BedVerdict::Refused(ENDLESS_NIGHT));
        assert_eq!(bed_enter(&config, "light"), BedVerdict::Allowed);
    }

    #[test]
    fn permanent_day_still_allows_beds() {
        let config = FoldConfig::default().with_defaults(FoldRatio::new(3.0, 0.0));
        assert_eq!(bed_enter(&config, "world"), BedVerdict::Allowed);
    }
}
