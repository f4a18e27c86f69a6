//! Shared type definitions for the TimeFold workspace.
//!
//! This crate is the single source of truth for the vocabulary shared by the
//! time keepers and the host: clock values, phase boundaries, fold ratios and
//! world identity.
//!
//! # Modules
//!
//! - [`cycle`] -- Phase boundary constants and the [`WorldTime`] clock value
//! - [`enums`] -- Held phase, four-way time of day, world environment
//! - [`ids`] -- Type-safe UUID wrapper for world identity
//! - [`structs`] -- Fold ratios and world descriptors

pub mod cycle;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use cycle::{
    CYCLE_LENGTH, DAY_DURATION, DAY_START, NIGHT_DURATION, NIGHT_START, SUNRISE_START,
    SUNSET_START, WorldTime,
};
pub use enums::{DayTime, Environment, HeldPhase};
pub use ids::WorldId;
pub use structs::{FoldRatio, WorldInfo};
