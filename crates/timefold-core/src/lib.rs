//! Day/night folding for simulated worlds.
//!
//! This crate stretches or compresses the day/night cycle of a world so that
//! a configured number of natural days and nights pass per folded cycle.
//!
//! # Modules
//!
//! - [`clock`] -- [`CycleClock`] adapter trait and the in-memory [`WorldTable`].
//! - [`config`] -- Loading `TimeFold.settings` into an immutable [`FoldConfig`].
//! - [`scheduler`] -- [`Scheduler`] trait, opaque task handles, [`TickScheduler`].
//! - [`keeper`] -- The per-world [`TimeKeeper`] state machine.
//! - [`registry`] -- [`KeeperRegistry`]: keeper lifecycle and config reloads.
//! - [`status`] -- Human-readable cycle status.
//! - [`sleep`] -- Bed rule for permanent-night worlds.
//! - [`command`] -- The `timefold` control command.
//!
//! [`CycleClock`]: clock::CycleClock
//! [`WorldTable`]: clock::WorldTable
//! [`FoldConfig`]: config::FoldConfig
//! [`Scheduler`]: scheduler::Scheduler
//! [`TickScheduler`]: scheduler::TickScheduler
//! [`TimeKeeper`]: keeper::TimeKeeper
//! [`KeeperRegistry`]: registry::KeeperRegistry

pub mod clock;
pub mod command;
pub mod config;
pub mod keeper;
pub mod registry;
pub mod scheduler;
pub mod sleep;
pub mod status;
