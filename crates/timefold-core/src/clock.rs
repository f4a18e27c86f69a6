//! Cycle clock adapter: the only window the keepers have onto a world's time.
//!
//! [`CycleClock`] is the surface the keepers consume. [`WorldTable`] is the
//! in-memory implementation used by the host binary and the tests: it owns the
//! loaded worlds and advances every clock by one tick per host tick. Any
//! caller may write a clock at any moment; keepers detect such writes
//! themselves.

use std::collections::BTreeMap;

use timefold_types::{WorldId, WorldInfo, WorldTime};
use tracing::debug;

/// Read/write access to world clocks.
pub trait CycleClock {
    /// Current clock value of a world, or `None` if the world is not loaded.
    fn time(&self, world: WorldId) -> Option<WorldTime>;

    /// Overwrite a world's clock. Unknown worlds are ignored.
    fn set_time(&mut self, world: WorldId, time: WorldTime);
}

/// A loaded world and its clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldEntry {
    /// Descriptor of the loaded world.
    pub info: WorldInfo,
    /// Current clock value.
    pub time: WorldTime,
}

/// In-memory set of loaded worlds, keyed by identity.
#[derive(Debug, Default)]
pub struct WorldTable {
    worlds: BTreeMap<WorldId, WorldEntry>,
}

impl WorldTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a world with its clock at `time`.
    pub fn load(&mut self, info: WorldInfo, time: WorldTime) -> WorldId {
        let id = info.id;
        debug!(world = info.name, %id, %time, "World loaded");
        self.worlds.insert(id, WorldEntry { info, time });
        id
    }

    /// Unload a world, returning its descriptor.
    pub fn unload(&mut self, world: WorldId) -> Option<WorldInfo> {
        self.worlds.remove(&world).map(|entry| entry.info)
    }

    /// Descriptor of a loaded world.
    pub fn get(&self, world: WorldId) -> Option<&WorldInfo> {
        self.worlds.get(&world).map(|entry| &entry.info)
    }

    /// First loaded world with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<&WorldInfo> {
        self.worlds
            .values()
            .map(|entry| &entry.info)
            .find(|info| info.name == name)
    }

    /// All loaded worlds in identity order.
    pub fn worlds(&self) -> impl Iterator<Item = &WorldEntry> {
        self.worlds.values()
    }

    /// Number of loaded worlds.
    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    /// Whether no world is loaded.
    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }

    /// Let one tick of natural time pass in every world.
    pub fn advance(&mut self) {
        for entry in self.worlds.values_mut() {
            entry.time = entry.time.next();
        }
    }

    /// Let `ticks` ticks of natural time pass in every world.
    pub fn advance_by(&mut self, ticks: u64) {
        let step = i64::try_from(ticks).unwrap_or(i64::MAX);
        for entry in self.worlds.values_mut() {
            entry.time = WorldTime::new(i64::from(entry.time.ticks()).saturating_add(step));
        }
    }
}

impl CycleClock for WorldTable {
    fn time(&self, world: WorldId) -> Option<WorldTime> {
        self.worlds.get(&world).map(|entry| entry.time)
    }

    fn set_time(&mut self, world: WorldId, time: WorldTime) {
        if let Some(entry) = self.worlds.get_mut(&world) {
            entry.time = time;
        }
    }
}
