//! The keeper registry: which worlds are folded, and by whom.
//!
//! The registry owns one [`TimeKeeper`] per folded world, keyed by
//! [`WorldId`] so two loaded worlds sharing a name never share a keeper. It
//! also owns the current [`FoldConfig`]; a reload stops every keeper, swaps
//! the whole configuration in one assignment, and starts fresh keepers from
//! the live clocks.

use std::collections::BTreeMap;
use std::sync::Arc;

use timefold_types::{WorldId, WorldInfo};
use tracing::{debug, info};

use crate::clock::CycleClock;
use crate::config::FoldConfig;
use crate::keeper::TimeKeeper;
use crate::scheduler::{DueTask, Scheduler, TickScheduler};

/// Active keepers and the configuration they run under.
#[derive(Debug)]
pub struct KeeperRegistry {
    /// Configuration shared with status reporting; replaced wholesale on reload.
    config: Arc<FoldConfig>,
    /// One keeper per folded world.
    keepers: BTreeMap<WorldId, TimeKeeper>,
}

impl KeeperRegistry {
    /// Create an empty registry running under `config`.
    pub fn new(config: FoldConfig) -> Self {
        Self {
            config: Arc::new(config),
            keepers: BTreeMap::new(),
        }
    }

    /// The configuration currently in effect.
    pub fn config(&self) -> &FoldConfig {
        &self.config
    }

    /// A shared handle to the configuration currently in effect.
    pub fn config_handle(&self) -> Arc<FoldConfig> {
        Arc::clone(&self.config)
    }

    /// Start folding a world.
    ///
    /// Worlds without a daylight cycle and worlds configured 1:1 are left
    /// alone. Returns `true` if the world is folded afterwards, including
    /// when it already was.
    pub fn add_world(
        &mut self,
        world: &WorldInfo,
        clock: &mut dyn CycleClock,
        scheduler: &mut dyn Scheduler,
    ) -> bool {
        if self.keepers.contains_key(&world.id) {
            return true;
        }
        if !world.environment.has_daylight_cycle() {
            debug!(world = world.name, environment = %world.environment, "No daylight cycle, not folding");
            return false;
        }
        let ratio = self.config.ratio(&world.name);
        if ratio.is_natural() {
            debug!(world = world.name, "Natural day/night cycle, not folding");
            return false;
        }

        let keeper = TimeKeeper::start(world.clone(), &self.config, clock, scheduler);
        info!(world = world.name, %ratio, "Time keeper started");
        self.keepers.insert(world.id, keeper);
        true
    }

    /// Stop folding a world. Returns `false` if it was not folded.
    pub fn remove_world(&mut self, world: WorldId, scheduler: &mut dyn Scheduler) -> bool {
        match self.keepers.remove(&world) {
            Some(mut keeper) => {
                keeper.stop(scheduler);
                info!(world = keeper.world().name, "Time keeper removed");
                true
            }
            None => false,
        }
    }

    /// The keeper folding a world, if any.
    pub fn keeper(&self, world: WorldId) -> Option<&TimeKeeper> {
        self.keepers.get(&world)
    }

    /// Number of folded worlds.
    pub fn len(&self) -> usize {
        self.keepers.len()
    }

    /// Whether no world is folded.
    pub fn is_empty(&self) -> bool {
        self.keepers.is_empty()
    }

    /// Route a due callback to its keeper. Callbacks for worlds that are no
    /// longer folded are dropped.
    pub fn dispatch(
        &mut self,
        task: DueTask,
        clock: &mut dyn CycleClock,
        scheduler: &mut dyn Scheduler,
    ) {
        match self.keepers.get_mut(&task.world) {
            Some(keeper) => keeper.fire(task.handle, &self.config, clock, scheduler),
            None => debug!(world = %task.world, "Dropping callback for unfolded world"),
        }
    }

    /// Fire every callback that is due on the scheduler's current tick.
    /// Returns the number of callbacks fired.
    pub fn run_due(&mut self, clock: &mut dyn CycleClock, scheduler: &mut TickScheduler) -> usize {
        let mut fired: usize = 0;
        while let Some(task) = scheduler.pop_due() {
            self.dispatch(task, clock, scheduler);
            fired = fired.saturating_add(1);
        }
        fired
    }

    /// Stop and discard every keeper.
    pub fn stop_all(&mut self, scheduler: &mut dyn Scheduler) {
        for keeper in self.keepers.values_mut() {
            keeper.stop(scheduler);
        }
        let stopped = self.keepers.len();
        self.keepers.clear();
        if stopped > 0 {
            info!(stopped, "All time keepers stopped");
        }
    }

    /// Stop every keeper, switch to `config`, and start keepers for `worlds`
    /// from their current clocks.
    pub fn reload<'a>(
        &mut self,
        config: FoldConfig,
        worlds: impl IntoIterator<Item = &'a WorldInfo>,
        clock: &mut dyn CycleClock,
        scheduler: &mut dyn Scheduler,
    ) {
        self.stop_all(scheduler);
        self.config = Arc::new(config);
        for world in worlds {
            self.add_world(world, clock, scheduler);
        }
        info!(folded = self.keepers.len(), "Time keepers reloaded");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use timefold_types::{Environment, FoldRatio, HeldPhase, WorldTime};

    use super::*;
    use crate::clock::WorldTable;

    fn setup(config: FoldConfig) -> (KeeperRegistry, WorldTable, TickScheduler) {
        (KeeperRegistry::new(config), WorldTable::new(), TickScheduler::new())
    }

    #[test]
    fn natural_and_skyless_worlds_are_skipped() {
        let config = FoldConfig::default().with_world("folded", FoldRatio::new(2.0, 2.0));
        let (mut registry, mut clock, mut scheduler) = setup(config);
        let natural = WorldInfo::new("plain", Environment::Normal);
        let nether = WorldInfo::new("folded", Environment::Nether);
        let folded = WorldInfo::new("folded", Environment::Normal);
        for world in [&natural, &nether, &folded] {
            clock.load(world.clone(), WorldTime::from(0));
        }

        assert!(!registry.add_world(&natural, &mut clock, &mut scheduler));
        assert!(!registry.add_world(&nether, &mut clock, &mut scheduler));
        assert!(registry.add_world(&folded, &mut clock, &mut scheduler));
        assert_eq!(registry.len(), 1);
        assert!(registry.keeper(folded.id).is_some());
        assert!(registry.keeper(natural.id).is_none());
    }

    #[test]
    fn add_is_idempotent() {
        let config = FoldConfig::default().with_defaults(FoldRatio::new(2.0, 1.0));
        let (mut registry, mut clock, mut scheduler) = setup(config);
        let world = WorldInfo::new("world", Environment::Normal);
        clock.load(world.clone(), WorldTime::from(100));

        assert!(registry.add_world(&world, &mut clock, &mut scheduler));
        assert!(registry.add_world(&world, &mut clock, &mut scheduler));
        assert_eq!(registry.len(), 1);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn lookup_is_by_identity_not_name() {
        let config = FoldConfig::default().with_defaults(FoldRatio::new(2.0, 1.0));
        let (mut registry, mut clock, mut scheduler) = setup(config);
        let first = WorldInfo::new("world", Environment::Normal);
        let second = WorldInfo::new("world", Environment::Normal);
        clock.load(first.clone(), WorldTime::from(100));
        clock.load(second.clone(), WorldTime::from(100));

        registry.add_world(&first, &mut clock, &mut scheduler);

        assert!(registry.keeper(first.id).is_some());
        assert!(registry.keeper(second.id).is_none());
        assert!(registry.add_world(&second, &mut clock, &mut scheduler));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn remove_cancels_pending_callback() {
        let config = FoldConfig::default().with_defaults(FoldRatio::new(2.0, 1.0));
        let (mut registry, mut clock, mut scheduler) = setup(config);
        let world = WorldInfo::new("world", Environment::Normal);
        clock.load(world.clone(), WorldTime::from(100));
        registry.add_world(&world, &mut clock, &mut scheduler);

        assert!(registry.remove_world(world.id, &mut scheduler));
        assert!(!registry.remove_world(world.id, &mut scheduler));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn run_due_fires_keepers() {
        let config = FoldConfig::default().with_defaults(FoldRatio::new(2.0, 3.0));
        let (mut registry, mut clock, mut scheduler) = setup(config);
        let world = WorldInfo::new("world", Environment::Normal);
        clock.load(world.clone(), WorldTime::from(500));
        registry.add_world(&world, &mut clock, &mut scheduler);

        let mut fired = 0;
        for _ in 0..200 {
            scheduler.advance();
            clock.advance();
            fired += registry.run_due(&mut clock, &mut scheduler);
        }

        assert_eq!(fired, 1);
        let keeper = registry.keeper(world.id).unwrap();
        assert_eq!(keeper.phase(), HeldPhase::Day);
        assert!((keeper.remaining_repetitions() - 1.0).abs() < f64::EPSILON);
        assert_eq!(clock.time(world.id), Some(WorldTime::from(700)));
    }

    #[test]
    fn reload_swaps_config_and_restarts() {
        let config = FoldConfig::default().with_defaults(FoldRatio::new(2.0, 3.0));
        let (mut registry, mut clock, mut scheduler) = setup(config);
        let world = WorldInfo::new("world", Environment::Normal);
        clock.load(world.clone(), WorldTime::from(500));
        registry.add_world(&world, &mut clock, &mut scheduler);
        let before = registry.config_handle();

        registry.reload(FoldConfig::default(), [&world], &mut clock, &mut scheduler);

        assert!(registry.is_empty());
        assert_eq!(scheduler.pending(), 0);
        assert!(registry.config().ratio("world").is_natural());
        assert_eq!(before.ratio("world"), FoldRatio::new(2.0, 3.0));
    }

    #[test]
    fn stop_all_clears_everything() {
        let config = FoldConfig::default().with_defaults(FoldRatio::new(0.0, 2.0));
        let (mut registry, mut clock, mut scheduler) = setup(config);
        for name in ["a", "b"] {
            let world = WorldInfo::new(name, Environment::Normal);
            clock.load(world.clone(), WorldTime::from(0));
            registry.add_world(&world, &mut clock, &mut scheduler);
        }
        assert_eq!(scheduler.pending(), 2);

        registry.stop_all(&mut scheduler);
        registry.stop_all(&mut scheduler);

        assert!(registry.is_empty());
        assert_eq!(scheduler.pending(), 0);
    }
}
