//! The simulated host: loaded worlds, the scheduler, and the keepers.
//!
//! One [`Host`] value owns everything that the keepers touch, and every
//! mutation happens from the tick loop's single task, so keepers never race
//! each other or the console.

use std::path::{Path, PathBuf};

use timefold_core::clock::{CycleClock, WorldTable};
use timefold_core::command::{self, Command, CommandHost, CommandSender, USAGE};
use timefold_core::config::FoldConfig;
use timefold_core::registry::KeeperRegistry;
use timefold_core::scheduler::TickScheduler;
use timefold_core::sleep::{self, BedVerdict};
use timefold_core::status::{self, CycleStatus};
use timefold_types::{Environment, WorldId, WorldInfo, WorldTime};
use tracing::{error, info, warn};

use crate::config::HostConfig;
use crate::console::ConsoleCommand;

/// Reply to one console line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleReply {
    /// Lines to show the operator.
    pub lines: Vec<String>,
    /// Whether the host should shut down.
    pub stop: bool,
}

impl ConsoleReply {
    const fn lines(lines: Vec<String>) -> Self {
        Self { lines, stop: false }
    }

    fn line(line: impl Into<String>) -> Self {
        Self::lines(vec![line.into()])
    }
}

/// Worlds, scheduler and keepers of a running host.
#[derive(Debug)]
pub struct Host {
    clock: WorldTable,
    scheduler: TickScheduler,
    registry: KeeperRegistry,
    settings_path: PathBuf,
}

impl Host {
    /// Load the fold settings, load the configured worlds, and start keepers.
    pub fn start(config: &HostConfig) -> Self {
        let settings = load_settings(&config.settings_path).unwrap_or_default();
        let mut host = Self {
            clock: WorldTable::new(),
            scheduler: TickScheduler::new(),
            registry: KeeperRegistry::new(settings),
            settings_path: config.settings_path.clone(),
        };
        for world in &config.worlds {
            host.load_world(&world.name, world.environment, WorldTime::from(world.time));
        }
        host
    }

    /// One host tick: natural time advances, then due callbacks fire.
    pub fn tick(&mut self) {
        self.scheduler.advance();
        self.clock.advance();
        self.registry.run_due(&mut self.clock, &mut self.scheduler);
    }

    /// Load a world and fold it if configured.
    pub fn load_world(&mut self, name: &str, environment: Environment, time: WorldTime) -> WorldId {
        let info = WorldInfo::new(name, environment);
        let id = self.clock.load(info.clone(), time);
        self.registry
            .add_world(&info, &mut self.clock, &mut self.scheduler);
        id
    }

    /// Unload a world by name, stopping its keeper first.
    pub fn unload_world(&mut self, name: &str) -> bool {
        let Some(id) = self.clock.find_by_name(name).map(|w| w.id) else {
            return false;
        };
        self.registry.remove_world(id, &mut self.scheduler);
        self.clock.unload(id).is_some()
    }

    /// Stop every keeper. Clocks stay where they were last pinned.
    pub fn shutdown(&mut self) {
        self.registry.stop_all(&mut self.scheduler);
        info!(worlds = self.clock.len(), "Host stopped");
    }

    /// The world table.
    pub const fn clock(&self) -> &WorldTable {
        &self.clock
    }

    /// The keeper registry.
    pub const fn registry(&self) -> &KeeperRegistry {
        &self.registry
    }

    /// The scheduler.
    pub const fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    /// Run one console line.
    pub fn handle_line(&mut self, line: &str) -> ConsoleReply {
        let command = match ConsoleCommand::parse(line) {
            Ok(command) => command,
            Err(err) => return ConsoleReply::line(err.to_string()),
        };

        match command {
            ConsoleCommand::Empty => ConsoleReply::default(),
            ConsoleCommand::TimeFold(args) => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                match Command::parse(&args) {
                    Ok(command) => {
                        ConsoleReply::lines(command::execute(&command, &CommandSender::console(), self))
                    }
                    Err(err) => {
                        let mut lines = vec![err.to_string()];
                        lines.extend(USAGE.iter().map(|line| (*line).to_owned()));
                        ConsoleReply::lines(lines)
                    }
                }
            }
            ConsoleCommand::Load { name, environment } => {
                if self.clock.find_by_name(&name).is_some() {
                    return ConsoleReply::line(format!("World {name} is already loaded"));
                }
                self.load_world(&name, environment, WorldTime::from(0));
                ConsoleReply::line(format!("Loaded {environment} world {name}"))
            }
            ConsoleCommand::Unload(name) => {
                if self.unload_world(&name) {
                    ConsoleReply::line(format!("Unloaded world {name}"))
                } else {
                    ConsoleReply::line(format!("World {name} not found!"))
                }
            }
            ConsoleCommand::SetTime { name, time } => {
                let Some(id) = self.clock.find_by_name(&name).map(|w| w.id) else {
                    return ConsoleReply::line(format!("World {name} not found!"));
                };
                self.clock.set_time(id, time);
                ConsoleReply::line(format!("Set the time of {name} to {time}"))
            }
            ConsoleCommand::Sleep(name) => self.sleep(&name),
            ConsoleCommand::Worlds => ConsoleReply::lines(
                self.clock
                    .worlds()
                    .map(|entry| {
                        format!(
                            "{} ({}) time {}: {}",
                            entry.info.name,
                            entry.info.environment,
                            entry.time,
                            self.world_status(&entry.info)
                        )
                    })
                    .collect(),
            ),
            ConsoleCommand::Stop => ConsoleReply {
                lines: vec!["Stopping".to_owned()],
                stop: true,
            },
        }
    }

    /// A player enters a bed. Sleeping through the night sets the clock to
    /// morning, which the keeper sees as an external change.
    fn sleep(&mut self, name: &str) -> ConsoleReply {
        let Some(world) = self.clock.find_by_name(name).cloned() else {
            return ConsoleReply::line(format!("World {name} not found!"));
        };
        if let BedVerdict::Refused(reason) = sleep::bed_enter(self.registry.config(), name) {
            return ConsoleReply::line(reason);
        }
        match self.clock.time(world.id) {
            Some(time) if !time.is_day() && world.environment.has_daylight_cycle() => {
                self.clock.set_time(world.id, WorldTime::from(0));
                ConsoleReply::line("You slept through the night")
            }
            _ => ConsoleReply::line("You can only sleep at night"),
        }
    }
}

impl CommandHost for Host {
    fn find_world(&self, name: &str) -> Option<WorldInfo> {
        self.clock.find_by_name(name).cloned()
    }

    fn world_status(&self, world: &WorldInfo) -> CycleStatus {
        status::cycle_status(world, &self.registry, &self.clock)
    }

    fn reload(&mut self) {
        let settings = load_settings(&self.settings_path).unwrap_or_else(|| {
            warn!("Keeping the previous TimeFold settings");
            self.registry.config().clone()
        });
        let worlds: Vec<WorldInfo> = self.clock.worlds().map(|e| e.info.clone()).collect();
        self.registry
            .reload(settings, &worlds, &mut self.clock, &mut self.scheduler);
    }
}

/// Load the fold settings, logging failures. `None` means the file could not
/// be read or created.
fn load_settings(path: &Path) -> Option<FoldConfig> {
    match FoldConfig::load_or_create(path) {
        Ok(settings) => Some(settings),
        Err(err) => {
            error!(error = %err, "Can't load the TimeFold settings, time stays natural");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use timefold_types::{DAY_START, NIGHT_START};

    use super::*;
    use crate::config::WorldSpec;

    fn host_with(settings: &str, worlds: Vec<WorldSpec>) -> (Host, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let settings_path = dir.path().join("TimeFold.settings");
        std::fs::write(&settings_path, settings).unwrap();
        let config = HostConfig {
            settings_path,
            worlds,
            ..HostConfig::default()
        };
        (Host::start(&config), dir)
    }

    fn world(name: &str, time: u32) -> WorldSpec {
        WorldSpec {
            name: name.to_owned(),
            environment: Environment::Normal,
            time,
        }
    }

    fn time_of(host: &Host, name: &str) -> u32 {
        let id = host.clock().find_by_name(name).unwrap().id;
        host.clock().time(id).unwrap().ticks()
    }

    #[test]
    fn start_folds_configured_worlds_only() {
        let (host, _dir) = host_with("world1:2:3", vec![world("world1", 500), world("plain", 0)]);
        assert_eq!(host.registry().len(), 1);
        assert_eq!(host.scheduler().pending(), 1);
    }

    #[test]
    fn missing_settings_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let settings_path = dir.path().join("plugins").join("TimeFold.settings");
        let config = HostConfig {
            settings_path: settings_path.clone(),
            worlds: vec![world("world", 0)],
            ..HostConfig::default()
        };
        let host = Host::start(&config);
        assert!(settings_path.exists());
        assert!(host.registry().is_empty());
    }

    #[test]
    fn ticks_drive_the_keeper() {
        let (mut host, _dir) = host_with("world1:2:3", vec![world("world1", 500)]);
        for _ in 0..200 {
            host.tick();
        }
        assert_eq!(time_of(&host, "world1"), DAY_START);
    }

    #[test]
    fn status_command_for_named_world() {
        let (mut host, _dir) = host_with("world1:2:3", vec![world("world1", 5_000)]);
        let reply = host.handle_line("timefold world1");
        assert_eq!(reply.lines, vec!["It's day 1 of 2".to_owned()]);
        let missing = host.handle_line("timefold nowhere");
        assert_eq!(missing.lines, vec!["World nowhere not found!".to_owned()]);
    }

    #[test]
    fn reload_picks_up_new_settings() {
        let (mut host, dir) = host_with("world1:2:3", vec![world("world1", 500)]);
        std::fs::write(dir.path().join("TimeFold.settings"), "world1:0:4").unwrap();

        let reply = host.handle_line("timefold reload");

        assert_eq!(reply.lines, vec!["TimeFold reloaded".to_owned()]);
        assert_eq!(time_of(&host, "world1"), NIGHT_START);
        assert_eq!(host.scheduler().pending(), 1);
    }

    #[test]
    fn external_time_set_is_corrected() {
        let (mut host, _dir) = host_with("world1:2:3", vec![world("world1", 500)]);
        host.handle_line("time world1 3500");
        for _ in 0..200 {
            host.tick();
        }
        // 3500 + 200 is mid-day: the keeper resynchronizes and pins day start.
        assert_eq!(time_of(&host, "world1"), DAY_START);
        assert_eq!(host.scheduler().pending(), 1);
    }

    #[test]
    fn beds_are_refused_in_endless_night() {
        let (mut host, _dir) = host_with("dark:0:3", vec![world("dark", 0), world("light", 15_000)]);
        let refused = host.handle_line("sleep dark");
        assert_eq!(refused.lines, vec![sleep::ENDLESS_NIGHT.to_owned()]);

        let slept = host.handle_line("sleep light");
        assert_eq!(slept.lines, vec!["You slept through the night".to_owned()]);
        assert_eq!(time_of(&host, "light"), 0);
    }

    #[test]
    fn load_and_unload_manage_keepers() {
        let (mut host, _dir) = host_with("[default]:3:1", vec![]);
        host.handle_line("load extra");
        assert_eq!(host.registry().len(), 1);
        host.handle_line("load hell nether");
        assert_eq!(host.registry().len(), 1);

        let reply = host.handle_line("unload extra");
        assert_eq!(reply.lines, vec!["Unloaded world extra".to_owned()]);
        assert!(host.registry().is_empty());
        assert_eq!(host.scheduler().pending(), 0);
    }

    #[test]
    fn stop_requests_shutdown() {
        let (mut host, _dir) = host_with("[default]:2:2", vec![world("world", 0)]);
        assert!(host.handle_line("stop").stop);
        host.shutdown();
        host.shutdown();
        assert!(host.registry().is_empty());
        assert_eq!(host.scheduler().pending(), 0);
    }

    #[test]
    fn usage_errors_are_reported() {
        let (mut host, _dir) = host_with("", vec![]);
        let reply = host.handle_line("timefold a b");
        assert_eq!(reply.lines.len(), USAGE.len() + 1);
        let reply = host.handle_line("bogus");
        assert_eq!(reply.lines, vec!["unknown command: bogus".to_owned()]);
    }
}
