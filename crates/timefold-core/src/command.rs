//! The `timefold` control command.
//!
//! `timefold` with no argument reports the sender's own world; with one
//! argument it is `reload`, `version`, `help`, or a world name. Reload is
//! gated on [`RELOAD_PERMISSION`]. The host supplies world lookup, status
//! and the reload itself through [`CommandHost`].

use timefold_types::WorldInfo;

use crate::status::CycleStatus;

/// Permission required to reload the settings.
pub const RELOAD_PERMISSION: &str = "timefold.reload";

/// Name and version reported by `timefold version`.
pub const VERSION: &str = concat!("TimeFold v", env!("CARGO_PKG_VERSION"));

/// Usage lines reported by `timefold help` and on usage errors.
pub const USAGE: [&str; 5] = [
    "timefold - Shows the day/night cycle of your world",
    "timefold <world> - Shows the day/night cycle of a world",
    "timefold reload - Reloads the settings and restarts all time keepers",
    "timefold version - Shows the version",
    "timefold help - Shows this help",
];

/// Errors raised while parsing a command line.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    /// More arguments than any subcommand accepts.
    #[error("too many arguments ({count}), expected at most 1")]
    TooManyArguments {
        /// Number of arguments given.
        count: usize,
    },
}

/// A parsed `timefold` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Status of the sender's own world.
    OwnWorld,
    /// Status of a named world.
    World(String),
    /// Stop all keepers, reload settings, restart keepers.
    Reload,
    /// Report the version.
    Version,
    /// Report usage.
    Help,
}

impl Command {
    /// Parse the arguments following `timefold`. Keywords are case-insensitive.
    pub fn parse(args: &[&str]) -> Result<Self, CommandError> {
        match args {
            [] => Ok(Self::OwnWorld),
            [arg] if arg.eq_ignore_ascii_case("reload") => Ok(Self::Reload),
            [arg] if arg.eq_ignore_ascii_case("version") => Ok(Self::Version),
            [arg] if arg.eq_ignore_ascii_case("help") => Ok(Self::Help),
            [world] => Ok(Self::World((*world).to_owned())),
            _ => Err(CommandError::TooManyArguments { count: args.len() }),
        }
    }
}

/// Who issued a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSender {
    /// The world the sender stands in; consoles have none.
    pub world: Option<WorldInfo>,
    /// Granted permission names.
    pub permissions: Vec<String>,
}

impl CommandSender {
    /// The server console: no world, every permission.
    pub fn console() -> Self {
        Self {
            world: None,
            permissions: vec![RELOAD_PERMISSION.to_owned()],
        }
    }

    /// Whether the sender holds a permission.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

/// Host services a command needs.
pub trait CommandHost {
    /// Find a loaded world by name.
    fn find_world(&self, name: &str) -> Option<WorldInfo>;

    /// Describe the cycle of a loaded world.
    fn world_status(&self, world: &WorldInfo) -> CycleStatus;

    /// Stop every keeper, reload settings, and restart keepers.
    fn reload(&mut self);
}

/// Run a command and return the reply lines for the sender.
pub fn execute(command: &Command, sender: &CommandSender, host: &mut dyn CommandHost) -> Vec<String> {
    match command {
        Command::OwnWorld => match &sender.world {
            Some(world) => vec![host.world_status(world).to_string()],
            None => vec![
                "No world specified!".to_owned(),
                "Use \"timefold <worldname>\"".to_owned(),
            ],
        },
        Command::World(name) => match host.find_world(name) {
            Some(world) => vec![host.world_status(&world).to_string()],
            None => vec![format!("World {name} not found!")],
        },
        Command::Reload => {
            if sender.has_permission(RELOAD_PERMISSION) {
                host.reload();
                vec!["TimeFold reloaded".to_owned()]
            } else {
                vec!["You don't have permission to do this!".to_owned()]
            }
        }
        Command::Version => vec![VERSION.to_owned()],
        Command::Help => USAGE.iter().map(|line| (*line).to_owned()).collect(),
    }
}
