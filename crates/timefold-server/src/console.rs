//! Console line parsing.
//!
//! The console speaks for the server operator: it can run the `timefold`
//! command and also play the part of the rest of the world, loading and
//! unloading worlds, setting clocks behind the keepers' backs, and sending a
//! player to bed.

use timefold_types::{Environment, WorldTime};

use crate::error::ConsoleError;

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Blank line.
    Empty,
    /// `timefold [args]`.
    TimeFold(Vec<String>),
    /// `load <world> [environment]`.
    Load {
        /// World name.
        name: String,
        /// Environment, `normal` when omitted.
        environment: Environment,
    },
    /// `unload <world>`.
    Unload(String),
    /// `time <world> <value>`: an external clock change.
    SetTime {
        /// World name.
        name: String,
        /// New clock value.
        time: WorldTime,
    },
    /// `sleep <world>`: a player enters a bed.
    Sleep(String),
    /// `worlds`: list loaded worlds.
    Worlds,
    /// `stop`: shut down.
    Stop,
}

impl ConsoleCommand {
    /// Parse a console line.
    pub fn parse(line: &str) -> Result<Self, ConsoleError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&head, args)) = words.split_first() else {
            return Ok(Self::Empty);
        };

        match (head.to_lowercase().as_str(), args) {
            ("timefold" | "tf", args) => Ok(Self::TimeFold(
                args.iter().map(|arg| (*arg).to_owned()).collect(),
            )),
            ("load", [name]) => Ok(Self::Load {
                name: (*name).to_owned(),
                environment: Environment::Normal,
            }),
            ("load", [name, env]) => Ok(Self::Load {
                name: (*name).to_owned(),
                environment: Environment::from_name(env).ok_or_else(|| {
                    ConsoleError::UnknownEnvironment {
                        name: (*env).to_owned(),
                    }
                })?,
            }),
            ("load", _) => Err(ConsoleError::Usage {
                usage: "load <world> [normal|nether|the_end]",
            }),
            ("unload", [name]) => Ok(Self::Unload((*name).to_owned())),
            ("unload", _) => Err(ConsoleError::Usage {
                usage: "unload <world>",
            }),
            ("time", [name, value]) => {
                let raw: i64 = value.parse().map_err(|_err| ConsoleError::InvalidTime {
                    value: (*value).to_owned(),
                })?;
                Ok(Self::SetTime {
                    name: (*name).to_owned(),
                    time: WorldTime::new(raw),
                })
            }
            ("time", _) => Err(ConsoleError::Usage {
                usage: "time <world> <value>",
            }),
            ("sleep", [name]) => Ok(Self::Sleep((*name).to_owned())),
            ("sleep", _) => Err(ConsoleError::Usage {
                usage: "sleep <world>",
            }),
            ("worlds", []) => Ok(Self::Worlds),
            ("stop", []) => Ok(Self::Stop),
            _ => Err(ConsoleError::UnknownCommand {
                name: head.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_empty() {
        assert_eq!(ConsoleCommand::parse("   "), Ok(ConsoleCommand::Empty));
    }

    #[test]
    fn timefold_passes_arguments_through() {
        assert_eq!(
            ConsoleCommand::parse("timefold world1"),
            Ok(ConsoleCommand::TimeFold(vec!["world1".to_owned()]))
        );
        assert_eq!(
            ConsoleCommand::parse("TF"),
            Ok(ConsoleCommand::TimeFold(Vec::new()))
        );
    }

    #[test]
    fn load_with_environment() {
        assert_eq!(
            ConsoleCommand::parse("load hell nether"),
            Ok(ConsoleCommand::Load {
                name: "hell".to_owned(),
                environment: Environment::Nether,
            })
        );
        assert_eq!(
            ConsoleCommand::parse("load hell lava"),
            Err(ConsoleError::UnknownEnvironment {
                name: "lava".to_owned()
            })
        );
    }

    #[test]
    fn time_wraps_and_validates() {
        assert_eq!(
            ConsoleCommand::parse("time world 24500"),
            Ok(ConsoleCommand::SetTime {
                name: "world".to_owned(),
                time: WorldTime::from(500),
            })
        );
        assert!(matches!(
            ConsoleCommand::parse("time world noon"),
            Err(ConsoleError::InvalidTime { .. })
        ));
        assert!(matches!(
            ConsoleCommand::parse("time world"),
            Err(ConsoleError::Usage { .. })
        ));
    }

    #[test]
    fn unknown_commands_are_rejected() {
        assert_eq!(
            ConsoleCommand::parse("weather clear"),
            Err(ConsoleError::UnknownCommand {
                name: "weather".to_owned()
            })
        );
    }
}
