//! Error types for the host binary.
//!
//! [`HostError`] is the top-level error type that `main` propagates with `?`.
//! Fold settings problems never appear here: they degrade to natural time
//! inside the keeper registry instead.

/// Top-level error for the host binary.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Reading the host config or the console failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The host config is not valid YAML for [`HostConfig`].
    ///
    /// [`HostConfig`]: crate::config::HostConfig
    #[error("failed to parse host config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for HostError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Errors in a console line. Reported to the operator, never fatal.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConsoleError {
    /// Wrong arguments for a console command.
    #[error("usage: {usage}")]
    Usage {
        /// The correct form of the command.
        usage: &'static str,
    },

    /// A clock value that is not an integer.
    #[error("invalid time value: {value}")]
    InvalidTime {
        /// The rejected text.
        value: String,
    },

    /// An environment name that is not `normal`, `nether` or `the_end`.
    #[error("unknown environment: {name}")]
    UnknownEnvironment {
        /// The rejected text.
        name: String,
    },

    /// The first word is not a console command.
    #[error("unknown command: {name}")]
    UnknownCommand {
        /// The rejected text.
        name: String,
    },
}
