//! Host binary for TimeFold.
//!
//! Simulates a game server for the time keepers: a set of loaded worlds
//! whose clocks advance by one each host tick, a tick scheduler, and an
//! operator console on stdin.
//!
//! # Startup Sequence
//!
//! 1. Load host configuration from `timefold-host.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Load fold settings, load worlds, start time keepers
//! 4. Run the tick loop until `stop` or Ctrl-C
//! 5. Stop every time keeper

mod config;
mod console;
mod error;
mod host;

use std::path::Path;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::{HOST_CONFIG_PATH, HostConfig};
use crate::error::HostError;
use crate::host::Host;

/// Application entry point for the host.
///
/// # Errors
///
/// Returns an error if the host config cannot be loaded, or if the console
/// or the interrupt handler fails.
#[tokio::main]
async fn main() -> Result<(), HostError> {
    // 1. Load configuration. Logging is not up yet; its level comes from here.
    let config = HostConfig::load(Path::new(HOST_CONFIG_PATH))?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .init();

    info!(
        tick_interval_ms = config.tick_interval_ms,
        settings_path = %config.settings_path.display(),
        worlds = config.worlds.len(),
        "timefold-server starting"
    );

    // 3. Worlds and keepers.
    let mut host = Host::start(&config);
    info!(
        worlds = host.clock().len(),
        folded = host.registry().len(),
        "Worlds loaded, entering tick loop"
    );

    // 4. Tick loop.
    let result = run(&mut host, config.tick_interval_ms).await;

    // 5. Shutdown.
    host.shutdown();
    info!(now = host.scheduler().now(), "timefold-server shutdown complete");
    result
}

/// Drive host ticks and console lines until a stop request or Ctrl-C.
async fn run(host: &mut Host, tick_interval_ms: u64) -> Result<(), HostError> {
    let mut interval = tokio::time::interval(Duration::from_millis(tick_interval_ms.max(1)));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut stdin_open = true;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => host.tick(),
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    debug!("Console closed, running until interrupted");
                    stdin_open = false;
                    continue;
                };
                let reply = host.handle_line(&line);
                for text in &reply.lines {
                    stdout.write_all(text.as_bytes()).await?;
                    stdout.write_all(b"\n").await?;
                }
                stdout.flush().await?;
                if reply.stop {
                    return Ok(());
                }
            }
            signal = &mut ctrl_c => {
                signal?;
                info!("Interrupt received");
                return Ok(());
            }
        }
    }
}
