//! Logging setup.

use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use crate::error::{Result, ThereminError};

/// Install a stderr `tracing` subscriber
///
/// `level` is the default (`"info"`, `"debug"`, ...); `RUST_LOG` takes
/// precedence when set.
pub fn init(level: &str) -> Result<()> {
    let default_level: LevelFilter = level
        .parse()
        .map_err(|_| ThereminError::InvalidConfig(format!("Unknown log level '{}'", level)))?;

    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr) // stderr for logs, stdout for CLI output
        .with_target(false)
        .try_init()
        .map_err(|e| ThereminError::InvalidConfig(format!("Logging already initialised: {}", e)))
}
