// Matrix Monitor Library - Public API

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

// Re-export error types
pub mod error;
pub use error::{MonitorError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use core::config::DashboardConfig;

/// Default log file: `<cache_dir>/matrix-monitor/matrix-monitor.log`.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("matrix-monitor").join("matrix-monitor.log"))
}

// Initialize logging
//
// The dashboard owns the terminal, so records go to a file. RUST_LOG
// overrides the default `warn` level.
pub fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let path = match log_file {
        Some(path) => path.to_path_buf(),
        None => match default_log_path() {
            Some(path) => path,
            None => return Ok(()),
        },
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .map_err(|e| MonitorError::other(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}
