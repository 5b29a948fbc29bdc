use std::io;
use thiserror::Error;

/// Custom error type for the dashboard
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Headline fetch failed: {0}")]
    Fetch(String),

    #[error("Metric acquisition failed: {0}")]
    Acquisition(String),

    #[error("GPU not available: {0}")]
    GpuNotAvailable(String),

    #[error("TUI error: {0}")]
    Tui(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for the dashboard
pub type Result<T> = std::result::Result<T, MonitorError>;

impl MonitorError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        MonitorError::Config(msg.into())
    }

    /// Create a headline fetch error
    pub fn fetch<S: Into<String>>(msg: S) -> Self {
        MonitorError::Fetch(msg.into())
    }

    /// Create a metric acquisition error
    pub fn acquisition<S: Into<String>>(msg: S) -> Self {
        MonitorError::Acquisition(msg.into())
    }

    pub fn gpu_not_available<S: Into<String>>(msg: S) -> Self {
        MonitorError::GpuNotAvailable(msg.into())
    }

    pub fn tui<S: Into<String>>(msg: S) -> Self {
        MonitorError::Tui(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        MonitorError::Other(msg.into())
    }
}
