use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::dashboard::sources::DEFAULT_RSS_URL;
use crate::core::dashboard::{SamplerSchedule, SchedulerConfig};
use crate::error::MonitorError;

pub const API_KEY_ENV: &str = "NEWS_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Rain tick period
    pub rain_interval_ms: u64,
    /// Panel bounce and ticker scroll period
    pub motion_interval_ms: u64,
    pub metrics_interval_ms: u64,
    pub network_interval_ms: u64,
    pub news_interval_secs: u64,
    /// Number of throughput samples kept for the chart
    pub history_size: usize,
    pub top_processes: usize,
    pub cell_width: u16,
    pub cell_height: u16,
    /// Opened when the ticker is clicked
    pub news_link: String,
    pub news_api_key: Option<String>,
    pub news_country: String,
    pub rss_url: String,
    pub http_timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            rain_interval_ms: 10,
            motion_interval_ms: 20,
            metrics_interval_ms: 1000,
            network_interval_ms: 1000,
            news_interval_secs: 30,
            history_size: 50,
            top_processes: 5,
            cell_width: 1,
            cell_height: 1,
            news_link: "https://news.google.com".to_string(),
            news_api_key: None,
            news_country: "de".to_string(),
            rss_url: DEFAULT_RSS_URL.to_string(),
            http_timeout_secs: 10,
        }
    }
}

impl DashboardConfig {
    /// Load from the default location, falling back to defaults.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load from `path`. A missing, empty or unparseable file yields the
    /// defaults; only an unreadable file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if !path.exists() {
            DashboardConfig::default()
        } else {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;

            if data.trim().is_empty() {
                DashboardConfig::default()
            } else {
                serde_json::from_str(&data).unwrap_or_else(|e| {
                    log::warn!("Ignoring unparseable config {:?}: {}", path, e);
                    DashboardConfig::default()
                })
            }
        };

        config.apply_env();
        Ok(config)
    }

    /// Fill the API key from the environment when the file has none.
    pub fn apply_env(&mut self) {
        if self.news_api_key.is_none() {
            self.news_api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data = serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        fs::write(path, data)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("matrix-monitor").join("config.json"))
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> crate::error::Result<()> {
        let periods = [
            ("rain_interval_ms", self.rain_interval_ms),
            ("motion_interval_ms", self.motion_interval_ms),
            ("metrics_interval_ms", self.metrics_interval_ms),
            ("network_interval_ms", self.network_interval_ms),
            ("news_interval_secs", self.news_interval_secs),
            ("http_timeout_secs", self.http_timeout_secs),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, value)| *value == 0) {
            return Err(MonitorError::config(format!("{} must be greater than 0", name)));
        }

        if self.history_size < 2 {
            return Err(MonitorError::config("history_size must be at least 2"));
        }

        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(MonitorError::config("cell sizes must be at least 1"));
        }

        Ok(())
    }

    pub fn schedule(&self) -> SamplerSchedule {
        SamplerSchedule {
            metrics: Duration::from_millis(self.metrics_interval_ms),
            network: Duration::from_millis(self.network_interval_ms),
            headlines: Duration::from_secs(self.news_interval_secs),
        }
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            rain_period: Duration::from_millis(self.rain_interval_ms),
            motion_period: Duration::from_millis(self.motion_interval_ms),
            cell_width: self.cell_width,
            cell_height: self.cell_height,
            news_link: self.news_link.clone(),
            seed: None,
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
