//! Dashboard command handler.

use anyhow::{Context, Result};
use clap::ArgMatches;

use super::{build_samplers, load_config};
use crate::platform::SystemBrowser;
use crate::ui::{run_dashboard_app, DashboardApp};

/// Execute the run command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    config.validate()?;

    if config.news_api_key.is_none() {
        log::warn!("No NewsAPI key configured; the ticker shows RSS headlines only");
    }

    let app = DashboardApp {
        samplers: build_samplers(&config)?,
        schedule: config.schedule(),
        history_capacity: config.history_size,
        scheduler: config.scheduler_config(),
    };

    run_dashboard_app(app, &SystemBrowser::new()).context("Failed to run dashboard")
}
