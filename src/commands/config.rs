use anyhow::Result;
use clap::ArgMatches;
use colored::Colorize;

use super::load_config;
use crate::core::DashboardConfig;

pub fn handle_config(matches: &ArgMatches, sub_matches: &ArgMatches) -> Result<()> {
    match sub_matches.subcommand() {
        Some(("path", _)) => show_path(),
        Some(("show", _)) => show_config(matches),
        _ => {
            println!("Use 'matrix-monitor config --help' for more information.");
            Ok(())
        }
    }
}

fn show_path() -> Result<()> {
    let path = DashboardConfig::get_config_path()?;
    println!("{}", "Config file path:".white());
    println!("{}", path.display().to_string().cyan().bold());

    if !path.exists() {
        println!(
            "{}",
            "The file does not exist yet; defaults are in effect.".dimmed()
        );
    }

    Ok(())
}

fn show_config(matches: &ArgMatches) -> Result<()> {
    let config = redacted(load_config(matches)?);
    println!("{}", serde_json::to_string_pretty(&config)?);

    if let Err(e) = config.validate() {
        eprintln!("{}", format!("⚠️  {}", e).yellow());
    }

    Ok(())
}

/// Hide the API key when printing.
pub fn redacted(mut config: DashboardConfig) -> DashboardConfig {
    if config.news_api_key.is_some() {
        config.news_api_key = Some("********".to_string());
    }
    config
}
