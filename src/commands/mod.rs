// Command handlers module
pub mod config;
pub mod run;
pub mod snapshot;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Arg, ArgMatches, Command};

use crate::core::dashboard::{HeadlineAggregator, MetricSampler, NetworkSampler, Samplers, SysinfoProbe};
use crate::core::dashboard::sources::{NewsApiSource, RssFeedSource};
use crate::core::DashboardConfig;

// Re-exports for cleaner imports
pub use run::execute as run;
pub use snapshot::execute as snapshot;

/// The command-line interface.
pub fn build_cli() -> Command {
    Command::new("matrix-monitor")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Matrix rain system dashboard with live metrics and a news ticker")
        .arg(
            Arg::new("metrics-interval")
                .long("metrics-interval")
                .value_name("MS")
                .help("Metric sampling period in milliseconds")
                .value_parser(clap::value_parser!(u64))
                .global(true),
        )
        .arg(
            Arg::new("news-interval")
                .long("news-interval")
                .value_name("SECS")
                .help("Headline refresh period in seconds")
                .value_parser(clap::value_parser!(u64))
                .global(true),
        )
        .arg(
            Arg::new("history")
                .long("history")
                .value_name("N")
                .help("Number of throughput samples shown in the chart")
                .value_parser(clap::value_parser!(usize))
                .global(true),
        )
        .arg(
            Arg::new("api-key")
                .long("api-key")
                .value_name("KEY")
                .help("NewsAPI key (defaults to $NEWS_API_KEY)")
                .global(true),
        )
        .arg(
            Arg::new("rss-url")
                .long("rss-url")
                .value_name("URL")
                .help("RSS feed for the ticker")
                .global(true),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .help("Write logs to PATH instead of the cache directory")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .subcommand(Command::new("run").about("Start the dashboard (default)"))
        .subcommand(
            Command::new("config")
                .about("Inspect configuration (use 'matrix-monitor config --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("path").about("Print the config file location"))
                .subcommand(Command::new("show").about("Print the effective configuration as JSON")),
        )
        .subcommand(
            Command::new("snapshot")
                .about("Sample metrics and throughput once and print them as JSON"),
        )
}

/// Load the config file and apply command-line overrides.
pub fn load_config(matches: &ArgMatches) -> Result<DashboardConfig> {
    let mut config = DashboardConfig::load()?;
    apply_overrides(&mut config, matches);
    Ok(config)
}

pub fn apply_overrides(config: &mut DashboardConfig, matches: &ArgMatches) {
    if let Some(ms) = matches.get_one::<u64>("metrics-interval") {
        config.metrics_interval_ms = *ms;
    }
    if let Some(secs) = matches.get_one::<u64>("news-interval") {
        config.news_interval_secs = *secs;
    }
    if let Some(history) = matches.get_one::<usize>("history") {
        config.history_size = *history;
    }
    if let Some(key) = matches.get_one::<String>("api-key") {
        config.news_api_key = Some(key.clone());
    }
    if let Some(url) = matches.get_one::<String>("rss-url") {
        config.rss_url = url.clone();
    }
}

/// Real samplers for `config`.
pub fn build_samplers(config: &DashboardConfig) -> Result<Samplers> {
    let timeout = config.http_timeout();
    let api = NewsApiSource::new(config.news_api_key.clone(), config.news_country.clone(), timeout)?;
    let feed = RssFeedSource::new(config.rss_url.clone(), timeout)?;

    Ok(Samplers {
        metrics: MetricSampler::with_top_processes(
            Box::new(SysinfoProbe::new()),
            config.top_processes,
        ),
        network: NetworkSampler::new(Box::new(SysinfoProbe::new())),
        headlines: HeadlineAggregator::new(Box::new(api), Box::new(feed)),
    })
}
