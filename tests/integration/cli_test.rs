use std::path::PathBuf;

use matrix_monitor::commands::{apply_overrides, build_cli};
use matrix_monitor::core::config::DashboardConfig;

#[test]
fn test_cli_without_subcommand_runs_dashboard() {
    let matches = build_cli().try_get_matches_from(["matrix-monitor"]).unwrap();
    assert!(matches.subcommand().is_none());
}

#[test]
fn test_cli_overrides_config_values() {
    let matches = build_cli()
        .try_get_matches_from([
            "matrix-monitor",
            "--metrics-interval",
            "500",
            "--news-interval",
            "60",
            "--history",
            "80",
            "--api-key",
            "k3y",
            "--rss-url",
            "https://example.org/rss",
        ])
        .unwrap();

    let mut config = DashboardConfig::default();
    apply_overrides(&mut config, &matches);

    assert_eq!(config.metrics_interval_ms, 500);
    assert_eq!(config.news_interval_secs, 60);
    assert_eq!(config.history_size, 80);
    assert_eq!(config.news_api_key.as_deref(), Some("k3y"));
    assert_eq!(config.rss_url, "https://example.org/rss");
    // Untouched values keep their defaults.
    assert_eq!(config.network_interval_ms, 1000);
}

#[test]
fn test_cli_global_flags_after_subcommand() {
    let matches = build_cli()
        .try_get_matches_from(["matrix-monitor", "run", "--history", "7", "--log-file", "/tmp/mm.log"])
        .unwrap();

    let (name, sub_matches) = matches.subcommand().unwrap();
    assert_eq!(name, "run");
    assert_eq!(sub_matches.get_one::<usize>("history"), Some(&7));
    assert_eq!(
        sub_matches.get_one::<PathBuf>("log-file"),
        Some(&PathBuf::from("/tmp/mm.log"))
    );
}

#[test]
fn test_cli_rejects_non_numeric_interval() {
    let result = build_cli().try_get_matches_from(["matrix-monitor", "--metrics-interval", "fast"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_config_requires_subcommand() {
    assert!(build_cli().try_get_matches_from(["matrix-monitor", "config"]).is_err());

    let matches = build_cli()
        .try_get_matches_from(["matrix-monitor", "config", "path"])
        .unwrap();
    let (_, config) = matches.subcommand().unwrap();
    assert_eq!(config.subcommand_name(), Some("path"));
}
