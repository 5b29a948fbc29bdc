use std::fs;
use std::time::Duration;

use matrix_monitor::core::config::DashboardConfig;
use matrix_monitor::MonitorError;
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = DashboardConfig::default();
    assert_eq!(config.rain_interval_ms, 10);
    assert_eq!(config.motion_interval_ms, 20);
    assert_eq!(config.history_size, 50);
    assert_eq!(config.top_processes, 5);
    assert_eq!(config.news_link, "https://news.google.com");
    assert_eq!(config.http_timeout(), Duration::from_secs(10));
}

#[test]
fn test_config_load_missing_file_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing").join("config.json");

    let config = DashboardConfig::load_from(&path).unwrap();
    assert_eq!(config.history_size, DashboardConfig::default().history_size);
    assert_eq!(config.rss_url, DashboardConfig::default().rss_url);
    assert!(!path.exists());
}

#[test]
fn test_config_load_garbage_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, "{ this is not json").unwrap();

    let config = DashboardConfig::load_from(&path).unwrap();
    assert_eq!(config.metrics_interval_ms, 1000);
}

#[test]
fn test_config_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("matrix-monitor").join("config.json");

    let config = DashboardConfig {
        history_size: 120,
        news_api_key: Some("abc123".to_string()),
        news_country: "us".to_string(),
        cell_width: 2,
        ..Default::default()
    };
    config.save_to(&path).unwrap();

    let loaded = DashboardConfig::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_config_schedule_and_scheduler_settings() {
    let config = DashboardConfig {
        metrics_interval_ms: 250,
        news_interval_secs: 5,
        cell_height: 2,
        news_link: "https://example.org/news".to_string(),
        ..Default::default()
    };

    let schedule = config.schedule();
    assert_eq!(schedule.metrics, Duration::from_millis(250));
    assert_eq!(schedule.network, Duration::from_secs(1));
    assert_eq!(schedule.headlines, Duration::from_secs(5));

    let scheduler = config.scheduler_config();
    assert_eq!(scheduler.rain_period, Duration::from_millis(10));
    assert_eq!(scheduler.motion_period, Duration::from_millis(20));
    assert_eq!((scheduler.cell_width, scheduler.cell_height), (1, 2));
    assert_eq!(scheduler.news_link, "https://example.org/news");
}

#[test]
fn test_config_validation() {
    let zero_cell = DashboardConfig {
        cell_width: 0,
        ..Default::default()
    };
    assert!(matches!(zero_cell.validate(), Err(MonitorError::Config(_))));

    let zero_news = DashboardConfig {
        news_interval_secs: 0,
        ..Default::default()
    };
    assert!(matches!(zero_news.validate(), Err(MonitorError::Config(_))));

    let smallest_history = DashboardConfig {
        history_size: 2,
        ..Default::default()
    };
    assert!(smallest_history.validate().is_ok());
}
