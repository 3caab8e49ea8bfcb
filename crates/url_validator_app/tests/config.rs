use std::fs;
use std::time::Duration;

use tempfile::TempDir;
use url_validator_app::{load_config, parse_config, AppConfig, LogDestination};

#[test]
fn defaults_match_reference_timings() {
    let config = AppConfig::default();
    assert_eq!(config.debounce(), Duration::from_millis(500));
    assert_eq!(config.probe_settings().request_timeout, Duration::from_secs(10));
    assert_eq!(config.log_destination, LogDestination::File);
}

#[test]
fn partial_config_keeps_other_defaults() {
    let config = parse_config("(debounce_ms: 250, log_destination: Terminal)").unwrap();
    assert_eq!(config.debounce_ms, 250);
    assert_eq!(config.log_destination, LogDestination::Terminal);
    assert_eq!(config.redirect_limit, AppConfig::default().redirect_limit);
}

#[test]
fn probe_settings_follow_config() {
    let config = parse_config("(connect_timeout_ms: 100, request_timeout_ms: 900, redirect_limit: 2)")
        .unwrap();
    let settings = config.probe_settings();
    assert_eq!(settings.connect_timeout, Duration::from_millis(100));
    assert_eq!(settings.request_timeout, Duration::from_millis(900));
    assert_eq!(settings.redirect_limit, 2);
}

#[test]
fn malformed_config_is_an_error() {
    assert!(parse_config("(debounce_ms: \"soon\")").is_err());
}

#[test]
fn missing_file_loads_defaults() {
    let temp = TempDir::new().unwrap();
    let config = load_config(&temp.path().join("absent.ron"));
    assert_eq!(config, AppConfig::default());
}

#[test]
fn unreadable_file_falls_back_to_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("url_validator.ron");
    fs::write(&path, "not ron at all {").unwrap();
    assert_eq!(load_config(&path), AppConfig::default());
}

#[test]
fn config_file_round_trips_from_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("url_validator.ron");
    fs::write(&path, "(debounce_ms: 75, log_destination: Off)").unwrap();

    let config = load_config(&path);
    assert_eq!(config.debounce(), Duration::from_millis(75));
    assert_eq!(config.log_destination, LogDestination::Off);
}
