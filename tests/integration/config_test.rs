use glucose_watch::core::config::Config;
use std::collections::HashMap;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.low_threshold, 70.0);
    assert_eq!(config.high_threshold, 250.0);
    assert_eq!(config.interval_minutes, 10);
    assert_eq!(config.cooldown_minutes, 10);
    assert!(config.source_url.is_none());
    assert!(config.recipients.is_empty());

    let monitor = config.monitor_config();
    assert_eq!(monitor.sampling_interval, Duration::from_secs(600));
    assert_eq!(monitor.cooldown, Duration::from_secs(600));
    assert!(monitor.validate().is_ok());
}

#[test]
fn test_config_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.json");

    let config = Config {
        low_threshold: 80.0,
        source_url: Some("http://localhost:8080/glucose".to_string()),
        recipients: vec!["+15550000001".to_string()],
        ..Default::default()
    };
    config.save_to(&path).unwrap();

    assert_eq!(Config::load_from(&path).unwrap(), config);
}

#[test]
fn test_config_missing_empty_or_corrupt_gives_default() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    assert_eq!(Config::load_from(&path).unwrap(), Config::default());

    fs::write(&path, "  \n").unwrap();
    assert_eq!(Config::load_from(&path).unwrap(), Config::default());

    fs::write(&path, "{ not json").unwrap();
    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}

#[test]
fn test_config_partial_file_fills_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, r#"{ "high_threshold": 200.0 }"#).unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.high_threshold, 200.0);
    assert_eq!(config.low_threshold, 70.0);
}

#[test]
fn test_config_environment_overrides() {
    let mut config = Config {
        recipients: vec!["+15550000001".to_string()],
        ..Default::default()
    };
    config.apply_overrides(lookup(&[
        ("GLUCOSE_LOW_THRESHOLD", "65"),
        ("GLUCOSE_HIGH_THRESHOLD", "not-a-number"),
        ("ALERT_COOLDOWN_MINUTES", "30"),
        ("GLUCOSE_SOURCE_URL", " http://cgm.local/latest "),
        ("ALERT_RECIPIENTS", "+15550000002, +15550000001,,"),
    ]));

    assert_eq!(config.low_threshold, 65.0);
    assert_eq!(config.high_threshold, 250.0);
    assert_eq!(config.cooldown_minutes, 30);
    assert_eq!(config.source_url.as_deref(), Some("http://cgm.local/latest"));
    assert_eq!(config.recipients, vec!["+15550000001", "+15550000002"]);
}
