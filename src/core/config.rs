use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::glucose_monitor::types::{
    MonitorConfig, DEFAULT_HIGH_THRESHOLD, DEFAULT_LOW_THRESHOLD,
};
use crate::core::integrations::DEFAULT_AUDIT_LOG;

const DEFAULT_INTERVAL_MINUTES: u64 = 10;
const DEFAULT_COOLDOWN_MINUTES: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Host configuration, persisted as JSON in the user config directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub low_threshold: f64,
    pub high_threshold: f64,
    pub interval_minutes: u64,
    pub cooldown_minutes: u64,
    /// Endpoint returning the current reading as JSON
    pub source_url: Option<String>,
    pub source_token: Option<String>,
    pub webhook_url: Option<String>,
    pub suggestion_url: Option<String>,
    /// Recipients reported by the dry-run sink
    pub recipients: Vec<String>,
    pub audit_log_path: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            low_threshold: DEFAULT_LOW_THRESHOLD,
            high_threshold: DEFAULT_HIGH_THRESHOLD,
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            cooldown_minutes: DEFAULT_COOLDOWN_MINUTES,
            source_url: None,
            source_token: None,
            webhook_url: None,
            suggestion_url: None,
            recipients: Vec::new(),
            audit_log_path: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load from the default location and apply environment overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from a file; a missing, empty or unreadable-as-JSON file gives defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if data.trim().is_empty() {
            return Ok(Config::default());
        }

        Ok(serde_json::from_str(&data).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable config file {:?}: {}", path, e);
            Config::default()
        }))
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
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

        Ok(config_dir.join("glucose-watch").join("config.json"))
    }

    /// Apply overrides from a key lookup (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = value("GLUCOSE_LOW_THRESHOLD") {
            parse_into(&mut self.low_threshold, "GLUCOSE_LOW_THRESHOLD", &v);
        }
        if let Some(v) = value("GLUCOSE_HIGH_THRESHOLD") {
            parse_into(&mut self.high_threshold, "GLUCOSE_HIGH_THRESHOLD", &v);
        }
        if let Some(v) = value("GLUCOSE_INTERVAL_MINUTES") {
            parse_into(&mut self.interval_minutes, "GLUCOSE_INTERVAL_MINUTES", &v);
        }
        if let Some(v) = value("ALERT_COOLDOWN_MINUTES") {
            parse_into(&mut self.cooldown_minutes, "ALERT_COOLDOWN_MINUTES", &v);
        }
        if let Some(v) = value("GLUCOSE_SOURCE_URL") {
            self.source_url = Some(v);
        }
        if let Some(v) = value("GLUCOSE_SOURCE_TOKEN") {
            self.source_token = Some(v);
        }
        if let Some(v) = value("ALERT_WEBHOOK_URL") {
            self.webhook_url = Some(v);
        }
        if let Some(v) = value("SUGGESTION_URL") {
            self.suggestion_url = Some(v);
        }
        if let Some(v) = value("ALERT_AUDIT_LOG") {
            self.audit_log_path = Some(v);
        }
        if let Some(v) = value("ALERT_RECIPIENTS") {
            for phone in v.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                if !self.recipients.iter().any(|r| r == phone) {
                    self.recipients.push(phone.to_string());
                }
            }
        }
    }

    /// Thresholds and timing for the monitor; validated and clamped at start
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig::new(
            self.low_threshold,
            self.high_threshold,
            Duration::from_secs(self.interval_minutes.saturating_mul(60)),
            Duration::from_secs(self.cooldown_minutes.saturating_mul(60)),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn audit_log_path(&self) -> PathBuf {
        PathBuf::from(
            self.audit_log_path
                .as_deref()
                .unwrap_or(DEFAULT_AUDIT_LOG),
        )
    }
}

fn parse_into<T: std::str::FromStr>(slot: &mut T, key: &str, raw: &str) {
    match raw.parse::<T>() {
        Ok(parsed) => *slot = parsed,
        Err(_) => log::warn!("Ignoring {}={:?}: not a valid number", key, raw),
    }
}
