//! Data model shared by the monitor, the dispatcher and the status surface.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::{MonitorError, Result};

/// Lower bound for the sampling interval, bounds pressure on the reading source
pub const MIN_SAMPLING_INTERVAL: Duration = Duration::from_secs(60);

pub const DEFAULT_LOW_THRESHOLD: f64 = 70.0;
pub const DEFAULT_HIGH_THRESHOLD: f64 = 250.0;
pub const DEFAULT_SAMPLING_INTERVAL: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(10 * 60);

/// Thresholds and timing for one monitoring run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub low_threshold: f64,
    pub high_threshold: f64,
    #[serde(with = "duration_secs")]
    pub sampling_interval: Duration,
    #[serde(with = "duration_secs")]
    pub cooldown: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            low_threshold: DEFAULT_LOW_THRESHOLD,
            high_threshold: DEFAULT_HIGH_THRESHOLD,
            sampling_interval: DEFAULT_SAMPLING_INTERVAL,
            cooldown: DEFAULT_COOLDOWN,
        }
    }
}

impl MonitorConfig {
    pub fn new(
        low_threshold: f64,
        high_threshold: f64,
        sampling_interval: Duration,
        cooldown: Duration,
    ) -> Self {
        Self {
            low_threshold,
            high_threshold,
            sampling_interval,
            cooldown,
        }
    }

    /// Reject thresholds that cannot describe a range
    pub fn validate(&self) -> Result<()> {
        if !self.low_threshold.is_finite() || !self.high_threshold.is_finite() {
            return Err(MonitorError::invalid_config(format!(
                "thresholds must be finite numbers (low={}, high={})",
                self.low_threshold, self.high_threshold
            )));
        }

        if self.low_threshold >= self.high_threshold {
            return Err(MonitorError::invalid_config(format!(
                "low threshold {} must be below high threshold {}",
                self.low_threshold, self.high_threshold
            )));
        }

        Ok(())
    }

    /// Copy of this config with the sampling interval raised to the floor
    pub fn effective(&self) -> Self {
        Self {
            sampling_interval: self.sampling_interval.max(MIN_SAMPLING_INTERVAL),
            ..*self
        }
    }

    pub fn interval_is_clamped(&self) -> bool {
        self.sampling_interval < MIN_SAMPLING_INTERVAL
    }
}

/// Verdict for one sample under the configured thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Low,
    High,
    InRange,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Low => "low",
            Classification::High => "high",
            Classification::InRange => "in_range",
        }
    }

    /// Whether a sample with this classification goes through the alert path
    pub fn is_alert(&self) -> bool {
        !matches!(self, Classification::InRange)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert built once per out-of-range sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertPayload {
    pub classification: Classification,
    pub value: f64,
    /// The threshold that was crossed
    pub threshold: f64,
    pub timestamp: DateTime<Local>,
    pub suggestion: String,
    pub suggestion_generated: bool,
}

impl AlertPayload {
    /// Human readable one-line description used by the audit log
    pub fn message(&self) -> String {
        let direction = match self.classification {
            Classification::High => "above",
            _ => "below",
        };
        format!(
            "GLUCOSE ALERT: {} at {} mg/dL ({} {})",
            self.classification.as_str().to_uppercase(),
            self.value,
            direction,
            self.threshold
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryStatus {
    Sent,
    DryRun,
    Error,
}

/// Outcome of a delivery attempt to one recipient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryResult {
    pub recipient: String,
    pub status: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Aggregate outcome reported by an alert sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliverySummary {
    pub count: usize,
    pub dry_run: bool,
    pub results: Vec<DeliveryResult>,
    pub timestamp: DateTime<Local>,
}

impl DeliverySummary {
    pub fn new(results: Vec<DeliveryResult>, dry_run: bool) -> Self {
        Self {
            count: results.len(),
            dry_run,
            results,
            timestamp: Local::now(),
        }
    }

    pub fn failed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == DeliveryStatus::Error)
            .count()
    }
}

/// Written only when the cooldown gate permitted a send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub result: DeliverySummary,
    pub sent_at: DateTime<Local>,
    pub classification: Classification,
}

/// Point-in-time copy of the monitor state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorStatus {
    pub running: bool,
    pub last_check_at: Option<DateTime<Local>>,
    pub last_value: Option<f64>,
    pub last_alert: Option<AlertPayload>,
    pub last_notification: Option<NotificationRecord>,
    pub last_error: Option<String>,
    pub config: MonitorConfig,
}

impl Default for MonitorStatus {
    fn default() -> Self {
        Self {
            running: false,
            last_check_at: None,
            last_value: None,
            last_alert: None,
            last_notification: None,
            last_error: None,
            config: MonitorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StartOutcome {
    pub started: bool,
    pub status: MonitorStatus,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StopOutcome {
    pub stopped: bool,
    pub status: MonitorStatus,
    pub message: String,
}

/// Serialize durations as whole seconds
pub mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
