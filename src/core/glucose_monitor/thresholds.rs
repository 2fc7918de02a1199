//! Threshold evaluation for glucose samples.

use super::types::{Classification, MonitorConfig};

/// Classify a sample. Values equal to a threshold are in range.
pub fn classify(value: f64, config: &MonitorConfig) -> Classification {
    if value < config.low_threshold {
        Classification::Low
    } else if value > config.high_threshold {
        Classification::High
    } else {
        Classification::InRange
    }
}

/// The bound crossed by an alerting classification
pub fn crossed_threshold(classification: Classification, config: &MonitorConfig) -> Option<f64> {
    match classification {
        Classification::Low => Some(config.low_threshold),
        Classification::High => Some(config.high_threshold),
        Classification::InRange => None,
    }
}
