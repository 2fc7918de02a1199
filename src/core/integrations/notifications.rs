//! Alert sinks and the short text format used for SMS-style delivery.

use std::time::Duration;

use serde_json::json;

use crate::core::glucose_monitor::{
    AlertPayload, AlertSink, DeliveryResult, DeliveryStatus, DeliverySummary,
};
use crate::error::{MonitorError, Result};

/// Longest suggestion kept in a text alert
const MAX_NOTE_CHARS: usize = 200;

/// Build a concise text message for an alert
pub fn format_alert_message(payload: &AlertPayload) -> String {
    let mut parts = vec![
        format!(
            "{} GLUCOSE: {} mg/dL",
            payload.classification.as_str().to_uppercase(),
            payload.value
        ),
        format!("Threshold: {}", payload.threshold),
        format!("At: {}", payload.timestamp.format("%Y-%m-%d %H:%M")),
    ];

    let note = payload.suggestion.trim();
    if !note.is_empty() {
        parts.push(format!("Note: {}", truncate_note(note)));
    }

    parts.join(" | ")
}

fn truncate_note(note: &str) -> String {
    if note.chars().count() <= MAX_NOTE_CHARS {
        return note.to_string();
    }
    let kept: String = note.chars().take(MAX_NOTE_CHARS - 3).collect();
    format!("{}...", kept)
}

/// Logs the message for every recipient instead of sending it
pub struct DryRunSink {
    recipients: Vec<String>,
}

impl DryRunSink {
    pub fn new(recipients: Vec<String>) -> Self {
        Self { recipients }
    }
}

impl AlertSink for DryRunSink {
    fn notify(&self, payload: &AlertPayload) -> Result<DeliverySummary> {
        let message = format_alert_message(payload);

        let results = self
            .recipients
            .iter()
            .map(|recipient| {
                log::info!("[dry-run] to {}: {}", recipient, message);
                DeliveryResult {
                    recipient: recipient.clone(),
                    status: DeliveryStatus::DryRun,
                    detail: Some(message.clone()),
                }
            })
            .collect();

        Ok(DeliverySummary::new(results, true))
    }
}

/// POSTs `{text, alert}` as JSON to a webhook
pub struct WebhookSink {
    client: reqwest::blocking::Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("glucose-watch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl AlertSink for WebhookSink {
    fn notify(&self, payload: &AlertPayload) -> Result<DeliverySummary> {
        let body = json!({
            "text": format_alert_message(payload),
            "alert": payload,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .map_err(|e| MonitorError::notification(format!("webhook request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::notification(format!(
                "webhook returned status {}",
                status
            )));
        }

        Ok(DeliverySummary::new(
            vec![DeliveryResult {
                recipient: self.url.clone(),
                status: DeliveryStatus::Sent,
                detail: Some(status.to_string()),
            }],
            false,
        ))
    }
}
