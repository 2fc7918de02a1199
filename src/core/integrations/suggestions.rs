//! Suggestion providers.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use crate::core::glucose_monitor::{Classification, SuggestionProvider};
use crate::error::{MonitorError, Result};

/// Used when no suggestion service is configured; the dispatcher falls back
pub struct DisabledSuggestions;

impl SuggestionProvider for DisabledSuggestions {
    fn suggest(&self, _: f64, _: Classification, _: f64) -> Result<String> {
        Err(MonitorError::suggestion_unavailable(
            "no suggestion service configured",
        ))
    }
}

#[derive(Debug, Deserialize)]
struct SuggestionResponse {
    suggestion: Option<String>,
}

/// POSTs `{value, classification, threshold}` and reads `{"suggestion": ..}`
pub struct HttpSuggestionProvider {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpSuggestionProvider {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl SuggestionProvider for HttpSuggestionProvider {
    fn suggest(&self, value: f64, classification: Classification, threshold: f64) -> Result<String> {
        let response = self
            .client
            .post(&self.url)
            .json(&json!({
                "value": value,
                "classification": classification,
                "threshold": threshold,
            }))
            .send()
            .map_err(|e| MonitorError::suggestion_unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MonitorError::suggestion_unavailable(format!(
                "suggestion service returned status {}",
                response.status()
            )));
        }

        let body: SuggestionResponse = response
            .json()
            .map_err(|e| MonitorError::suggestion_unavailable(e.to_string()))?;

        body.suggestion
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| MonitorError::suggestion_unavailable("empty suggestion"))
    }
}
