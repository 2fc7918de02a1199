//! HTTP reading source.
//!
//! Expects a JSON body carrying the current value in mg/dL as `value` (or
//! `mg_dl`). No retries: a failed request is one failed tick.

use std::time::Duration;

use serde::Deserialize;

use crate::core::glucose_monitor::ReadingSource;
use crate::error::{MonitorError, Result};

#[derive(Debug, Deserialize)]
struct ReadingResponse {
    #[serde(alias = "mg_dl")]
    value: Option<f64>,
}

pub struct HttpReadingSource {
    client: reqwest::blocking::Client,
    url: String,
    token: Option<String>,
}

impl HttpReadingSource {
    pub fn new(url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("glucose-watch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            token,
        })
    }
}

/// Extract the reading from a response body
fn parse_reading(body: &str) -> Result<f64> {
    let response: ReadingResponse = serde_json::from_str(body)
        .map_err(|e| MonitorError::reading_unavailable(format!("malformed reading: {}", e)))?;

    match response.value {
        Some(value) if value.is_finite() => Ok(value),
        Some(value) => Err(MonitorError::reading_unavailable(format!(
            "reading is not a number: {}",
            value
        ))),
        None => Err(MonitorError::reading_unavailable(
            "no current glucose reading available",
        )),
    }
}

impl ReadingSource for HttpReadingSource {
    fn fetch(&self) -> Result<f64> {
        let mut request = self.client.get(&self.url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|e| MonitorError::reading_unavailable(format!("source request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::reading_unavailable(format!(
                "source returned status {}",
                status
            )));
        }

        let body = response
            .text()
            .map_err(|e| MonitorError::reading_unavailable(format!("failed to read body: {}", e)))?;

        parse_reading(&body)
    }
}
