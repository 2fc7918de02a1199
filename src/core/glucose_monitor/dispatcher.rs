//! Per-sample alert pipeline: classify, suggest, audit, gate, notify, publish.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::Mutex;

use super::cooldown::CooldownGate;
use super::run_state::RunState;
use super::thresholds::{classify, crossed_threshold};
use super::traits::{AlertSink, AuditLog, SuggestionProvider};
use super::types::{AlertPayload, MonitorConfig, MonitorStatus, NotificationRecord};
use crate::error::{MonitorError, Result};

/// Advisory text used whenever the suggestion provider has nothing usable
pub fn fallback_suggestion(value: f64) -> String {
    format!(
        "Suggestion unavailable. Please consult your healthcare provider for guidance on glucose level {} mg/dL.",
        value
    )
}

/// What happened to one sample
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    InRange,
    /// Audited, but the cooldown gate held the notification back
    Suppressed(AlertPayload),
    Notified(AlertPayload, NotificationRecord),
    /// Audited and attempted; the sink reported an error
    NotificationFailed(AlertPayload, String),
    /// The run was stopped while the sample was in flight; nothing published
    Discarded,
}

impl DispatchOutcome {
    pub fn payload(&self) -> Option<&AlertPayload> {
        match self {
            DispatchOutcome::InRange | DispatchOutcome::Discarded => None,
            DispatchOutcome::Suppressed(payload)
            | DispatchOutcome::Notified(payload, _)
            | DispatchOutcome::NotificationFailed(payload, _) => Some(payload),
        }
    }

    /// True when the gate permitted a send, whatever the sink made of it
    pub fn notification_attempted(&self) -> bool {
        matches!(
            self,
            DispatchOutcome::Notified(..) | DispatchOutcome::NotificationFailed(..)
        )
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run one collaborator call, turning a panic into that step's error
fn contained<T, F, E>(call: F, on_panic: E) -> Result<T>
where
    F: FnOnce() -> Result<T>,
    E: FnOnce(String) -> MonitorError,
{
    catch_unwind(AssertUnwindSafe(call))
        .unwrap_or_else(|payload| Err(on_panic(format!("panicked: {}", panic_message(payload)))))
}

/// Orchestrates evaluator, suggestion provider, audit log, cooldown gate and
/// sink for one sample.
///
/// Suggestion, audit and notification failures are each handled locally: the
/// remaining steps still run and nothing propagates to the sampler. A panic
/// in one of those calls is handled like an error from it. Status is written
/// once, at the end, under a single lock.
///
/// Once the run is retired the gate, the sink and the status are left alone.
pub struct AlertDispatcher {
    config: MonitorConfig,
    suggestions: Arc<dyn SuggestionProvider>,
    audit_log: Arc<dyn AuditLog>,
    sink: Arc<dyn AlertSink>,
    gate: Arc<Mutex<CooldownGate>>,
    status: Arc<Mutex<MonitorStatus>>,
    run: Arc<RunState>,
}

impl AlertDispatcher {
    pub fn new(
        config: MonitorConfig,
        suggestions: Arc<dyn SuggestionProvider>,
        audit_log: Arc<dyn AuditLog>,
        sink: Arc<dyn AlertSink>,
        gate: Arc<Mutex<CooldownGate>>,
        status: Arc<Mutex<MonitorStatus>>,
    ) -> Self {
        Self {
            config,
            suggestions,
            audit_log,
            sink,
            gate,
            status,
            run: Arc::new(RunState::new()),
        }
    }

    /// Tie this dispatcher to a run owned by the controller
    pub fn with_run_state(mut self, run: Arc<RunState>) -> Self {
        self.run = run;
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn run_state(&self) -> &Arc<RunState> {
        &self.run
    }

    pub fn dispatch(&self, value: f64, now: DateTime<Local>) -> DispatchOutcome {
        let classification = classify(value, &self.config);

        let Some(threshold) = crossed_threshold(classification, &self.config) else {
            let mut status = self.status.lock();
            if !self.run.is_live() {
                return DispatchOutcome::Discarded;
            }
            status.last_value = Some(value);
            status.last_check_at = Some(now);
            return DispatchOutcome::InRange;
        };

        if !self.run.is_live() {
            log::debug!("Discarding {} mg/dL sample from a stopped run", value);
            return DispatchOutcome::Discarded;
        }

        let mut last_error: Option<String> = None;

        let suggested = contained(
            || self.suggestions.suggest(value, classification, threshold),
            MonitorError::suggestion_unavailable,
        );
        let (suggestion, suggestion_generated) = match suggested {
            Ok(text) if !text.trim().is_empty() => (text.trim().to_string(), true),
            Ok(_) => {
                log::warn!("Suggestion provider returned empty text for {} mg/dL", value);
                (fallback_suggestion(value), false)
            }
            Err(e) => {
                log::warn!("{}", e);
                last_error = Some(e.to_string());
                (fallback_suggestion(value), false)
            }
        };

        let payload = AlertPayload {
            classification,
            value,
            threshold,
            timestamp: now,
            suggestion,
            suggestion_generated,
        };

        // Every crossing is audited, whatever the gate decides
        if let Err(e) = contained(|| self.audit_log.append(&payload), MonitorError::audit_log) {
            log::warn!("Failed to write audit entry: {}", e);
            last_error = Some(e.to_string());
        }

        let permitted = {
            let mut gate = self.gate.lock();
            if !self.run.is_live() {
                return DispatchOutcome::Discarded;
            }
            gate.should_notify(classification, now)
        };

        let outcome = if permitted {
            match contained(|| self.sink.notify(&payload), MonitorError::notification) {
                Ok(summary) => {
                    log::info!(
                        "Sent {} alert to {} recipient(s){}",
                        classification,
                        summary.count,
                        if summary.dry_run { " (dry run)" } else { "" }
                    );
                    let record = NotificationRecord {
                        result: summary,
                        sent_at: now,
                        classification,
                    };
                    DispatchOutcome::Notified(payload.clone(), record)
                }
                Err(e) => {
                    log::warn!("{}", e);
                    let message = e.to_string();
                    last_error = Some(message.clone());
                    DispatchOutcome::NotificationFailed(payload.clone(), message)
                }
            }
        } else {
            DispatchOutcome::Suppressed(payload.clone())
        };

        let mut status = self.status.lock();
        if !self.run.is_live() {
            return DispatchOutcome::Discarded;
        }
        status.last_check_at = Some(now);
        status.last_value = Some(value);
        status.last_alert = Some(payload);
        if let DispatchOutcome::Notified(_, record) = &outcome {
            status.last_notification = Some(record.clone());
        }
        if let Some(error) = last_error {
            status.last_error = Some(error);
        }

        outcome
    }
}
