use glucose_watch::core::glucose_monitor::{
    fallback_suggestion, AlertDispatcher, Classification, CooldownGate, DispatchOutcome,
    MonitorConfig, MonitorStatus, Sampler,
};
use glucose_watch::error::MonitorError;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use super::support::{at_minute, FixedSuggestions, RecordingAudit, RecordingSink, ScriptedSource};

fn config() -> MonitorConfig {
    MonitorConfig::new(70.0, 180.0, Duration::from_secs(300), Duration::from_secs(900))
}

fn dispatcher(
    suggestion: Option<&str>,
    audit: Arc<RecordingAudit>,
    sink: Arc<RecordingSink>,
    status: Arc<Mutex<MonitorStatus>>,
) -> AlertDispatcher {
    AlertDispatcher::new(
        config(),
        Arc::new(FixedSuggestions(suggestion.map(str::to_string))),
        audit,
        sink,
        Arc::new(Mutex::new(CooldownGate::new(config().cooldown))),
        status,
    )
}

#[test]
fn test_suggestion_failure_uses_fallback_text() {
    let audit = Arc::new(RecordingAudit::default());
    let sink = Arc::new(RecordingSink::default());
    let status = Arc::new(Mutex::new(MonitorStatus::default()));
    let d = dispatcher(None, audit.clone(), sink.clone(), status.clone());

    let outcome = d.dispatch(200.0, at_minute(0));

    let payload = outcome.payload().unwrap();
    assert_eq!(payload.classification, Classification::High);
    assert_eq!(payload.threshold, 180.0);
    assert_eq!(payload.suggestion, fallback_suggestion(200.0));
    assert!(!payload.suggestion_generated);
    assert_eq!(audit.entries().len(), 1);
    assert_eq!(sink.attempts().len(), 1);
    assert!(status.lock().last_error.as_deref().unwrap().contains("Suggestion unavailable"));
}

#[test]
fn test_blank_suggestion_uses_fallback_text() {
    let audit = Arc::new(RecordingAudit::default());
    let status = Arc::new(Mutex::new(MonitorStatus::default()));
    let d = dispatcher(Some("   "), audit, Arc::new(RecordingSink::default()), status);

    let outcome = d.dispatch(50.0, at_minute(0));

    assert_eq!(outcome.payload().unwrap().suggestion, fallback_suggestion(50.0));
}

#[test]
fn test_audit_failure_does_not_block_notification() {
    let sink = Arc::new(RecordingSink::default());
    let status = Arc::new(Mutex::new(MonitorStatus::default()));
    let d = dispatcher(
        Some("Drink water."),
        Arc::new(RecordingAudit::failing()),
        sink.clone(),
        status.clone(),
    );

    let outcome = d.dispatch(250.0, at_minute(0));

    assert!(matches!(outcome, DispatchOutcome::Notified(..)));
    assert_eq!(sink.attempts().len(), 1);
    let status = status.lock();
    assert!(status.last_notification.is_some());
    assert!(status.last_error.as_deref().unwrap().contains("Audit log error"));
}

#[test]
fn test_in_range_sample_keeps_previous_alert() {
    let status = Arc::new(Mutex::new(MonitorStatus::default()));
    let d = dispatcher(
        Some("Eat something."),
        Arc::new(RecordingAudit::default()),
        Arc::new(RecordingSink::default()),
        status.clone(),
    );

    d.dispatch(60.0, at_minute(0));
    d.dispatch(110.0, at_minute(5));

    let status = status.lock();
    assert_eq!(status.last_value, Some(110.0));
    assert_eq!(status.last_check_at, Some(at_minute(5)));
    assert_eq!(status.last_alert.as_ref().unwrap().value, 60.0);
}

#[test]
fn test_reading_failure_leaves_alert_history_untouched() {
    let status = Arc::new(Mutex::new(MonitorStatus::default()));
    let sink = Arc::new(RecordingSink::default());
    let d = Arc::new(dispatcher(
        Some("Eat something."),
        Arc::new(RecordingAudit::default()),
        sink.clone(),
        status.clone(),
    ));
    let source = Arc::new(ScriptedSource::script(vec![
        Ok(60.0),
        Err(MonitorError::reading_unavailable("sensor warming up")),
    ]));
    let sampler = Sampler::new(source, d, status.clone(), Duration::from_secs(60));

    assert!(sampler.tick(at_minute(0)).is_some());
    let before = status.lock().clone();
    assert!(sampler.tick(at_minute(5)).is_none());

    let after = status.lock().clone();
    assert_eq!(after.last_alert, before.last_alert);
    assert_eq!(after.last_notification, before.last_notification);
    assert_eq!(after.last_check_at, Some(at_minute(5)));
    assert_eq!(after.last_value, None);
    assert!(after.last_error.unwrap().contains("sensor warming up"));
    assert_eq!(sink.attempts().len(), 1);
}
