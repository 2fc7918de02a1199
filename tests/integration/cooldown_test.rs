use glucose_watch::core::glucose_monitor::{
    AlertDispatcher, CooldownGate, DispatchOutcome, MonitorConfig, MonitorStatus,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use super::support::{at_minute, FixedSuggestions, RecordingAudit, RecordingSink};

struct Harness {
    dispatcher: AlertDispatcher,
    sink: Arc<RecordingSink>,
    audit: Arc<RecordingAudit>,
    status: Arc<Mutex<MonitorStatus>>,
}

fn harness(sink: RecordingSink) -> Harness {
    let config = MonitorConfig::new(70.0, 250.0, Duration::from_secs(60), Duration::from_secs(600));
    let sink = Arc::new(sink);
    let audit = Arc::new(RecordingAudit::default());
    let status = Arc::new(Mutex::new(MonitorStatus::default()));
    let dispatcher = AlertDispatcher::new(
        config,
        Arc::new(FixedSuggestions(Some("Recheck in 15 minutes.".to_string()))),
        audit.clone(),
        sink.clone(),
        Arc::new(Mutex::new(CooldownGate::new(config.cooldown))),
        status.clone(),
    );
    Harness {
        dispatcher,
        sink,
        audit,
        status,
    }
}

#[test]
fn test_repeated_low_within_cooldown_notifies_once() {
    let h = harness(RecordingSink::default());

    let outcomes: Vec<_> = [0, 1, 5]
        .into_iter()
        .map(|m| h.dispatcher.dispatch(65.0, at_minute(m)))
        .collect();

    assert!(matches!(outcomes[0], DispatchOutcome::Notified(..)));
    assert!(matches!(outcomes[1], DispatchOutcome::Suppressed(_)));
    assert!(matches!(outcomes[2], DispatchOutcome::Suppressed(_)));
    assert_eq!(h.sink.attempts().len(), 1);
    assert_eq!(h.audit.entries().len(), 3);

    let status = h.status.lock();
    assert_eq!(status.last_alert.as_ref().unwrap().timestamp, at_minute(5));
    assert_eq!(status.last_notification.as_ref().unwrap().sent_at, at_minute(0));
}

#[test]
fn test_classification_change_bypasses_cooldown() {
    let h = harness(RecordingSink::default());

    h.dispatcher.dispatch(65.0, at_minute(0));
    let outcome = h.dispatcher.dispatch(300.0, at_minute(1));

    assert!(matches!(outcome, DispatchOutcome::Notified(..)));
    assert_eq!(h.sink.attempts().len(), 2);
}

#[test]
fn test_same_classification_after_cooldown_notifies_again() {
    let h = harness(RecordingSink::default());

    h.dispatcher.dispatch(65.0, at_minute(0));
    h.dispatcher.dispatch(60.0, at_minute(11));

    assert_eq!(h.sink.attempts().len(), 2);
}

#[test]
fn test_in_range_sample_does_not_reset_cooldown() {
    let h = harness(RecordingSink::default());

    h.dispatcher.dispatch(65.0, at_minute(0));
    assert_eq!(h.dispatcher.dispatch(120.0, at_minute(2)), DispatchOutcome::InRange);
    let outcome = h.dispatcher.dispatch(65.0, at_minute(4));

    assert!(matches!(outcome, DispatchOutcome::Suppressed(_)));
    assert_eq!(h.sink.attempts().len(), 1);
}

#[test]
fn test_failed_send_still_counts_against_cooldown() {
    let h = harness(RecordingSink::failing());

    let first = h.dispatcher.dispatch(65.0, at_minute(0));
    let second = h.dispatcher.dispatch(65.0, at_minute(1));

    assert!(matches!(first, DispatchOutcome::NotificationFailed(..)));
    assert!(matches!(second, DispatchOutcome::Suppressed(_)));
    assert_eq!(h.sink.attempts().len(), 1);

    let status = h.status.lock();
    assert!(status.last_notification.is_none());
    assert!(status
        .last_error
        .as_deref()
        .unwrap()
        .contains("Notification error"));
}
