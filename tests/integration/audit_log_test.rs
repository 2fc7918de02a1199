use chrono::Local;
use glucose_watch::core::glucose_monitor::{AlertPayload, AuditLog, Classification};
use glucose_watch::core::integrations::FileAuditLog;
use std::fs;
use tempfile::TempDir;

fn payload(classification: Classification, value: f64, threshold: f64) -> AlertPayload {
    AlertPayload {
        classification,
        value,
        threshold,
        timestamp: Local::now(),
        suggestion: "Recheck soon.".to_string(),
        suggestion_generated: true,
    }
}

#[test]
fn test_audit_log_appends_one_line_per_entry() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("logs").join("alerts.log");
    let log = FileAuditLog::new(&path);

    log.append(&payload(Classification::Low, 65.0, 70.0)).unwrap();
    log.append(&payload(Classification::High, 300.0, 250.0)).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);

    let fields: Vec<&str> = lines[0].splitn(3, " | ").collect();
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[1], "GLUCOSE ALERT: LOW at 65 mg/dL (below 70)");
    let recorded: AlertPayload = serde_json::from_str(fields[2]).unwrap();
    assert_eq!(recorded.value, 65.0);

    assert!(lines[1].contains("GLUCOSE ALERT: HIGH at 300 mg/dL (above 250)"));
}

#[test]
fn test_audit_log_keeps_existing_content() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("alerts.log");
    fs::write(&path, "earlier entry\n").unwrap();

    FileAuditLog::new(&path)
        .append(&payload(Classification::Low, 50.0, 70.0))
        .unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("earlier entry\n"));
    assert_eq!(contents.lines().count(), 2);
}
