use chrono::{DateTime, Local};
use colored::*;

use crate::core::glucose_monitor::{Classification, MonitorStatus};

/// Format a timestamp as YYYY-MM-DD HH:MM:SS
pub fn format_instant(at: Option<&DateTime<Local>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string())
}

/// Colorize a classification label
pub fn format_classification(classification: Classification) -> ColoredString {
    match classification {
        Classification::Low => "LOW".red().bold(),
        Classification::High => "HIGH".yellow().bold(),
        Classification::InRange => "IN RANGE".green(),
    }
}

/// Multi-line, human readable status report
pub fn format_status(status: &MonitorStatus) -> String {
    let mut lines = Vec::new();

    let state = if status.running {
        "running".green().bold()
    } else {
        "stopped".dimmed()
    };
    lines.push(format!("{} {}", "Monitor:".white().bold(), state));

    lines.push(format!(
        "  Thresholds:   {} - {} mg/dL",
        status.config.low_threshold, status.config.high_threshold
    ));
    lines.push(format!(
        "  Interval:     {}s (cooldown {}s)",
        status.config.sampling_interval.as_secs(),
        status.config.cooldown.as_secs()
    ));
    lines.push(format!(
        "  Last check:   {}",
        format_instant(status.last_check_at.as_ref())
    ));
    lines.push(format!(
        "  Last value:   {}",
        status
            .last_value
            .map(|v| format!("{} mg/dL", v))
            .unwrap_or_else(|| "-".to_string())
    ));

    match &status.last_alert {
        Some(alert) => lines.push(format!(
            "  Last alert:   {} {} mg/dL at {}",
            format_classification(alert.classification),
            alert.value,
            format_instant(Some(&alert.timestamp))
        )),
        None => lines.push("  Last alert:   -".to_string()),
    }

    if let Some(notification) = &status.last_notification {
        lines.push(format!(
            "  Notified:     {} recipient(s){} at {}",
            notification.result.count,
            if notification.result.dry_run { " (dry run)" } else { "" },
            format_instant(Some(&notification.sent_at))
        ));
    }

    if let Some(error) = &status.last_error {
        lines.push(format!("  {} {}", "Last error:".red(), error));
    }

    lines.join("\n")
}
