//! Concrete collaborators for the monitor, chosen by the host at startup.

pub mod audit_log;
pub mod notifications;
pub mod reading_source;
pub mod suggestions;

pub use audit_log::{FileAuditLog, DEFAULT_AUDIT_LOG};
pub use notifications::{format_alert_message, DryRunSink, WebhookSink};
pub use reading_source::HttpReadingSource;
pub use suggestions::{DisabledSuggestions, HttpSuggestionProvider};
