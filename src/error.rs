use std::io;
use thiserror::Error;

/// Custom error type for the glucose monitor
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Reading unavailable: {0}")]
    ReadingUnavailable(String),

    #[error("Suggestion unavailable: {0}")]
    SuggestionUnavailable(String),

    #[error("Notification error: {0}")]
    NotificationFailure(String),

    #[error("Audit log error: {0}")]
    AuditLog(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to launch sampler: {0}")]
    Launch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for the glucose monitor
pub type Result<T> = std::result::Result<T, MonitorError>;

impl MonitorError {
    /// Create a reading unavailable error
    pub fn reading_unavailable<S: Into<String>>(msg: S) -> Self {
        MonitorError::ReadingUnavailable(msg.into())
    }

    /// Create a suggestion unavailable error
    pub fn suggestion_unavailable<S: Into<String>>(msg: S) -> Self {
        MonitorError::SuggestionUnavailable(msg.into())
    }

    /// Create a notification failure
    pub fn notification<S: Into<String>>(msg: S) -> Self {
        MonitorError::NotificationFailure(msg.into())
    }

    pub fn audit_log<S: Into<String>>(msg: S) -> Self {
        MonitorError::AuditLog(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        MonitorError::InvalidConfig(msg.into())
    }

    pub fn launch<S: Into<String>>(msg: S) -> Self {
        MonitorError::Launch(msg.into())
    }

    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        MonitorError::Config(msg.into())
    }

    /// Stable short tag for the error category
    pub fn kind(&self) -> &'static str {
        match self {
            MonitorError::ReadingUnavailable(_) => "reading_unavailable",
            MonitorError::SuggestionUnavailable(_) => "suggestion_unavailable",
            MonitorError::NotificationFailure(_) => "notification_failure",
            MonitorError::AuditLog(_) => "audit_log",
            MonitorError::InvalidConfig(_) => "invalid_config",
            MonitorError::Launch(_) => "launch",
            MonitorError::Config(_) => "config",
            MonitorError::Io(_) => "io",
            MonitorError::Http(_) => "http",
            MonitorError::Serialization(_) => "serialization",
        }
    }
}
