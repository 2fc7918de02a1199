//! Glucose monitoring core.
//!
//! A controller owns one sampler at a time. Each tick the sampler pulls a
//! reading, the dispatcher classifies it, audits out-of-range samples, and
//! asks the cooldown gate whether the alert sink may be called.

mod controller;
mod cooldown;
mod dispatcher;
mod run_state;
mod sampler;
mod thresholds;
mod traits;
pub mod types;

pub use controller::{MonitorController, MonitorServices, DEFAULT_STOP_TIMEOUT};
pub use cooldown::CooldownGate;
pub use dispatcher::{fallback_suggestion, AlertDispatcher, DispatchOutcome};
pub use run_state::{RunState, TickGuard};
pub use sampler::Sampler;
pub use thresholds::{classify, crossed_threshold};
pub use traits::{AlertSink, AuditLog, ReadingSource, SuggestionProvider};
pub use types::{
    AlertPayload, Classification, DeliveryResult, DeliveryStatus, DeliverySummary, MonitorConfig,
    MonitorStatus, NotificationRecord, StartOutcome, StopOutcome, MIN_SAMPLING_INTERVAL,
};
