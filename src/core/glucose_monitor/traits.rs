//! Seams to the external collaborators of the monitor.
//!
//! Implementations are chosen and built once by the host and handed to the
//! controller. Calls are synchronous from the sampler's point of view and run on
//! a blocking thread; implementations are expected to bound their own latency
//! (request timeouts) so a stalled dependency cannot hold a tick forever.

use crate::error::Result;

use super::types::{AlertPayload, Classification, DeliverySummary};

/// Supplies the current measurement
pub trait ReadingSource: Send + Sync {
    /// Current glucose value in mg/dL, or why none is available
    fn fetch(&self) -> Result<f64>;
}

/// Produces advisory text for an out-of-range sample
pub trait SuggestionProvider: Send + Sync {
    fn suggest(&self, value: f64, classification: Classification, threshold: f64)
        -> Result<String>;
}

/// Delivers an alert to its recipients
pub trait AlertSink: Send + Sync {
    /// One call, one aggregate outcome, however many recipients are behind it
    fn notify(&self, payload: &AlertPayload) -> Result<DeliverySummary>;
}

/// Durable append-only record of every alert-worthy sample
pub trait AuditLog: Send + Sync {
    fn append(&self, payload: &AlertPayload) -> Result<()>;
}
