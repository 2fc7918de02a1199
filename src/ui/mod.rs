// UI and formatting module

pub mod status_formatters;

// Re-export commonly used items for cleaner imports
pub use status_formatters::{format_classification, format_instant, format_status};
