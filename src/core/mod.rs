// Core business logic module

pub mod config;
pub mod glucose_monitor;
pub mod integrations;

// Re-export commonly used items
pub use config::Config;
pub use glucose_monitor::{MonitorController, MonitorServices};
