// glucose-watch library - public API

// Re-export error types
pub mod error;
pub use error::{MonitorError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod ui;

// Re-export commonly used types
pub use crate::core::config::Config;
pub use crate::core::glucose_monitor::{MonitorConfig, MonitorController, MonitorServices, MonitorStatus};

// Initialize logging (RUST_LOG overrides the default Info level)
pub fn init_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
