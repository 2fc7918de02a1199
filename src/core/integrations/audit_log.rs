//! Line-oriented, append-only audit log of alert-worthy samples.
//!
//! Each record is `<ISO-8601 timestamp> | <message> | <payload JSON>`.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::core::glucose_monitor::{AlertPayload, AuditLog};
use crate::error::{MonitorError, Result};

/// Default file name, relative to the working directory
pub const DEFAULT_AUDIT_LOG: &str = "alerts.log";

pub struct FileAuditLog {
    path: PathBuf,
}

impl FileAuditLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Render one audit record, newline included
pub fn format_audit_line(payload: &AlertPayload) -> Result<String> {
    Ok(format!(
        "{} | {} | {}\n",
        Local::now().to_rfc3339(),
        payload.message(),
        serde_json::to_string(payload)?
    ))
}

impl AuditLog for FileAuditLog {
    fn append(&self, payload: &AlertPayload) -> Result<()> {
        let line = format_audit_line(payload)?;
        log::info!("[GlucoseMonitor] {}", line.trim_end());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    MonitorError::audit_log(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                MonitorError::audit_log(format!("cannot open {}: {}", self.path.display(), e))
            })?;

        file.write_all(line.as_bytes())
            .map_err(|e| MonitorError::audit_log(format!("cannot write {}: {}", self.path.display(), e)))?;

        Ok(())
    }
}
