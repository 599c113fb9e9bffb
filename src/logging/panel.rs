//! Plugin-panel log
//!
//! Append-only, timestamped log lines shown in the plugin panel, capped at
//! the most recent [`PANEL_LOG_CAPACITY`] entries. Distinct from the tracing
//! pipeline: these are the user-facing lines, one per noteworthy event.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;

/// Maximum number of retained panel log entries
pub const PANEL_LOG_CAPACITY: usize = 100;

/// Severity of a panel log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelLevel {
    /// Informational line
    Info,
    /// Warning line
    Warn,
    /// Error line
    Error,
}

impl fmt::Display for PanelLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelLevel::Info => write!(f, "info"),
            PanelLevel::Warn => write!(f, "warn"),
            PanelLevel::Error => write!(f, "error"),
        }
    }
}

/// One panel log entry
#[derive(Debug, Clone, Serialize)]
pub struct PanelEntry {
    /// Time the line was appended
    pub timestamp: DateTime<Utc>,

    /// Severity
    pub level: PanelLevel,

    /// Message text
    pub message: String,
}

/// Capped append-only panel log
#[derive(Debug, Default)]
pub struct PanelLog {
    entries: Mutex<VecDeque<PanelEntry>>,
}

impl PanelLog {
    /// Creates an empty panel log
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line, evicting the oldest entry once the cap is reached
    pub fn append(&self, level: PanelLevel, message: impl Into<String>) {
        let mut entries = self.entries.lock().expect("panel log lock poisoned");
        if entries.len() == PANEL_LOG_CAPACITY {
            entries.pop_front();
        }
        entries.push_back(PanelEntry {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        });
    }

    /// Shorthand for an info line
    pub fn info(&self, message: impl Into<String>) {
        self.append(PanelLevel::Info, message);
    }

    /// Shorthand for a warning line
    pub fn warn(&self, message: impl Into<String>) {
        self.append(PanelLevel::Warn, message);
    }

    /// Shorthand for an error line
    pub fn error(&self, message: impl Into<String>) {
        self.append(PanelLevel::Error, message);
    }

    /// Retained entries, oldest first
    pub fn entries(&self) -> Vec<PanelEntry> {
        self.entries
            .lock()
            .expect("panel log lock poisoned")
            .iter()
            .cloned()
            .collect()
    }

    /// Formatted lines for the panel, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.entries()
            .iter()
            .map(|e| {
                format!(
                    "{} [{}] {}",
                    e.timestamp.format("%H:%M:%S"),
                    e.level,
                    e.message
                )
            })
            .collect()
    }

    /// Number of retained entries
    pub fn len(&self) -> usize {
        self.entries.lock().expect("panel log lock poisoned").len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_format() {
        let log = PanelLog::new();
        log.info("Plugin initialized");
        log.error("Export failed: Icon");

        let lines = log.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[info] Plugin initialized"));
        assert!(lines[1].contains("[error] Export failed: Icon"));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let log = PanelLog::new();
        for i in 0..PANEL_LOG_CAPACITY + 5 {
            log.info(format!("line {i}"));
        }

        let entries = log.entries();
        assert_eq!(entries.len(), PANEL_LOG_CAPACITY);
        assert_eq!(entries[0].message, "line 5");
        assert_eq!(
            entries.last().unwrap().message,
            format!("line {}", PANEL_LOG_CAPACITY + 4)
        );
    }

    #[test]
    fn test_levels_display() {
        assert_eq!(PanelLevel::Info.to_string(), "info");
        assert_eq!(PanelLevel::Warn.to_string(), "warn");
        assert_eq!(PanelLevel::Error.to_string(), "error");
    }
}
