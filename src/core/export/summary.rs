//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting batch export
//! results.

use serde::Serialize;
use std::time::Duration;

/// Failure record for a single batch item
#[derive(Debug, Clone, Serialize)]
pub struct BatchItemError {
    /// Zero-based position of the item in the batch
    pub index: usize,

    /// Layer name of the failed item
    pub name: String,

    /// Error message
    pub message: String,
}

impl BatchItemError {
    /// Creates a new item failure record
    pub fn new(index: usize, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Summary of a batch export
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    /// Number of items in the batch
    pub total: usize,

    /// Number of items exported successfully
    pub exported: usize,

    /// Number of items that failed
    pub failed: usize,

    /// Whether the batch stopped early on a cancellation request.
    /// Items already exported stay exported; the rest were never attempted.
    pub cancelled: bool,

    /// Wall-clock duration of the batch
    #[serde(skip)]
    pub duration: Duration,

    /// Per-item failure records
    pub errors: Vec<BatchItemError>,
}

impl ExportSummary {
    /// Creates an empty summary for a batch of `total` items
    pub fn new(total: usize) -> Self {
        Self {
            total,
            exported: 0,
            failed: 0,
            cancelled: false,
            duration: Duration::from_secs(0),
            errors: Vec::new(),
        }
    }

    /// Sets the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Records a successful item
    pub fn add_success(&mut self) {
        self.exported += 1;
    }

    /// Records a failed item
    pub fn add_failure(&mut self, error: BatchItemError) {
        self.failed += 1;
        self.errors.push(error);
    }

    /// Number of items never attempted (cancellation skips)
    pub fn skipped(&self) -> usize {
        self.total - self.exported - self.failed
    }

    /// Whether every item was attempted and none failed
    pub fn is_successful(&self) -> bool {
        !self.cancelled && self.failed == 0
    }

    /// Logs the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total = self.total,
            exported = self.exported,
            failed = self.failed,
            skipped = self.skipped(),
            cancelled = self.cancelled,
            duration_ms = self.duration.as_millis() as u64,
            "Export batch finished"
        );

        for error in &self.errors {
            tracing::warn!(
                index = error.index,
                name = %error.name,
                message = %error.message,
                "Export item failed"
            );
        }
    }
}
