//! Progress events emitted by the batch pipeline
//!
//! Events are delivered over an unbounded `tokio::sync::mpsc` channel so the
//! panel glue can update the progress bar without back-pressuring the
//! pipeline. They serialize to tagged JSON for the webview boundary.

use serde::Serialize;
use tokio::sync::mpsc;

/// One event per pipeline tick
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// An item was exported
    Exported {
        /// Zero-based item index
        index: usize,
        /// Batch size
        total: usize,
        /// Layer name
        name: String,
        /// Output file name
        file: String,
    },

    /// An item failed; the batch continues
    ItemFailed {
        /// Zero-based item index
        index: usize,
        /// Batch size
        total: usize,
        /// Layer name
        name: String,
        /// Error message
        message: String,
    },

    /// Terminal event: the batch ran to exhaustion
    Completed {
        /// Items exported
        exported: usize,
        /// Items failed
        failed: usize,
    },

    /// Terminal event: the batch stopped on a cancellation request
    Cancelled {
        /// Items exported before the stop
        exported: usize,
    },
}

impl ProgressEvent {
    /// Percentage for the progress bar, 0..=100
    ///
    /// Terminal events always report a defined end state.
    pub fn percent(&self) -> u8 {
        match self {
            ProgressEvent::Exported { index, total, .. }
            | ProgressEvent::ItemFailed { index, total, .. } => {
                if *total == 0 {
                    100
                } else {
                    (((index + 1) * 100) / total) as u8
                }
            }
            ProgressEvent::Completed { .. } | ProgressEvent::Cancelled { .. } => 100,
        }
    }
}

/// Sender half of a progress channel
pub type ProgressSender = mpsc::UnboundedSender<ProgressEvent>;

/// Receiver half of a progress channel
pub type ProgressReceiver = mpsc::UnboundedReceiver<ProgressEvent>;

/// Creates a progress channel
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    mpsc::unbounded_channel()
}

/// Sends an event, ignoring a receiver that has gone away
///
/// Progress reporting is advisory; a closed panel must not fail the batch.
pub(crate) fn emit(sender: Option<&ProgressSender>, event: ProgressEvent) {
    if let Some(sender) = sender {
        let _ = sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_mid_batch() {
        let event = ProgressEvent::Exported {
            index: 1,
            total: 4,
            name: "Icon".to_string(),
            file: "Icon.png".to_string(),
        };
        assert_eq!(event.percent(), 50);
    }

    #[test]
    fn test_terminal_events_reach_one_hundred() {
        assert_eq!(
            ProgressEvent::Completed {
                exported: 3,
                failed: 1
            }
            .percent(),
            100
        );
        assert_eq!(ProgressEvent::Cancelled { exported: 2 }.percent(), 100);
    }

    #[test]
    fn test_event_serializes_tagged() {
        let event = ProgressEvent::ItemFailed {
            index: 0,
            total: 2,
            name: "Icon".to_string(),
            message: "Render failed".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "item_failed");
        assert_eq!(json["name"], "Icon");
    }

    #[test]
    fn test_emit_ignores_closed_receiver() {
        let (tx, rx) = progress_channel();
        drop(rx);
        emit(
            Some(&tx),
            ProgressEvent::Cancelled { exported: 0 },
        );
    }
}
