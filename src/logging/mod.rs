//! Logging and observability
//!
//! Two sinks with different audiences:
//! - [`structured`] - developer-facing tracing output (console, optional
//!   rotating JSON file)
//! - [`panel`] - the user-facing plugin-panel log, capped at the most
//!   recent 100 lines

pub mod panel;
pub mod structured;

// Re-export commonly used items
pub use panel::{PanelEntry, PanelLevel, PanelLog, PANEL_LOG_CAPACITY};
pub use structured::{init_logging, LoggingGuard};
