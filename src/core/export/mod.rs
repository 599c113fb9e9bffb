//! Export pipeline
//!
//! Single-item export and the sequential batch driver.

pub mod exporter;
pub mod pipeline;
pub mod progress;
pub mod summary;

pub use exporter::LayerExporter;
pub use pipeline::ExportPipeline;
pub use progress::{progress_channel, ProgressEvent, ProgressReceiver, ProgressSender};
pub use summary::{BatchItemError, ExportSummary};
