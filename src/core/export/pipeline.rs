//! Batch export pipeline
//!
//! Sequential driver over a list of matched layers. Items run strictly in
//! input order, never in parallel: the host transaction model and the shared
//! visibility state forbid overlapping isolate/restore cycles. Cancellation
//! is cooperative (a `watch` flag checked before each item, never a
//! preemption of an in-flight item) and a failed item never aborts its
//! siblings.

use crate::core::export::exporter::LayerExporter;
use crate::core::export::progress::{emit, ProgressEvent, ProgressSender};
use crate::core::export::summary::{BatchItemError, ExportSummary};
use crate::domain::layer::{DocumentId, MatchRecord};
use crate::domain::options::ExportOptions;
use crate::domain::result::Result;
use crate::domain::LayerportError;
use crate::host::traits::{DocumentHost, FolderHandle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Resets the running flag on every exit path
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Sequential batch export over matched layers
pub struct ExportPipeline {
    host: Arc<dyn DocumentHost>,
    exporter: LayerExporter,
    is_exporting: AtomicBool,
}

impl ExportPipeline {
    /// Creates a pipeline bound to a host
    pub fn new(host: Arc<dyn DocumentHost>) -> Self {
        let exporter = LayerExporter::new(host.clone());
        Self {
            host,
            exporter,
            is_exporting: AtomicBool::new(false),
        }
    }

    /// Whether a batch is currently running on this pipeline
    pub fn is_exporting(&self) -> bool {
        self.is_exporting.load(Ordering::SeqCst)
    }

    /// Runs a batch export
    ///
    /// Processes `matches` strictly in input order. Before each item the
    /// cancellation flag is checked; once set, the remaining items are never
    /// attempted. Per-item failures are recorded and the batch continues.
    /// A cooperative yield between items keeps the host UI responsive.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyRunning` (without side effects) if a batch is already
    /// in progress on this pipeline, or `InvalidInput` for invalid options.
    /// Per-item failures never surface here; they are in the summary.
    pub async fn run(
        &self,
        document: DocumentId,
        matches: &[MatchRecord],
        options: &ExportOptions,
        dest: &FolderHandle,
        cancel: watch::Receiver<bool>,
        progress: Option<&ProgressSender>,
    ) -> Result<ExportSummary> {
        options.validate()?;

        if self
            .is_exporting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(LayerportError::AlreadyRunning);
        }
        let _guard = RunningGuard(&self.is_exporting);

        let started = Instant::now();
        let total = matches.len();
        let mut summary = ExportSummary::new(total);

        tracing::info!(
            total,
            dest = %dest.native_path,
            prefix = %options.prefix,
            "Starting export batch"
        );

        for (index, record) in matches.iter().enumerate() {
            if *cancel.borrow() {
                summary.cancelled = true;
                tracing::info!(
                    exported = summary.exported,
                    remaining = total - index,
                    "Export batch cancelled"
                );
                break;
            }

            match self
                .exporter
                .export_one(document, record, options, dest)
                .await
            {
                Ok(file) => {
                    summary.add_success();
                    emit(
                        progress,
                        ProgressEvent::Exported {
                            index,
                            total,
                            name: record.name.clone(),
                            file: file.name,
                        },
                    );
                }
                Err(e) => {
                    summary.add_failure(BatchItemError::new(index, &record.name, e.to_string()));
                    emit(
                        progress,
                        ProgressEvent::ItemFailed {
                            index,
                            total,
                            name: record.name.clone(),
                            message: e.to_string(),
                        },
                    );
                }
            }

            // Cooperative pause between items; no ordering or correctness
            // guarantees attach to it.
            tokio::task::yield_now().await;
        }

        if summary.cancelled {
            emit(
                progress,
                ProgressEvent::Cancelled {
                    exported: summary.exported,
                },
            );
        } else {
            emit(
                progress,
                ProgressEvent::Completed {
                    exported: summary.exported,
                    failed: summary.failed,
                },
            );
            if options.reveal_in_file_browser && summary.exported > 0 {
                if let Err(e) = self.host.reveal_in_file_browser(&dest.native_path).await {
                    tracing::warn!(error = %e, "Could not reveal destination folder");
                }
            }
        }

        let summary = summary.with_duration(started.elapsed());
        summary.log_summary();
        Ok(summary)
    }
}
