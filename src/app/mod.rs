//! Plugin application state
//!
//! [`PluginApp`] is the single explicit state object constructed at plugin
//! startup. It owns the host adapter and the search/export collaborators; the
//! panel's DOM event bindings are a thin adapter layer outside this crate
//! that calls into it. (This replaces the ad-hoc global singleton the plugin
//! started out as.)
//!
//! Concurrency model: the host provides one cooperative UI/document thread.
//! The interior mutexes exist to make the shared state `Sync`, not to
//! arbitrate real contention, and are never held across an await point.

use crate::config::PluginConfig;
use crate::core::export::{ExportPipeline, ExportSummary, ProgressSender};
use crate::core::search::LayerSearcher;
use crate::domain::layer::MatchRecord;
use crate::domain::options::ExportOptions;
use crate::domain::result::Result;
use crate::domain::LayerportError;
use crate::host::traits::{DocumentHost, FolderHandle};
use crate::logging::panel::PanelLog;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Application state for one plugin instance
pub struct PluginApp {
    host: Arc<dyn DocumentHost>,
    searcher: LayerSearcher,
    pipeline: ExportPipeline,
    config: PluginConfig,
    matches: Mutex<Vec<MatchRecord>>,
    cancel: Mutex<watch::Sender<bool>>,
    panel: PanelLog,
}

impl PluginApp {
    /// Creates the application state with default configuration
    pub fn new(host: Arc<dyn DocumentHost>) -> Self {
        Self::with_config(host, PluginConfig::default())
    }

    /// Creates the application state with a loaded configuration
    pub fn with_config(host: Arc<dyn DocumentHost>, config: PluginConfig) -> Self {
        let searcher = LayerSearcher::new(host.clone());
        let pipeline = ExportPipeline::new(host.clone());
        let (cancel_tx, _) = watch::channel(false);
        let panel = PanelLog::new();
        panel.info(format!("{} initialized", config.application.name));
        Self {
            host,
            searcher,
            pipeline,
            config,
            matches: Mutex::new(Vec::new()),
            cancel: Mutex::new(cancel_tx),
            panel,
        }
    }

    /// The loaded configuration
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// The user-facing panel log
    pub fn panel(&self) -> &PanelLog {
        &self.panel
    }

    /// Whether an export batch is in flight
    pub fn is_exporting(&self) -> bool {
        self.pipeline.is_exporting()
    }

    /// Searches the active document's layer tree and stores the matches
    ///
    /// # Errors
    ///
    /// Returns `NoActiveDocument` if the host has no open document and
    /// `InvalidInput` for an empty query, both before any host mutation.
    pub fn search(&self, query: &str, exact: bool) -> Result<Vec<MatchRecord>> {
        let document = self.host.active_document()?;
        let matches = self.searcher.search(document, query, exact)?;

        self.panel.info(format!(
            "Found {} layer(s) matching '{}'",
            matches.len(),
            query.trim()
        ));

        let mut stored = self.matches.lock().expect("match list lock poisoned");
        *stored = matches.clone();
        Ok(matches)
    }

    /// The matches from the most recent search
    pub fn matches(&self) -> Vec<MatchRecord> {
        self.matches
            .lock()
            .expect("match list lock poisoned")
            .clone()
    }

    /// Current matches as a JSON payload for the panel webview
    pub fn matches_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self.matches())
            .map_err(|e| LayerportError::Export(format!("Failed to serialize matches: {e}")))
    }

    /// Exports every match from the most recent search
    pub async fn export_all(
        &self,
        options: &ExportOptions,
        dest: &FolderHandle,
        progress: Option<&ProgressSender>,
    ) -> Result<ExportSummary> {
        let selection: Vec<usize> = (0..self.matches().len()).collect();
        self.export_selected(&selection, options, dest, progress)
            .await
    }

    /// Exports a selection (by index) of the most recent search's matches
    ///
    /// # Errors
    ///
    /// Returns `AlreadyRunning` while a batch is in flight, `InvalidInput`
    /// for an empty selection or an out-of-range index, and
    /// `NoActiveDocument` if the host lost its document. Per-item failures
    /// are reported in the summary, not here.
    pub async fn export_selected(
        &self,
        indices: &[usize],
        options: &ExportOptions,
        dest: &FolderHandle,
        progress: Option<&ProgressSender>,
    ) -> Result<ExportSummary> {
        if self.pipeline.is_exporting() {
            return Err(LayerportError::AlreadyRunning);
        }

        let document = self.host.active_document()?;
        let selected = self.select_matches(indices)?;

        // Fresh cancellation channel per batch: an earlier cancel request
        // must not poison this run. The export holds its own handles from
        // here on; later document-change notifications do not touch it.
        let cancel_rx = {
            let mut cancel = self.cancel.lock().expect("cancel channel lock poisoned");
            let (tx, rx) = watch::channel(false);
            *cancel = tx;
            rx
        };

        self.panel.info(format!(
            "Exporting {} layer(s) to {}",
            selected.len(),
            dest.native_path
        ));

        let summary = self
            .pipeline
            .run(document, &selected, options, dest, cancel_rx, progress)
            .await?;

        for error in &summary.errors {
            self.panel
                .error(format!("{}: {}", error.name, error.message));
        }
        if summary.cancelled {
            self.panel.warn(format!(
                "Export cancelled after {} layer(s)",
                summary.exported
            ));
        } else {
            self.panel.info(format!(
                "Export finished: {} exported, {} failed",
                summary.exported, summary.failed
            ));
        }

        Ok(summary)
    }

    /// Requests cooperative cancellation of the in-flight batch
    ///
    /// Observed between items only; the current item always finishes.
    pub fn request_cancel(&self) {
        let cancel = self.cancel.lock().expect("cancel channel lock poisoned");
        if cancel.send(true).is_ok() {
            self.panel.warn("Cancellation requested");
        }
    }

    /// Host document-change notification
    ///
    /// Invalidates the stored search results (their paths and handles may be
    /// stale) but never aborts an in-flight export, which holds its own
    /// references.
    pub fn notify_document_changed(&self) {
        let mut stored = self.matches.lock().expect("match list lock poisoned");
        if !stored.is_empty() {
            stored.clear();
            self.panel.info("Document changed, search results cleared");
        }
    }

    fn select_matches(&self, indices: &[usize]) -> Result<Vec<MatchRecord>> {
        let stored = self.matches.lock().expect("match list lock poisoned");
        if indices.is_empty() {
            return Err(LayerportError::InvalidInput(
                "no layers selected for export".to_string(),
            ));
        }
        indices
            .iter()
            .map(|&i| {
                stored.get(i).cloned().ok_or_else(|| {
                    LayerportError::InvalidInput(format!(
                        "selection index {} out of range (have {} matches)",
                        i,
                        stored.len()
                    ))
                })
            })
            .collect()
    }
}
