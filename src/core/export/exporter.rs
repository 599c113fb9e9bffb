//! Single-item export
//!
//! Exports one matched layer as an isolated PNG: isolate → duplicate →
//! optional trim → encode → cleanup → restore, inside a host modal scope.
//! Every acquired resource is released on every exit path: the duplicate is
//! closed even when trim or encode fails, the visibility snapshot is restored
//! even when any later step fails, and the modal scope is always left. Rust
//! has no async drop, so the cleanup is layered as nested `match`-free calls
//! whose results are only propagated after their cleanup ran.

use crate::core::isolate::VisibilityIsolator;
use crate::domain::layer::{DocumentId, MatchRecord};
use crate::domain::options::ExportOptions;
use crate::domain::result::Result;
use crate::host::traits::{DocumentHost, FileHandle, FolderHandle};
use std::sync::Arc;

/// Exports one matched layer to a standalone PNG
pub struct LayerExporter {
    host: Arc<dyn DocumentHost>,
    isolator: VisibilityIsolator,
}

impl LayerExporter {
    /// Creates an exporter bound to a host
    pub fn new(host: Arc<dyn DocumentHost>) -> Self {
        let isolator = VisibilityIsolator::new(host.clone());
        Self { host, isolator }
    }

    /// Exports a single matched layer
    ///
    /// Runs inside a host modal scope. A failure at any step surfaces as a
    /// single error for this item; the caller (the batch pipeline) treats it
    /// as a per-item failure and moves on.
    pub async fn export_one(
        &self,
        document: DocumentId,
        record: &MatchRecord,
        options: &ExportOptions,
        dest: &FolderHandle,
    ) -> Result<FileHandle> {
        let modal = self
            .host
            .begin_modal(&format!("Export {}", record.name))
            .await?;

        let result = self.export_isolated(document, record, options, dest).await;

        if let Err(e) = self.host.end_modal(modal).await {
            tracing::warn!(layer = %record.name, error = %e, "Failed to leave modal scope");
        }

        match &result {
            Ok(file) => tracing::info!(
                layer = %record.name,
                path = %record.path,
                file = %file.native_path,
                "Exported layer"
            ),
            Err(e) => tracing::warn!(
                layer = %record.name,
                path = %record.path,
                error = %e,
                "Layer export failed"
            ),
        }
        result
    }

    /// Isolation wrapper: restore runs even when the render path fails
    async fn export_isolated(
        &self,
        document: DocumentId,
        record: &MatchRecord,
        options: &ExportOptions,
        dest: &FolderHandle,
    ) -> Result<FileHandle> {
        let snapshot = self.isolator.isolate(document, record.layer)?;

        let result = self.render_and_save(document, record, options, dest).await;

        // Restore is the sole authority for final visibility state.
        if let Err(e) = self.isolator.restore(&snapshot) {
            tracing::warn!(layer = %record.name, error = %e, "Visibility restore failed");
        }
        result
    }

    /// Duplicate wrapper: the duplicate is closed even when trim/encode fails
    async fn render_and_save(
        &self,
        document: DocumentId,
        record: &MatchRecord,
        options: &ExportOptions,
        dest: &FolderHandle,
    ) -> Result<FileHandle> {
        // Host UI convenience, not a correctness requirement.
        if let Err(e) = self.host.set_active_layer(document, record.layer) {
            tracing::debug!(layer = %record.name, error = %e, "Could not set active layer");
        }

        let file_name = options.output_file_name(&record.name);

        let duplicate = self.host.duplicate_document(document).await?;
        let result = self
            .save_duplicate(duplicate, &file_name, options, dest)
            .await;

        if let Err(e) = self.host.close_document(duplicate).await {
            tracing::warn!(document = %duplicate, error = %e, "Failed to close duplicate");
        }
        result
    }

    async fn save_duplicate(
        &self,
        duplicate: DocumentId,
        file_name: &str,
        options: &ExportOptions,
        dest: &FolderHandle,
    ) -> Result<FileHandle> {
        if options.trim_transparent {
            self.host.trim_transparent_bounds(duplicate).await?;
        }

        let file = self.host.create_file(dest, file_name, true).await?;
        self.host
            .save_png(duplicate, &file, options.compression)
            .await?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::search::LayerSearcher;
    use crate::domain::errors::LayerportError;
    use crate::host::memory::InMemoryHost;

    fn fixture() -> (Arc<InMemoryHost>, DocumentId, Vec<MatchRecord>) {
        let host = Arc::new(InMemoryHost::new());
        let doc = host.create_document("Root");
        let ui = host.add_group(doc, None, "UI");
        host.add_layer(doc, Some(ui), "Button");
        host.add_layer(doc, Some(ui), "Icon");
        host.add_layer(doc, None, "Background");

        let matches = LayerSearcher::new(host.clone())
            .search(doc, "Icon", true)
            .unwrap();
        (host, doc, matches)
    }

    fn dest() -> FolderHandle {
        FolderHandle::new("out", "/tmp/out")
    }

    #[tokio::test]
    async fn test_export_one_writes_isolated_png() {
        let (host, doc, matches) = fixture();
        let exporter = LayerExporter::new(host.clone());
        let options = ExportOptions {
            prefix: "x_".to_string(),
            compression: 9,
            ..Default::default()
        };

        let file = exporter
            .export_one(doc, &matches[0], &options, &dest())
            .await
            .unwrap();
        assert_eq!(file.name, "x_Icon.png");
        assert_eq!(file.native_path, "/tmp/out/x_Icon.png");

        let saved = host.saved_pngs();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].compression, 9);
        assert!(!saved[0].trimmed);
        // The duplicate was encoded with only the target and its ancestor
        // chain visible.
        let mut visible = saved[0].visible_layers.clone();
        visible.sort();
        assert_eq!(visible, vec!["Icon".to_string(), "UI".to_string()]);
    }

    #[tokio::test]
    async fn test_export_one_restores_visibility_and_closes_duplicate() {
        let (host, doc, matches) = fixture();
        let before = host.visibility_map(doc);
        let exporter = LayerExporter::new(host.clone());

        exporter
            .export_one(doc, &matches[0], &ExportOptions::default(), &dest())
            .await
            .unwrap();

        assert_eq!(host.visibility_map(doc), before);
        assert_eq!(host.open_document_count(), 1);
        assert_eq!(host.open_modal_count(), 0);
    }

    #[tokio::test]
    async fn test_trim_option_trims_duplicate_only() {
        let (host, doc, matches) = fixture();
        let exporter = LayerExporter::new(host.clone());
        let options = ExportOptions {
            trim_transparent: true,
            ..Default::default()
        };

        exporter
            .export_one(doc, &matches[0], &options, &dest())
            .await
            .unwrap();

        assert!(host.saved_pngs()[0].trimmed);
    }

    #[tokio::test]
    async fn test_save_failure_still_restores_and_cleans_up() {
        let (host, doc, matches) = fixture();
        let before = host.visibility_map(doc);
        host.fail_save_for("Icon.png");

        let exporter = LayerExporter::new(host.clone());
        let err = exporter
            .export_one(doc, &matches[0], &ExportOptions::default(), &dest())
            .await
            .unwrap_err();
        assert!(matches!(err, LayerportError::HostOperation(_)));

        assert_eq!(host.visibility_map(doc), before);
        assert_eq!(host.open_document_count(), 1);
        assert_eq!(host.open_modal_count(), 0);
        assert!(host.saved_pngs().is_empty());
    }

    #[tokio::test]
    async fn test_deleted_target_reports_not_found() {
        let (host, doc, matches) = fixture();
        host.delete_layer(matches[0].layer);

        let exporter = LayerExporter::new(host.clone());
        let err = exporter
            .export_one(doc, &matches[0], &ExportOptions::default(), &dest())
            .await
            .unwrap_err();
        assert!(matches!(err, LayerportError::NotFound(_)));
        assert_eq!(host.open_modal_count(), 0);
    }
}
