//! Integration tests for the plugin application state
//!
//! These tests verify that:
//! - Search results feed selection-based export
//! - Cancellation requested through the app stops an in-flight batch
//! - A document change invalidates search results without aborting exports
//! - The panel log records the user-facing story of a session

use layerport::app::PluginApp;
use layerport::core::export::{progress_channel, ProgressEvent};
use layerport::domain::layer::DocumentId;
use layerport::domain::options::ExportOptions;
use layerport::domain::LayerportError;
use layerport::host::memory::InMemoryHost;
use layerport::host::traits::FolderHandle;
use std::sync::Arc;

fn app_with_layers(names: &[&str]) -> (Arc<InMemoryHost>, DocumentId, Arc<PluginApp>) {
    let host = Arc::new(InMemoryHost::new());
    let doc = host.create_document("Root");
    for name in names {
        host.add_layer(doc, None, *name);
    }
    let app = Arc::new(PluginApp::new(host.clone()));
    (host, doc, app)
}

fn dest() -> FolderHandle {
    FolderHandle::new("out", "/tmp/out")
}

#[tokio::test]
async fn test_search_then_export_selected() {
    let (host, _doc, app) = app_with_layers(&["Icon A", "Icon B", "Icon C"]);
    let matches = app.search("icon", false).unwrap();
    assert_eq!(matches.len(), 3);

    let summary = app
        .export_selected(&[0, 2], &ExportOptions::default(), &dest(), None)
        .await
        .unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.exported, 2);
    let saved: Vec<String> = host
        .saved_pngs()
        .iter()
        .map(|s| s.file.name.clone())
        .collect();
    assert_eq!(saved, vec!["Icon A.png", "Icon C.png"]);
}

#[tokio::test]
async fn test_export_all_reports_per_item_failures_in_panel() {
    let (host, _doc, app) = app_with_layers(&["Icon A", "Icon B"]);
    host.fail_render_for("Icon B");
    app.search("icon", false).unwrap();

    let summary = app
        .export_all(&ExportOptions::default(), &dest(), None)
        .await
        .unwrap();

    assert_eq!(summary.exported, 1);
    assert_eq!(summary.failed, 1);

    let lines = app.panel().lines().join("\n");
    assert!(lines.contains("Icon B:"));
    assert!(lines.contains("Export finished: 1 exported, 1 failed"));
}

#[tokio::test]
async fn test_cancel_through_app_stops_batch() {
    let (host, _doc, app) = app_with_layers(&["Icon A", "Icon B", "Icon C", "Icon D"]);
    app.search("icon", false).unwrap();
    let (progress_tx, mut progress_rx) = progress_channel();

    let handle = tokio::spawn({
        let app = app.clone();
        async move {
            app.export_all(&ExportOptions::default(), &dest(), Some(&progress_tx))
                .await
        }
    });

    while let Some(event) = progress_rx.recv().await {
        if matches!(event, ProgressEvent::Exported { index: 1, .. }) {
            app.request_cancel();
        }
    }

    let summary = handle.await.unwrap().unwrap();
    assert!(summary.cancelled);
    assert_eq!(summary.exported, 2);
    assert_eq!(summary.skipped(), 2);
    assert_eq!(host.saved_pngs().len(), 2);

    let lines = app.panel().lines().join("\n");
    assert!(lines.contains("Export cancelled after 2 layer(s)"));
}

#[tokio::test]
async fn test_stale_cancel_does_not_poison_next_batch() {
    let (host, _doc, app) = app_with_layers(&["Icon A"]);
    app.search("icon", false).unwrap();

    // A cancel with no batch running must not affect the one started later.
    app.request_cancel();

    let summary = app
        .export_all(&ExportOptions::default(), &dest(), None)
        .await
        .unwrap();
    assert!(!summary.cancelled);
    assert_eq!(summary.exported, 1);
    assert_eq!(host.saved_pngs().len(), 1);
}

#[tokio::test]
async fn test_second_export_rejected_while_first_runs() {
    let (_host, _doc, app) = app_with_layers(&["Icon A", "Icon B", "Icon C"]);
    app.search("icon", false).unwrap();

    let handle = tokio::spawn({
        let app = app.clone();
        async move {
            app.export_all(&ExportOptions::default(), &dest(), None)
                .await
        }
    });

    tokio::task::yield_now().await;
    assert!(app.is_exporting());

    let err = app
        .export_all(&ExportOptions::default(), &dest(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, LayerportError::AlreadyRunning));

    let summary = handle.await.unwrap().unwrap();
    assert_eq!(summary.exported, 3);
}

#[tokio::test]
async fn test_document_change_clears_matches_but_not_the_batch() {
    let (host, _doc, app) = app_with_layers(&["Icon A", "Icon B", "Icon C"]);
    app.search("icon", false).unwrap();
    let (progress_tx, mut progress_rx) = progress_channel();

    let handle = tokio::spawn({
        let app = app.clone();
        async move {
            app.export_all(&ExportOptions::default(), &dest(), Some(&progress_tx))
                .await
        }
    });

    while let Some(event) = progress_rx.recv().await {
        if matches!(event, ProgressEvent::Exported { index: 0, .. }) {
            app.notify_document_changed();
        }
    }

    // The batch holds its own copies of the matched records and runs to
    // completion; only the stored search results are gone.
    let summary = handle.await.unwrap().unwrap();
    assert!(!summary.cancelled);
    assert_eq!(summary.exported, 3);
    assert_eq!(host.saved_pngs().len(), 3);
    assert!(app.matches().is_empty());
}

#[tokio::test]
async fn test_export_without_search_is_rejected() {
    let (_host, _doc, app) = app_with_layers(&["Icon A"]);

    let err = app
        .export_all(&ExportOptions::default(), &dest(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, LayerportError::InvalidInput(_)));
}

#[tokio::test]
async fn test_export_requires_active_document() {
    let (host, _doc, app) = app_with_layers(&["Icon A"]);
    app.search("icon", false).unwrap();
    host.clear_active_document();

    let err = app
        .export_all(&ExportOptions::default(), &dest(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, LayerportError::NoActiveDocument));
}
