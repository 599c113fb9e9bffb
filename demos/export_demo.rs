//! Example demonstrating the Layerport search and export pipeline
//!
//! This example shows how to:
//! - Initialize structured logging
//! - Build a layer tree on the in-memory host
//! - Search it and export the matches with progress reporting
//!
//! Run with:
//! ```bash
//! cargo run --example export_demo
//! ```

use layerport::app::PluginApp;
use layerport::config::LoggingConfig;
use layerport::core::export::{progress_channel, ProgressEvent};
use layerport::domain::options::ExportOptions;
use layerport::host::memory::InMemoryHost;
use layerport::host::traits::FolderHandle;
use layerport::logging::init_logging;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging = LoggingConfig {
        local_enabled: false,
        ..Default::default()
    };

    // Keep the guard alive for the duration of the program
    let _guard = init_logging("debug", &logging)?;

    // Build a small document tree the way a host adapter would expose one
    let host = Arc::new(InMemoryHost::new());
    let doc = host.create_document("Mockup");
    let ui = host.add_group(doc, None, "UI");
    host.add_layer(doc, Some(ui), "Home Icon");
    host.add_layer(doc, Some(ui), "Search Icon");
    host.add_layer(doc, Some(ui), "Button");
    host.add_layer(doc, None, "Background");

    let app = PluginApp::new(host);

    // Find every layer whose name contains "icon"
    let matches = app.search("icon", false)?;
    for record in &matches {
        println!("match: {}", record.path);
    }

    // Export them, printing progress events as they arrive
    let (progress_tx, mut progress_rx) = progress_channel();
    let options = ExportOptions {
        prefix: "ui_".to_string(),
        trim_transparent: true,
        ..Default::default()
    };
    let dest = FolderHandle::new("exports", "/tmp/layerport_demo");

    let export = app.export_all(&options, &dest, Some(&progress_tx));
    let printer = async {
        while let Some(event) = progress_rx.recv().await {
            println!("progress: {}% {:?}", event.percent(), event);
            if matches!(
                event,
                ProgressEvent::Completed { .. } | ProgressEvent::Cancelled { .. }
            ) {
                break;
            }
        }
    };

    let (summary, _) = tokio::join!(export, printer);
    let summary = summary?;

    println!(
        "done: {} exported, {} failed in {:?}",
        summary.exported, summary.failed, summary.duration
    );
    for line in app.panel().lines() {
        println!("panel: {line}");
    }

    Ok(())
}
