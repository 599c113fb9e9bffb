// Layerport - Layer Search and PNG Export Plugin Core
// Copyright (c) 2025 Layerport Contributors
// Licensed under the MIT License

//! # Layerport - Layer Search and PNG Export
//!
//! Layerport is the host-independent core of an image-editor plugin that
//! finds layers by name in deeply nested layer trees and exports each match
//! as an individual, isolated PNG.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Searching** layer trees recursively by exact or substring name match
//! - **Isolating** a single layer's visibility with snapshot and restore
//! - **Exporting** isolated layers to trimmed PNG files
//! - **Batching** exports sequentially with progress reporting, per-item
//!   failure isolation, and cooperative cancellation
//!
//! ## Architecture
//!
//! Layerport follows a layered architecture:
//!
//! - [`app`] - Plugin application state and panel-facing operations
//! - [`core`] - Business logic (search, isolate, export)
//! - [`host`] - The [`host::traits::DocumentHost`] adapter boundary and an
//!   in-memory reference host
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and the panel log
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use layerport::app::PluginApp;
//! use layerport::domain::options::ExportOptions;
//! use layerport::host::memory::InMemoryHost;
//! use layerport::host::traits::FolderHandle;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let host = Arc::new(InMemoryHost::new());
//!     let app = PluginApp::new(host);
//!
//!     // Find every layer whose name contains "icon"
//!     let matches = app.search("icon", false)?;
//!     println!("Found {} layers", matches.len());
//!
//!     // Export them all as isolated PNGs
//!     let dest = FolderHandle::new("exports", "/tmp/exports");
//!     let summary = app
//!         .export_all(&ExportOptions::default(), &dest, None)
//!         .await?;
//!
//!     println!("Exported {} of {} layers", summary.exported, summary.total);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Layerport uses the [`domain::LayerportError`] type for all errors:
//!
//! ```rust,no_run
//! use layerport::domain::LayerportError;
//!
//! fn example() -> Result<(), LayerportError> {
//!     let config = layerport::config::load_config("layerport.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Layerport uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Starting export batch");
//! warn!(layer = "Icon", "Restore skipped a deleted layer");
//! ```

pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod host;
pub mod logging;
