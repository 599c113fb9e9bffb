//! Domain error types
//!
//! This module defines the error hierarchy for Layerport. All errors are
//! domain-specific and never expose host SDK types to callers.

use thiserror::Error;

/// Main Layerport error type
///
/// This is the primary error type used throughout the crate. Per-item export
/// failures are caught at the exporter boundary and recorded in the batch
/// summary; the variants below are what callers of the public API observe.
#[derive(Debug, Error)]
pub enum LayerportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No document is open in the host
    #[error("No active document")]
    NoActiveDocument,

    /// Caller-supplied input was rejected before any host mutation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A layer handle no longer resolves in the host's document tree
    #[error("Layer not found: {0}")]
    NotFound(String),

    /// A host API call rejected (render, trim, encode, file write, ...)
    #[error("Host operation failed: {0}")]
    HostOperation(#[from] HostError),

    /// An export batch is already in progress on this pipeline
    #[error("An export is already running")]
    AlreadyRunning,

    /// Export process errors not tied to a single host call
    #[error("Export error: {0}")]
    Export(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Host-operation errors
///
/// Failures reported by the host adapter. The variant records which host
/// capability rejected so the panel can show a meaningful line, without
/// leaking the host's own error types.
#[derive(Debug, Error)]
pub enum HostError {
    /// Document duplication (the render step) failed
    #[error("Render failed: {0}")]
    RenderFailed(String),

    /// The trim-to-transparent-bounds command failed
    #[error("Trim failed: {0}")]
    TrimFailed(String),

    /// PNG encoding failed
    #[error("Encode failed: {0}")]
    EncodeFailed(String),

    /// Writing the output file failed
    #[error("File write failed: {0}")]
    WriteFailed(String),

    /// Entering or leaving the modal editing scope failed
    #[error("Modal scope failed: {0}")]
    ModalFailed(String),

    /// A layer or document handle went stale mid-operation
    #[error("Stale handle: {0}")]
    StaleHandle(String),

    /// Closing a duplicate document failed
    #[error("Document close failed: {0}")]
    CloseFailed(String),

    /// The shell refused to reveal the destination folder
    #[error("Shell operation failed: {0}")]
    ShellFailed(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for LayerportError {
    fn from(err: std::io::Error) -> Self {
        LayerportError::Io(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for LayerportError {
    fn from(err: toml::de::Error) -> Self {
        LayerportError::Configuration(format!("TOML parse error: {err}"))
    }
}
