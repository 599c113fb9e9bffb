//! Host abstraction traits
//!
//! This module defines the trait a host adapter must implement for Layerport
//! to search, isolate and export layers. In production the adapter bridges to
//! the Photoshop UXP APIs; the test suite runs against
//! [`crate::host::memory::InMemoryHost`].
//!
//! Tree reads and visibility writes are synchronous: the host runs a single
//! cooperative UI/document thread and these calls complete inline. The await
//! points are exactly the heavyweight host operations (modal scope, render,
//! trim, encode, file write, shell).

use crate::domain::layer::{DocumentId, LayerId, LayerKind, ModalToken};
use crate::domain::result::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Handle to a destination folder picked by the user
///
/// Mirrors the host file-system folder handle: a display name plus the
/// platform-native path used for shell reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderHandle {
    /// Folder display name
    pub name: String,

    /// Platform-native path
    pub native_path: String,
}

impl FolderHandle {
    /// Creates a folder handle
    pub fn new(name: impl Into<String>, native_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            native_path: native_path.into(),
        }
    }
}

/// Handle to a file created inside a destination folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    /// File name, including extension
    pub name: String,

    /// Platform-native path
    pub native_path: String,
}

/// Host document/imaging/file-system adapter
///
/// All mutation goes through host-provided setters; Layerport never assumes
/// ownership of the tree. Implementations must report a stale handle as
/// [`crate::domain::LayerportError::NotFound`] rather than panicking.
#[async_trait]
pub trait DocumentHost: Send + Sync {
    // --- document model -------------------------------------------------

    /// The currently active document
    ///
    /// # Errors
    ///
    /// Returns `NoActiveDocument` if no document is open.
    fn active_document(&self) -> Result<DocumentId>;

    /// Display name of a document (heads every match path)
    fn document_name(&self, document: DocumentId) -> Result<String>;

    /// The document's top-level layers, in z-order
    fn top_level_layers(&self, document: DocumentId) -> Result<Vec<LayerId>>;

    /// Whether a layer handle still resolves in the tree
    fn layer_exists(&self, layer: LayerId) -> bool;

    /// Layer name
    fn layer_name(&self, layer: LayerId) -> Result<String>;

    /// Layer kind tag
    fn layer_kind(&self, layer: LayerId) -> Result<LayerKind>;

    /// Current visibility flag
    fn layer_visible(&self, layer: LayerId) -> Result<bool>;

    /// Sets the visibility flag
    fn set_layer_visible(&self, layer: LayerId, visible: bool) -> Result<()>;

    /// Direct children of a group, in z-order. Empty for leaves.
    fn layer_children(&self, layer: LayerId) -> Result<Vec<LayerId>>;

    /// Parent group, or `None` for a top-level layer
    fn layer_parent(&self, layer: LayerId) -> Result<Option<LayerId>>;

    /// Makes a layer the host's active selection. UI convenience only; not
    /// a correctness requirement of the export.
    fn set_active_layer(&self, document: DocumentId, layer: LayerId) -> Result<()>;

    // --- transactional scope --------------------------------------------

    /// Enters a modal editing scope with a display name shown by the host
    async fn begin_modal(&self, display_name: &str) -> Result<ModalToken>;

    /// Leaves a modal editing scope
    async fn end_modal(&self, token: ModalToken) -> Result<()>;

    // --- rendering and encoding -----------------------------------------

    /// Duplicates a document so the original is never mutated by the
    /// render/trim/encode path
    async fn duplicate_document(&self, document: DocumentId) -> Result<DocumentId>;

    /// Trims a document's canvas to the bounding box of non-transparent
    /// pixels on all four edges
    async fn trim_transparent_bounds(&self, document: DocumentId) -> Result<()>;

    /// Encodes a document to PNG at the given compression level and writes
    /// it to `file`
    async fn save_png(&self, document: DocumentId, file: &FileHandle, compression: u8)
        -> Result<()>;

    /// Closes a document, discarding it without saving
    async fn close_document(&self, document: DocumentId) -> Result<()>;

    // --- file system and shell ------------------------------------------

    /// Creates (or overwrites) a file in a destination folder
    async fn create_file(
        &self,
        folder: &FolderHandle,
        name: &str,
        overwrite: bool,
    ) -> Result<FileHandle>;

    /// Opens a native path in the platform file browser
    async fn reveal_in_file_browser(&self, native_path: &str) -> Result<()>;
}
