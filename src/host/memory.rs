//! In-memory reference host
//!
//! A `DocumentHost` implementation backed by plain data structures. It drives
//! the integration suite: tests build a layer tree, run searches and exports
//! against it, and assert on the recorded saves, reveals and visibility
//! state. Failure injection mimics a host API rejecting mid-batch.

use crate::domain::errors::{HostError, LayerportError};
use crate::domain::layer::{DocumentId, LayerId, LayerKind, ModalToken};
use crate::domain::result::Result;
use crate::host::traits::{DocumentHost, FileHandle, FolderHandle};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

/// A PNG write recorded by the in-memory host
#[derive(Debug, Clone)]
pub struct SavedPng {
    /// The file that was written
    pub file: FileHandle,

    /// Compression level the encoder was asked for
    pub compression: u8,

    /// Whether the source document had been trimmed before encoding
    pub trimmed: bool,

    /// Visibility state of the source document's layers at encode time,
    /// keyed by layer name
    pub visible_layers: Vec<String>,
}

#[derive(Debug, Clone)]
struct LayerState {
    document: DocumentId,
    name: String,
    kind: LayerKind,
    visible: bool,
    parent: Option<LayerId>,
    children: Vec<LayerId>,
}

#[derive(Debug, Clone)]
struct DocumentState {
    name: String,
    roots: Vec<LayerId>,
    active_layer: Option<LayerId>,
    trimmed: bool,
}

#[derive(Debug, Default)]
struct HostState {
    next_id: u64,
    active_document: Option<DocumentId>,
    documents: HashMap<DocumentId, DocumentState>,
    layers: HashMap<LayerId, LayerState>,
    open_modals: HashSet<u64>,
    saved: Vec<SavedPng>,
    revealed: Vec<String>,
    fail_render_layers: HashSet<String>,
    fail_save_files: HashSet<String>,
}

impl HostState {
    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn layer(&self, layer: LayerId) -> Result<&LayerState> {
        self.layers
            .get(&layer)
            .ok_or_else(|| LayerportError::NotFound(layer.to_string()))
    }

    fn layer_mut(&mut self, layer: LayerId) -> Result<&mut LayerState> {
        self.layers
            .get_mut(&layer)
            .ok_or_else(|| LayerportError::NotFound(layer.to_string()))
    }

    fn document(&self, document: DocumentId) -> Result<&DocumentState> {
        self.documents
            .get(&document)
            .ok_or_else(|| HostError::StaleHandle(document.to_string()).into())
    }
}

/// In-memory `DocumentHost` implementation
#[derive(Debug, Default)]
pub struct InMemoryHost {
    state: Mutex<HostState>,
}

impl InMemoryHost {
    /// Creates an empty host with no open documents
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().expect("host state lock poisoned")
    }

    /// Opens a new document; the first one becomes the active document
    pub fn create_document(&self, name: impl Into<String>) -> DocumentId {
        let mut state = self.state();
        let id = DocumentId(state.next());
        state.documents.insert(
            id,
            DocumentState {
                name: name.into(),
                roots: Vec::new(),
                active_layer: None,
                trimmed: false,
            },
        );
        if state.active_document.is_none() {
            state.active_document = Some(id);
        }
        id
    }

    /// Adds a group layer under `parent` (or at top level)
    pub fn add_group(
        &self,
        document: DocumentId,
        parent: Option<LayerId>,
        name: impl Into<String>,
    ) -> LayerId {
        self.insert_layer(document, parent, name.into(), LayerKind::Group, true)
    }

    /// Adds a visible pixel layer under `parent` (or at top level)
    pub fn add_layer(
        &self,
        document: DocumentId,
        parent: Option<LayerId>,
        name: impl Into<String>,
    ) -> LayerId {
        self.insert_layer(document, parent, name.into(), LayerKind::Pixel, true)
    }

    /// Adds a layer with an explicit kind and visibility
    pub fn add_layer_with(
        &self,
        document: DocumentId,
        parent: Option<LayerId>,
        name: impl Into<String>,
        kind: LayerKind,
        visible: bool,
    ) -> LayerId {
        self.insert_layer(document, parent, name.into(), kind, visible)
    }

    fn insert_layer(
        &self,
        document: DocumentId,
        parent: Option<LayerId>,
        name: String,
        kind: LayerKind,
        visible: bool,
    ) -> LayerId {
        let mut state = self.state();
        let id = LayerId(state.next());
        state.layers.insert(
            id,
            LayerState {
                document,
                name,
                kind,
                visible,
                parent,
                children: Vec::new(),
            },
        );
        match parent {
            Some(parent_id) => {
                if let Some(parent_state) = state.layers.get_mut(&parent_id) {
                    parent_state.children.push(id);
                }
            }
            None => {
                if let Some(doc) = state.documents.get_mut(&document) {
                    doc.roots.push(id);
                }
            }
        }
        id
    }

    /// Deletes a layer and its subtree, detaching it from its parent.
    /// Simulates the host mutating the tree between search and export.
    pub fn delete_layer(&self, layer: LayerId) {
        let mut state = self.state();
        let Some(removed) = state.layers.remove(&layer) else {
            return;
        };
        match removed.parent {
            Some(parent_id) => {
                if let Some(parent_state) = state.layers.get_mut(&parent_id) {
                    parent_state.children.retain(|c| *c != layer);
                }
            }
            None => {
                if let Some(doc) = state.documents.get_mut(&removed.document) {
                    doc.roots.retain(|c| *c != layer);
                }
            }
        }
        let mut pending = removed.children;
        while let Some(child) = pending.pop() {
            if let Some(child_state) = state.layers.remove(&child) {
                pending.extend(child_state.children);
            }
        }
    }

    /// Forgets the active document (simulates all documents closed)
    pub fn clear_active_document(&self) {
        self.state().active_document = None;
    }

    /// Forces `duplicate_document` to fail while the named layer is the
    /// document's active layer
    pub fn fail_render_for(&self, layer_name: impl Into<String>) {
        self.state().fail_render_layers.insert(layer_name.into());
    }

    /// Forces `save_png` to fail for the named output file
    pub fn fail_save_for(&self, file_name: impl Into<String>) {
        self.state().fail_save_files.insert(file_name.into());
    }

    /// All PNG writes recorded so far, in order
    pub fn saved_pngs(&self) -> Vec<SavedPng> {
        self.state().saved.clone()
    }

    /// Paths handed to the shell for reveal, in order
    pub fn revealed_paths(&self) -> Vec<String> {
        self.state().revealed.clone()
    }

    /// Number of documents currently open (duplicates included)
    pub fn open_document_count(&self) -> usize {
        self.state().documents.len()
    }

    /// Number of modal scopes currently open
    pub fn open_modal_count(&self) -> usize {
        self.state().open_modals.len()
    }

    /// Current visibility of every layer in a document, keyed by handle
    pub fn visibility_map(&self, document: DocumentId) -> HashMap<LayerId, bool> {
        let state = self.state();
        state
            .layers
            .iter()
            .filter(|(_, l)| l.document == document)
            .map(|(id, l)| (*id, l.visible))
            .collect()
    }

    fn deep_copy_layer(
        state: &mut HostState,
        source: LayerId,
        target_doc: DocumentId,
        parent: Option<LayerId>,
    ) -> Option<LayerId> {
        let template = state.layers.get(&source)?.clone();
        let id = LayerId(state.next());
        state.layers.insert(
            id,
            LayerState {
                document: target_doc,
                name: template.name,
                kind: template.kind,
                visible: template.visible,
                parent,
                children: Vec::new(),
            },
        );
        for child in template.children {
            if let Some(copied) = Self::deep_copy_layer(state, child, target_doc, Some(id)) {
                if let Some(parent_state) = state.layers.get_mut(&id) {
                    parent_state.children.push(copied);
                }
            }
        }
        Some(id)
    }
}

#[async_trait]
impl DocumentHost for InMemoryHost {
    fn active_document(&self) -> Result<DocumentId> {
        self.state()
            .active_document
            .ok_or(LayerportError::NoActiveDocument)
    }

    fn document_name(&self, document: DocumentId) -> Result<String> {
        Ok(self.state().document(document)?.name.clone())
    }

    fn top_level_layers(&self, document: DocumentId) -> Result<Vec<LayerId>> {
        Ok(self.state().document(document)?.roots.clone())
    }

    fn layer_exists(&self, layer: LayerId) -> bool {
        self.state().layers.contains_key(&layer)
    }

    fn layer_name(&self, layer: LayerId) -> Result<String> {
        Ok(self.state().layer(layer)?.name.clone())
    }

    fn layer_kind(&self, layer: LayerId) -> Result<LayerKind> {
        Ok(self.state().layer(layer)?.kind)
    }

    fn layer_visible(&self, layer: LayerId) -> Result<bool> {
        Ok(self.state().layer(layer)?.visible)
    }

    fn set_layer_visible(&self, layer: LayerId, visible: bool) -> Result<()> {
        self.state().layer_mut(layer)?.visible = visible;
        Ok(())
    }

    fn layer_children(&self, layer: LayerId) -> Result<Vec<LayerId>> {
        Ok(self.state().layer(layer)?.children.clone())
    }

    fn layer_parent(&self, layer: LayerId) -> Result<Option<LayerId>> {
        Ok(self.state().layer(layer)?.parent)
    }

    fn set_active_layer(&self, document: DocumentId, layer: LayerId) -> Result<()> {
        let mut state = self.state();
        state.layer(layer)?;
        let doc = state
            .documents
            .get_mut(&document)
            .ok_or_else(|| LayerportError::from(HostError::StaleHandle(document.to_string())))?;
        doc.active_layer = Some(layer);
        Ok(())
    }

    async fn begin_modal(&self, _display_name: &str) -> Result<ModalToken> {
        let mut state = self.state();
        let token = state.next();
        state.open_modals.insert(token);
        Ok(ModalToken(token))
    }

    async fn end_modal(&self, token: ModalToken) -> Result<()> {
        let mut state = self.state();
        if !state.open_modals.remove(&token.0) {
            return Err(HostError::ModalFailed(format!("unknown modal token {}", token.0)).into());
        }
        Ok(())
    }

    async fn duplicate_document(&self, document: DocumentId) -> Result<DocumentId> {
        let mut state = self.state();
        let source = state.document(document)?.clone();

        if let Some(active) = source.active_layer {
            if let Some(layer) = state.layers.get(&active) {
                if state.fail_render_layers.contains(&layer.name) {
                    return Err(HostError::RenderFailed(format!(
                        "duplicate rejected while '{}' is active",
                        layer.name
                    ))
                    .into());
                }
            }
        }

        let id = DocumentId(state.next());
        state.documents.insert(
            id,
            DocumentState {
                name: format!("{} copy", source.name),
                roots: Vec::new(),
                active_layer: None,
                trimmed: false,
            },
        );
        for root in source.roots {
            if let Some(copied) = Self::deep_copy_layer(&mut state, root, id, None) {
                if let Some(doc) = state.documents.get_mut(&id) {
                    doc.roots.push(copied);
                }
            }
        }
        Ok(id)
    }

    async fn trim_transparent_bounds(&self, document: DocumentId) -> Result<()> {
        let mut state = self.state();
        let doc = state
            .documents
            .get_mut(&document)
            .ok_or_else(|| LayerportError::from(HostError::StaleHandle(document.to_string())))?;
        doc.trimmed = true;
        Ok(())
    }

    async fn save_png(
        &self,
        document: DocumentId,
        file: &FileHandle,
        compression: u8,
    ) -> Result<()> {
        let mut state = self.state();
        if state.fail_save_files.contains(&file.name) {
            return Err(HostError::WriteFailed(format!("cannot write {}", file.name)).into());
        }
        let trimmed = state.document(document)?.trimmed;
        let visible_layers = state
            .layers
            .values()
            .filter(|l| l.document == document && l.visible)
            .map(|l| l.name.clone())
            .collect();
        state.saved.push(SavedPng {
            file: file.clone(),
            compression,
            trimmed,
            visible_layers,
        });
        Ok(())
    }

    async fn close_document(&self, document: DocumentId) -> Result<()> {
        let mut state = self.state();
        if state.documents.remove(&document).is_none() {
            return Err(HostError::CloseFailed(document.to_string()).into());
        }
        state.layers.retain(|_, l| l.document != document);
        if state.active_document == Some(document) {
            state.active_document = None;
        }
        Ok(())
    }

    async fn create_file(
        &self,
        folder: &FolderHandle,
        name: &str,
        overwrite: bool,
    ) -> Result<FileHandle> {
        let native_path = format!("{}/{}", folder.native_path, name);
        if !overwrite {
            let state = self.state();
            if state.saved.iter().any(|s| s.file.native_path == native_path) {
                return Err(HostError::WriteFailed(format!("{native_path} already exists")).into());
            }
        }
        Ok(FileHandle {
            name: name.to_string(),
            native_path,
        })
    }

    async fn reveal_in_file_browser(&self, native_path: &str) -> Result<()> {
        self.state().revealed.push(native_path.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_construction() {
        let host = InMemoryHost::new();
        let doc = host.create_document("Root");
        let group = host.add_group(doc, None, "UI");
        let button = host.add_layer(doc, Some(group), "Button");

        assert_eq!(host.active_document().unwrap(), doc);
        assert_eq!(host.document_name(doc).unwrap(), "Root");
        assert_eq!(host.top_level_layers(doc).unwrap(), vec![group]);
        assert_eq!(host.layer_children(group).unwrap(), vec![button]);
        assert_eq!(host.layer_parent(button).unwrap(), Some(group));
        assert!(host.layer_kind(group).unwrap().is_group());
    }

    #[test]
    fn test_delete_layer_removes_subtree() {
        let host = InMemoryHost::new();
        let doc = host.create_document("Root");
        let group = host.add_group(doc, None, "UI");
        let child = host.add_layer(doc, Some(group), "Button");

        host.delete_layer(group);

        assert!(!host.layer_exists(group));
        assert!(!host.layer_exists(child));
        assert!(host.top_level_layers(doc).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_is_deep_and_independent() {
        let host = InMemoryHost::new();
        let doc = host.create_document("Root");
        let group = host.add_group(doc, None, "UI");
        host.add_layer(doc, Some(group), "Button");

        let dup = host.duplicate_document(doc).await.unwrap();
        assert_ne!(dup, doc);
        assert_eq!(host.open_document_count(), 2);

        // Mutating the duplicate must not touch the original
        let dup_roots = host.top_level_layers(dup).unwrap();
        host.set_layer_visible(dup_roots[0], false).unwrap();
        assert!(host.layer_visible(group).unwrap());

        host.close_document(dup).await.unwrap();
        assert_eq!(host.open_document_count(), 1);
        assert!(host.layer_exists(group));
    }

    #[tokio::test]
    async fn test_modal_tokens_balance() {
        let host = InMemoryHost::new();
        let token = host.begin_modal("Export Button").await.unwrap();
        assert_eq!(host.open_modal_count(), 1);
        host.end_modal(token).await.unwrap();
        assert_eq!(host.open_modal_count(), 0);
        assert!(host.end_modal(token).await.is_err());
    }

    #[tokio::test]
    async fn test_scripted_save_failure() {
        let host = InMemoryHost::new();
        let doc = host.create_document("Root");
        host.fail_save_for("bad.png");

        let folder = FolderHandle::new("out", "/tmp/out");
        let ok_file = host.create_file(&folder, "good.png", true).await.unwrap();
        let bad_file = host.create_file(&folder, "bad.png", true).await.unwrap();

        assert!(host.save_png(doc, &ok_file, 6).await.is_ok());
        let err = host.save_png(doc, &bad_file, 6).await.unwrap_err();
        assert!(matches!(
            err,
            LayerportError::HostOperation(HostError::WriteFailed(_))
        ));
        assert_eq!(host.saved_pngs().len(), 1);
    }
}
