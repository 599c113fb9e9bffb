//! Visibility isolation
//!
//! To render a single layer's visual contribution, the whole tree is hidden
//! and only the target plus its ancestor chain are made visible again. The
//! prior visibility of every node is captured first and replayed exactly on
//! restore. (The plugin this crate grew out of restored by setting every
//! layer visible; snapshot replay replaces that blanket restore.)
//!
//! Isolation is reentrant for strictly sequential use (the batch pipeline
//! runs one isolate/restore cycle per exported item, never overlapping) but
//! it is not safe for concurrent use on the same tree.

use crate::domain::layer::{DocumentId, LayerId};
use crate::domain::result::Result;
use crate::domain::LayerportError;
use crate::host::traits::DocumentHost;
use std::sync::Arc;

/// Captured visibility of every layer in a document
///
/// Produced by [`VisibilityIsolator::isolate`]; the sole authority for the
/// document's final visibility state once replayed by
/// [`VisibilityIsolator::restore`].
#[derive(Debug, Clone)]
pub struct VisibilitySnapshot {
    document: DocumentId,
    entries: Vec<(LayerId, bool)>,
}

impl VisibilitySnapshot {
    /// The document this snapshot was captured from
    pub fn document(&self) -> DocumentId {
        self.document
    }

    /// Number of layers captured
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot captured no layers
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Isolates a single layer's visual contribution by visibility toggling
pub struct VisibilityIsolator {
    host: Arc<dyn DocumentHost>,
}

impl VisibilityIsolator {
    /// Creates an isolator bound to a host
    pub fn new(host: Arc<dyn DocumentHost>) -> Self {
        Self { host }
    }

    /// Isolates `target` so that only it and its ancestor chain render
    ///
    /// Captures the current visibility of every layer, hides everything,
    /// then shows the target and walks up its parent chain showing each
    /// ancestor, stopping at the document root (which has no parent).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` without mutating anything if the target handle no
    /// longer resolves (the host deleted it between discovery and export).
    pub fn isolate(&self, document: DocumentId, target: LayerId) -> Result<VisibilitySnapshot> {
        if !self.host.layer_exists(target) {
            return Err(LayerportError::NotFound(target.to_string()));
        }

        let snapshot = self.capture(document)?;

        for (layer, _) in &snapshot.entries {
            self.host.set_layer_visible(*layer, false)?;
        }
        self.host.set_layer_visible(target, true)?;

        let mut ancestor = self.host.layer_parent(target)?;
        while let Some(group) = ancestor {
            self.host.set_layer_visible(group, true)?;
            ancestor = self.host.layer_parent(group)?;
        }

        tracing::debug!(
            target = %target,
            layer_count = snapshot.len(),
            "Isolated layer"
        );
        Ok(snapshot)
    }

    /// Replays a snapshot node-for-node
    ///
    /// Restore is the sole authority for the final visibility state,
    /// regardless of what the render step did to unrelated nodes. Layers
    /// deleted by the host since capture are skipped; everything else is
    /// reset exactly.
    pub fn restore(&self, snapshot: &VisibilitySnapshot) -> Result<()> {
        let mut skipped = 0usize;
        for (layer, visible) in &snapshot.entries {
            if !self.host.layer_exists(*layer) {
                skipped += 1;
                continue;
            }
            self.host.set_layer_visible(*layer, *visible)?;
        }
        if skipped > 0 {
            tracing::warn!(skipped, "Snapshot entries vanished before restore");
        }
        Ok(())
    }

    /// Captures the visibility of every layer in the document, pre-order
    fn capture(&self, document: DocumentId) -> Result<VisibilitySnapshot> {
        let mut entries = Vec::new();
        for layer in self.host.top_level_layers(document)? {
            self.capture_subtree(layer, &mut entries)?;
        }
        Ok(VisibilitySnapshot { document, entries })
    }

    fn capture_subtree(&self, layer: LayerId, entries: &mut Vec<(LayerId, bool)>) -> Result<()> {
        entries.push((layer, self.host.layer_visible(layer)?));
        for child in self.host.layer_children(layer)? {
            self.capture_subtree(child, entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::InMemoryHost;

    struct Fixture {
        host: Arc<InMemoryHost>,
        doc: DocumentId,
        ui: LayerId,
        button: LayerId,
        icon: LayerId,
        background: LayerId,
    }

    fn fixture() -> Fixture {
        let host = Arc::new(InMemoryHost::new());
        let doc = host.create_document("Root");
        let ui = host.add_group(doc, None, "UI");
        let button = host.add_layer(doc, Some(ui), "Button");
        let icon = host.add_layer(doc, Some(ui), "Icon");
        let background = host.add_layer(doc, None, "Background");
        Fixture {
            host,
            doc,
            ui,
            button,
            icon,
            background,
        }
    }

    #[test]
    fn test_isolate_shows_only_target_and_ancestors() {
        let f = fixture();
        let isolator = VisibilityIsolator::new(f.host.clone());

        isolator.isolate(f.doc, f.icon).unwrap();

        let vis = f.host.visibility_map(f.doc);
        assert!(vis[&f.icon]);
        assert!(vis[&f.ui]);
        assert!(!vis[&f.button]);
        assert!(!vis[&f.background]);
    }

    #[test]
    fn test_isolate_top_level_leaf() {
        let f = fixture();
        let isolator = VisibilityIsolator::new(f.host.clone());

        isolator.isolate(f.doc, f.background).unwrap();

        let vis = f.host.visibility_map(f.doc);
        assert!(vis[&f.background]);
        assert!(!vis[&f.ui]);
        assert!(!vis[&f.button]);
        assert!(!vis[&f.icon]);
    }

    #[test]
    fn test_restore_replays_mixed_prior_state() {
        let f = fixture();
        // Uneven starting state: hidden group member and hidden background.
        f.host.set_layer_visible(f.button, false).unwrap();
        f.host.set_layer_visible(f.background, false).unwrap();
        let before = f.host.visibility_map(f.doc);

        let isolator = VisibilityIsolator::new(f.host.clone());
        let snapshot = isolator.isolate(f.doc, f.icon).unwrap();
        assert_ne!(f.host.visibility_map(f.doc), before);

        isolator.restore(&snapshot).unwrap();
        assert_eq!(f.host.visibility_map(f.doc), before);
    }

    #[test]
    fn test_restore_overrides_render_side_mutations() {
        let f = fixture();
        let isolator = VisibilityIsolator::new(f.host.clone());
        let before = f.host.visibility_map(f.doc);

        let snapshot = isolator.isolate(f.doc, f.button).unwrap();
        // Simulate the render step flipping an unrelated node.
        f.host.set_layer_visible(f.background, true).unwrap();
        f.host.set_layer_visible(f.icon, true).unwrap();

        isolator.restore(&snapshot).unwrap();
        assert_eq!(f.host.visibility_map(f.doc), before);
    }

    #[test]
    fn test_isolate_deleted_target_fails_without_mutation() {
        let f = fixture();
        let before = f.host.visibility_map(f.doc);
        f.host.delete_layer(f.icon);

        let isolator = VisibilityIsolator::new(f.host.clone());
        let err = isolator.isolate(f.doc, f.icon).unwrap_err();
        assert!(matches!(err, LayerportError::NotFound(_)));

        let mut expected = before;
        expected.remove(&f.icon);
        assert_eq!(f.host.visibility_map(f.doc), expected);
    }

    #[test]
    fn test_restore_skips_layers_deleted_after_capture() {
        let f = fixture();
        let isolator = VisibilityIsolator::new(f.host.clone());

        let snapshot = isolator.isolate(f.doc, f.icon).unwrap();
        f.host.delete_layer(f.button);

        isolator.restore(&snapshot).unwrap();
        let vis = f.host.visibility_map(f.doc);
        assert!(vis[&f.ui]);
        assert!(vis[&f.icon]);
        assert!(vis[&f.background]);
        assert!(!vis.contains_key(&f.button));
    }

    #[test]
    fn test_sequential_isolate_restore_cycles() {
        let f = fixture();
        let isolator = VisibilityIsolator::new(f.host.clone());
        let before = f.host.visibility_map(f.doc);

        for target in [f.button, f.icon, f.background] {
            let snapshot = isolator.isolate(f.doc, target).unwrap();
            isolator.restore(&snapshot).unwrap();
        }

        assert_eq!(f.host.visibility_map(f.doc), before);
    }
}
