//! Recursive layer-tree search
//!
//! Depth-first, pre-order walk over the host's layer tree: a node is tested
//! before its subtree, and a container's direct children are visited in the
//! order the host reports them. The walk never mutates the tree and relies on
//! the host's guarantee that the tree is acyclic.

use crate::domain::layer::{DocumentId, LayerId, MatchRecord, PATH_SEPARATOR};
use crate::domain::result::Result;
use crate::domain::LayerportError;
use crate::host::traits::DocumentHost;
use std::sync::Arc;

/// Layer search over a host document
pub struct LayerSearcher {
    host: Arc<dyn DocumentHost>,
}

impl LayerSearcher {
    /// Creates a searcher bound to a host
    pub fn new(host: Arc<dyn DocumentHost>) -> Self {
        Self { host }
    }

    /// Searches a document's layer tree by name
    ///
    /// `exact = true` matches by case-sensitive equality; `exact = false`
    /// matches by case-insensitive substring containment. Zero matches
    /// produce an empty vec, not an error.
    ///
    /// Match paths are materialized at visit time and head with the document
    /// name; they are never revalidated afterwards.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty or whitespace-only query, and
    /// propagates host read failures.
    pub fn search(
        &self,
        document: DocumentId,
        query: &str,
        exact: bool,
    ) -> Result<Vec<MatchRecord>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LayerportError::InvalidInput(
                "search query must not be empty".to_string(),
            ));
        }

        let needle = if exact {
            query.to_string()
        } else {
            query.to_lowercase()
        };

        let mut matches = Vec::new();
        let mut path = vec![self.host.document_name(document)?];
        for layer in self.host.top_level_layers(document)? {
            self.visit(layer, &needle, exact, &mut path, &mut matches)?;
        }

        tracing::debug!(
            query,
            exact,
            match_count = matches.len(),
            "Layer search completed"
        );
        Ok(matches)
    }

    fn visit(
        &self,
        layer: LayerId,
        needle: &str,
        exact: bool,
        path: &mut Vec<String>,
        matches: &mut Vec<MatchRecord>,
    ) -> Result<()> {
        let name = self.host.layer_name(layer)?;
        let kind = self.host.layer_kind(layer)?;
        path.push(name.clone());

        if matches_query(&name, needle, exact) {
            matches.push(MatchRecord {
                layer,
                name,
                path: path.join(PATH_SEPARATOR),
                kind,
                // Best-effort probe: mirrors current visibility.
                has_content: self.host.layer_visible(layer)?,
            });
        }

        // Descend only into group-kind nodes or nodes that actually expose
        // children; childless leaves are never descended into even when the
        // kind tag disagrees.
        let children = self.host.layer_children(layer)?;
        if kind.is_group() || !children.is_empty() {
            for child in children {
                self.visit(child, needle, exact, path, matches)?;
            }
        }

        path.pop();
        Ok(())
    }
}

fn matches_query(name: &str, needle: &str, exact: bool) -> bool {
    if exact {
        name == needle
    } else {
        name.to_lowercase().contains(needle)
    }
}
