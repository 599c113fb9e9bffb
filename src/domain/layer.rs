//! Layer and document handle types
//!
//! The host owns the document tree; this crate only ever holds opaque handles
//! into it. Handles can go stale whenever the host mutates the tree outside
//! our control; every consumer must tolerate a handle that no longer
//! resolves (surfaced as `LayerportError::NotFound`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used when materializing a layer path from ancestor names.
pub const PATH_SEPARATOR: &str = " > ";

/// Opaque handle to a layer in the host's document tree
///
/// Layerport never creates or destroys layers; it only references them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub u64);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

/// Opaque handle to an open document in the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// Token for an open modal editing scope in the host
///
/// Returned by `DocumentHost::begin_modal` and consumed by `end_modal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModalToken(pub u64);

/// Kind tag for a layer node
///
/// Only the leaf-vs-group distinction matters to the walker; the extra
/// variants mirror the kind tags the host reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Raster pixel layer
    Pixel,
    /// Layer group (may contain children)
    Group,
    /// Text layer
    Text,
    /// Adjustment layer
    Adjustment,
    /// Any other host kind tag
    Other,
}

impl LayerKind {
    /// Whether this kind tag denotes a group container
    pub fn is_group(self) -> bool {
        matches!(self, LayerKind::Group)
    }
}

/// A layer matched by a search
///
/// Produced fresh per search and discarded on the next search or document
/// change. `path` is materialized at visit time and never revalidated: it can
/// go stale if the host mutates the tree between search and export.
#[derive(Debug, Clone, Serialize)]
pub struct MatchRecord {
    /// Handle to the matched layer
    pub layer: LayerId,

    /// Layer name at time of visit
    pub name: String,

    /// Ancestor-to-node name chain, including the document root name,
    /// joined with [`PATH_SEPARATOR`]
    pub path: String,

    /// Kind tag of the matched layer
    pub kind: LayerKind,

    /// Best-effort content probe. Currently mirrors the layer's visibility
    /// at time of visit, a weak signal kept for forward extensibility.
    pub has_content: bool,
}
