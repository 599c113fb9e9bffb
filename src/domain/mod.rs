//! Domain models and types for Layerport.
//!
//! This module contains the core domain types shared by the search, isolation
//! and export components.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Opaque host handles** ([`LayerId`], [`DocumentId`], [`ModalToken`])
//! - **Search results** ([`MatchRecord`], [`LayerKind`])
//! - **Export inputs** ([`ExportOptions`])
//! - **Error types** ([`LayerportError`], [`HostError`])
//! - **Result type alias** ([`Result`])
//!
//! # Handle semantics
//!
//! The host owns the document tree. `LayerId` and `DocumentId` are references
//! into it, never ownership: the host can delete or reorder layers between a
//! search and the export that consumes its matches, and every component must
//! tolerate a stale handle (reported as [`LayerportError::NotFound`]).
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`]:
//!
//! ```
//! use layerport::domain::{LayerportError, Result};
//!
//! fn example(query: &str) -> Result<()> {
//!     if query.trim().is_empty() {
//!         return Err(LayerportError::InvalidInput("empty query".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod layer;
pub mod options;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{HostError, LayerportError};
pub use layer::{DocumentId, LayerId, LayerKind, MatchRecord, ModalToken, PATH_SEPARATOR};
pub use options::{sanitize_layer_name, ExportOptions, MAX_PNG_COMPRESSION};
pub use result::Result;
