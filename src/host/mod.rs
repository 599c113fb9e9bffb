//! Host adapters
//!
//! Layerport talks to the document host exclusively through the
//! [`DocumentHost`] trait. The production adapter bridges to the Photoshop
//! UXP APIs and lives with the plugin glue, outside this crate;
//! [`memory::InMemoryHost`] is the in-process reference implementation used
//! by the test suite.

pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use memory::InMemoryHost;
pub use traits::{DocumentHost, FileHandle, FolderHandle};
