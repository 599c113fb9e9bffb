//! Layer-tree search

pub mod walker;

pub use walker::LayerSearcher;
