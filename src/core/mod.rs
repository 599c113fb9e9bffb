//! Core business logic
//!
//! The three cores of the plugin engine:
//!
//! - [`search`] - recursive layer-tree search producing match records
//! - [`isolate`] - visibility snapshot/isolate/restore
//! - [`export`] - single-item export and the cancellable batch pipeline

pub mod export;
pub mod isolate;
pub mod search;
