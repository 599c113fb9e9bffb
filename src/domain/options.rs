//! Export options and output file naming
//!
//! `ExportOptions` is an immutable value object validated at construction;
//! the batch pipeline and single-item exporter only ever read it.

use crate::domain::errors::LayerportError;
use crate::domain::result::Result;
use serde::{Deserialize, Serialize};

/// Highest PNG compression level accepted by the host encoder.
pub const MAX_PNG_COMPRESSION: u8 = 9;

/// Characters that are illegal in output file names on at least one host
/// platform; each is replaced with `_` when composing a file name.
const INVALID_FILE_NAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Options for a batch export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Prefix prepended to every output file name
    #[serde(default)]
    pub prefix: String,

    /// PNG compression level, 0 (largest/fastest) to 9 (smallest/slowest).
    /// Semantics are inherited from the host encoder.
    #[serde(default = "default_compression")]
    pub compression: u8,

    /// Trim each rendering's canvas to the bounding box of non-transparent
    /// pixels before encoding
    #[serde(default)]
    pub trim_transparent: bool,

    /// Reveal the destination folder in the native file browser after a
    /// completed batch
    #[serde(default)]
    pub reveal_in_file_browser: bool,
}

fn default_compression() -> u8 {
    6
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            compression: default_compression(),
            trim_transparent: false,
            reveal_in_file_browser: false,
        }
    }
}

impl ExportOptions {
    /// Validates the options
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the compression level is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.compression > MAX_PNG_COMPRESSION {
            return Err(LayerportError::InvalidInput(format!(
                "PNG compression must be 0..={}, got {}",
                MAX_PNG_COMPRESSION, self.compression
            )));
        }
        Ok(())
    }

    /// Composes the output file name for a layer
    pub fn output_file_name(&self, layer_name: &str) -> String {
        format!("{}{}.png", self.prefix, sanitize_layer_name(layer_name))
    }
}

/// Replaces file-name-hostile characters in a layer name with `_`
pub fn sanitize_layer_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if INVALID_FILE_NAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}
