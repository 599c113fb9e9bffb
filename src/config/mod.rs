//! Configuration management for Layerport.
//!
//! TOML-based configuration with environment variable substitution
//! (`${VAR_NAME}`), `LAYERPORT_*` overrides, defaults for every optional
//! key, and validation on load.
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! name = "layerport"
//! log_level = "info"
//!
//! [export]
//! prefix = "layer_"
//! compression = 6
//! trim_transparent = true
//! reveal_in_file_browser = false
//!
//! [logging]
//! local_enabled = true
//! local_path = "logs"
//! local_rotation = "daily"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{ApplicationConfig, LoggingConfig, PluginConfig};
