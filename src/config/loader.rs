//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::PluginConfig;
use crate::domain::errors::LayerportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into `PluginConfig`
/// 4. Applies environment variable overrides (`LAYERPORT_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
pub fn load_config(path: impl AsRef<Path>) -> Result<PluginConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LayerportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        LayerportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: PluginConfig = toml::from_str(&contents)
        .map_err(|e| LayerportError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        LayerportError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static regex");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(LayerportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `LAYERPORT_*` prefix
///
/// Environment variables follow the pattern `LAYERPORT_<SECTION>_<KEY>`,
/// e.g. `LAYERPORT_EXPORT_PREFIX` or `LAYERPORT_APPLICATION_LOG_LEVEL`.
fn apply_env_overrides(config: &mut PluginConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("LAYERPORT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Export overrides
    if let Ok(val) = std::env::var("LAYERPORT_EXPORT_PREFIX") {
        config.export.prefix = val;
    }
    if let Ok(val) = std::env::var("LAYERPORT_EXPORT_COMPRESSION") {
        if let Ok(level) = val.parse() {
            config.export.compression = level;
        }
    }
    if let Ok(val) = std::env::var("LAYERPORT_EXPORT_TRIM_TRANSPARENT") {
        config.export.trim_transparent = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("LAYERPORT_EXPORT_REVEAL_IN_FILE_BROWSER") {
        config.export.reveal_in_file_browser = val.parse().unwrap_or(false);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("LAYERPORT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("LAYERPORT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
