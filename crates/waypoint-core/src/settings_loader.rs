//! Settings loading from configuration files.
//!
//! Loads [`Settings`] from TOML or JSON and applies environment variable
//! overrides on top.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults, table by table).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `WAYPOINT_DEBUG` | `debug` |
//! | `WAYPOINT_LOG_LEVEL` | `log_level` |
//! | `WAYPOINT_EXTENSION` | `router.extension` |
//! | `WAYPOINT_DEFAULT_CONTROLLER` | `router.controller` |
//! | `WAYPOINT_DEFAULT_ACTION` | `router.action` |
//! | `WAYPOINT_REWRITE` | `router.rewrite` |
//! | `WAYPOINT_SHOW_INDEX` | `router.show_index` |
//! | `WAYPOINT_COMPLETE` | `router.complete` |
//! | `WAYPOINT_SCHEME` | `request.scheme` |
//! | `WAYPOINT_HOST` | `request.host` |
//! | `WAYPOINT_PORT` | `request.port` |
//! | `WAYPOINT_WEB_ROOT` | `request.web_root` |
//! | `WAYPOINT_CONTROLLER_DIR` | `controllers.dir` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use waypoint_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("config/waypoint.toml").unwrap();
//! ```

use std::path::{Path, PathBuf};

use crate::error::RouterError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML keep their default values, including
/// individual fields inside a partially specified table.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
///
/// # Examples
///
/// ```
/// use waypoint_core::settings_loader::from_toml_str;
///
/// let settings = from_toml_str(r#"
///     [router]
///     rewrite = false
///
///     [routes]
///     "blog.archive" = 'year<\d+>/month<\d+>:1/day:1'
/// "#).unwrap();
/// assert!(!settings.router.rewrite);
/// assert_eq!(settings.router.action, "index");
/// assert!(settings.routes.contains_key("blog.archive"));
/// ```
pub fn from_toml_str(toml_str: &str) -> Result<Settings, RouterError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| RouterError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    let json_value = toml_to_json(toml_value);
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        RouterError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, json_value);
    serde_json::from_value(merged).map_err(|e| {
        RouterError::ConfigurationError(format!("Failed to deserialize settings from TOML: {e}"))
    })
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, RouterError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        RouterError::ConfigurationError(format!(
            "Failed to read TOML file '{}': {e}",
            path.as_ref().display()
        ))
    })?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, RouterError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, RouterError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| RouterError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        RouterError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, json_value);
    serde_json::from_value(merged).map_err(|e| {
        RouterError::ConfigurationError(format!("Failed to deserialize settings from JSON: {e}"))
    })
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, RouterError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        RouterError::ConfigurationError(format!(
            "Failed to read JSON file '{}': {e}",
            path.as_ref().display()
        ))
    })?;
    from_json_str(&content)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, RouterError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `WAYPOINT_*` environment variable overrides to a settings struct.
///
/// Boolean variables accept "true"/"1"/"yes" as true and anything else as
/// false. An unparseable `WAYPOINT_PORT` is ignored.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Some(val) = env_bool("WAYPOINT_DEBUG") {
        settings.debug = val;
    }

    if let Ok(val) = std::env::var("WAYPOINT_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("WAYPOINT_EXTENSION") {
        settings.router.extension = val;
    }

    if let Ok(val) = std::env::var("WAYPOINT_DEFAULT_CONTROLLER") {
        settings.router.controller = val;
    }

    if let Ok(val) = std::env::var("WAYPOINT_DEFAULT_ACTION") {
        settings.router.action = val;
    }

    if let Some(val) = env_bool("WAYPOINT_REWRITE") {
        settings.router.rewrite = val;
    }

    if let Some(val) = env_bool("WAYPOINT_SHOW_INDEX") {
        settings.router.show_index = val;
    }

    if let Some(val) = env_bool("WAYPOINT_COMPLETE") {
        settings.router.complete = val;
    }

    if let Ok(val) = std::env::var("WAYPOINT_SCHEME") {
        settings.request.scheme = val;
    }

    if let Ok(val) = std::env::var("WAYPOINT_HOST") {
        settings.request.host = val;
    }

    if let Ok(val) = std::env::var("WAYPOINT_PORT") {
        if let Ok(port) = val.parse::<u16>() {
            settings.request.port = Some(port);
        }
    }

    if let Ok(val) = std::env::var("WAYPOINT_WEB_ROOT") {
        settings.request.web_root = val;
    }

    if let Ok(val) = std::env::var("WAYPOINT_CONTROLLER_DIR") {
        settings.controllers.dir = PathBuf::from(val);
    }
}

// ============================================================
// Helpers
// ============================================================

fn env_bool(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|val| matches!(val.to_lowercase().as_str(), "true" | "1" | "yes"))
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}
