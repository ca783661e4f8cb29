//! Settings for the waypoint router.
//!
//! [`Settings`] bundles the router-wide options ([`RouterConfig`]), the base
//! components of the current request ([`RequestSettings`]), where controllers
//! live ([`ControllerSettings`]), and the per-route grammar table. A router is
//! constructed from an immutable snapshot of these values; nothing here is
//! reachable through a global.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Router-wide options.
///
/// # Examples
///
/// ```
/// use waypoint_core::settings::RouterConfig;
///
/// let config = RouterConfig::default();
/// assert_eq!(config.controller, "default");
/// assert_eq!(config.action, "index");
/// assert!(config.rewrite);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Default extension for locators that do not name one. Empty means none.
    pub extension: String,
    /// The default controller name.
    pub controller: String,
    /// The default action name.
    pub action: String,
    /// Whether path-segment ("rewrite") URLs are used instead of query-string URLs.
    pub rewrite: bool,
    /// Whether the index script is written into generated URLs.
    pub show_index: bool,
    /// Whether generated URLs include scheme, host, and port.
    pub complete: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            extension: String::new(),
            controller: "default".to_string(),
            action: "index".to_string(),
            rewrite: true,
            show_index: false,
            complete: false,
        }
    }
}

impl RouterConfig {
    /// Returns the default extension, or `None` when it is empty.
    pub fn default_extension(&self) -> Option<&str> {
        if self.extension.is_empty() {
            None
        } else {
            Some(&self.extension)
        }
    }
}

/// Base URL components of the request being handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSettings {
    /// The URL scheme (e.g. "http").
    pub scheme: String,
    /// The host name.
    pub host: String,
    /// The port, if it is not implied by the scheme.
    pub port: Option<u16>,
    /// The path prefix the application is mounted under.
    pub web_root: String,
    /// The front-controller script name (e.g. "index.php").
    pub index_script: String,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            port: None,
            web_root: "/".to_string(),
            index_script: "index.php".to_string(),
        }
    }
}

/// Where controller files are looked up in rewrite mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerSettings {
    /// The controller root directory.
    pub dir: PathBuf,
    /// File extension of a controller file, without the dot.
    pub file_extension: String,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("controllers"),
            file_extension: "rs".to_string(),
        }
    }
}

/// The complete set of settings a router is built from.
///
/// # Examples
///
/// ```
/// use waypoint_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.log_level, "info");
/// assert!(settings.routes.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Whether debug mode is enabled.
    pub debug: bool,
    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,
    /// Router-wide options.
    pub router: RouterConfig,
    /// Base URL components.
    pub request: RequestSettings,
    /// Controller lookup location.
    pub controllers: ControllerSettings,
    /// Route grammars keyed by dot key (e.g. `"admin.user.edit"`).
    pub routes: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            router: RouterConfig::default(),
            request: RequestSettings::default(),
            controllers: ControllerSettings::default(),
            routes: HashMap::new(),
        }
    }
}
