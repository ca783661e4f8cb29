//! # waypoint-core
//!
//! Core types for the waypoint routing engine. This crate has no routing logic
//! of its own and provides the foundation the `waypoint-http` crate builds on.
//!
//! ## Modules
//!
//! - [`error`] - The router error taxonomy and result alias
//! - [`settings`] - Router-wide options, request base components, controller location
//! - [`settings_loader`] - Loading [`Settings`] from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{ErrorKind, RouterError, RouterResult};
pub use settings::{ControllerSettings, RequestSettings, RouterConfig, Settings};
