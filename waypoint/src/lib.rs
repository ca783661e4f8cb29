//! # waypoint
//!
//! Controller/action URL routing.
//!
//! This is the meta-crate that re-exports the sub-crates. Depend on
//! `waypoint` for everything, or on the individual crates for finer-grained
//! control.
//!
//! ```
//! use std::sync::Arc;
//!
//! use waypoint::core::Settings;
//! use waypoint::http::urls::controllers::StaticControllerResolver;
//! use waypoint::http::{Params, Router};
//!
//! let resolver = StaticControllerResolver::new().with_controller("blog");
//! let router = Router::from_settings(&Settings::default(), Arc::new(resolver));
//!
//! let url = router.generate("blog:list", &Params::new()).unwrap();
//! assert_eq!(url, "/blog/list");
//! assert_eq!(router.parse(&url).unwrap().action, "list");
//! ```

/// Error types, settings, settings loading, and logging setup.
pub use waypoint_core as core;

/// URL routing: locators, route grammars, parsing and generation.
#[cfg(feature = "http")]
pub use waypoint_http as http;

/// Third-party re-exports.
pub use serde;
pub use serde_json;
pub use tracing;
pub use tracing_subscriber;
