//! URL routing: parsing and generation.
//!
//! - [`locator`]: `controller:action[.ext][#fragment]` locator strings
//! - [`grammar`]: per-route positional parameter grammars (`year<\d+>/month:1`)
//! - [`cache`]: memoized grammar compilation
//! - [`rules`]: where grammar strings come from
//! - [`controllers`]: controller existence checks for rewrite-mode parsing
//! - [`base`]: scheme/host/web-root/index-script URL prefix
//! - [`encoding`]: URL splitting and percent-encoding helpers
//! - [`rewrite`]: the path-segment strategy
//! - [`query`]: the query-string strategy
//! - [`router`]: the [`Router`](router::Router) facade and shared result types
//!
//! # Examples
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use waypoint_core::settings::{RequestSettings, RouterConfig};
//! use waypoint_http::urls::base::BaseUrl;
//! use waypoint_http::urls::controllers::StaticControllerResolver;
//! use waypoint_http::{Params, Router};
//!
//! let mut rules = HashMap::new();
//! rules.insert("blog.archive".to_string(), r"year<\d+>/month<\d+>:1/day:1".to_string());
//!
//! let router = Router::new(
//!     RouterConfig::default(),
//!     BaseUrl::from_settings(&RequestSettings::default()),
//!     Arc::new(StaticControllerResolver::new().with_controller("blog")),
//!     Arc::new(rules),
//! );
//!
//! let m = router.parse("/blog/archive/2012").unwrap();
//! assert_eq!(m.controller, "blog");
//! assert_eq!(m.params.get("month").unwrap(), "1");
//!
//! let mut params = Params::new();
//! params.insert("year".to_string(), "2012".to_string());
//! let url = router.generate("blog:archive", &params).unwrap();
//! assert_eq!(url, "/blog/archive/2012/1/1");
//! ```

pub mod base;
pub mod cache;
pub mod controllers;
pub mod encoding;
pub mod grammar;
pub mod locator;
pub mod query;
pub mod rewrite;
pub mod router;
pub mod rules;
