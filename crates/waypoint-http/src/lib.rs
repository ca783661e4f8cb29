//! # waypoint-http
//!
//! URL routing for the waypoint framework. Maps an incoming request URL to a
//! controller, action, extension, and parameter set, and synthesizes URLs back
//! from symbolic locators such as `"blog:archive"`.
//!
//! Two addressing styles are supported behind one [`Routing`](urls::router::Routing)
//! interface: path-segment ("rewrite") URLs and query-string URLs. The style is
//! chosen once when a [`Router`] is built.

pub mod urls;

pub use urls::router::{GenerateWarning, GeneratedUrl, Params, RouteMatch, Router, Routing};
