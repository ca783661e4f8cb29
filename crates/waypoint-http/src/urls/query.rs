//! Query-string URLs.
//!
//! URL shape:
//!
//! ```text
//! [scheme://host[:port]][webRoot][indexScript][?controller=...&action=...&param=...][#fragment]
//! ```
//!
//! Controller and action travel as ordinary query keys, so parsing never
//! fails: missing keys fall back to the router-wide defaults.

use std::sync::Arc;

use waypoint_core::RouterResult;

use super::encoding::{decode_query, encode_fragment, encode_query, split_url};
use super::router::{GeneratedUrl, Params, RouteMatch, RouterContext, Routing};

const CONTROLLER_KEY: &str = "controller";
const ACTION_KEY: &str = "action";

/// The query-string [`Routing`] strategy.
#[derive(Debug)]
pub struct QueryRouting {
    context: Arc<RouterContext>,
}

impl QueryRouting {
    /// Creates the strategy over a shared router context.
    pub const fn new(context: Arc<RouterContext>) -> Self {
        Self { context }
    }
}

impl Routing for QueryRouting {
    fn parse(&self, url: &str) -> RouterResult<RouteMatch> {
        let config = &self.context.config;
        let mut params = split_url(url)
            .query
            .as_deref()
            .map(decode_query)
            .unwrap_or_default();

        let controller = params
            .remove(CONTROLLER_KEY)
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| config.controller.clone());
        let action = params
            .remove(ACTION_KEY)
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| config.action.clone());

        Ok(RouteMatch {
            controller,
            action,
            extension: None,
            params,
        })
    }

    fn generate(&self, locator: &str, params: &Params) -> RouterResult<GeneratedUrl> {
        let config = &self.context.config;
        let locator = self.context.locator(locator)?;

        let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 2);
        if locator.controller != config.controller {
            pairs.push((CONTROLLER_KEY, locator.controller.as_str()));
        }
        if locator.action != config.action {
            pairs.push((ACTION_KEY, locator.action.as_str()));
        }
        // The locator owns the controller/action keys.
        pairs.extend(
            params
                .iter()
                .filter(|(k, _)| k.as_str() != CONTROLLER_KEY && k.as_str() != ACTION_KEY)
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );

        let mut url = self
            .context
            .base
            .prefix(config.complete, config.show_index, false);
        if !pairs.is_empty() {
            url.push('?');
            url.push_str(&encode_query(pairs));
        }
        if let Some(fragment) = &locator.fragment {
            url.push('#');
            url.push_str(&encode_fragment(fragment));
        }

        Ok(GeneratedUrl {
            url,
            warnings: Vec::new(),
        })
    }
}
