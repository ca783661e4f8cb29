//! Path-segment ("rewrite") URLs.
//!
//! URL shape:
//!
//! ```text
//! [scheme://host[:port]][webRoot][indexScript/]controller[/subpath]/action[.ext][/p1/p2...][?extra=...][#fragment]
//! ```
//!
//! Parsing walks the path against the controller tree, then binds the
//! remaining segments positionally to the route's grammar. Generation mirrors
//! it, omitting the default controller and action when nothing forces them.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use waypoint_core::{RouterError, RouterResult};

use super::encoding::{
    collapse_slashes, decode_query, decode_segment, encode_fragment, encode_query,
    encode_segment, split_url,
};
use super::grammar::RouteGrammar;
use super::router::{GenerateWarning, GeneratedUrl, Params, RouteMatch, RouterContext, Routing};
use super::rules::dot_key;

/// `action[.ext]`, ASCII word characters only.
static ACTION_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_]+)(?:\.([A-Za-z0-9_]+))?$").expect("valid action segment regex")
});

/// The rewrite-mode [`Routing`] strategy.
#[derive(Debug)]
pub struct RewriteRouting {
    context: Arc<RouterContext>,
}

impl RewriteRouting {
    /// Creates the strategy over a shared router context.
    pub const fn new(context: Arc<RouterContext>) -> Self {
        Self { context }
    }

    /// Walks leading segments to find the controller.
    ///
    /// `segments` are already percent-decoded. Returns the controller path and
    /// how many segments it consumed. A lone segment that is neither a
    /// controller file nor a directory is taken as an action of the default
    /// controller, unless the path ends in `/`. A controller file wins over a
    /// directory of the same name. A segment that decodes to something
    /// containing `/` never names a controller or directory.
    fn resolve_controller(
        &self,
        segments: &[&str],
        dir_terminated: bool,
    ) -> RouterResult<(String, usize)> {
        let resolver = &self.context.resolver;
        let default_controller = &self.context.config.controller;

        if let [only] = segments {
            let known = !only.contains('/')
                && (resolver.exists(only) || resolver.is_directory(only));
            if !dir_terminated && !known {
                return Ok((default_controller.clone(), 0));
            }
        }

        let mut prefix = String::new();
        for (i, segment) in segments.iter().enumerate() {
            if segment.contains('/') {
                return Err(if i == 0 {
                    RouterError::ControllerNotFound((*segment).to_string())
                } else {
                    RouterError::ControllerPathInvalid(format!("{prefix}/{segment}"))
                });
            }
            let candidate = if prefix.is_empty() {
                (*segment).to_string()
            } else {
                format!("{prefix}/{segment}")
            };

            if resolver.exists(&candidate) {
                return Ok((candidate, i + 1));
            }
            if !resolver.is_directory(&candidate) {
                return Err(if i == 0 {
                    RouterError::ControllerNotFound(candidate)
                } else {
                    RouterError::ControllerPathInvalid(candidate)
                });
            }
            prefix = candidate;
        }

        // Every segment was a directory: fall back to its default controller.
        let fallback = format!("{prefix}/{default_controller}");
        if resolver.exists(&fallback) {
            Ok((fallback, segments.len()))
        } else {
            Err(RouterError::ControllerNotFound(prefix))
        }
    }

    /// Splits an `action[.ext]` segment.
    fn parse_action(segment: &str) -> RouterResult<(String, Option<String>)> {
        let captures = ACTION_SEGMENT
            .captures(segment)
            .ok_or_else(|| RouterError::InvalidActionFormat(segment.to_string()))?;
        let action = captures[1].to_string();
        let extension = captures.get(2).map(|m| m.as_str().to_string());
        Ok((action, extension))
    }
}

/// Parameters bound from one path, split by where each value came from.
#[derive(Debug, Default)]
struct BoundParams {
    /// Values taken from URL segments.
    path: Params,
    /// Grammar defaults for positions the URL left out.
    defaults: Params,
}

/// Binds path segments to grammar positions, filling defaults for missing ones.
fn bind_params(
    grammar: &RouteGrammar,
    segments: &[&str],
    path: &str,
) -> RouterResult<BoundParams> {
    if segments.len() > grammar.len() {
        return Err(RouterError::PathTooDeep {
            path: path.to_string(),
            max: grammar.len(),
        });
    }

    let mut bound = BoundParams::default();
    for (i, rule) in grammar.iter().enumerate() {
        match segments.get(i) {
            Some(raw) => {
                let value = decode_segment(raw);
                if !rule.matches(&value) {
                    return Err(RouterError::ParamPatternMismatch {
                        param: rule.key().to_string(),
                        value,
                        pattern: rule.pattern().unwrap_or_default().to_string(),
                    });
                }
                bound.path.insert(rule.key().to_string(), value);
            }
            None => {
                if let Some(default) = rule.default() {
                    bound
                        .defaults
                        .insert(rule.key().to_string(), decode_segment(default));
                }
            }
        }
    }
    Ok(bound)
}

impl Routing for RewriteRouting {
    fn parse(&self, url: &str) -> RouterResult<RouteMatch> {
        let config = &self.context.config;
        let split = split_url(url);
        let path = collapse_slashes(&split.path);
        let rest = self.context.base.strip(&path);
        let query = split.query.as_deref().map(decode_query).unwrap_or_default();

        if rest.is_empty() {
            let mut route = RouteMatch::new(config.controller.clone(), config.action.clone());
            route.params = query;
            return Ok(route);
        }

        let dir_terminated = rest.ends_with('/');
        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        // Controller and action names are matched decoded; parameter
        // segments stay raw until they are bound.
        let decoded: Vec<String> = segments.iter().map(|s| decode_segment(s)).collect();
        let names: Vec<&str> = decoded.iter().map(String::as_str).collect();

        let (controller, consumed) = self.resolve_controller(&names, dir_terminated)?;

        let (action, extension, param_segments) = match names.get(consumed) {
            Some(segment) => {
                let (action, extension) = Self::parse_action(segment)?;
                (action, extension, &segments[consumed + 1..])
            }
            None => (config.action.clone(), None, &segments[consumed..]),
        };

        let grammar = self.context.grammar(&controller, &action)?;
        let bound = bind_params(&grammar, param_segments, rest)?;
        // Path values beat the query string, which beats grammar defaults.
        let mut params = bound.defaults;
        params.extend(query);
        params.extend(bound.path);

        Ok(RouteMatch {
            controller,
            action,
            extension,
            params,
        })
    }

    fn generate(&self, locator: &str, params: &Params) -> RouterResult<GeneratedUrl> {
        let config = &self.context.config;
        let locator = self.context.locator(locator)?;
        let grammar = self.context.grammar(&locator.controller, &locator.action)?;

        let mut extra = params.clone();
        let mut warnings = Vec::new();
        let mut path_params = Vec::with_capacity(grammar.len());
        for rule in grammar.iter() {
            let value = match extra.remove(rule.key()) {
                Some(value) => value,
                None => {
                    if let Some(default) = rule.default() {
                        default.to_string()
                    } else {
                        warnings.push(GenerateWarning::MissingDefault {
                            route: dot_key(&locator.controller, &locator.action),
                            param: rule.key().to_string(),
                        });
                        String::new()
                    }
                }
            };
            path_params.push(encode_segment(&value));
        }

        // Parameters or a grammar pin the controller and action in place.
        let forced = !params.is_empty() || !grammar.is_empty();
        let show_controller = forced || locator.controller != config.controller;
        let show_action = forced || locator.action != config.action;

        let mut segments: Vec<String> = Vec::new();
        if show_controller {
            segments.extend(locator.controller.split('/').map(encode_segment));
        }
        if show_action {
            let mut action = locator.action.clone();
            if let Some(ext) = locator.extension.as_deref() {
                if path_params.is_empty() {
                    action.push('.');
                    action.push_str(ext);
                }
            }
            if !ACTION_SEGMENT.is_match(&action) {
                return Err(RouterError::InvalidLocator(format!(
                    "action segment '{action}' of '{locator}' cannot be parsed back"
                )));
            }
            segments.push(action);
        }
        segments.extend(path_params);

        let mut url = self
            .context
            .base
            .prefix(config.complete, config.show_index, true);
        url.push_str(&segments.join("/"));

        if !extra.is_empty() {
            url.push('?');
            url.push_str(&encode_query(
                extra.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            ));
        }
        if let Some(fragment) = &locator.fragment {
            url.push('#');
            url.push_str(&encode_fragment(fragment));
        }

        Ok(GeneratedUrl { url, warnings })
    }
}
