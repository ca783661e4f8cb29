//! The router facade and the types both strategies share.
//!
//! [`Routing`] is the capability both addressing styles implement. A
//! [`Router`] picks one implementation when it is built (from
//! [`RouterConfig::rewrite`]) and delegates to it, so no method branches on
//! the style at call time.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use waypoint_core::logging::route_span;
use waypoint_core::{RouterConfig, RouterResult, Settings};

use super::base::BaseUrl;
use super::cache::GrammarCache;
use super::controllers::ControllerResolver;
use super::grammar::RouteGrammar;
use super::locator::Locator;
use super::query::QueryRouting;
use super::rewrite::RewriteRouting;
use super::rules::{dot_key, RouteRuleSource};

/// Route parameters, ordered by key so generated query strings are stable.
pub type Params = BTreeMap<String, String>;

/// The result of parsing a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    /// Controller path, `/`-separated for nested controllers.
    pub controller: String,
    /// Action name.
    pub action: String,
    /// Extension from an `action.ext` segment (rewrite mode only).
    pub extension: Option<String>,
    /// Path parameters and, in rewrite mode, any extra query parameters.
    pub params: Params,
}

impl RouteMatch {
    /// Creates a match with no extension and no parameters.
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
            extension: None,
            params: Params::new(),
        }
    }

    /// Returns the rule-lookup key of the matched route.
    pub fn dot_key(&self) -> String {
        dot_key(&self.controller, &self.action)
    }

    /// Returns the locator that names this route (without parameters).
    pub fn locator(&self) -> String {
        match &self.extension {
            Some(ext) => format!("{}:{}.{ext}", self.controller, self.action),
            None => format!("{}:{}", self.controller, self.action),
        }
    }
}

/// A non-fatal problem found while generating a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateWarning {
    /// A grammar position had neither a supplied value nor a default; an
    /// empty segment was written in its place.
    MissingDefault { route: String, param: String },
}

impl fmt::Display for GenerateWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDefault { route, param } => {
                write!(f, "no value or default for parameter '{param}' of route '{route}'")
            }
        }
    }
}

/// A generated URL together with any warnings raised while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUrl {
    /// The URL.
    pub url: String,
    /// Non-fatal diagnostics.
    pub warnings: Vec<GenerateWarning>,
}

/// One URL addressing style.
pub trait Routing: Send + Sync {
    /// Maps a request URL to a route.
    ///
    /// # Errors
    ///
    /// Returns a [`RouterError`](waypoint_core::RouterError) when the URL
    /// cannot be resolved.
    fn parse(&self, url: &str) -> RouterResult<RouteMatch>;

    /// Builds a URL for a locator and parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`RouterError`](waypoint_core::RouterError) for an invalid
    /// locator or a malformed route grammar.
    fn generate(&self, locator: &str, params: &Params) -> RouterResult<GeneratedUrl>;
}

/// State shared by both strategies of one router.
pub struct RouterContext {
    /// Router-wide options.
    pub config: RouterConfig,
    /// Request base components.
    pub base: BaseUrl,
    /// Controller existence oracle.
    pub resolver: Arc<dyn ControllerResolver>,
    /// Grammar string lookup.
    pub rules: Arc<dyn RouteRuleSource>,
    /// Compiled grammars.
    pub grammars: GrammarCache,
}

impl fmt::Debug for RouterContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterContext")
            .field("config", &self.config)
            .field("base", &self.base)
            .field("grammars", &self.grammars)
            .finish_non_exhaustive()
    }
}

impl RouterContext {
    /// Parses a locator, applying the router-wide default extension.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidLocator`](waypoint_core::RouterError::InvalidLocator).
    pub fn locator(&self, locator: &str) -> RouterResult<Locator> {
        Locator::parse(locator, self.config.default_extension())
    }

    /// Returns the (cached) grammar for a route.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidGrammar`](waypoint_core::RouterError::InvalidGrammar).
    pub fn grammar(&self, controller: &str, action: &str) -> RouterResult<Arc<RouteGrammar>> {
        self.grammars
            .get_or_compile(controller, action, self.rules.as_ref())
    }
}

/// Maps URLs to routes and routes back to URLs.
///
/// `Router` is `Send + Sync`; one instance can serve concurrent requests.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use std::sync::Arc;
///
/// use waypoint_core::settings::Settings;
/// use waypoint_http::urls::controllers::StaticControllerResolver;
/// use waypoint_http::{Params, Router};
///
/// let mut settings = Settings::default();
/// settings.router.rewrite = false;
///
/// let router = Router::from_settings(&settings, Arc::new(StaticControllerResolver::new()));
/// let m = router.parse("/?controller=blog&action=show&id=7").unwrap();
/// assert_eq!(m.controller, "blog");
/// assert_eq!(m.params.get("id").unwrap(), "7");
///
/// let url = router.generate("blog:show", &Params::new()).unwrap();
/// assert_eq!(url, "/?controller=blog&action=show");
/// ```
pub struct Router {
    context: Arc<RouterContext>,
    strategy: Box<dyn Routing>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("rewrite", &self.is_rewrite())
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl Router {
    /// Creates a router, selecting the rewrite or query strategy from `config`.
    pub fn new(
        config: RouterConfig,
        base: BaseUrl,
        resolver: Arc<dyn ControllerResolver>,
        rules: Arc<dyn RouteRuleSource>,
    ) -> Self {
        let rewrite = config.rewrite;
        let context = Arc::new(RouterContext {
            config,
            base,
            resolver,
            rules,
            grammars: GrammarCache::new(),
        });
        let strategy: Box<dyn Routing> = if rewrite {
            Box::new(RewriteRouting::new(Arc::clone(&context)))
        } else {
            Box::new(QueryRouting::new(Arc::clone(&context)))
        };
        Self { context, strategy }
    }

    /// Creates a router from a settings snapshot, using its `routes` table as
    /// the rule source.
    pub fn from_settings(settings: &Settings, resolver: Arc<dyn ControllerResolver>) -> Self {
        Self::new(
            settings.router.clone(),
            BaseUrl::from_settings(&settings.request),
            resolver,
            Arc::new(settings.routes.clone()),
        )
    }

    /// Maps a request URL to a route.
    ///
    /// # Errors
    ///
    /// In rewrite mode, returns a not-found-class
    /// [`RouterError`](waypoint_core::RouterError) when no controller, action,
    /// or parameter layout matches. Query mode only fails on a malformed grammar.
    pub fn parse(&self, url: &str) -> RouterResult<RouteMatch> {
        let span = route_span(url);
        let _guard = span.enter();

        let result = self.strategy.parse(url);
        match &result {
            Ok(m) => tracing::debug!(
                controller = %m.controller,
                action = %m.action,
                params = m.params.len(),
                "resolved route"
            ),
            Err(e) => tracing::debug!(error = %e, "route resolution failed"),
        }
        result
    }

    /// Builds a URL for `locator` (e.g. `"blog:archive"`) and `params`.
    ///
    /// Warnings are logged and dropped; use
    /// [`generate_with_diagnostics`](Self::generate_with_diagnostics) to inspect them.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidLocator`](waypoint_core::RouterError::InvalidLocator)
    /// or [`RouterError::InvalidGrammar`](waypoint_core::RouterError::InvalidGrammar).
    pub fn generate(&self, locator: &str, params: &Params) -> RouterResult<String> {
        self.generate_with_diagnostics(locator, params)
            .map(|generated| generated.url)
    }

    /// Builds a URL and returns it with any non-fatal warnings.
    ///
    /// # Errors
    ///
    /// See [`generate`](Self::generate).
    pub fn generate_with_diagnostics(
        &self,
        locator: &str,
        params: &Params,
    ) -> RouterResult<GeneratedUrl> {
        let generated = self.strategy.generate(locator, params)?;
        for warning in &generated.warnings {
            tracing::warn!(locator, "{warning}");
        }
        Ok(generated)
    }

    /// Returns the compiled grammar for a route, compiling and caching it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidGrammar`](waypoint_core::RouterError::InvalidGrammar).
    pub fn grammar(&self, controller: &str, action: &str) -> RouterResult<Arc<RouteGrammar>> {
        self.context.grammar(controller, action)
    }

    /// Returns `true` if this router uses path-segment URLs.
    pub fn is_rewrite(&self) -> bool {
        self.context.config.rewrite
    }

    /// Returns the router-wide options.
    pub fn config(&self) -> &RouterConfig {
        &self.context.config
    }

    /// Returns the grammar cache.
    pub fn grammar_cache(&self) -> &GrammarCache {
        &self.context.grammars
    }
}
