//! Memoized grammar compilation.
//!
//! The [`GrammarCache`] compiles each route's grammar at most once for the
//! lifetime of the cache and hands out shared [`Arc<RouteGrammar>`]s. Entries
//! are never evicted: the set of routes is bounded by the application's
//! controllers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use waypoint_core::RouterResult;

use super::grammar::{compile_grammar, RouteGrammar};
use super::rules::RouteRuleSource;

type CacheKey = (String, String);

/// A thread-safe, grow-only cache of compiled route grammars.
#[derive(Debug, Default)]
pub struct GrammarCache {
    entries: RwLock<HashMap<CacheKey, Arc<RouteGrammar>>>,
    compilations: AtomicUsize,
}

impl GrammarCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached grammar for a route, compiling it on first access.
    ///
    /// Lookups take a read lock. Compilation happens under the write lock,
    /// after a second check, so concurrent first accesses compile once.
    /// Failed compilations are not cached.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidGrammar`](waypoint_core::RouterError::InvalidGrammar)
    /// if the route's rule string is malformed.
    pub fn get_or_compile(
        &self,
        controller: &str,
        action: &str,
        rules: &dyn RouteRuleSource,
    ) -> RouterResult<Arc<RouteGrammar>> {
        if let Some(grammar) = self.get(controller, action) {
            return Ok(grammar);
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let key = (controller.to_string(), action.to_string());
        if let Some(grammar) = entries.get(&key) {
            return Ok(Arc::clone(grammar));
        }

        let grammar = Arc::new(compile_grammar(controller, action, rules)?);
        self.compilations.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            controller,
            action,
            params = grammar.len(),
            "compiled route grammar"
        );
        entries.insert(key, Arc::clone(&grammar));
        Ok(grammar)
    }

    /// Returns the cached grammar for a route without compiling.
    pub fn get(&self, controller: &str, action: &str) -> Option<Arc<RouteGrammar>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&(controller.to_string(), action.to_string()))
            .cloned()
    }

    /// Returns how many grammars have been compiled by this cache.
    pub fn compilations(&self) -> usize {
        self.compilations.load(Ordering::Relaxed)
    }

    /// Returns the number of cached grammars.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
