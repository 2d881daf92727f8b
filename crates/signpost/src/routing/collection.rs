//! Route storage and two-phase lookup.
//!
//! Routes are stored per method in insertion order. Lookup runs an exact
//! phase first (a literal pattern equal to the requested path always wins)
//! and then a wildcard phase, where each registered pattern is expanded
//! through the lookup template and tested against the path. The first
//! pattern to match, in registration order, is the result; its capture
//! groups become the returned route's parameters.

use super::route::Route;
use super::Method;
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, trace};

/// Default lookup template: the registered pattern as a prefix, plus one
/// dynamic trailing segment captured as a parameter.
pub const WILDCARD_TEMPLATE: &str = "^{pattern}/([^/]*)$";

/// Errors raised by the route collection.
#[derive(Error, Debug)]
pub enum CollectionError {
    /// A route with the same (method, path) is already registered.
    /// Configuration error, detected at insertion time.
    #[error("Duplicate route: {method};{path}")]
    DuplicateRoute { method: Method, path: String },

    /// No registered route matches the requested (method, path).
    #[error("Unexpected route: {method};{path}")]
    UnexpectedRoute { method: Method, path: String },

    /// The lookup template expanded into a regex that does not compile.
    #[error("Invalid wildcard pattern: {0}")]
    InvalidWildcardPattern(String),
}

/// Registry of explicitly registered routes, keyed by method and path
/// pattern.
#[derive(Debug)]
pub struct RouteCollection {
    // Per-method vectors keep insertion order, which is the documented
    // tie-break for the wildcard phase.
    routes: HashMap<Method, Vec<Route>>,
    template: String,
}

impl RouteCollection {
    pub fn new() -> Self {
        Self::with_template(WILDCARD_TEMPLATE)
    }

    /// Use a custom lookup template. `{pattern}` is replaced with the
    /// escaped registered pattern; every capture group in the expansion
    /// becomes a parameter, in order.
    pub fn with_template(template: impl Into<String>) -> Self {
        Self {
            routes: HashMap::new(),
            template: template.into(),
        }
    }

    /// Register a route. Fails if a route with the same (method, path) is
    /// already present; the collection is left unchanged in that case.
    pub fn add_route(&mut self, route: Route) -> Result<(), CollectionError> {
        let entries = self.routes.entry(route.method()).or_default();
        if entries.iter().any(|existing| existing.path() == route.path()) {
            return Err(CollectionError::DuplicateRoute {
                method: route.method(),
                path: route.path().to_string(),
            });
        }

        debug!(
            method = %route.method(),
            path = route.path(),
            action = route.action(),
            "route registered"
        );
        entries.push(route);
        Ok(())
    }

    /// Whether any registered route matches the (method, path) pair.
    pub fn has_route(&self, method: Method, path: &str) -> bool {
        matches!(self.locate(method, path), Ok(Some(_)))
    }

    /// Resolve the (method, path) pair to a route. The returned route is a
    /// fresh value carrying any extracted parameters; the stored template
    /// route is never mutated.
    pub fn get_route(&self, method: Method, path: &str) -> Result<Route, CollectionError> {
        self.locate(method, path)?
            .ok_or_else(|| CollectionError::UnexpectedRoute {
                method,
                path: path.to_string(),
            })
    }

    /// All registered routes, optionally filtered to one method. Order is
    /// registration order within a method.
    pub fn routes(&self, method: Option<Method>) -> Vec<&Route> {
        match method {
            Some(method) => self
                .routes
                .get(&method)
                .map(|entries| entries.iter().collect())
                .unwrap_or_default(),
            None => self.routes.values().flatten().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.values().all(Vec::is_empty)
    }

    fn locate(&self, method: Method, path: &str) -> Result<Option<Route>, CollectionError> {
        let Some(entries) = self.routes.get(&method) else {
            return Ok(None);
        };

        // Exact phase: no parameter extraction.
        if let Some(route) = entries.iter().find(|route| route.path() == path) {
            trace!(%method, path, "exact route match");
            return Ok(Some(route.clone()));
        }

        // Wildcard phase: first registered pattern wins.
        for route in entries {
            let matcher = self.wildcard_matcher(route.path())?;
            if let Some(captures) = matcher.captures(path) {
                let parameters: Vec<String> = captures
                    .iter()
                    .skip(1)
                    .flatten()
                    .map(|group| group.as_str().to_string())
                    .collect();
                trace!(
                    %method,
                    path,
                    pattern = route.path(),
                    ?parameters,
                    "wildcard route match"
                );
                return Ok(Some(route.clone().with_parameters(parameters)));
            }
        }

        Ok(None)
    }

    fn wildcard_matcher(&self, pattern: &str) -> Result<Regex, CollectionError> {
        let expanded = self.template.replace("{pattern}", &regex::escape(pattern));
        Regex::new(&expanded)
            .map_err(|err| CollectionError::InvalidWildcardPattern(err.to_string()))
    }
}

impl Default for RouteCollection {
    fn default() -> Self {
        Self::new()
    }
}
