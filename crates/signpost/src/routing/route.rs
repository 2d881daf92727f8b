//! Route value object and field validation.
//!
//! A [`Route`] is immutable after construction: every field is validated
//! at assignment time and construction fails fast on the first violation.
//! The only post-construction data is the `parameters` sequence, which is
//! bound by the matcher onto a fresh clone of the stored route, never onto
//! the stored route itself.

use super::Method;
use crate::action::HandlerRegistry;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while validating route fields at construction time.
#[derive(Error, Debug)]
pub enum RouteError {
    #[error("Unexpected method: {0}")]
    UnknownMethod(String),
    #[error("Invalid path: {0}")]
    UnknownPath(String),
    #[error("Invalid action: {0}")]
    UnknownAction(String),
    #[error("Unknown property: {0}")]
    UnknownProperty(String),
}

// Path grammar: one or more slash-led segments of word characters.
// Hyphens are admitted so kebab-case paths stay routable in auto mode.
static PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:/[\w-]*)+$").expect("path grammar regex"));

// Action grammar: capitalized components separated by `::`.
static ACTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]\w*(?:::[A-Z]\w*)*$").expect("action grammar regex"));

/// Validation policy applied when constructing a [`Route`].
///
/// Replaces the subclass hooks of older router designs with explicit
/// configuration: the viable method set and, optionally, a handler
/// registry against which action names are existence-checked.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    viable_methods: Vec<Method>,
    registry: Option<Arc<HandlerRegistry>>,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self {
            viable_methods: vec![Method::GET, Method::POST],
            registry: None,
        }
    }
}

impl RoutePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the viable method set.
    pub fn with_viable_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.viable_methods = methods.into_iter().collect();
        self
    }

    /// Require action names to be registered handlers, not just
    /// syntactically valid identifiers.
    pub fn with_registry(mut self, registry: Arc<HandlerRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn viable_methods(&self) -> &[Method] {
        &self.viable_methods
    }

    fn check_method(&self, method: Method) -> Result<(), RouteError> {
        if self.viable_methods.contains(&method) {
            Ok(())
        } else {
            Err(RouteError::UnknownMethod(method.to_string()))
        }
    }

    fn check_action(&self, action: &str) -> Result<(), RouteError> {
        if !ACTION_RE.is_match(action) {
            return Err(RouteError::UnknownAction(action.to_string()));
        }

        if let Some(registry) = &self.registry {
            if !registry.contains(action) {
                return Err(RouteError::UnknownAction(action.to_string()));
            }
        }

        Ok(())
    }
}

/// A resolved or resolvable mapping from (method, path) to a named
/// handler, plus any parameters extracted from the matched path.
#[derive(Debug, Clone)]
pub struct Route {
    method: Method,
    path: String,
    action: String,
    private: bool,
    parameters: Vec<String>,
}

impl Route {
    /// Construct a route under the default policy (viable methods
    /// GET and POST, no registry check).
    pub fn new(method: &str, path: &str, action: &str, private: bool) -> Result<Self, RouteError> {
        Self::with_policy(&RoutePolicy::default(), method, path, action, private)
    }

    /// Construct a route, validating each field against the given policy.
    pub fn with_policy(
        policy: &RoutePolicy,
        method: &str,
        path: &str,
        action: &str,
        private: bool,
    ) -> Result<Self, RouteError> {
        let method = Method::parse(method)?;
        policy.check_method(method)?;
        let path = normalize_path(path)?;
        policy.check_action(action)?;

        Ok(Self {
            method,
            path,
            action: action.to_string(),
            private,
            parameters: Vec::new(),
        })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn is_private(&self) -> bool {
        self.private
    }

    /// Parameters extracted from the dynamic portion of a matched path.
    /// Empty unless this route came out of a match operation.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Bind extracted parameters. Used by the matcher when it hands back a
    /// match result; the registered template route keeps an empty sequence.
    pub fn with_parameters(mut self, parameters: Vec<String>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    /// True when the identifying (path, action, method, private) tuple of
    /// both routes is equal. Parameters are request-scoped and never part
    /// of route identity.
    pub fn matches_route(&self, other: &Route) -> bool {
        self == other
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
            && self.action == other.action
            && self.method == other.method
            && self.private == other.private
    }
}

impl Eq for Route {}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, {})",
            self.path,
            self.action,
            self.method,
            u8::from(self.private)
        )
    }
}

/// Normalize a raw path into its canonical match-key form: query string
/// and fragment discarded, exactly one leading slash, trailing slash
/// stripped (the bare root stays `/`).
pub(crate) fn normalize_path(raw: &str) -> Result<String, RouteError> {
    let raw = raw.split(['?', '#']).next().unwrap_or_default();

    let mut path = if raw.starts_with('/') {
        raw.to_string()
    } else {
        format!("/{raw}")
    };

    while path.len() > 1 && path.ends_with('/') {
        path.pop();
    }

    if !PATH_RE.is_match(&path) {
        return Err(RouteError::UnknownPath(path));
    }

    Ok(path)
}
