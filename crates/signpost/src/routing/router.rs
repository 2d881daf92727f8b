//! Dual-mode request resolution.
//!
//! A [`Router`] serves exactly one request: it reads the method and URI
//! from the [`RequestSource`] at construction and resolves them to a
//! [`Route`] on demand. In collection mode the registered
//! [`RouteCollection`] answers through its two-phase lookup; in auto mode
//! the route is derived from the path alone, with no registration step.
//!
//! Auto derivation policy: path segments are partitioned into numeric
//! parameters and name components, the name components are joined in
//! Pascal case, and the fixed `Action` suffix is appended
//! (`/users/42/edit` resolves to `UsersEditAction` with parameters
//! `["42"]`; the bare root resolves to `IndexAction`).

use super::collection::{CollectionError, RouteCollection};
use super::factory::{FactoryError, RouteDefinition, RouteFactory};
use super::route::{normalize_path, Route, RouteError};
use super::Method;
use crate::request::{RequestSource, REQUEST_METHOD, REQUEST_URI};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Errors raised during request resolution and route registration.
#[derive(Error, Debug)]
pub enum RouterError {
    /// No registered route matches the current request.
    #[error("Unexpected route: {method};{path}")]
    UnexpectedRoute { method: Method, path: String },

    /// A registration or listing operation was called on an auto-router.
    /// Programmer error, not a runtime condition to recover from.
    #[error("Auto-routers don't collect routes")]
    UnexpectedAutorouterAction,

    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error(transparent)]
    Factory(#[from] FactoryError),

    #[error(transparent)]
    Route(#[from] RouteError),
}

/// Default segment substituted when the request path is the bare root.
const DEFAULT_SEGMENT: &str = "index";

/// Suffix appended to every auto-derived handler name.
const ACTION_SUFFIX: &str = "Action";

type PrivacyPredicate = Box<dyn Fn(&Route) -> bool + Send + Sync>;

/// Resolves the current request to a [`Route`].
///
/// Request-scoped: one router serves one (method, path) resolution. The
/// collection-mode result is memoized behind a dirty flag that is set by
/// every registration and cleared after the next lookup.
pub struct Router {
    method: Method,
    path: String,
    collection: RouteCollection,
    factory: RouteFactory,
    resolved: Option<Route>,
    dirty: bool,
    auto: bool,
    privacy: PrivacyPredicate,
}

impl Router {
    /// Collection-mode router over the given request, seeded with a route
    /// table.
    pub fn new(
        request: &dyn RequestSource,
        routes: Vec<RouteDefinition>,
    ) -> Result<Self, RouterError> {
        Self::with_parts(request, RouteCollection::new(), RouteFactory::new(), routes)
    }

    /// Collection-mode router with an injected collection and factory.
    pub fn with_parts(
        request: &dyn RequestSource,
        collection: RouteCollection,
        factory: RouteFactory,
        routes: Vec<RouteDefinition>,
    ) -> Result<Self, RouterError> {
        let mut router = Self::from_request(request, collection, factory, false)?;
        router.add_routes(routes)?;
        Ok(router)
    }

    /// Auto-mode router: no registration, the route is derived from the
    /// request path on every resolution.
    pub fn auto(request: &dyn RequestSource) -> Result<Self, RouterError> {
        Self::from_request(request, RouteCollection::new(), RouteFactory::new(), true)
    }

    fn from_request(
        request: &dyn RequestSource,
        collection: RouteCollection,
        factory: RouteFactory,
        auto: bool,
    ) -> Result<Self, RouterError> {
        let method = Method::parse(request.server_var(REQUEST_METHOD).unwrap_or_default())?;
        let path = normalize_path(request.server_var(REQUEST_URI).unwrap_or_default())?;

        Ok(Self {
            method,
            path,
            collection,
            factory,
            resolved: None,
            dirty: true,
            auto,
            privacy: Box::new(|_| false),
        })
    }

    /// Swap the factory (and with it the route policy) before resolution.
    pub fn with_factory(mut self, factory: RouteFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Inject the predicate deciding whether an auto-derived route is
    /// private. Defaults to never.
    pub fn with_privacy(
        mut self,
        predicate: impl Fn(&Route) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.privacy = Box::new(predicate);
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_auto(&self) -> bool {
        self.auto
    }

    /// Resolve the current request to a route.
    pub fn route(&mut self) -> Result<Route, RouterError> {
        if self.auto {
            self.auto_route()
        } else {
            self.collected_route()
        }
    }

    /// All registered routes. Undefined for auto-routers, which do not
    /// maintain a finite registered set.
    pub fn routes(&self) -> Result<Vec<&Route>, RouterError> {
        self.guard_collecting()?;
        Ok(self.collection.routes(None))
    }

    /// Run a definition through the factory and register the produced
    /// route.
    pub fn add_route(&mut self, definition: RouteDefinition) -> Result<(), RouterError> {
        self.guard_collecting()?;
        let route = self.factory.produce_route(&definition)?;
        self.collection.add_route(route)?;
        self.dirty = true;
        Ok(())
    }

    pub fn add_routes(
        &mut self,
        definitions: impl IntoIterator<Item = RouteDefinition>,
    ) -> Result<(), RouterError> {
        for definition in definitions {
            self.add_route(definition)?;
        }
        Ok(())
    }

    /// Register a route supplied as a generic key-value mapping.
    pub fn add_route_value(&mut self, value: Value) -> Result<(), RouterError> {
        self.guard_collecting()?;
        let route = self.factory.produce_route_from_value(value)?;
        self.collection.add_route(route)?;
        self.dirty = true;
        Ok(())
    }

    fn guard_collecting(&self) -> Result<(), RouterError> {
        if self.auto {
            Err(RouterError::UnexpectedAutorouterAction)
        } else {
            Ok(())
        }
    }

    fn collected_route(&mut self) -> Result<Route, RouterError> {
        if self.dirty {
            // A miss is memoized; any other collection error is a
            // configuration problem and must surface as-is.
            self.resolved = match self.collection.get_route(self.method, &self.path) {
                Ok(route) => Some(route),
                Err(CollectionError::UnexpectedRoute { .. }) => None,
                Err(err) => return Err(err.into()),
            };
            self.dirty = false;
        }

        self.resolved
            .clone()
            .ok_or_else(|| RouterError::UnexpectedRoute {
                method: self.method,
                path: self.path.clone(),
            })
    }

    fn auto_route(&self) -> Result<Route, RouterError> {
        let (action, parameters) = derive_action(&self.path);

        let route = Route::with_policy(
            self.factory.policy(),
            self.method.as_str(),
            &self.path,
            &action,
            false,
        )?;
        let private = (self.privacy)(&route);

        debug!(
            method = %self.method,
            path = %self.path,
            action = %action,
            ?parameters,
            private,
            "auto-derived route"
        );

        Ok(route.with_private(private).with_parameters(parameters))
    }
}

// Manual Debug because the privacy predicate is a closure.
impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("auto", &self.auto)
            .field("dirty", &self.dirty)
            .field("routes", &self.collection.len())
            .finish()
    }
}

/// Derive the handler name and positional parameters from a request path.
///
/// Segments that read as numeric literals become parameters; the rest, in
/// original order, are Pascal-cased and joined into the handler name,
/// which then gains the fixed `Action` suffix.
fn derive_action(path: &str) -> (String, Vec<String>) {
    let path = path.split('?').next().unwrap_or_default();

    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        segments.push(DEFAULT_SEGMENT);
    }

    let (parameters, names): (Vec<&str>, Vec<&str>) =
        segments.into_iter().partition(|segment| is_numeric(segment));

    let mut action: String = names.iter().map(|segment| pascalize(segment)).collect();
    if action.is_empty() {
        action.push_str("Index");
    }
    action.push_str(ACTION_SUFFIX);

    let parameters = parameters.into_iter().map(str::to_string).collect();
    (action, parameters)
}

/// Integer or decimal literals count as parameters; exponent and
/// non-finite forms do not.
fn is_numeric(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        && segment.parse::<f64>().is_ok()
}

/// Lowercase a segment, then capitalize its first letter and every letter
/// following a hyphen, dropping the hyphens (`process-login` becomes
/// `ProcessLogin`).
fn pascalize(segment: &str) -> String {
    let lowered = segment.to_ascii_lowercase();
    lowered
        .split('-')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect()
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ServerVars;

    fn definitions() -> Vec<RouteDefinition> {
        vec![
            RouteDefinition::new("GET", "/", "IndexAction"),
            RouteDefinition::new("GET", "/users", "UsersAction"),
            RouteDefinition::new("POST", "/login", "LoginAction"),
        ]
    }

    #[test]
    fn test_collection_mode_exact_resolution() {
        let vars = ServerVars::for_request("GET", "/users");
        let mut router = Router::new(&vars, definitions()).unwrap();

        let route = router.route().unwrap();
        assert_eq!(route.action(), "UsersAction");
        assert_eq!(route.parameters(), Vec::<String>::new());
    }

    #[test]
    fn test_collection_mode_wildcard_resolution() {
        let vars = ServerVars::for_request("GET", "/users/42");
        let mut router = Router::new(&vars, definitions()).unwrap();

        let route = router.route().unwrap();
        assert_eq!(route.action(), "UsersAction");
        assert_eq!(route.parameters(), ["42".to_string()]);
    }

    #[test]
    fn test_collection_mode_miss() {
        let vars = ServerVars::for_request("POST", "/nope");
        let mut router = Router::new(&vars, definitions()).unwrap();

        assert!(matches!(
            router.route(),
            Err(RouterError::UnexpectedRoute { .. })
        ));
    }

    #[test]
    fn test_resolution_is_memoized_until_routes_change() {
        let vars = ServerVars::for_request("GET", "/late");
        let mut router = Router::new(&vars, definitions()).unwrap();

        assert!(router.route().is_err());

        // Registering a matching route re-arms the search.
        router
            .add_route(RouteDefinition::new("GET", "/late", "LateAction"))
            .unwrap();
        assert_eq!(router.route().unwrap().action(), "LateAction");
        assert_eq!(router.route().unwrap().action(), "LateAction");
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let vars = ServerVars::for_request("GET", "/users");
        let mut router = Router::new(&vars, definitions()).unwrap();

        let err = router
            .add_route(RouteDefinition::new("GET", "/users", "OtherAction"))
            .unwrap_err();
        assert!(matches!(
            err,
            RouterError::Collection(CollectionError::DuplicateRoute { .. })
        ));
    }

    #[test]
    fn test_broken_lookup_template_is_not_reported_as_a_miss() {
        let vars = ServerVars::for_request("GET", "/users/42");
        let collection = RouteCollection::with_template("^{pattern}/([^/]*$");
        let mut router = Router::with_parts(
            &vars,
            collection,
            RouteFactory::new(),
            vec![RouteDefinition::new("GET", "/users", "UsersAction")],
        )
        .unwrap();

        assert!(matches!(
            router.route(),
            Err(RouterError::Collection(
                CollectionError::InvalidWildcardPattern(_)
            ))
        ));
    }

    #[test]
    fn test_request_query_string_is_discarded() {
        let vars = ServerVars::for_request("GET", "/users?page=2");
        let mut router = Router::new(&vars, definitions()).unwrap();

        assert_eq!(router.path(), "/users");
        assert_eq!(router.route().unwrap().action(), "UsersAction");
    }

    #[test]
    fn test_request_method_is_case_normalized() {
        let vars = ServerVars::for_request("post", "/login");
        let mut router = Router::new(&vars, definitions()).unwrap();

        assert_eq!(router.method(), Method::POST);
        assert_eq!(router.route().unwrap().action(), "LoginAction");
    }

    #[test]
    fn test_missing_server_vars_fail_validation() {
        let vars = ServerVars::new();
        assert!(matches!(
            Router::new(&vars, vec![]),
            Err(RouterError::Route(RouteError::UnknownMethod(_)))
        ));
    }

    #[test]
    fn test_routes_listing() {
        let vars = ServerVars::for_request("GET", "/");
        let router = Router::new(&vars, definitions()).unwrap();
        assert_eq!(router.routes().unwrap().len(), 3);
    }

    #[test]
    fn test_auto_router_rejects_collection_operations() {
        let vars = ServerVars::for_request("GET", "/users");
        let mut router = Router::auto(&vars).unwrap();

        assert!(matches!(
            router.routes(),
            Err(RouterError::UnexpectedAutorouterAction)
        ));
        assert!(matches!(
            router.add_route(RouteDefinition::new("GET", "/users", "UsersAction")),
            Err(RouterError::UnexpectedAutorouterAction)
        ));
    }

    #[test]
    fn test_auto_route_for_root_path() {
        let vars = ServerVars::for_request("GET", "/");
        let mut router = Router::auto(&vars).unwrap();

        let route = router.route().unwrap();
        assert_eq!(route.action(), "IndexAction");
        assert_eq!(route.path(), "/");
        assert_eq!(route.parameters(), Vec::<String>::new());
        assert!(!route.is_private());
    }

    #[test]
    fn test_auto_route_kebab_case() {
        let vars = ServerVars::for_request("GET", "/process-login");
        let mut router = Router::auto(&vars).unwrap();

        assert_eq!(router.route().unwrap().action(), "ProcessLoginAction");
    }

    #[test]
    fn test_auto_route_numeric_partition() {
        let vars = ServerVars::for_request("GET", "/users/42/edit");
        let mut router = Router::auto(&vars).unwrap();

        let route = router.route().unwrap();
        assert_eq!(route.action(), "UsersEditAction");
        assert_eq!(route.parameters(), ["42".to_string()]);
    }

    #[test]
    fn test_auto_route_all_numeric_path() {
        let vars = ServerVars::for_request("GET", "/42/7");
        let mut router = Router::auto(&vars).unwrap();

        let route = router.route().unwrap();
        assert_eq!(route.action(), "IndexAction");
        assert_eq!(route.parameters(), ["42".to_string(), "7".to_string()]);
    }

    #[test]
    fn test_auto_route_privacy_predicate() {
        let vars = ServerVars::for_request("GET", "/account/settings");
        let mut router = Router::auto(&vars)
            .unwrap()
            .with_privacy(|route| route.path().starts_with("/account"));

        assert!(router.route().unwrap().is_private());
    }

    #[test]
    fn test_derive_action_cases() {
        assert_eq!(derive_action("/"), ("IndexAction".to_string(), vec![]));
        assert_eq!(
            derive_action("/login"),
            ("LoginAction".to_string(), vec![])
        );
        assert_eq!(
            derive_action("/process-login"),
            ("ProcessLoginAction".to_string(), vec![])
        );
        assert_eq!(
            derive_action("/users/42/edit"),
            ("UsersEditAction".to_string(), vec!["42".to_string()])
        );
        assert_eq!(
            derive_action("/FOO-BAR/baz"),
            ("FooBarBazAction".to_string(), vec![])
        );
        assert_eq!(
            derive_action("/orders?sort=desc"),
            ("OrdersAction".to_string(), vec![])
        );
    }

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric("42"));
        assert!(is_numeric("3.14"));
        assert!(!is_numeric("v2"));
        assert!(!is_numeric("nan"));
        assert!(!is_numeric("1e3"));
        assert!(!is_numeric(""));
    }
}
