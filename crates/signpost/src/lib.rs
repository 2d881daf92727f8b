//! # signpost
//!
//! Request-to-route resolution core: maps an incoming (HTTP method, path)
//! pair to a [`Route`] descriptor naming the handler to invoke.
//!
//! Two resolution modes:
//! - **Collection mode**: routes are registered up front into a
//!   [`RouteCollection`] and matched exactly or by a trailing-wildcard
//!   suffix, with the dynamic segment exposed as a parameter.
//! - **Auto mode**: no registration step; the route, handler name and
//!   positional parameters included, is derived from the request path
//!   (`/process-login` resolves to `ProcessLoginAction`, `/users/42/edit`
//!   to `UsersEditAction` with parameters `["42"]`).
//!
//! The core stops at resolution: transporting HTTP and invoking the
//! resolved handler belong to the embedding application.
//!
//! ```
//! use signpost::{RouteDefinition, Router, ServerVars};
//!
//! let request = ServerVars::for_request("GET", "/users/42");
//! let mut router = Router::new(
//!     &request,
//!     vec![RouteDefinition::new("GET", "/users", "UsersAction")],
//! )
//! .unwrap();
//!
//! let route = router.route().unwrap();
//! assert_eq!(route.action(), "UsersAction");
//! assert_eq!(route.parameters(), ["42".to_string()]);
//! ```

pub mod action;
pub mod request;
pub mod routing;

pub use action::{Action, HandlerRegistry};
pub use request::{RequestSource, ServerVars, REQUEST_METHOD, REQUEST_URI};
pub use routing::{
    CollectionError, FactoryError, Method, Route, RouteCollection, RouteDefinition, RouteError,
    RouteFactory, RoutePolicy, Router, RouterError, WILDCARD_TEMPLATE,
};
