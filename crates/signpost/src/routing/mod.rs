//! Request-to-route resolution.
//!
//! This module provides the routing core:
//! - Validated [`Route`] value objects
//! - [`RouteCollection`] storage with exact and wildcard-suffix lookup
//! - [`RouteFactory`] production from plain records
//! - The dual-mode [`Router`] (registered collection or automatic
//!   derivation from the request path)

pub mod collection;
pub mod factory;
pub mod route;
pub mod router;

pub use collection::{CollectionError, RouteCollection, WILDCARD_TEMPLATE};
pub use factory::{FactoryError, RouteDefinition, RouteFactory};
pub use route::{Route, RouteError, RoutePolicy};
pub use router::{Router, RouterError};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HTTP methods recognized by the router.
///
/// Which of these a [`Route`] may actually carry is decided by the
/// [`RoutePolicy`] viable set, not by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
    OPTIONS,
}

impl Method {
    /// Parse a method name, case-insensitively.
    pub fn parse(method: &str) -> Result<Self, RouteError> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            "PATCH" => Ok(Method::PATCH),
            "HEAD" => Ok(Method::HEAD),
            "OPTIONS" => Ok(Method::OPTIONS),
            _ => Err(RouteError::UnknownMethod(method.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::PATCH => "PATCH",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Method {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
