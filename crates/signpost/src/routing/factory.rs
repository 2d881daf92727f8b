//! Route production from plain records.
//!
//! Route tables arrive as in-memory records of exactly the keys
//! `method`, `path`, `action`, `private`. The factory validates that
//! shape at the boundary and owns the [`RoutePolicy`] the produced routes
//! are validated against.

use super::route::{Route, RouteError, RoutePolicy};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while producing routes from plain records.
#[derive(Error, Debug)]
pub enum FactoryError {
    /// The record's shape does not deserialize into a route definition.
    #[error("Invalid route data: {0}")]
    InvalidRouteData(String),

    #[error(transparent)]
    Route(#[from] RouteError),
}

/// Plain route record accepted at the boundary.
///
/// `deny_unknown_fields` keeps the accepted key set closed: anything
/// outside `method`, `path`, `action`, `private` is rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteDefinition {
    pub method: String,
    pub path: String,
    pub action: String,
    #[serde(default)]
    pub private: bool,
}

impl RouteDefinition {
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            action: action.into(),
            private: false,
        }
    }

    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }
}

const DEFINITION_KEYS: [&str; 4] = ["method", "path", "action", "private"];

/// Produces validated [`Route`] values from plain records.
#[derive(Debug, Clone, Default)]
pub struct RouteFactory {
    policy: RoutePolicy,
}

impl RouteFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: RoutePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RoutePolicy {
        &self.policy
    }

    /// Produce a route from a typed definition, validating every field
    /// against the factory's policy.
    pub fn produce_route(&self, definition: &RouteDefinition) -> Result<Route, FactoryError> {
        Ok(Route::with_policy(
            &self.policy,
            &definition.method,
            &definition.path,
            &definition.action,
            definition.private,
        )?)
    }

    /// Produce a route from a generic key-value mapping. The key set must
    /// stay inside `method`, `path`, `action`, `private`; anything else is
    /// an unknown property.
    pub fn produce_route_from_value(&self, value: Value) -> Result<Route, FactoryError> {
        if let Value::Object(map) = &value {
            for key in map.keys() {
                if !DEFINITION_KEYS.contains(&key.as_str()) {
                    return Err(FactoryError::Route(RouteError::UnknownProperty(
                        key.clone(),
                    )));
                }
            }
        }

        let definition: RouteDefinition = serde_json::from_value(value)
            .map_err(|err| FactoryError::InvalidRouteData(err.to_string()))?;
        self.produce_route(&definition)
    }

    /// A neutral placeholder route for embedders that stage construction.
    /// Still validated against the factory's policy.
    pub fn produce_blank_route(&self) -> Result<Route, FactoryError> {
        Ok(Route::with_policy(
            &self.policy,
            "GET",
            "/",
            "IndexAction",
            false,
        )?)
    }
}
