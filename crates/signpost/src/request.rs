//! Request boundary: server variables feeding the router.
//!
//! The core never parses raw HTTP. The embedding transport exposes the
//! current request through [`RequestSource`], and the router reads exactly
//! two variables from it: the request method and the request URI.

use std::collections::HashMap;

/// Server variable holding the HTTP method of the current request.
pub const REQUEST_METHOD: &str = "REQUEST_METHOD";

/// Server variable holding the URI of the current request.
pub const REQUEST_URI: &str = "REQUEST_URI";

/// Source of server variables for the current request.
pub trait RequestSource {
    /// Look up a server variable by name.
    fn server_var(&self, name: &str) -> Option<&str>;
}

/// Map-backed [`RequestSource`] for embedders and tests.
#[derive(Debug, Clone, Default)]
pub struct ServerVars {
    vars: HashMap<String, String>,
}

impl ServerVars {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    /// Convenience constructor carrying just the two variables the router
    /// reads.
    pub fn for_request(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::new()
            .with_var(REQUEST_METHOD, method)
            .with_var(REQUEST_URI, uri)
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl RequestSource for ServerVars {
    fn server_var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}
