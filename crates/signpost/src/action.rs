//! Handler capability and name registry.
//!
//! A [`Route`](crate::Route) resolves to a handler *name*; the behavior
//! behind that name lives in the embedding application. The [`Action`]
//! trait is the capability a named handler must expose, and the
//! [`HandlerRegistry`] is the symbol space used when route validation is
//! configured to existence-check handler names.

use std::collections::HashMap;
use std::fmt;

/// A named, externally resolved behavior a route ultimately points to.
///
/// The routing core never calls `execute`; it only resolves names. The
/// embedding application produces an `Action` from the resolved name and
/// invokes it.
pub trait Action {
    /// Run the handler's side effect.
    fn execute(&mut self);
}

type ActionFactory = Box<dyn Fn() -> Box<dyn Action> + Send + Sync>;

/// Registry mapping handler names to [`Action`] factories.
///
/// Injected via [`RoutePolicy`](crate::RoutePolicy) to turn the syntactic
/// action-name check into an existence check: a name validates only if it
/// is registered here.
#[derive(Default)]
pub struct HandlerRegistry {
    factories: HashMap<String, ActionFactory>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a factory under a handler name.
    pub fn register<F, A>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> A + Send + Sync + 'static,
        A: Action + 'static,
    {
        self.factories
            .insert(name.into(), Box::new(move || Box::new(factory())));
    }

    /// Whether a handler with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Produce a fresh handler instance for a registered name.
    pub fn produce(&self, name: &str) -> Option<Box<dyn Action>> {
        self.factories.get(name).map(|factory| factory())
    }

    /// Names of all registered handlers, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

// Manual Debug because the stored factories are closures.
impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
