//! Route registration and lookup.
//!
//! # Responsibilities
//! - Store bound routes, unique by normalized path
//! - Resolve a path to the first route whose template accepts it
//! - Cache compiled matchers per template
//!
//! # Design Decisions
//! - Readers work on an immutable snapshot (`ArcSwap`), writers replace it,
//!   so binding from any thread never blocks an in-flight lookup
//! - Binding an already-bound path and unbinding an unknown path are silent
//! - Overlapping templates are a configuration error: the first bound wins,
//!   there is no specificity ranking

use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::DashMap;

use crate::error::RoutingError;
use crate::interception::InterceptorRegistry;
use crate::observability::metrics;
use crate::routing::matcher::{CompiledMatcher, PathPattern, PatternError};
use crate::routing::parameters::Parameters;
use crate::routing::route::Route;

/// Thread-safe set of routes in insertion order.
#[derive(Debug)]
pub struct RouteTable {
    routes: ArcSwap<Vec<Route>>,
    matchers: DashMap<String, Arc<CompiledMatcher>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self {
            routes: ArcSwap::from_pointee(Vec::new()),
            matchers: DashMap::new(),
        }
    }

    /// Bind `route` unless its path is already bound.
    /// Returns true when the route was inserted.
    pub fn bind(&self, route: Route) -> bool {
        let mut inserted = false;
        self.routes.rcu(|current| {
            inserted = !current.contains(&route);
            if inserted {
                let mut next = Vec::clone(current);
                next.push(route.clone());
                Arc::new(next)
            } else {
                Arc::clone(current)
            }
        });

        if inserted {
            tracing::debug!(path = %route.path(), destination = %route.factory().name(), "Route bound");
            metrics::record_route_count(self.len());
        } else {
            tracing::debug!(path = %route.path(), "Route already bound, ignoring");
        }
        inserted
    }

    pub fn bind_all<I>(&self, routes: I)
    where
        I: IntoIterator<Item = Route>,
    {
        for route in routes {
            self.bind(route);
        }
    }

    /// Remove the route with the same path. Returns true if one was removed.
    pub fn unbind(&self, route: &Route) -> bool {
        let mut removed = false;
        self.routes.rcu(|current| {
            removed = current.contains(route);
            if removed {
                Arc::new(current.iter().filter(|r| *r != route).cloned().collect::<Vec<_>>())
            } else {
                Arc::clone(current)
            }
        });

        if removed {
            self.matchers.remove(route.path());
            tracing::debug!(path = %route.path(), "Route unbound");
            metrics::record_route_count(self.len());
        }
        removed
    }

    /// Unbind `routes` and drop every interceptor registered for their paths.
    pub fn unbind_all(&self, routes: &[Route], interceptors: &InterceptorRegistry) {
        for route in routes {
            interceptors.unregister_all(route.path());
            self.unbind(route);
        }
    }

    /// Find the route accepting `path` (compared in lower case).
    pub fn resolve(&self, path: &str) -> Option<Route> {
        let normalized = path.to_lowercase();
        let snapshot = self.routes.load();

        snapshot
            .iter()
            .find(|route| match self.matcher(route.path()) {
                Ok(matcher) => matcher.matches(&normalized),
                Err(e) => {
                    tracing::warn!(path = %route.path(), error = %e, "Skipping route with invalid template");
                    false
                }
            })
            .cloned()
    }

    /// Parse the parameters of `path` against `route`'s template.
    pub fn extract(&self, route: &Route, path: &str) -> Result<Option<Parameters>, RoutingError> {
        let matcher = self
            .matcher(route.path())
            .map_err(|e| RoutingError::Unknown(e.to_string()))?;
        matcher.extract(&path.to_lowercase())
    }

    /// Parse the parameters of `path` without failing on packed values that
    /// cannot be split. Only template compilation can fail.
    pub fn extract_lenient(&self, route: &Route, path: &str) -> Result<Option<Parameters>, RoutingError> {
        let matcher = self
            .matcher(route.path())
            .map_err(|e| RoutingError::Unknown(e.to_string()))?;
        Ok(matcher.extract_lenient(&path.to_lowercase()))
    }

    /// Compiled, exact matcher for `template`, memoized.
    pub fn matcher(&self, template: &str) -> Result<Arc<CompiledMatcher>, PatternError> {
        if let Some(cached) = self.matchers.get(template) {
            return Ok(Arc::clone(cached.value()));
        }
        let compiled = Arc::new(PathPattern::compile(template, true)?);
        self.matchers.insert(template.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    pub fn contains(&self, path: &str) -> bool {
        let normalized = path.to_lowercase();
        self.routes.load().iter().any(|route| route.path() == normalized)
    }

    /// Snapshot of the bound routes in insertion order.
    pub fn routes(&self) -> Vec<Route> {
        self.routes.load().as_ref().clone()
    }

    pub fn len(&self) -> usize {
        self.routes.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}
