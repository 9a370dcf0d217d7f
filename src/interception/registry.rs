//! Interceptor storage and chain ordering.

use std::cmp::Reverse;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::interception::interceptor::{InterceptionPoint, Interceptor};

/// Thread-safe list of interceptors in registration order.
#[derive(Debug)]
pub struct InterceptorRegistry {
    interceptors: ArcSwap<Vec<Arc<Interceptor>>>,
}

impl InterceptorRegistry {
    pub fn new() -> Self {
        Self {
            interceptors: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Append an interceptor. Duplicates are allowed.
    pub fn register(&self, interceptor: Interceptor) {
        tracing::debug!(
            path = %interceptor.path(),
            when = interceptor.when().as_str(),
            priority = ?interceptor.priority(),
            "Interceptor registered"
        );
        let interceptor = Arc::new(interceptor);
        self.interceptors.rcu(|current| {
            let mut next = Vec::clone(current);
            next.push(Arc::clone(&interceptor));
            next
        });
    }

    /// Append an interceptor unless one with the same key is registered.
    /// Returns true when it was added.
    pub fn register_unique(&self, interceptor: Interceptor) -> bool {
        let key = interceptor.key();
        let interceptor = Arc::new(interceptor);
        let mut added = false;
        self.interceptors.rcu(|current| {
            added = !current.iter().any(|existing| existing.key() == key);
            let mut next = Vec::clone(current);
            if added {
                next.push(Arc::clone(&interceptor));
            }
            next
        });

        if !added {
            tracing::debug!(path = %key.path, "Interceptor already registered, ignoring");
        }
        added
    }

    /// Remove every interceptor registered for `path`, any point or priority.
    /// Returns how many were removed.
    pub fn unregister_all(&self, path: &str) -> usize {
        let normalized = path.to_lowercase();
        let mut removed = 0;
        self.interceptors.rcu(|current| {
            let next: Vec<_> = current
                .iter()
                .filter(|interceptor| interceptor.path().to_lowercase() != normalized)
                .cloned()
                .collect();
            removed = current.len() - next.len();
            next
        });

        if removed > 0 {
            tracing::debug!(path = %path, removed, "Interceptors removed");
        }
        removed
    }

    /// Interceptors for `path` at `when`, in execution order.
    ///
    /// Higher priority first. Within a priority, interceptors that do not
    /// require authentication come first. Ties keep registration order.
    pub fn chain_for(&self, path: &str, when: InterceptionPoint) -> Vec<Arc<Interceptor>> {
        let mut chain: Vec<_> = self
            .interceptors
            .load()
            .iter()
            .filter(|interceptor| interceptor.applies_to(path, when))
            .cloned()
            .collect();
        chain.sort_by_key(|interceptor| {
            (Reverse(interceptor.priority()), interceptor.requires_authentication())
        });
        chain
    }

    pub fn len(&self) -> usize {
        self.interceptors.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InterceptorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
