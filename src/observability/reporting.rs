//! Error reporting and navigation observation hooks.

use crate::error::RoutingError;

/// Receives every navigation failure.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, path: &str, error: &RoutingError);
}

/// Notified after each successful dispatch with the route template path.
pub trait GlobalObserver: Send + Sync {
    fn did_navigate(&self, path: &str);
}

/// Default reporter: logs failures.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, path: &str, error: &RoutingError) {
        match error {
            RoutingError::Unknown(_) | RoutingError::InactiveSurface => {
                tracing::error!(path = %path, kind = error.kind(), error = %error, "Navigation failed");
            }
            _ => {
                tracing::warn!(path = %path, kind = error.kind(), error = %error, "Navigation failed");
            }
        }
    }
}
