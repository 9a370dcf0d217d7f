//! Routing error definitions.

use thiserror::Error;

/// Errors that terminate a navigation.
///
/// Every variant is reported to the configured
/// [`ErrorReporter`](crate::observability::reporting::ErrorReporter) and
/// surfaced as [`NavigationOutcome::Failed`](crate::navigation::NavigationOutcome::Failed).
/// None of them is retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoutingError {
    /// The route requires authentication and no gate is available.
    #[error("authentication required")]
    Unauthorized,

    /// No template matches the path and no callback handler claimed it.
    #[error("unregistered path: {0}")]
    NonRegisteredRoute(String),

    /// Declared and supplied parameter names differ.
    #[error("{0}")]
    MissingParameters(String),

    /// The presentation layer has nowhere to present.
    #[error("no active presentation surface")]
    InactiveSurface,

    /// Unexpected failure, mostly while parsing parameters.
    #[error("{0}")]
    Unknown(String),
}

impl RoutingError {
    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            RoutingError::Unauthorized => "unauthorized",
            RoutingError::NonRegisteredRoute(_) => "non_registered_route",
            RoutingError::MissingParameters(_) => "missing_parameters",
            RoutingError::InactiveSurface => "inactive_surface",
            RoutingError::Unknown(_) => "unknown",
        }
    }
}
