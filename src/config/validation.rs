//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check route templates are well formed and compile
//! - Detect routes that collapse to the same normalized path
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::routing::PathPattern;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("route `{0}` must start with `/`")]
    RelativePath(String),

    #[error("route `{0}` has a placeholder without a name")]
    EmptyPlaceholder(String),

    #[error("route `{0}` is declared more than once")]
    DuplicatePath(String),

    #[error("route `{0}` has no destination")]
    MissingDestination(String),

    #[error("route `{path}` does not compile: {reason}")]
    InvalidTemplate { path: String, reason: String },

    #[error("unknown log level `{0}`")]
    UnknownLogLevel(String),
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for route in &config.routes {
        if !route.path.starts_with('/') {
            errors.push(ValidationError::RelativePath(route.path.clone()));
        }
        if PathPattern::has_empty_placeholder(&route.path) {
            errors.push(ValidationError::EmptyPlaceholder(route.path.clone()));
        } else if let Err(e) = PathPattern::compile(&route.path.to_lowercase(), true) {
            errors.push(ValidationError::InvalidTemplate {
                path: route.path.clone(),
                reason: e.to_string(),
            });
        }
        if !seen.insert(route.path.to_lowercase()) {
            errors.push(ValidationError::DuplicatePath(route.path.clone()));
        }
        if route.destination.trim().is_empty() {
            errors.push(ValidationError::MissingDestination(route.path.clone()));
        }
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouteConfig;

    fn route(path: &str, destination: &str) -> RouteConfig {
        RouteConfig {
            path: path.to_string(),
            destination: destination.to_string(),
            requires_authentication: true,
            allowed_externally: false,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        let config = RouterConfig {
            routes: vec![route("/home", "home"), route("/view2C/:id:show", "packed")],
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let config = RouterConfig {
            routes: vec![
                route("home", "home"),
                route("/users/:", "users"),
                route("/a", "a"),
                route("/A", "a"),
                route("/b", " "),
            ],
            ..Default::default()
        };

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::RelativePath("home".into()),
                ValidationError::EmptyPlaceholder("/users/:".into()),
                ValidationError::DuplicatePath("/A".into()),
                ValidationError::MissingDestination("/b".into()),
            ]
        );
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut config = RouterConfig::default();
        config.observability.log_level = "loud".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::UnknownLogLevel("loud".into())]);
    }
}
