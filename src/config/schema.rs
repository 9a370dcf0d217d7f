//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the navigation router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Pipeline timing and authentication limits.
    pub navigation: NavigationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Routes bound at startup, resolved through the destination catalog.
    pub routes: Vec<RouteConfig>,
}

/// Navigation pipeline settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct NavigationConfig {
    /// Delay before dispatching an external navigation.
    pub external_navigation_delay_ms: u64,

    /// Longest wait for an interceptor to resume its continuation.
    /// A stalled interceptor counts as a cancel. Unset means wait forever.
    pub interceptor_timeout_ms: Option<u64>,

    /// Longest wait for a login to finish. Unset means wait forever.
    pub login_timeout_ms: Option<u64>,

    /// How many times one navigation may restart after a login.
    pub max_authentication_restarts: u32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            external_navigation_delay_ms: 1000,
            interceptor_timeout_ms: None,
            login_timeout_ms: None,
            max_authentication_restarts: 3,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Record navigation metrics.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}

/// A route declared in configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Route template, e.g. `/users/:id`.
    pub path: String,

    /// Catalog name of the destination to build.
    pub destination: String,

    #[serde(default = "default_true")]
    pub requires_authentication: bool,

    #[serde(default)]
    pub allowed_externally: bool,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: RouterConfig = toml::from_str("").unwrap();
        assert_eq!(config.navigation.external_navigation_delay_ms, 1000);
        assert_eq!(config.navigation.max_authentication_restarts, 3);
        assert!(config.navigation.interceptor_timeout_ms.is_none());
        assert_eq!(config.observability.log_level, "info");
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_route_defaults() {
        let config: RouterConfig = toml::from_str(
            r#"
            [navigation]
            interceptor_timeout_ms = 250

            [[routes]]
            path = "/home"
            destination = "home"

            [[routes]]
            path = "/promo"
            destination = "promo"
            requires_authentication = false
            allowed_externally = true
            "#,
        )
        .unwrap();

        assert_eq!(config.navigation.interceptor_timeout_ms, Some(250));
        assert!(config.routes[0].requires_authentication);
        assert!(!config.routes[0].allowed_externally);
        assert!(!config.routes[1].requires_authentication);
        assert!(config.routes[1].allowed_externally);
    }
}
