//! Destination names to factories, for routes declared in configuration.

use std::collections::HashMap;

use thiserror::Error;

use crate::config::RouteConfig;
use crate::routing::{DestinationFactory, Routable, Route};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("route `{path}` names unknown destination `{destination}`")]
    UnknownDestination { path: String, destination: String },
}

#[derive(Debug, Default, Clone)]
pub struct DestinationCatalog {
    factories: HashMap<String, DestinationFactory>,
}

impl DestinationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, factory: DestinationFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn register_routable<T: Routable>(&mut self, name: impl Into<String>) {
        self.register(name, DestinationFactory::of::<T>());
    }

    pub fn get(&self, name: &str) -> Option<&DestinationFactory> {
        self.factories.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Turn configured routes into [`Route`]s. Fails on the first unknown
    /// destination.
    pub fn routes_from_config(&self, configs: &[RouteConfig]) -> Result<Vec<Route>, CatalogError> {
        configs
            .iter()
            .map(|config| {
                let factory = self.get(&config.destination).cloned().ok_or_else(|| {
                    CatalogError::UnknownDestination {
                        path: config.path.clone(),
                        destination: config.destination.clone(),
                    }
                })?;
                Ok(Route::with_factory(&config.path, factory)
                    .requires_authentication(config.requires_authentication)
                    .allowed_externally(config.allowed_externally))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{Destination, Parameters};

    #[derive(Debug)]
    struct Promo;

    impl Destination for Promo {}

    impl Routable for Promo {
        fn from_parameters(_: Option<Parameters>) -> Self {
            Promo
        }
    }

    fn config(path: &str, destination: &str) -> RouteConfig {
        RouteConfig {
            path: path.into(),
            destination: destination.into(),
            requires_authentication: false,
            allowed_externally: true,
        }
    }

    #[test]
    fn test_routes_from_config() {
        let mut catalog = DestinationCatalog::new();
        catalog.register_routable::<Promo>("promo");

        let routes = catalog.routes_from_config(&[config("/Promo", "promo")]).unwrap();
        assert_eq!(routes[0].path(), "/promo");
        assert!(!routes[0].is_authentication_required());
        assert!(routes[0].is_allowed_externally());
        assert_eq!(catalog.names(), vec!["promo"]);
    }

    #[test]
    fn test_unknown_destination() {
        let catalog = DestinationCatalog::new();
        let err = catalog.routes_from_config(&[config("/x", "ghost")]).unwrap_err();
        assert_eq!(
            err,
            CatalogError::UnknownDestination {
                path: "/x".into(),
                destination: "ghost".into()
            }
        );
    }
}
