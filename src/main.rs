//! navigation-router CLI
//!
//! Loads a route manifest and exercises the router against it.
//!
//! ```text
//! navigation-router --config routes.toml routes
//! navigation-router --config routes.toml check /users/42 --externally
//! navigation-router --config routes.toml navigate /users/42 --authenticated
//! ```
//!
//! Every destination named in the manifest is bound to a generic
//! `ManifestDestination`; presenting one logs it.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use serde_json::json;

use navigation_router::config::loader::load_config;
use navigation_router::modules::DestinationCatalog;
use navigation_router::observability::{logging, metrics};
use navigation_router::routing::PathPattern;
use navigation_router::{
    AuthenticationGate, Destination, DestinationFactory, InterceptionFlow, NavigationOptions,
    NavigationOutcome, Navigator, Parameters, PresentationOptions, Presenter, RouterConfig,
    RoutingError,
};

#[derive(Parser)]
#[command(name = "navigation-router")]
#[command(about = "Inspect and exercise a navigation route manifest", long_about = None)]
struct Cli {
    /// Route manifest (TOML). Without one the router starts empty.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Treat the user as logged in.
    #[arg(long, global = true)]
    authenticated: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List bound routes
    Routes,
    /// Check whether a path can be navigated to
    Check {
        path: String,
        #[arg(long)]
        externally: bool,
    },
    /// Run a navigation and print its outcome
    Navigate {
        path: String,
        #[arg(long)]
        externally: bool,
    },
}

#[derive(Debug)]
struct ManifestDestination {
    destination: String,
    parameters: Option<Parameters>,
}

impl Destination for ManifestDestination {
    fn attach_interception_flow(&mut self, flow: InterceptionFlow) {
        flow.proceed();
    }
}

struct LoggingPresenter;

impl Presenter for LoggingPresenter {
    fn present(
        &self,
        destination: Box<dyn Destination>,
        options: &PresentationOptions,
    ) -> Result<(), RoutingError> {
        match destination.downcast_ref::<ManifestDestination>() {
            Some(manifest) => tracing::info!(
                destination = %manifest.destination,
                parameters = ?manifest.parameters,
                modal = options.modal,
                transition = ?options.transition,
                "Presenting"
            ),
            None => tracing::info!(destination = ?destination, "Presenting"),
        }
        Ok(())
    }
}

/// Gate with a fixed answer; login never changes it.
struct StaticGate;

#[async_trait]
impl AuthenticationGate for StaticGate {
    fn is_authenticated(&self) -> bool {
        true
    }

    async fn login(&self) {}
}

fn catalog_for(config: &RouterConfig) -> DestinationCatalog {
    let names: BTreeSet<&str> = config.routes.iter().map(|r| r.destination.as_str()).collect();

    let mut catalog = DestinationCatalog::new();
    for name in names {
        let destination = name.to_string();
        catalog.register(
            name,
            DestinationFactory::from_fn(name, &[], move |parameters| {
                Box::new(ManifestDestination {
                    destination: destination.clone(),
                    parameters,
                })
            }),
        );
    }
    catalog
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    logging::init_logging(&config.observability);
    metrics::set_enabled(config.observability.metrics_enabled);

    tracing::info!(
        routes = config.routes.len(),
        external_navigation_delay_ms = config.navigation.external_navigation_delay_ms,
        "navigation-router v0.1.0 starting"
    );

    let mut builder = Navigator::builder()
        .config(config.navigation.clone())
        .presenter(Arc::new(LoggingPresenter));
    if cli.authenticated {
        builder = builder.authentication(Arc::new(StaticGate));
    }
    let navigator = builder.build();

    let routes = catalog_for(&config).routes_from_config(&config.routes)?;
    navigator.bind_all(routes);

    match cli.command {
        Commands::Routes => {
            let listing: Vec<_> = navigator
                .routes()
                .iter()
                .map(|route| {
                    let (pattern, parameters) = match PathPattern::compile(route.path(), true) {
                        Ok(m) => (
                            m.pattern().to_string(),
                            m.parameter_names().iter().map(|s| s.to_string()).collect(),
                        ),
                        Err(_) => (String::new(), Vec::<String>::new()),
                    };
                    json!({
                        "path": route.path(),
                        "pattern": pattern,
                        "destination": route.factory().name(),
                        "requires_authentication": route.is_authentication_required(),
                        "allowed_externally": route.is_allowed_externally(),
                        "parameters": parameters,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        Commands::Check { path, externally } => {
            let allowed = navigator.can_navigate(&path, externally);
            println!("{}", json!({ "path": path, "externally": externally, "navigable": allowed }));
        }
        Commands::Navigate { path, externally } => {
            let options = NavigationOptions::default().externally(externally);
            let outcome = navigator.navigate_with(&path, options).outcome().await;
            println!("{}", json!({ "path": path, "outcome": outcome.label() }));
            if let NavigationOutcome::Failed(error) = outcome {
                navigator.shutdown();
                return Err(Box::new(error) as Box<dyn std::error::Error>);
            }
        }
    }

    navigator.shutdown();
    tracing::info!("Shutdown complete");
    Ok(())
}
