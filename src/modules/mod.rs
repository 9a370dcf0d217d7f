//! Feature modules and the destination catalog.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     ModuleRegistry (explicit list)
//!     → module.setup(navigator)
//!     → module.register_routes(navigator)
//!     → module.register_interceptors(navigator)
//!
//! Configuration:
//!     [[routes]] entries
//!     → catalog.rs (destination name → factory)
//!     → Route values bound on the navigator
//! ```
//!
//! # Design Decisions
//! - Modules are listed explicitly; nothing is discovered at runtime
//! - Loading happens once per registry

pub mod catalog;
pub mod registry;

pub use catalog::{CatalogError, DestinationCatalog};
pub use registry::{ModuleRegistry, RoutableModule};
