//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation path ("/view2C/id=5:show=true")
//!     → lower-cased
//!     → table.rs (first bound route whose template matches)
//!     → matcher.rs (extract parameters from the path)
//!     → parameters.rs (declared names vs supplied names)
//!     → route.rs (DestinationFactory builds the destination)
//!
//! Template compilation (lazy, per template):
//!     "/view2c/:id:show"
//!     → tokens (literal text, placeholders)
//!     → anchored regex, cached by the table
//! ```
//!
//! # Design Decisions
//! - Paths and templates are compared in lower case
//! - Routes are unique by normalized template
//! - First bound match wins
//! - Destinations are built through type-erased factories

pub mod matcher;
pub mod parameters;
pub mod route;
pub mod table;

pub use matcher::{CompiledMatcher, PathPattern, PatternError};
pub use parameters::{check_parameters, ParameterMismatch, Parameters};
pub use route::{AsAny, Destination, DestinationFactory, Routable, Route};
pub use table::RouteTable;
