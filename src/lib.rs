//! In-process navigation router.
//!
//! Resolves symbolic paths such as `/view2C/id=5:show=true` to registered
//! destinations, checks their parameters and authentication requirements,
//! runs priority-ordered interceptor chains that can suspend or cancel a
//! navigation, and hands the result to a presentation layer.

pub mod config;
pub mod error;
pub mod interception;
pub mod lifecycle;
pub mod modules;
pub mod navigation;
pub mod observability;
pub mod presentation;
pub mod routing;
pub mod security;

pub use config::schema::RouterConfig;
pub use error::RoutingError;
pub use interception::{Continuation, InterceptionFlow, InterceptionPoint, InterceptionPriority};
pub use lifecycle::Shutdown;
pub use navigation::{NavigationHandle, NavigationOptions, NavigationOutcome, Navigator};
pub use presentation::{ExternalOpener, PresentationOptions, Presenter, Transition};
pub use routing::{Destination, DestinationFactory, Parameters, Routable, Route};
pub use security::AuthenticationGate;
