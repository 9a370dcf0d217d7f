//! Routes and the destinations they build.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::interception::InterceptionFlow;
use crate::routing::parameters::Parameters;

/// Object-safe access to `Any` for trait objects.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Something the presentation layer can show.
pub trait Destination: AsAny + Send + fmt::Debug {
    /// Receives the flow of the navigation that caused this one.
    ///
    /// Resuming the flow lets the outer navigation continue. Dropping it
    /// cancels the outer navigation, which is what this default does.
    fn attach_interception_flow(&mut self, flow: InterceptionFlow) {
        drop(flow);
    }
}

impl dyn Destination {
    pub fn downcast_ref<T: Destination>(&self) -> Option<&T> {
        <dyn Destination as AsAny>::as_any(self).downcast_ref::<T>()
    }

    pub fn is<T: Destination>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }
}

/// A destination type constructible from navigation parameters.
pub trait Routable: Destination + Sized {
    /// Parameter names the path must supply, no more and no fewer.
    fn required_parameters() -> Option<&'static [&'static str]> {
        None
    }

    fn from_parameters(parameters: Option<Parameters>) -> Self;
}

type BuildFn = dyn Fn(Option<Parameters>) -> Box<dyn Destination> + Send + Sync;

/// Type-erased constructor for a destination.
#[derive(Clone)]
pub struct DestinationFactory {
    name: String,
    required: Vec<String>,
    build: Arc<BuildFn>,
}

impl DestinationFactory {
    /// Factory for a [`Routable`] type.
    pub fn of<T: Routable>() -> Self {
        let required = T::required_parameters()
            .unwrap_or_default()
            .iter()
            .map(|name| name.to_string())
            .collect();
        Self {
            name: std::any::type_name::<T>().to_string(),
            required,
            build: Arc::new(|parameters| Box::new(T::from_parameters(parameters))),
        }
    }

    /// Factory backed by a closure.
    pub fn from_fn<F>(name: impl Into<String>, required: &[&str], build: F) -> Self
    where
        F: Fn(Option<Parameters>) -> Box<dyn Destination> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            required: required.iter().map(|name| name.to_string()).collect(),
            build: Arc::new(build),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameter names, empty when the destination declares none.
    pub fn required_parameters(&self) -> &[String] {
        &self.required
    }

    pub fn build(&self, parameters: Option<Parameters>) -> Box<dyn Destination> {
        (self.build)(parameters)
    }
}

impl fmt::Debug for DestinationFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DestinationFactory")
            .field("name", &self.name)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// A registered route.
///
/// Equality and hashing only consider the normalized path, so a route table
/// never holds two routes for the same template.
#[derive(Debug, Clone)]
pub struct Route {
    path: String,
    requires_authentication: bool,
    allowed_externally: bool,
    factory: DestinationFactory,
}

impl Route {
    /// Route to a [`Routable`] type. Requires authentication and is not
    /// allowed externally until configured otherwise.
    pub fn new<T: Routable>(path: &str) -> Self {
        Self::with_factory(path, DestinationFactory::of::<T>())
    }

    pub fn with_factory(path: &str, factory: DestinationFactory) -> Self {
        Self {
            path: path.to_lowercase(),
            requires_authentication: true,
            allowed_externally: false,
            factory,
        }
    }

    pub fn requires_authentication(mut self, required: bool) -> Self {
        self.requires_authentication = required;
        self
    }

    pub fn allowed_externally(mut self, allowed: bool) -> Self {
        self.allowed_externally = allowed;
        self
    }

    /// The normalized (lower-case) template.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_authentication_required(&self) -> bool {
        self.requires_authentication
    }

    pub fn is_allowed_externally(&self) -> bool {
        self.allowed_externally
    }

    pub fn factory(&self) -> &DestinationFactory {
        &self.factory
    }

    pub fn required_parameters(&self) -> &[String] {
        self.factory.required_parameters()
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Route {}

impl Hash for Route {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}
