//! The router API.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::config::NavigationConfig;
use crate::interception::{
    Continuation, InterceptionPoint, InterceptionPriority, Interceptor, InterceptorRegistry,
};
use crate::lifecycle::Shutdown;
use crate::navigation::pipeline;
use crate::navigation::request::{NavigationHandle, NavigationOptions};
use crate::navigation::ui::UiContext;
use crate::observability::{ErrorReporter, GlobalObserver, TracingErrorReporter};
use crate::presentation::{ExternalOpener, Presenter};
use crate::routing::{Destination, Route, RouteTable};
use crate::security::AuthenticationGate;

type Slot<T> = RwLock<Option<Arc<T>>>;

fn read_slot<T: ?Sized>(slot: &Slot<T>) -> Option<Arc<T>> {
    slot.read().unwrap_or_else(PoisonError::into_inner).clone()
}

fn write_slot<T: ?Sized>(slot: &Slot<T>, value: Option<Arc<T>>) {
    *slot.write().unwrap_or_else(PoisonError::into_inner) = value;
}

struct RouterCore {
    routes: RouteTable,
    interceptors: InterceptorRegistry,
    presenter: Slot<dyn Presenter>,
    authentication: Slot<dyn AuthenticationGate>,
    error_reporter: Slot<dyn ErrorReporter>,
    observer: Slot<dyn GlobalObserver>,
    external_opener: Slot<dyn ExternalOpener>,
    config: NavigationConfig,
    ui: UiContext,
    shutdown: Shutdown,
}

/// Owns the route table, the interceptors and the collaborators, and starts
/// navigations.
///
/// Cloning is cheap; clones share everything.
#[derive(Clone)]
pub struct Navigator {
    core: Arc<RouterCore>,
}

impl Navigator {
    pub fn builder() -> NavigatorBuilder {
        NavigatorBuilder::default()
    }

    /// Navigator with default settings and no collaborators.
    /// Must be called inside a tokio runtime.
    pub fn new() -> Self {
        Self::builder().build()
    }

    // Routes

    pub fn bind(&self, route: Route) -> bool {
        self.core.routes.bind(route)
    }

    pub fn bind_all<I>(&self, routes: I)
    where
        I: IntoIterator<Item = Route>,
    {
        self.core.routes.bind_all(routes);
    }

    pub fn unbind(&self, route: &Route) -> bool {
        self.core.routes.unbind(route)
    }

    /// Unbind `routes` and every interceptor registered for them.
    pub fn unbind_all(&self, routes: &[Route]) {
        self.core.routes.unbind_all(routes, &self.core.interceptors);
    }

    pub fn routes(&self) -> Vec<Route> {
        self.core.routes.routes()
    }

    // Interceptors

    pub fn intercept<F>(
        &self,
        path: &str,
        when: InterceptionPoint,
        priority: InterceptionPriority,
        requires_authentication: bool,
        handler: F,
    ) where
        F: Fn(&Navigator, Continuation) + Send + Sync + 'static,
    {
        self.core.interceptors.register(Interceptor::new(
            path,
            when,
            priority,
            requires_authentication,
            handler,
        ));
    }

    /// Like [`intercept`](Self::intercept), unless an interceptor with the
    /// same path, point, priority and authentication requirement exists.
    pub fn intercept_unique<F>(
        &self,
        path: &str,
        when: InterceptionPoint,
        priority: InterceptionPriority,
        requires_authentication: bool,
        handler: F,
    ) -> bool
    where
        F: Fn(&Navigator, Continuation) + Send + Sync + 'static,
    {
        self.core.interceptors.register_unique(Interceptor::new(
            path,
            when,
            priority,
            requires_authentication,
            handler,
        ))
    }

    pub fn remove_interceptors(&self, path: &str) -> usize {
        self.core.interceptors.unregister_all(path)
    }

    // Navigation

    pub fn navigate(&self, path: &str) -> NavigationHandle {
        self.navigate_with(path, NavigationOptions::default())
    }

    /// Start a navigation and return immediately.
    pub fn navigate_with(&self, path: &str, options: NavigationOptions) -> NavigationHandle {
        let id = Uuid::new_v4();
        let span = tracing::info_span!(
            "navigation",
            id = %id,
            path = %path,
            externally = options.externally
        );
        tracing::debug!(parent: &span, "Navigation requested");

        let task = tokio::spawn(
            pipeline::drive(self.clone(), id, path.to_string(), options).instrument(span),
        );
        NavigationHandle::new(id, task)
    }

    /// Whether navigating to `path` could currently succeed, without running
    /// any interceptor.
    pub fn can_navigate(&self, path: &str, externally: bool) -> bool {
        if !path.starts_with('/') {
            return match (Url::parse(path), self.external_opener()) {
                (Ok(url), Some(opener)) => opener.can_open(&url),
                _ => false,
            };
        }

        let Some(route) = self.core.routes.resolve(path) else {
            return self
                .authentication()
                .map(|gate| gate.can_handle_callback(path))
                .unwrap_or(false);
        };

        if externally && !route.is_allowed_externally() {
            return false;
        }
        !(route.is_authentication_required() && self.authentication().is_none())
    }

    /// Build the destination for `path` without presenting it.
    ///
    /// Returns `None` when no route matches or the parameters do not satisfy
    /// the destination.
    pub fn destination_for(&self, path: &str) -> Option<Box<dyn Destination>> {
        let route = self.core.routes.resolve(path)?;
        match pipeline::validate(self, &route, path) {
            Ok(parameters) => Some(route.factory().build(parameters)),
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "No destination");
                None
            }
        }
    }

    // Presentation

    pub fn dismiss_modal(&self) {
        if let Some(presenter) = self.presenter() {
            if !self.core.ui.post(move || presenter.dismiss_modal()) {
                tracing::debug!("UI context stopped, dismiss ignored");
            }
        }
    }

    pub fn pop(&self, animated: bool) {
        if let Some(presenter) = self.presenter() {
            if !self.core.ui.post(move || presenter.pop(animated)) {
                tracing::debug!("UI context stopped, pop ignored");
            }
        }
    }

    // Authentication

    /// Without a gate the user counts as authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.authentication()
            .map(|gate| gate.is_authenticated())
            .unwrap_or(true)
    }

    pub async fn logout(&self) {
        if let Some(gate) = self.authentication() {
            gate.logout().await;
        }
    }

    // Collaborators

    pub fn set_presenter(&self, presenter: Option<Arc<dyn Presenter>>) {
        write_slot(&self.core.presenter, presenter);
    }

    pub fn set_authentication_gate(&self, gate: Option<Arc<dyn AuthenticationGate>>) {
        write_slot(&self.core.authentication, gate);
    }

    pub fn set_error_reporter(&self, reporter: Option<Arc<dyn ErrorReporter>>) {
        write_slot(&self.core.error_reporter, reporter);
    }

    pub fn set_observer(&self, observer: Option<Arc<dyn GlobalObserver>>) {
        write_slot(&self.core.observer, observer);
    }

    pub fn set_external_opener(&self, opener: Option<Arc<dyn ExternalOpener>>) {
        write_slot(&self.core.external_opener, opener);
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.core.config
    }

    // Lifecycle

    /// Stop the UI context. Navigations still running fail at dispatch.
    pub fn shutdown(&self) {
        tracing::info!("Navigator shutting down");
        self.core.shutdown.trigger();
    }

    pub fn is_shut_down(&self) -> bool {
        self.core.shutdown.is_triggered()
    }

    pub(crate) fn table(&self) -> &RouteTable {
        &self.core.routes
    }

    pub(crate) fn interceptors(&self) -> &InterceptorRegistry {
        &self.core.interceptors
    }

    pub(crate) fn ui(&self) -> &UiContext {
        &self.core.ui
    }

    pub(crate) fn presenter(&self) -> Option<Arc<dyn Presenter>> {
        read_slot(&self.core.presenter)
    }

    pub(crate) fn authentication(&self) -> Option<Arc<dyn AuthenticationGate>> {
        read_slot(&self.core.authentication)
    }

    pub(crate) fn observer(&self) -> Option<Arc<dyn GlobalObserver>> {
        read_slot(&self.core.observer)
    }

    pub(crate) fn external_opener(&self) -> Option<Arc<dyn ExternalOpener>> {
        read_slot(&self.core.external_opener)
    }

    pub(crate) fn error_reporter(&self) -> Arc<dyn ErrorReporter> {
        read_slot(&self.core.error_reporter).unwrap_or_else(|| Arc::new(TracingErrorReporter))
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("routes", &self.core.routes.len())
            .field("interceptors", &self.core.interceptors.len())
            .field("config", &self.core.config)
            .finish_non_exhaustive()
    }
}

/// Assembles a [`Navigator`].
#[derive(Default)]
pub struct NavigatorBuilder {
    config: NavigationConfig,
    presenter: Option<Arc<dyn Presenter>>,
    authentication: Option<Arc<dyn AuthenticationGate>>,
    error_reporter: Option<Arc<dyn ErrorReporter>>,
    observer: Option<Arc<dyn GlobalObserver>>,
    external_opener: Option<Arc<dyn ExternalOpener>>,
}

impl NavigatorBuilder {
    pub fn config(mut self, config: NavigationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn presenter(mut self, presenter: Arc<dyn Presenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    pub fn authentication(mut self, gate: Arc<dyn AuthenticationGate>) -> Self {
        self.authentication = Some(gate);
        self
    }

    pub fn error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.error_reporter = Some(reporter);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn GlobalObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn external_opener(mut self, opener: Arc<dyn ExternalOpener>) -> Self {
        self.external_opener = Some(opener);
        self
    }

    /// Spawn the UI context and build the navigator.
    /// Must be called inside a tokio runtime.
    pub fn build(self) -> Navigator {
        let shutdown = Shutdown::new();
        let ui = UiContext::spawn(&shutdown);

        tracing::debug!(
            external_navigation_delay_ms = self.config.external_navigation_delay_ms,
            max_authentication_restarts = self.config.max_authentication_restarts,
            "Navigator ready"
        );

        Navigator {
            core: Arc::new(RouterCore {
                routes: RouteTable::new(),
                interceptors: InterceptorRegistry::new(),
                presenter: RwLock::new(self.presenter),
                authentication: RwLock::new(self.authentication),
                error_reporter: RwLock::new(self.error_reporter),
                observer: RwLock::new(self.observer),
                external_opener: RwLock::new(self.external_opener),
                config: self.config,
                ui,
                shutdown,
            }),
        }
    }
}
