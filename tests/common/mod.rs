//! Shared collaborators and destinations for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use navigation_router::config::NavigationConfig;
use navigation_router::observability::{ErrorReporter, GlobalObserver};
use navigation_router::{
    AuthenticationGate, Destination, DestinationFactory, ExternalOpener, InterceptionFlow,
    Navigator, Parameters, PresentationOptions, Presenter, Routable, RoutingError,
};

// Destinations

#[derive(Debug)]
pub struct View2A;

impl Destination for View2A {}

impl Routable for View2A {
    fn from_parameters(_: Option<Parameters>) -> Self {
        View2A
    }
}

/// Requires exactly `id` and `show`.
#[derive(Debug)]
pub struct View2C {
    pub parameters: Parameters,
}

impl Destination for View2C {}

impl Routable for View2C {
    fn required_parameters() -> Option<&'static [&'static str]> {
        Some(&["id", "show"])
    }

    fn from_parameters(parameters: Option<Parameters>) -> Self {
        Self {
            parameters: parameters.unwrap_or_default(),
        }
    }
}

/// Accepts any parameters.
#[derive(Debug)]
pub struct Profile {
    pub parameters: Option<Parameters>,
}

impl Destination for Profile {}

impl Routable for Profile {
    fn from_parameters(parameters: Option<Parameters>) -> Self {
        Self { parameters }
    }
}

pub type FlowSlot = Arc<Mutex<Option<InterceptionFlow>>>;

/// Keeps the flow it receives in a shared slot so the test can resume it.
#[derive(Debug)]
pub struct FlowHolder {
    slot: FlowSlot,
}

impl Destination for FlowHolder {
    fn attach_interception_flow(&mut self, flow: InterceptionFlow) {
        *self.slot.lock().unwrap() = Some(flow);
    }
}

pub fn flow_holder_factory(slot: &FlowSlot) -> DestinationFactory {
    let slot = Arc::clone(slot);
    DestinationFactory::from_fn("flow-holder", &[], move |_| {
        Box::new(FlowHolder {
            slot: Arc::clone(&slot),
        })
    })
}

// Collaborators

pub struct RecordingPresenter {
    active: AtomicBool,
    presented: Mutex<Vec<(Box<dyn Destination>, PresentationOptions)>>,
    dismissals: AtomicUsize,
    pops: AtomicUsize,
}

impl RecordingPresenter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            active: AtomicBool::new(true),
            presented: Mutex::new(Vec::new()),
            dismissals: AtomicUsize::new(0),
            pops: AtomicUsize::new(0),
        })
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.presented.lock().unwrap().len()
    }

    /// Run `f` on the most recently presented destination if it is a `T`.
    pub fn with_last<T: Destination, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let presented = self.presented.lock().unwrap();
        presented
            .last()
            .and_then(|(destination, _)| destination.downcast_ref::<T>())
            .map(f)
    }

    pub fn last_options(&self) -> Option<PresentationOptions> {
        self.presented.lock().unwrap().last().map(|(_, options)| *options)
    }

    pub fn dismissals(&self) -> usize {
        self.dismissals.load(Ordering::SeqCst)
    }

    pub fn pops(&self) -> usize {
        self.pops.load(Ordering::SeqCst)
    }
}

impl Presenter for RecordingPresenter {
    fn present(
        &self,
        destination: Box<dyn Destination>,
        options: &PresentationOptions,
    ) -> Result<(), RoutingError> {
        if !self.active.load(Ordering::SeqCst) {
            return Err(RoutingError::InactiveSurface);
        }
        self.presented.lock().unwrap().push((destination, *options));
        Ok(())
    }

    fn dismiss_modal(&self) {
        self.dismissals.fetch_add(1, Ordering::SeqCst);
    }

    fn pop(&self, _animated: bool) {
        self.pops.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct MockGate {
    authenticated: AtomicBool,
    login_grants: bool,
    login_delay: Option<Duration>,
    login_calls: AtomicUsize,
    callback_prefix: Option<String>,
    callbacks: Mutex<Vec<String>>,
}

impl MockGate {
    pub fn authenticated() -> Self {
        Self::with_state(true, true)
    }

    /// Unauthenticated; `login_grants` decides whether login authenticates.
    pub fn unauthenticated(login_grants: bool) -> Self {
        Self::with_state(false, login_grants)
    }

    fn with_state(authenticated: bool, login_grants: bool) -> Self {
        Self {
            authenticated: AtomicBool::new(authenticated),
            login_grants,
            login_delay: None,
            login_calls: AtomicUsize::new(0),
            callback_prefix: None,
            callbacks: Mutex::new(Vec::new()),
        }
    }

    pub fn login_delay(mut self, delay: Duration) -> Self {
        self.login_delay = Some(delay);
        self
    }

    pub fn handles_callbacks(mut self, prefix: &str) -> Self {
        self.callback_prefix = Some(prefix.to_string());
        self
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn callbacks(&self) -> Vec<String> {
        self.callbacks.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthenticationGate for MockGate {
    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    async fn login(&self) {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.login_delay {
            tokio::time::sleep(delay).await;
        }
        if self.login_grants {
            self.authenticated.store(true, Ordering::SeqCst);
        }
    }

    async fn logout(&self) {
        self.authenticated.store(false, Ordering::SeqCst);
    }

    fn can_handle_callback(&self, target: &str) -> bool {
        self.callback_prefix
            .as_deref()
            .map(|prefix| target.starts_with(prefix))
            .unwrap_or(false)
    }

    async fn handle_callback(&self, target: &str) {
        self.callbacks.lock().unwrap().push(target.to_string());
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<(String, RoutingError)>>,
}

impl RecordingReporter {
    pub fn reports(&self) -> Vec<(String, RoutingError)> {
        self.reports.lock().unwrap().clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, path: &str, error: &RoutingError) {
        self.reports
            .lock()
            .unwrap()
            .push((path.to_string(), error.clone()));
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    paths: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl GlobalObserver for RecordingObserver {
    fn did_navigate(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

pub struct RecordingOpener {
    accepts: bool,
    opened: Mutex<Vec<String>>,
}

impl RecordingOpener {
    pub fn new(accepts: bool) -> Arc<Self> {
        Arc::new(Self {
            accepts,
            opened: Mutex::new(Vec::new()),
        })
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl ExternalOpener for RecordingOpener {
    fn can_open(&self, _url: &Url) -> bool {
        self.accepts
    }

    fn open(&self, url: &Url) {
        self.opened.lock().unwrap().push(url.to_string());
    }
}

// Harness

/// Navigation settings with short delays.
pub fn fast_config() -> NavigationConfig {
    NavigationConfig {
        external_navigation_delay_ms: 10,
        ..NavigationConfig::default()
    }
}

pub struct Harness {
    pub navigator: Navigator,
    pub presenter: Arc<RecordingPresenter>,
    pub reporter: Arc<RecordingReporter>,
    pub observer: Arc<RecordingObserver>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(fast_config())
    }

    pub fn with_config(config: NavigationConfig) -> Self {
        let presenter = RecordingPresenter::new();
        let reporter = Arc::new(RecordingReporter::default());
        let observer = Arc::new(RecordingObserver::default());
        let navigator = Navigator::builder()
            .config(config)
            .presenter(presenter.clone())
            .error_reporter(reporter.clone())
            .observer(observer.clone())
            .build();
        Self {
            navigator,
            presenter,
            reporter,
            observer,
        }
    }

    pub fn with_gate(self, gate: Arc<MockGate>) -> Self {
        self.navigator.set_authentication_gate(Some(gate));
        self
    }
}

/// Poll `condition` for up to a second.
pub async fn eventually<F: Fn() -> bool>(condition: F) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
