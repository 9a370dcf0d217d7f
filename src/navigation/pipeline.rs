//! The navigation pipeline.
//!
//! # Data Flow
//! ```text
//! navigate(path, options)
//!     → Resolving          (external target? route lookup, callback hand-off)
//!     → Validating         (extract + check declared parameters)
//!     → Authorizing        (gate check; login then restart from Resolving)
//!     → BeforeIntercepting (ordered chain, one continuation at a time)
//!     → Dispatching        (UI context: build, attach flow, present, notify)
//!     → AfterIntercepting  (ordered chain, cancel stops the rest)
//!     → Done
//! ```
//!
//! # Design Decisions
//! - One tokio task per navigation; handlers and dispatch hop onto the UI
//!   context, waiting for continuations and logins never does
//! - The chain is a `Vec` walked in a loop
//! - A before-cancel ends the navigation silently, it is not an error
//! - Failures go to the error reporter verbatim and are never retried

use std::sync::Arc;
use std::time::{Duration, Instant};

use url::Url;
use uuid::Uuid;

use crate::error::RoutingError;
use crate::interception::interceptor::Resumption;
use crate::interception::{Continuation, InterceptionPoint};
use crate::navigation::navigator::Navigator;
use crate::navigation::request::{NavigationOptions, NavigationOutcome, NavigationRequest};
use crate::observability::metrics;
use crate::routing::{check_parameters, Parameters, Route};
use crate::security::AuthenticationGate;

/// Pipeline states, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolving,
    Validating,
    Authorizing,
    BeforeIntercepting,
    Dispatching,
    AfterIntercepting,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Resolving => "resolving",
            Stage::Validating => "validating",
            Stage::Authorizing => "authorizing",
            Stage::BeforeIntercepting => "before_intercepting",
            Stage::Dispatching => "dispatching",
            Stage::AfterIntercepting => "after_intercepting",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChainResult {
    Completed,
    Cancelled,
}

/// Run one navigation to its terminal state, then report and record it.
pub(crate) async fn drive(
    navigator: Navigator,
    id: Uuid,
    path: String,
    mut options: NavigationOptions,
) -> NavigationOutcome {
    let started = Instant::now();
    let outcome = run(&navigator, id, &path, &mut options).await;

    match &outcome {
        NavigationOutcome::Failed(error) => navigator.error_reporter().report(&path, error),
        NavigationOutcome::Presented { path: template } => {
            tracing::info!(
                route = %template,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Navigation complete"
            );
        }
        other => tracing::debug!(outcome = other.label(), "Navigation finished"),
    }
    metrics::record_navigation(outcome.label(), started);

    // An unconsumed flow is dropped here, which cancels the outer navigation.
    outcome
}

async fn run(
    navigator: &Navigator,
    id: Uuid,
    path: &str,
    options: &mut NavigationOptions,
) -> NavigationOutcome {
    let config = navigator.config();
    let mut restarts = 0u32;

    loop {
        tracing::debug!(stage = Stage::Resolving.as_str(), restarts, "Resolving");
        if !path.starts_with('/') {
            return open_external(navigator, path).await;
        }

        let Some(route) = navigator.table().resolve(path) else {
            return unmatched(navigator, path);
        };

        if options.externally && !route.is_allowed_externally() {
            tracing::debug!(route = %route.path(), "Route not allowed externally, ignoring");
            return NavigationOutcome::Ignored;
        }

        tracing::debug!(stage = Stage::Validating.as_str(), route = %route.path(), "Validating");
        let parameters = match validate(navigator, &route, path) {
            Ok(parameters) => parameters,
            Err(e) => return fail(Stage::Validating, e),
        };

        if route.is_authentication_required() {
            tracing::debug!(stage = Stage::Authorizing.as_str(), "Authorizing");
            let Some(gate) = navigator.authentication() else {
                return fail(Stage::Authorizing, RoutingError::Unauthorized);
            };
            if !gate.is_authenticated() {
                if restarts >= config.max_authentication_restarts {
                    tracing::warn!(restarts, "Still unauthenticated after login");
                    return fail(Stage::Authorizing, RoutingError::Unauthorized);
                }
                restarts += 1;
                if !login(gate.as_ref(), config.login_timeout_ms).await {
                    return fail(Stage::Authorizing, RoutingError::Unauthorized);
                }
                tracing::info!(restarts, "Login finished, restarting navigation");
                continue;
            }
        }

        if !options.skip_before_interceptors {
            tracing::debug!(stage = Stage::BeforeIntercepting.as_str(), "Running before interceptors");
            let result = run_chain(navigator, &route, InterceptionPoint::Before).await;
            if result == ChainResult::Cancelled {
                tracing::info!(route = %route.path(), "Navigation cancelled by interceptor");
                return NavigationOutcome::Cancelled;
            }
        }

        if options.externally && config.external_navigation_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.external_navigation_delay_ms)).await;
        }

        let request = NavigationRequest {
            id,
            original_path: path.to_string(),
            route: route.clone(),
            parameters,
            presentation: options.presentation(),
            externally: options.externally,
            flow: options.interception_flow.take(),
        };

        tracing::debug!(stage = Stage::Dispatching.as_str(), "Dispatching");
        if let Err(e) = dispatch(navigator, request).await {
            return fail(Stage::Dispatching, e);
        }

        tracing::debug!(stage = Stage::AfterIntercepting.as_str(), "Running after interceptors");
        if run_chain(navigator, &route, InterceptionPoint::After).await == ChainResult::Cancelled {
            tracing::debug!(route = %route.path(), "After chain cancelled");
        }

        return NavigationOutcome::Presented {
            path: route.path().to_string(),
        };
    }
}

fn fail(stage: Stage, error: RoutingError) -> NavigationOutcome {
    tracing::debug!(stage = stage.as_str(), kind = error.kind(), "Navigation failed");
    NavigationOutcome::Failed(error)
}

/// No route matched: offer the path to the gate as a callback.
fn unmatched(navigator: &Navigator, path: &str) -> NavigationOutcome {
    if let Some(gate) = navigator.authentication() {
        if gate.can_handle_callback(path) {
            tracing::info!(path = %path, "Handing path to authentication callback");
            let target = path.to_string();
            tokio::spawn(async move {
                gate.handle_callback(&target).await;
            });
            return NavigationOutcome::CallbackHandled;
        }
    }
    fail(
        Stage::Resolving,
        RoutingError::NonRegisteredRoute(path.to_string()),
    )
}

/// Extract the route's parameters and check them against its declaration.
/// Routes that declare nothing get whatever could be extracted.
pub(crate) fn validate(
    navigator: &Navigator,
    route: &Route,
    path: &str,
) -> Result<Option<Parameters>, RoutingError> {
    let required = route.required_parameters();
    if required.is_empty() {
        let extracted = navigator.table().extract_lenient(route, path)?;
        return Ok(extracted.filter(|parameters| !parameters.is_empty()));
    }

    let extracted = navigator
        .table()
        .extract(route, path)?
        .filter(|parameters| !parameters.is_empty());
    check_parameters(required, extracted.as_ref())?;
    Ok(extracted)
}

async fn open_external(navigator: &Navigator, target: &str) -> NavigationOutcome {
    let url = match Url::parse(target) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!(external = %target, error = %e, "Not a URL, ignoring");
            return NavigationOutcome::Ignored;
        }
    };
    let Some(opener) = navigator.external_opener() else {
        tracing::debug!(external = %target, "No external opener configured");
        return NavigationOutcome::Ignored;
    };

    let opened = navigator
        .ui()
        .run(move || {
            if opener.can_open(&url) {
                opener.open(&url);
                true
            } else {
                false
            }
        })
        .await;

    match opened {
        Ok(true) => {
            tracing::info!(external = %target, "Opened externally");
            NavigationOutcome::OpenedExternally
        }
        Ok(false) => NavigationOutcome::Ignored,
        Err(e) => fail(Stage::Resolving, e),
    }
}

/// Wait for `gate.login()`. Returns false if it timed out.
async fn login(gate: &dyn AuthenticationGate, timeout_ms: Option<u64>) -> bool {
    match timeout_ms {
        Some(ms) => {
            let finished = tokio::time::timeout(Duration::from_millis(ms), gate.login())
                .await
                .is_ok();
            if !finished {
                tracing::warn!(timeout_ms = ms, "Login timed out");
            }
            finished
        }
        None => {
            gate.login().await;
            true
        }
    }
}

async fn run_chain(navigator: &Navigator, route: &Route, when: InterceptionPoint) -> ChainResult {
    let chain = navigator.interceptors().chain_for(route.path(), when);
    if chain.is_empty() {
        return ChainResult::Completed;
    }
    let config = navigator.config();
    let timeout = config.interceptor_timeout_ms.map(Duration::from_millis);

    for interceptor in chain {
        if interceptor.requires_authentication() {
            if let Some(gate) = navigator.authentication() {
                if !gate.is_authenticated() && !login(gate.as_ref(), config.login_timeout_ms).await {
                    metrics::record_interceptor(when.as_str(), Resumption::TimedOut.as_str());
                    return ChainResult::Cancelled;
                }
            }
        }

        let (continuation, signal) = Continuation::channel();
        let handler_navigator = navigator.clone();
        let target = Arc::clone(&interceptor);
        if let Err(e) = navigator
            .ui()
            .run(move || target.invoke(&handler_navigator, continuation))
            .await
        {
            tracing::warn!(interceptor = %interceptor.id(), error = %e, "Interceptor could not run");
        }

        let resumption = signal.wait(timeout).await;
        metrics::record_interceptor(when.as_str(), resumption.as_str());
        match resumption {
            Resumption::Proceed => {
                tracing::debug!(interceptor = %interceptor.id(), when = when.as_str(), "Interceptor proceeded");
            }
            Resumption::Cancel => {
                tracing::debug!(interceptor = %interceptor.id(), when = when.as_str(), "Interceptor cancelled");
                return ChainResult::Cancelled;
            }
            Resumption::Abandoned | Resumption::TimedOut => {
                tracing::warn!(
                    interceptor = %interceptor.id(),
                    when = when.as_str(),
                    result = resumption.as_str(),
                    "Interceptor never resumed, cancelling"
                );
                return ChainResult::Cancelled;
            }
        }
    }

    ChainResult::Completed
}

async fn dispatch(navigator: &Navigator, request: NavigationRequest) -> Result<(), RoutingError> {
    let presenter = navigator.presenter().ok_or(RoutingError::InactiveSurface)?;
    let observer = navigator.observer();
    let NavigationRequest {
        id,
        route,
        parameters,
        presentation,
        flow,
        ..
    } = request;

    navigator
        .ui()
        .run(move || -> Result<(), RoutingError> {
            let mut destination = route.factory().build(parameters);
            if let Some(flow) = flow {
                destination.attach_interception_flow(flow);
            }
            presenter.present(destination, &presentation)?;
            tracing::debug!(navigation = %id, route = %route.path(), "Presented");
            if let Some(observer) = observer {
                observer.did_navigate(route.path());
            }
            Ok(())
        })
        .await?
}
