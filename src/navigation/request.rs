//! Navigation requests, options and outcomes.

use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::RoutingError;
use crate::interception::InterceptionFlow;
use crate::presentation::{PresentationOptions, Transition};
use crate::routing::{Parameters, Route};

/// Per-navigation options.
#[derive(Debug)]
pub struct NavigationOptions {
    pub replace: bool,
    /// The navigation comes from outside the application (a link, a push).
    pub externally: bool,
    pub embed: bool,
    pub modal: bool,
    pub prevent_dismissal: bool,
    pub transition: Transition,
    /// Continuation of the navigation that started this one.
    pub interception_flow: Option<InterceptionFlow>,
    pub skip_before_interceptors: bool,
}

impl NavigationOptions {
    pub fn replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    pub fn externally(mut self, externally: bool) -> Self {
        self.externally = externally;
        self
    }

    pub fn embed(mut self, embed: bool) -> Self {
        self.embed = embed;
        self
    }

    pub fn modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    pub fn prevent_dismissal(mut self, prevent: bool) -> Self {
        self.prevent_dismissal = prevent;
        self
    }

    pub fn transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    pub fn with_flow(mut self, flow: impl Into<InterceptionFlow>) -> Self {
        self.interception_flow = Some(flow.into());
        self
    }

    pub fn skip_before_interceptors(mut self, skip: bool) -> Self {
        self.skip_before_interceptors = skip;
        self
    }

    pub fn presentation(&self) -> PresentationOptions {
        PresentationOptions {
            replace: self.replace,
            modal: self.modal,
            embed: self.embed,
            prevent_dismissal: self.prevent_dismissal,
            transition: self.transition,
        }
    }
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            replace: false,
            externally: false,
            embed: true,
            modal: false,
            prevent_dismissal: false,
            transition: Transition::None,
            interception_flow: None,
            skip_before_interceptors: false,
        }
    }
}

/// A resolved and validated navigation, ready for dispatch.
#[derive(Debug)]
pub struct NavigationRequest {
    pub id: Uuid,
    pub original_path: String,
    pub route: Route,
    pub parameters: Option<Parameters>,
    pub presentation: PresentationOptions,
    pub externally: bool,
    pub flow: Option<InterceptionFlow>,
}

/// Terminal state of a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The destination was presented; `path` is the route template.
    Presented { path: String },
    /// A before-interceptor cancelled.
    Cancelled,
    Failed(RoutingError),
    /// The target was handed to the external opener.
    OpenedExternally,
    /// The authentication gate took the path as a callback.
    CallbackHandled,
    /// Nothing to do: external navigation to an internal-only route, or an
    /// external target nobody can open.
    Ignored,
}

impl NavigationOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            NavigationOutcome::Presented { .. } => "presented",
            NavigationOutcome::Cancelled => "cancelled",
            NavigationOutcome::Failed(_) => "failed",
            NavigationOutcome::OpenedExternally => "opened_externally",
            NavigationOutcome::CallbackHandled => "callback_handled",
            NavigationOutcome::Ignored => "ignored",
        }
    }

    pub fn is_presented(&self) -> bool {
        matches!(self, NavigationOutcome::Presented { .. })
    }

    pub fn error(&self) -> Option<&RoutingError> {
        match self {
            NavigationOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Handle on a running navigation.
///
/// Dropping the handle does not stop the navigation.
#[derive(Debug)]
pub struct NavigationHandle {
    id: Uuid,
    task: JoinHandle<NavigationOutcome>,
}

impl NavigationHandle {
    pub(crate) fn new(id: Uuid, task: JoinHandle<NavigationOutcome>) -> Self {
        Self { id, task }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the navigation to reach its terminal state.
    pub async fn outcome(self) -> NavigationOutcome {
        self.task
            .await
            .unwrap_or_else(|e| NavigationOutcome::Failed(RoutingError::Unknown(e.to_string())))
    }
}
