//! Interceptor definitions and the one-shot continuation protocol.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use uuid::Uuid;

use crate::navigation::Navigator;

/// When an interceptor runs relative to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterceptionPoint {
    Before,
    After,
}

impl InterceptionPoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterceptionPoint::Before => "before",
            InterceptionPoint::After => "after",
        }
    }
}

/// Interceptor priority. Higher priorities run first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InterceptionPriority {
    Low,
    Medium,
    High,
    Mandatory,
}

/// Handler invoked with the navigator and the continuation it must resume.
pub type InterceptorHandler = Arc<dyn Fn(&Navigator, Continuation) + Send + Sync>;

/// Logical identity of an interceptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterceptorKey {
    pub path: String,
    pub when: InterceptionPoint,
    pub priority: InterceptionPriority,
    pub requires_authentication: bool,
}

/// A registered interceptor.
#[derive(Clone)]
pub struct Interceptor {
    id: Uuid,
    path: String,
    when: InterceptionPoint,
    priority: InterceptionPriority,
    requires_authentication: bool,
    handler: InterceptorHandler,
}

impl Interceptor {
    pub fn new<F>(
        path: &str,
        when: InterceptionPoint,
        priority: InterceptionPriority,
        requires_authentication: bool,
        handler: F,
    ) -> Self
    where
        F: Fn(&Navigator, Continuation) + Send + Sync + 'static,
    {
        Self {
            id: Uuid::new_v4(),
            path: path.to_string(),
            when,
            priority,
            requires_authentication,
            handler: Arc::new(handler),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn when(&self) -> InterceptionPoint {
        self.when
    }

    pub fn priority(&self) -> InterceptionPriority {
        self.priority
    }

    pub fn requires_authentication(&self) -> bool {
        self.requires_authentication
    }

    pub fn key(&self) -> InterceptorKey {
        InterceptorKey {
            path: self.path.to_lowercase(),
            when: self.when,
            priority: self.priority,
            requires_authentication: self.requires_authentication,
        }
    }

    pub(crate) fn applies_to(&self, path: &str, when: InterceptionPoint) -> bool {
        self.when == when && self.path.to_lowercase() == path.to_lowercase()
    }

    pub(crate) fn invoke(&self, navigator: &Navigator, continuation: Continuation) {
        (self.handler)(navigator, continuation)
    }
}

impl fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("when", &self.when)
            .field("priority", &self.priority)
            .field("requires_authentication", &self.requires_authentication)
            .finish_non_exhaustive()
    }
}

/// One-shot token an interceptor resumes to continue or cancel a navigation.
///
/// Every method consumes the token. Dropping it without resuming counts as a
/// cancel.
pub struct Continuation {
    sender: oneshot::Sender<bool>,
}

impl Continuation {
    pub(crate) fn channel() -> (Continuation, ContinuationSignal) {
        let (sender, receiver) = oneshot::channel();
        (Continuation { sender }, ContinuationSignal { receiver })
    }

    /// Let the navigation continue.
    pub fn proceed(self) {
        self.resume(None);
    }

    /// Stop the navigation.
    pub fn cancel(self) {
        self.resume(Some(true));
    }

    /// Resume with an optional cancel flag; `None` means continue.
    pub fn resume(self, cancel: Option<bool>) {
        let _ = self.sender.send(cancel.unwrap_or(false));
    }
}

impl fmt::Debug for Continuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Continuation")
            .field("resumed", &self.sender.is_closed())
            .finish()
    }
}

/// How a continuation was resumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resumption {
    Proceed,
    Cancel,
    /// The token was dropped without being resumed.
    Abandoned,
    TimedOut,
}

impl Resumption {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Resumption::Proceed => "proceed",
            Resumption::Cancel => "cancel",
            Resumption::Abandoned => "abandoned",
            Resumption::TimedOut => "timed_out",
        }
    }
}

/// Receiving half of a [`Continuation`].
#[derive(Debug)]
pub(crate) struct ContinuationSignal {
    receiver: oneshot::Receiver<bool>,
}

impl ContinuationSignal {
    /// Wait for the continuation, at most `timeout` when given.
    pub(crate) async fn wait(self, timeout: Option<Duration>) -> Resumption {
        let received = match timeout {
            Some(limit) => match tokio::time::timeout(limit, self.receiver).await {
                Ok(received) => received,
                Err(_) => return Resumption::TimedOut,
            },
            None => self.receiver.await,
        };

        match received {
            Ok(false) => Resumption::Proceed,
            Ok(true) => Resumption::Cancel,
            Err(_) => Resumption::Abandoned,
        }
    }
}

/// Continuation handed to the destination of a nested navigation, so that it
/// can resume the navigation whose interceptor started it.
#[derive(Debug)]
pub struct InterceptionFlow {
    continuation: Continuation,
}

impl InterceptionFlow {
    pub fn new(continuation: Continuation) -> Self {
        Self { continuation }
    }

    pub fn proceed(self) {
        self.continuation.proceed();
    }

    pub fn cancel(self) {
        self.continuation.cancel();
    }

    pub fn resume(self, cancel: Option<bool>) {
        self.continuation.resume(cancel);
    }
}

impl From<Continuation> for InterceptionFlow {
    fn from(continuation: Continuation) -> Self {
        Self::new(continuation)
    }
}
