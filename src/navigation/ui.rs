//! The serial UI execution context.
//!
//! # Responsibilities
//! - Run interceptor handlers, dispatch and observer notifications one at a
//!   time, in submission order
//! - Stop when the navigator shuts down
//!
//! # Design Decisions
//! - One task draining an unbounded queue; jobs never interleave
//! - A panicking job is logged and skipped, the context keeps running
//! - Submitting to a stopped context fails with `InactiveSurface`

use std::panic::{catch_unwind, AssertUnwindSafe};

use tokio::sync::{mpsc, oneshot};

use crate::error::RoutingError;
use crate::lifecycle::Shutdown;

type Job = Box<dyn FnOnce() + Send>;

/// Handle on the UI context task.
#[derive(Debug, Clone)]
pub struct UiContext {
    jobs: mpsc::UnboundedSender<Job>,
}

impl UiContext {
    /// Spawn the context task. Must be called inside a tokio runtime.
    pub fn spawn(shutdown: &Shutdown) -> Self {
        let (jobs, mut queue) = mpsc::unbounded_channel::<Job>();
        let mut stop = shutdown.subscribe();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = stop.recv() => {
                        tracing::debug!("UI context stopping");
                        break;
                    }
                    job = queue.recv() => match job {
                        Some(job) => {
                            if catch_unwind(AssertUnwindSafe(job)).is_err() {
                                tracing::error!("UI job panicked");
                            }
                        }
                        None => break,
                    },
                }
            }
        });

        Self { jobs }
    }

    /// Run `job` on the context and wait for its result.
    pub async fn run<F, R>(&self, job: F) -> Result<R, RoutingError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.jobs
            .send(Box::new(move || {
                let _ = tx.send(job());
            }))
            .map_err(|_| RoutingError::InactiveSurface)?;
        rx.await.map_err(|_| RoutingError::InactiveSurface)
    }

    /// Queue `job` without waiting. Returns false if the context is stopped.
    pub fn post<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.jobs.send(Box::new(job)).is_ok()
    }

    pub fn is_active(&self) -> bool {
        !self.jobs.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_jobs_run_in_order() {
        let shutdown = Shutdown::new();
        let ui = UiContext::spawn(&shutdown);
        let log = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let log = Arc::clone(&log);
            assert!(ui.post(move || log.lock().unwrap().push(i)));
        }
        let len = ui.run({
            let log = Arc::clone(&log);
            move || log.lock().unwrap().len()
        })
        .await
        .unwrap();

        assert_eq!(len, 5);
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_panicking_job_does_not_stop_context() {
        let shutdown = Shutdown::new();
        let ui = UiContext::spawn(&shutdown);

        let result: Result<(), _> = ui.run(|| panic!("boom")).await;
        assert_eq!(result, Err(RoutingError::InactiveSurface));
        assert_eq!(ui.run(|| 7).await, Ok(7));
    }

    #[tokio::test]
    async fn test_stopped_context_is_inactive() {
        let shutdown = Shutdown::new();
        let ui = UiContext::spawn(&shutdown);
        shutdown.trigger();

        for _ in 0..100 {
            if !ui.is_active() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(!ui.is_active());
        assert_eq!(ui.run(|| 1).await, Err(RoutingError::InactiveSurface));
    }
}
