//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation pipeline produces:
//!     → logging.rs (structured events inside a per-navigation span)
//!     → metrics.rs (outcome counters, duration histogram, route gauge)
//!     → reporting.rs (ErrorReporter for failures, GlobalObserver for
//!       successful dispatches)
//!
//! Consumers:
//!     → Log output (stdout via tracing-subscriber)
//!     → Whatever metrics recorder the host application installs
//!     → Application-provided reporter / observer
//! ```
//!
//! # Design Decisions
//! - Navigation id flows through every event of a navigation via its span
//! - The library never installs a metrics exporter
//! - Errors reach the reporter verbatim; reporting never retries

pub mod logging;
pub mod metrics;
pub mod reporting;

pub use reporting::{ErrorReporter, GlobalObserver, TracingErrorReporter};
