//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (navigator builder):
//!     Config → Tables → UI context task → Modules register routes
//!
//! Shutdown (shutdown.rs):
//!     navigator.shutdown() → broadcast → UI context stops
//!     → later dispatches fail with InactiveSurface
//! ```
//!
//! # Design Decisions
//! - One broadcast channel per navigator, no global state
//! - In-flight navigations are not aborted; they fail at their next UI job

pub mod shutdown;

pub use shutdown::Shutdown;
