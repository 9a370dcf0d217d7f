//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Route or interceptor requiring authentication:
//!     → gate.is_authenticated()
//!     → false: gate.login() awaited off the UI context
//!     → route: restart the navigation / interceptor: run its handler
//!
//! Unmatched path:
//!     → gate.can_handle_callback(path)
//!     → true: gate.handle_callback(path) in the background
//! ```
//!
//! # Design Decisions
//! - Fail closed: a route requiring authentication without a gate is refused
//! - The gate is a collaborator; the router stores no credentials

pub mod authentication;

pub use authentication::AuthenticationGate;
