//! Interception subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (any thread):
//!     Interceptor { path, when, priority, requires_authentication, handler }
//!     → registry.rs (append to snapshot)
//!
//! Navigation (pipeline):
//!     registry.chain_for(route path, Before | After)
//!     → ordered chain
//!     → for each interceptor: handler(navigator, Continuation)
//!     → wait for proceed / cancel
//! ```
//!
//! # Design Decisions
//! - Chains are ordered by priority, then by authentication requirement,
//!   then by registration order
//! - A continuation is consumed when resumed, so it can only resume once
//! - A continuation dropped without being resumed cancels the navigation
//! - Interceptors are keyed by route template, not by the concrete path

pub mod interceptor;
pub mod registry;

pub use interceptor::{
    Continuation, InterceptionFlow, InterceptionPoint, InterceptionPriority, Interceptor,
    InterceptorHandler, InterceptorKey,
};
pub use registry::InterceptorRegistry;
