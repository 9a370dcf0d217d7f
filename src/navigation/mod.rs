//! Navigation subsystem.
//!
//! # Data Flow
//! ```text
//! Caller (any thread)
//!     → navigator.rs  navigate(path, options) → NavigationHandle
//!     → pipeline.rs   one task per navigation (span: id, path)
//!         → RouteTable / InterceptorRegistry / AuthenticationGate
//!         → ui.rs     handlers, dispatch, observer (serialized)
//!         → Presenter
//!     → NavigationOutcome (awaitable through the handle)
//! ```
//!
//! # Design Decisions
//! - Every navigator owns its tables; nothing is global
//! - `navigate` never blocks; the outcome is observable but optional
//! - Collaborators can be swapped at runtime

pub mod navigator;
pub mod pipeline;
pub mod request;
pub mod ui;

pub use navigator::{Navigator, NavigatorBuilder};
pub use pipeline::Stage;
pub use request::{NavigationHandle, NavigationOptions, NavigationOutcome, NavigationRequest};
pub use ui::UiContext;
