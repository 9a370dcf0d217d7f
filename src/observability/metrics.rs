//! Metrics collection.
//!
//! # Metrics
//! - `navigation_router_navigations_total` (counter): navigations by outcome
//! - `navigation_router_navigation_duration_seconds` (histogram): time from
//!   `navigate` to the terminal state
//! - `navigation_router_interceptors_total` (counter): interceptor runs by
//!   point and result
//! - `navigation_router_routes` (gauge): bound routes
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - Recording can be switched off from configuration

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(true);

/// Turn recording on or off process-wide.
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Record a finished navigation.
pub fn record_navigation(outcome: &'static str, started: Instant) {
    if !is_enabled() {
        return;
    }
    ::metrics::counter!("navigation_router_navigations_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("navigation_router_navigation_duration_seconds")
        .record(started.elapsed().as_secs_f64());
}

/// Record one interceptor run.
pub fn record_interceptor(when: &'static str, result: &'static str) {
    if !is_enabled() {
        return;
    }
    ::metrics::counter!(
        "navigation_router_interceptors_total",
        "when" => when,
        "result" => result
    )
    .increment(1);
}

pub fn record_route_count(count: usize) {
    if !is_enabled() {
        return;
    }
    ::metrics::gauge!("navigation_router_routes").set(count as f64);
}
