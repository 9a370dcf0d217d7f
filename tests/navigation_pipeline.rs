//! End-to-end tests for resolving, validating, authorizing and dispatching.

use std::sync::Arc;
use std::time::Duration;

use navigation_router::config::NavigationConfig;
use navigation_router::{
    NavigationOptions, NavigationOutcome, Navigator, Route, RoutingError, Transition,
};

mod common;
use common::{eventually, fast_config, Harness, MockGate, Profile, RecordingOpener, View2A, View2C};

#[tokio::test]
async fn test_packed_parameters_reach_destination() {
    let h = Harness::new();
    h.navigator
        .bind(Route::new::<View2C>("/view2C/:id:show").requires_authentication(false));

    let outcome = h.navigator.navigate("/view2c/id=5:show=true").outcome().await;

    assert_eq!(
        outcome,
        NavigationOutcome::Presented {
            path: "/view2c/:id:show".into()
        }
    );
    let (id, show) = h
        .presenter
        .with_last(|view: &View2C| (view.parameters["id"].clone(), view.parameters["show"].clone()))
        .unwrap();
    assert_eq!(id, "5");
    assert_eq!(show, "true");
    assert_eq!(h.observer.paths(), vec!["/view2c/:id:show"]);
    assert!(h.reporter.reports().is_empty());
}

#[tokio::test]
async fn test_positional_parameters_without_declaration() {
    let h = Harness::new();
    h.navigator
        .bind(Route::new::<Profile>("/users/:uid").requires_authentication(false));
    h.navigator
        .bind(Route::new::<Profile>("/about").requires_authentication(false));

    h.navigator.navigate("/Users/42").outcome().await;
    let uid = h
        .presenter
        .with_last(|p: &Profile| p.parameters.as_ref().map(|p| p["uid"].clone()))
        .unwrap();
    assert_eq!(uid.as_deref(), Some("42"));

    h.navigator.navigate("/about").outcome().await;
    assert_eq!(h.presenter.with_last(|p: &Profile| p.parameters.is_none()), Some(true));
}

#[tokio::test]
async fn test_unregistered_route_is_reported() {
    let h = Harness::new();

    let outcome = h.navigator.navigate("/nope").outcome().await;

    let expected = RoutingError::NonRegisteredRoute("/nope".into());
    assert_eq!(outcome, NavigationOutcome::Failed(expected.clone()));
    assert_eq!(h.reporter.reports(), vec![("/nope".to_string(), expected)]);
    assert_eq!(h.presenter.count(), 0);
}

#[tokio::test]
async fn test_parameter_contract_is_strict() {
    let h = Harness::new();
    h.navigator
        .bind(Route::new::<View2C>("/view2c/:id:show").requires_authentication(false));

    let missing = h.navigator.navigate("/view2c/id=5").outcome().await;
    match missing.error() {
        Some(RoutingError::MissingParameters(message)) => assert!(message.contains("show")),
        other => panic!("unexpected outcome: {:?}", other),
    }

    let extra = h
        .navigator
        .navigate("/view2c/id=5:show=true:extra=1")
        .outcome()
        .await;
    match extra.error() {
        Some(RoutingError::MissingParameters(message)) => assert!(message.contains("extra")),
        other => panic!("unexpected outcome: {:?}", other),
    }

    assert_eq!(h.presenter.count(), 0);
    assert_eq!(h.reporter.reports().len(), 2);
}

#[tokio::test]
async fn test_malformed_packed_value_is_unknown() {
    let h = Harness::new();
    h.navigator
        .bind(Route::new::<View2C>("/view2c/:id:show").requires_authentication(false));

    let outcome = h.navigator.navigate("/view2c/id=5:show").outcome().await;
    assert!(matches!(outcome, NavigationOutcome::Failed(RoutingError::Unknown(_))));
}

#[tokio::test]
async fn test_packed_template_without_declared_parameters_passes_value_through() {
    let h = Harness::new();
    h.navigator
        .bind(Route::new::<Profile>("/items/:id:show").requires_authentication(false));

    let outcome = h.navigator.navigate("/items/foo").outcome().await;

    assert_eq!(
        outcome,
        NavigationOutcome::Presented {
            path: "/items/:id:show".into()
        }
    );
    let raw = h
        .presenter
        .with_last(|p: &Profile| p.parameters.as_ref().map(|p| p["id:show"].clone()))
        .unwrap();
    assert_eq!(raw.as_deref(), Some("foo"));

    h.navigator.navigate("/items/id=5:show=true").outcome().await;
    let id = h
        .presenter
        .with_last(|p: &Profile| p.parameters.as_ref().map(|p| p["id"].clone()))
        .unwrap();
    assert_eq!(id.as_deref(), Some("5"));
    assert!(h.reporter.reports().is_empty());
}

#[tokio::test]
async fn test_authenticated_route_without_gate_is_unauthorized() {
    let h = Harness::new();
    h.navigator.bind(Route::new::<View2A>("/view2a"));

    let outcome = h.navigator.navigate("/view2a").outcome().await;

    assert_eq!(outcome, NavigationOutcome::Failed(RoutingError::Unauthorized));
    assert_eq!(h.presenter.count(), 0);
}

#[tokio::test]
async fn test_login_restarts_navigation() {
    let gate = Arc::new(MockGate::unauthenticated(true));
    let h = Harness::new().with_gate(gate.clone());
    h.navigator.bind(Route::new::<View2A>("/view2a"));

    let outcome = h.navigator.navigate("/view2a").outcome().await;

    assert!(outcome.is_presented());
    assert_eq!(gate.login_calls(), 1);
    assert_eq!(h.presenter.count(), 1);
}

#[tokio::test]
async fn test_failed_logins_are_bounded() {
    let gate = Arc::new(MockGate::unauthenticated(false));
    let config = NavigationConfig {
        max_authentication_restarts: 2,
        ..fast_config()
    };
    let h = Harness::with_config(config).with_gate(gate.clone());
    h.navigator.bind(Route::new::<View2A>("/view2a"));

    let outcome = h.navigator.navigate("/view2a").outcome().await;

    assert_eq!(outcome, NavigationOutcome::Failed(RoutingError::Unauthorized));
    assert_eq!(gate.login_calls(), 2);
}

#[tokio::test]
async fn test_login_timeout_is_unauthorized() {
    let gate = Arc::new(MockGate::unauthenticated(true).login_delay(Duration::from_secs(5)));
    let config = NavigationConfig {
        login_timeout_ms: Some(20),
        ..fast_config()
    };
    let h = Harness::with_config(config).with_gate(gate);
    h.navigator.bind(Route::new::<View2A>("/view2a"));

    let outcome = h.navigator.navigate("/view2a").outcome().await;
    assert_eq!(outcome, NavigationOutcome::Failed(RoutingError::Unauthorized));
}

#[tokio::test]
async fn test_external_navigation_respects_route() {
    let h = Harness::new();
    h.navigator.bind(Route::new::<View2A>("/internal").requires_authentication(false));
    h.navigator.bind(
        Route::new::<View2A>("/promo")
            .requires_authentication(false)
            .allowed_externally(true),
    );

    let ignored = h
        .navigator
        .navigate_with("/internal", NavigationOptions::default().externally(true))
        .outcome()
        .await;
    assert_eq!(ignored, NavigationOutcome::Ignored);
    assert_eq!(h.presenter.count(), 0);
    assert!(h.reporter.reports().is_empty());

    let presented = h
        .navigator
        .navigate_with("/promo", NavigationOptions::default().externally(true))
        .outcome()
        .await;
    assert!(presented.is_presented());
}

#[tokio::test]
async fn test_presentation_options_are_forwarded() {
    let h = Harness::new();
    h.navigator.bind(Route::new::<View2A>("/view2a").requires_authentication(false));

    let options = NavigationOptions::default()
        .modal(true)
        .embed(false)
        .transition(Transition::Left);
    h.navigator.navigate_with("/view2a", options).outcome().await;

    let presented = h.presenter.last_options().unwrap();
    assert!(presented.modal);
    assert!(!presented.embed);
    assert_eq!(presented.transition, Transition::Left);
}

#[tokio::test]
async fn test_unmatched_callback_goes_to_gate() {
    let gate = Arc::new(MockGate::authenticated().handles_callbacks("/oauth"));
    let h = Harness::new().with_gate(gate.clone());

    let outcome = h.navigator.navigate("/oauth/callback?code=1").outcome().await;

    assert_eq!(outcome, NavigationOutcome::CallbackHandled);
    assert!(eventually(|| gate.callbacks() == vec!["/oauth/callback?code=1".to_string()]).await);
    assert!(h.reporter.reports().is_empty());
}

#[tokio::test]
async fn test_external_targets_use_opener() {
    let h = Harness::new();
    let opener = RecordingOpener::new(true);
    h.navigator.set_external_opener(Some(opener.clone()));

    let outcome = h.navigator.navigate("https://example.com/help").outcome().await;
    assert_eq!(outcome, NavigationOutcome::OpenedExternally);
    assert_eq!(opener.opened(), vec!["https://example.com/help"]);

    h.navigator.set_external_opener(Some(RecordingOpener::new(false)));
    let refused = h.navigator.navigate("https://example.com/help").outcome().await;
    assert_eq!(refused, NavigationOutcome::Ignored);

    let garbage = h.navigator.navigate("not a url").outcome().await;
    assert_eq!(garbage, NavigationOutcome::Ignored);
}

#[tokio::test]
async fn test_missing_presenter_is_inactive_surface() {
    let navigator = Navigator::builder().config(fast_config()).build();
    navigator.bind(Route::new::<View2A>("/view2a").requires_authentication(false));

    let outcome = navigator.navigate("/view2a").outcome().await;
    assert_eq!(outcome, NavigationOutcome::Failed(RoutingError::InactiveSurface));
}

#[tokio::test]
async fn test_presenter_without_surface() {
    let h = Harness::new();
    h.navigator.bind(Route::new::<View2A>("/view2a").requires_authentication(false));
    h.presenter.set_active(false);

    let outcome = h.navigator.navigate("/view2a").outcome().await;

    assert_eq!(outcome, NavigationOutcome::Failed(RoutingError::InactiveSurface));
    assert!(h.observer.paths().is_empty());
}

#[tokio::test]
async fn test_shutdown_stops_dispatch() {
    let h = Harness::new();
    h.navigator.bind(Route::new::<View2A>("/view2a").requires_authentication(false));

    h.navigator.shutdown();
    assert!(h.navigator.is_shut_down());
    tokio::time::sleep(Duration::from_millis(10)).await;

    let outcome = h.navigator.navigate("/view2a").outcome().await;
    assert_eq!(outcome, NavigationOutcome::Failed(RoutingError::InactiveSurface));
}

#[tokio::test]
async fn test_dismiss_and_pop_reach_presenter() {
    let h = Harness::new();

    h.navigator.dismiss_modal();
    h.navigator.pop(true);

    assert!(eventually(|| h.presenter.dismissals() == 1 && h.presenter.pops() == 1).await);
}

#[tokio::test]
async fn test_logout_goes_through_gate() {
    let gate = Arc::new(MockGate::authenticated());
    let h = Harness::new().with_gate(gate);

    assert!(h.navigator.is_authenticated());
    h.navigator.logout().await;
    assert!(!h.navigator.is_authenticated());
}
