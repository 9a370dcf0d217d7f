//! Authentication gate.

use async_trait::async_trait;

/// Decides whether the user is authenticated and drives login.
///
/// `login` resolves once the login flow has finished, whatever its result;
/// the pipeline re-checks [`is_authenticated`](AuthenticationGate::is_authenticated)
/// afterwards by restarting the navigation.
#[async_trait]
pub trait AuthenticationGate: Send + Sync {
    fn is_authenticated(&self) -> bool;

    async fn login(&self);

    async fn logout(&self) {}

    /// Whether an unmatched path is an authentication callback this gate
    /// handles (OAuth redirects and the like).
    fn can_handle_callback(&self, target: &str) -> bool {
        let _ = target;
        false
    }

    async fn handle_callback(&self, target: &str) {
        let _ = target;
    }
}
