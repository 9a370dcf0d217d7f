//! Presentation collaborators.
//!
//! The router never renders anything. Dispatch hands a built destination and
//! its [`PresentationOptions`] to a [`Presenter`]; external targets go to an
//! [`ExternalOpener`]. Both run on the UI context.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::RoutingError;
use crate::routing::Destination;

/// Direction of the presentation animation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    #[default]
    None,
    Left,
    Right,
    Up,
    Down,
}

/// How a destination should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationOptions {
    /// Replace the current stack instead of pushing.
    pub replace: bool,
    pub modal: bool,
    /// Embed the destination in a navigation container.
    pub embed: bool,
    /// Modal presentations cannot be dismissed interactively.
    pub prevent_dismissal: bool,
    pub transition: Transition,
}

impl Default for PresentationOptions {
    fn default() -> Self {
        Self {
            replace: false,
            modal: false,
            embed: true,
            prevent_dismissal: false,
            transition: Transition::None,
        }
    }
}

/// Shows destinations.
pub trait Presenter: Send + Sync {
    /// Present `destination`. Fails with [`RoutingError::InactiveSurface`]
    /// when there is nothing to present on.
    fn present(
        &self,
        destination: Box<dyn Destination>,
        options: &PresentationOptions,
    ) -> Result<(), RoutingError>;

    fn dismiss_modal(&self) {}

    fn pop(&self, animated: bool) {
        let _ = animated;
    }
}

/// Opens targets outside the application.
pub trait ExternalOpener: Send + Sync {
    fn can_open(&self, url: &Url) -> bool;

    fn open(&self, url: &Url);
}
