//! Navigation outside a browser.

use crate::providers::{Location, Navigator};
use crate::routes::Route;
use std::sync::{Arc, Mutex, PoisonError};

/// Origin client routes resolve against when none is given.
pub const DEFAULT_APP_ORIGIN: &str = "http://localhost:3000";

/// Navigator for hosts without a browser.
///
/// Remembers where the user was last sent and logs every move. The
/// remembered address doubles as the current [`Location`], so a command
/// line host can hand an OAuth callback URL to [`HeadlessNavigator::visit`]
/// and read the token back through [`crate::oauth::oauth_token`]. Client
/// routes are recorded as absolute URLs under the app origin.
#[derive(Debug, Clone)]
pub struct HeadlessNavigator {
    origin: String,
    current: Arc<Mutex<Option<String>>>,
}

impl Default for HeadlessNavigator {
    fn default() -> Self {
        Self::with_origin(DEFAULT_APP_ORIGIN)
    }
}

impl HeadlessNavigator {
    /// Start with no current page under [`DEFAULT_APP_ORIGIN`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with no current page under `origin`.
    #[must_use]
    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into().trim_end_matches('/').to_string(),
            current: Arc::default(),
        }
    }

    /// Pretend the user opened `href`.
    pub fn visit(&self, href: impl Into<String>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(href.into());
    }

    /// Last page the user was sent to.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for HeadlessNavigator {
    fn navigate(&self, route: &Route) {
        tracing::info!(to = %route, "Navigate");
        self.visit(format!("{}{}", self.origin, route.path()));
    }

    fn redirect(&self, url: &str) {
        tracing::info!(%url, "Redirect");
        self.visit(url);
    }
}

impl Location for HeadlessNavigator {
    fn href(&self) -> Option<String> {
        self.current()
    }
}
