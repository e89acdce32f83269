//! Mock navigation for testing.

use crate::providers::{Location, Navigator};
use crate::routes::Route;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A navigation recorded by [`RecordingNavigator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    /// Client-side navigation.
    Navigate(Route),
    /// Full-page redirect.
    Redirect(String),
}

/// Navigator that records instead of moving.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    events: Arc<Mutex<Vec<NavigationEvent>>>,
}

impl RecordingNavigator {
    /// Create a navigator with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<NavigationEvent> {
        self.lock().clone()
    }

    /// Client-side navigations so far.
    #[must_use]
    pub fn routes(&self) -> Vec<Route> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                NavigationEvent::Navigate(route) => Some(*route),
                NavigationEvent::Redirect(_) => None,
            })
            .collect()
    }

    /// Full-page redirects so far.
    #[must_use]
    pub fn redirects(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                NavigationEvent::Redirect(url) => Some(url.clone()),
                NavigationEvent::Navigate(_) => None,
            })
            .collect()
    }

    /// Path of the latest client-side navigation.
    #[must_use]
    pub fn last_path(&self) -> Option<String> {
        self.routes().last().map(Route::path)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<NavigationEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &Route) {
        self.lock().push(NavigationEvent::Navigate(*route));
    }

    fn redirect(&self, url: &str) {
        self.lock().push(NavigationEvent::Redirect(url.to_string()));
    }
}

/// Location fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticLocation {
    href: Option<String>,
}

impl StaticLocation {
    /// A page at `href`.
    #[must_use]
    pub fn at(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
        }
    }

    /// No page at all, as outside a browser.
    #[must_use]
    pub const fn detached() -> Self {
        Self { href: None }
    }
}

impl Location for StaticLocation {
    fn href(&self) -> Option<String> {
        self.href.clone()
    }
}
