//! Navigation surface.

use crate::routes::Route;

/// Moves the user between pages.
pub trait Navigator: Send + Sync {
    /// Client-side navigation within the application.
    fn navigate(&self, route: &Route);

    /// Full-page navigation to an absolute URL; control leaves the app.
    fn redirect(&self, url: &str);
}

/// Read access to the current page address.
pub trait Location: Send + Sync {
    /// Absolute URL of the current page, or `None` outside a browser.
    fn href(&self) -> Option<String>;
}
