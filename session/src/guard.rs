//! Role-gated pages.
//!
//! A guard looks at the session and decides whether a restricted page may
//! render, should wait, or must send the viewer elsewhere.

use crate::providers::Navigator;
use crate::routes::Route;
use crate::state::{Role, SessionState, User};

/// Pages that need a signed-in user with a suitable role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestrictedPage {
    /// Administrator panel.
    AdminPanel,
    /// Disaster report submission.
    ReportDisaster,
}

impl RestrictedPage {
    /// Every restricted page.
    pub const ALL: [Self; 2] = [Self::AdminPanel, Self::ReportDisaster];

    /// Whether `role` may view this page.
    #[must_use]
    pub const fn allows(self, role: Role) -> bool {
        match self {
            Self::AdminPanel => match role {
                Role::Administrator => true,
                Role::Standard | Role::Volunteer => false,
            },
            Self::ReportDisaster => match role {
                Role::Administrator | Role::Volunteer => true,
                Role::Standard => false,
            },
        }
    }

    /// Route the page lives at.
    #[must_use]
    pub const fn route(self) -> Route {
        match self {
            Self::AdminPanel => Route::Admin,
            Self::ReportDisaster => Route::ReportDisaster,
        }
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving; render a placeholder and do not redirect.
    Loading,
    /// Render the page for this user.
    Granted(User),
    /// Leave for this route.
    Redirect(Route),
}

impl GuardDecision {
    /// Whether the page may render.
    #[must_use]
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }
}

/// Routes the navigation bar offers to `user`.
///
/// Restricted pages appear only for roles they allow. Volunteers also get
/// their own reports; anonymous viewers get the credential screen instead.
#[must_use]
pub fn visible_routes(user: Option<&User>) -> Vec<Route> {
    let role = user.map(|user| user.role);
    let offers = |page: RestrictedPage| role.is_some_and(|role| page.allows(role));

    let mut routes = vec![Route::Dashboard];
    if offers(RestrictedPage::ReportDisaster) {
        routes.push(RestrictedPage::ReportDisaster.route());
    }
    routes.push(Route::Resources);
    if offers(RestrictedPage::AdminPanel) {
        routes.push(RestrictedPage::AdminPanel.route());
    }

    match role {
        Some(Role::Volunteer) => routes.push(Route::MyReports),
        Some(Role::Administrator | Role::Standard) => {},
        None => routes.push(Route::AUTH),
    }
    routes
}

/// Decide what `page` should do for the current session.
#[must_use]
pub fn evaluate(page: RestrictedPage, state: &SessionState) -> GuardDecision {
    if state.is_loading() {
        return GuardDecision::Loading;
    }

    match state.user() {
        None => GuardDecision::Redirect(Route::AUTH),
        Some(user) if page.allows(user.role) => GuardDecision::Granted(user.clone()),
        Some(_) => GuardDecision::Redirect(Route::Dashboard),
    }
}

/// [`evaluate`], then navigate away when the decision is a redirect.
pub fn enforce<N>(page: RestrictedPage, state: &SessionState, navigator: &N) -> GuardDecision
where
    N: Navigator + ?Sized,
{
    let decision = evaluate(page, state);
    if let GuardDecision::Redirect(route) = &decision {
        tracing::debug!(?page, to = %route, "Guard redirect");
        navigator.navigate(route);
    }
    decision
}
