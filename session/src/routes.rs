//! Client-side routes.

use crate::state::AuthMode;
use std::collections::HashMap;
use std::fmt;
use url::Url;

/// Notice shown on the credential screen after a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthNotice {
    /// The OAuth round trip did not produce a session.
    OAuthFailed,
}

impl AuthNotice {
    /// Value of the `error` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OAuthFailed => "oauth_failed",
        }
    }
}

/// Pages of the relief client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Landing page
    Home,
    /// Credential screen
    Auth {
        /// Form to show
        mode: AuthMode,
        /// Optional notice
        notice: Option<AuthNotice>,
    },
    /// Signed-in home
    Dashboard,
    /// Administrator panel
    Admin,
    /// Disaster report submission
    ReportDisaster,
    /// Resource directory
    Resources,
    /// Reports filed by the signed-in volunteer
    MyReports,
    /// Landing page for a finished OAuth round trip
    OAuthSuccess,
}

impl Route {
    /// Credential screen in login mode without a notice.
    pub const AUTH: Self = Self::Auth {
        mode: AuthMode::Login,
        notice: None,
    };

    /// Path plus query string for this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Auth { mode, notice } => {
                let mut query = Vec::new();
                if *mode == AuthMode::Signup {
                    query.push(format!("mode={}", mode.as_str()));
                }
                if let Some(notice) = notice {
                    query.push(format!("error={}", notice.as_str()));
                }
                if query.is_empty() {
                    "/auth".to_string()
                } else {
                    format!("/auth?{}", query.join("&"))
                }
            },
            Self::Dashboard => "/dashboard".to_string(),
            Self::Admin => "/admin".to_string(),
            Self::ReportDisaster => "/report-disaster".to_string(),
            Self::Resources => "/resources".to_string(),
            Self::MyReports => "/my-reports".to_string(),
            Self::OAuthSuccess => "/oauth-success".to_string(),
        }
    }

    /// Parse a path with an optional query string.
    ///
    /// Unknown query parameters are ignored; unknown paths yield `None`.
    #[must_use]
    pub fn parse(path_and_query: &str) -> Option<Self> {
        let (path, query) = path_and_query
            .split_once('?')
            .unwrap_or((path_and_query, ""));
        let path = path.trim_end_matches('/');

        let route = match path {
            "" => Self::Home,
            "/auth" => {
                let params: HashMap<String, String> =
                    serde_urlencoded::from_str(query).unwrap_or_default();
                let mode = match params.get("mode").map(String::as_str) {
                    Some("signup") => AuthMode::Signup,
                    _ => AuthMode::Login,
                };
                let notice = match params.get("error").map(String::as_str) {
                    Some("oauth_failed") => Some(AuthNotice::OAuthFailed),
                    _ => None,
                };
                Self::Auth { mode, notice }
            },
            "/dashboard" => Self::Dashboard,
            "/admin" => Self::Admin,
            "/report-disaster" => Self::ReportDisaster,
            "/resources" => Self::Resources,
            "/my-reports" => Self::MyReports,
            "/oauth-success" => Self::OAuthSuccess,
            _ => return None,
        };

        Some(route)
    }

    /// Route addressed by an absolute URL, ignoring its origin.
    #[must_use]
    pub fn from_url(href: &str) -> Option<Self> {
        let url = Url::parse(href).ok()?;
        match url.query() {
            Some(query) => Self::parse(&format!("{}?{query}", url.path())),
            None => Self::parse(url.path()),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
