//! OAuth hand-off.
//!
//! The backend runs the provider dance. The client only sends the browser
//! to the backend's sign-in endpoint and, after the round trip, may read a
//! `token` parameter from the callback URL.

use crate::config::GatewayConfig;
use crate::providers::{Location, Navigator};
use crate::state::{OAuthProvider, Role};
use url::Url;

/// Path of the backend's OAuth sign-in endpoint.
pub const OAUTH_SIGNIN_PATH: &str = "/api/auth/oauth/signin";

/// Build the backend sign-in URL for `provider`, requesting `role`.
///
/// The role is always sent in its lower-case wire form.
#[must_use]
pub fn authorization_url(config: &GatewayConfig, provider: OAuthProvider, role: Role) -> String {
    let params = [("provider", provider.as_str()), ("role", role.as_str())];
    // Both values are fixed ASCII names, so encoding cannot fail
    let query = serde_urlencoded::to_string(params).unwrap_or_default();

    format!("{}?{query}", config.endpoint(OAUTH_SIGNIN_PATH))
}

/// Send the browser to the provider sign-in flow.
pub fn initiate_oauth<N>(
    navigator: &N,
    config: &GatewayConfig,
    provider: OAuthProvider,
    role: Role,
) where
    N: Navigator + ?Sized,
{
    let url = authorization_url(config, provider, role);
    tracing::info!(provider = %provider, role = %role, "Redirecting to OAuth sign-in");
    navigator.redirect(&url);
}

/// Read the `token` query parameter from the current page.
///
/// Returns `None` when there is no page, the address cannot be parsed, or
/// the parameter is missing. A present but empty `token=` comes back as an
/// empty string.
#[must_use]
pub fn oauth_token<L>(location: &L) -> Option<String>
where
    L: Location + ?Sized,
{
    location.href().as_deref().and_then(token_from_url)
}

/// Extract the `token` query parameter from an absolute URL.
#[must_use]
pub fn token_from_url(href: &str) -> Option<String> {
    let url = Url::parse(href).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.into_owned())
}
