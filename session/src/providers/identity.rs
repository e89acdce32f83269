//! Identity gateway trait.

use crate::error::Result;
use crate::state::{Role, User};
use std::future::Future;

/// Remote identity API.
///
/// Every call is credentialed: the session cookie set by the backend is
/// stored and replayed by the implementation, never by callers.
///
/// # Implementation Notes
///
/// - Non-success statuses become [`GatewayError::Authentication`] carrying
///   the backend's `error` message or the operation's fallback
/// - No retries; each failure surfaces once
///
/// [`GatewayError::Authentication`]: crate::error::GatewayError::Authentication
pub trait IdentityGateway: Send + Sync {
    /// Fetch the user behind the current session cookie.
    ///
    /// # Errors
    ///
    /// Fails when there is no active session or the request fails.
    fn fetch_current_session(&self) -> impl Future<Output = Result<User>> + Send;

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Fails when the backend rejects the credentials or the request fails.
    fn login(&self, email: &str, password: &str) -> impl Future<Output = Result<User>> + Send;

    /// Register a new account.
    ///
    /// Returns the backend's response body; signing up does not sign in.
    ///
    /// # Errors
    ///
    /// Fails when the backend rejects the registration or the request fails.
    fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> impl Future<Output = Result<serde_json::Value>> + Send;

    /// End the current session.
    ///
    /// # Errors
    ///
    /// Fails when the backend rejects the request or the request fails.
    fn logout_session(&self) -> impl Future<Output = Result<serde_json::Value>> + Send;
}
