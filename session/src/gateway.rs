//! HTTP identity gateway.
//!
//! Production [`IdentityGateway`] over `reqwest`. The client keeps a cookie
//! store, so the session cookie set by the backend on login is replayed on
//! every later call made through the same gateway (or any clone of it).

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::providers::IdentityGateway;
use crate::state::{Role, User};
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Current-session endpoint.
pub const SESSION_PATH: &str = "/api/users/me";
/// Login endpoint.
pub const LOGIN_PATH: &str = "/api/auth/login";
/// Signup endpoint.
pub const SIGNUP_PATH: &str = "/api/auth/signup";
/// Logout endpoint.
pub const LOGOUT_PATH: &str = "/api/auth/logout";

const FETCH_SESSION_FALLBACK: &str = "Failed to fetch current user";
const LOGIN_FALLBACK: &str = "Login failed";
const SIGNUP_FALLBACK: &str = "Sign up failed";
const LOGOUT_FALLBACK: &str = "Logout failed";

/// `{ "data": T }`
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// `{ "user": User }`
#[derive(Deserialize)]
struct LoginData {
    user: User,
}

/// `{ "error": "..." }`
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignupRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    role: Role,
}

/// Identity gateway client.
#[derive(Debug, Clone)]
pub struct HttpIdentityGateway {
    client: Client,
    config: GatewayConfig,
}

impl HttpIdentityGateway {
    /// Build a gateway with its own cookie store.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidUrl` if the configured origin does not
    /// parse, or `GatewayError::Transport` if the HTTP client cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        Url::parse(&config.api_url).map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;

        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Build a gateway from `RELIEF_OPS_*` environment variables.
    ///
    /// # Errors
    ///
    /// Same as [`HttpIdentityGateway::new`].
    pub fn from_env() -> Result<Self> {
        Self::new(GatewayConfig::from_env())
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Send a JSON request and turn non-success statuses into errors.
    async fn request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        fallback: &'static str,
    ) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = Url::parse(&self.config.endpoint(path))
            .map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;

        tracing::debug!(%method, %url, "Sending identity request");

        let mut request = self
            .client
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.error)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());

        tracing::warn!(status = status.as_u16(), %message, "Identity request rejected");
        Err(GatewayError::authentication(status.as_u16(), message))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| GatewayError::Decode(e.to_string()))
    }

    /// Backend-defined body; empty decodes as `null`.
    async fn decode_value(response: Response) -> Result<serde_json::Value> {
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

impl IdentityGateway for HttpIdentityGateway {
    #[tracing::instrument(skip(self), name = "fetch_current_session")]
    async fn fetch_current_session(&self) -> Result<User> {
        let response = self
            .request::<()>(Method::GET, SESSION_PATH, None, FETCH_SESSION_FALLBACK)
            .await?;
        let envelope: Envelope<User> = Self::decode(response).await?;
        Ok(envelope.data)
    }

    #[tracing::instrument(skip(self, password), name = "login")]
    async fn login(&self, email: &str, password: &str) -> Result<User> {
        let body = LoginRequest { email, password };
        let response = self
            .request(Method::POST, LOGIN_PATH, Some(&body), LOGIN_FALLBACK)
            .await?;
        let envelope: Envelope<LoginData> = Self::decode(response).await?;
        Ok(envelope.data.user)
    }

    #[tracing::instrument(skip(self, password), name = "signup")]
    async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<serde_json::Value> {
        let body = SignupRequest {
            name,
            email,
            password,
            role,
        };
        let response = self
            .request(Method::POST, SIGNUP_PATH, Some(&body), SIGNUP_FALLBACK)
            .await?;
        Self::decode_value(response).await
    }

    #[tracing::instrument(skip(self), name = "logout_session")]
    async fn logout_session(&self) -> Result<serde_json::Value> {
        let response = self
            .request::<()>(Method::POST, LOGOUT_PATH, None, LOGOUT_FALLBACK)
            .await?;
        Self::decode_value(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparsable_origin_is_rejected() {
        let result = HttpIdentityGateway::new(GatewayConfig::new("not a url".to_string()));
        assert!(matches!(result, Err(GatewayError::InvalidUrl(_))));
    }

    #[test]
    fn from_env_uses_environment_config() {
        if let Ok(gateway) = HttpIdentityGateway::from_env() {
            assert_eq!(gateway.config(), &GatewayConfig::from_env());
        } else {
            // Only an unparsable RELIEF_OPS_API_URL can fail the build
            let origin = std::env::var(crate::config::API_URL_ENV).unwrap_or_default();
            assert!(url::Url::parse(&origin).is_err());
        }
    }

    #[test]
    fn signup_body_uses_wire_role() {
        let body = SignupRequest {
            name: "Ada",
            email: "ada@relief.example",
            password: "longenough",
            role: Role::Volunteer,
        };
        let json = serde_json::to_value(&body).unwrap_or_default();
        assert_eq!(json["role"], "volunteer");
    }
}
