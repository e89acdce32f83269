//! Mock identity gateway for testing.

use crate::error::{GatewayError, Result};
use crate::providers::IdentityGateway;
use crate::state::{Role, User};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

/// A call received by [`MockIdentityGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// `fetch_current_session`
    FetchCurrentSession,
    /// `login`
    Login {
        /// Submitted email.
        email: String,
    },
    /// `signup`
    Signup {
        /// Submitted name.
        name: String,
        /// Submitted email.
        email: String,
        /// Requested role.
        role: Role,
    },
    /// `logout_session`
    Logout,
}

/// Holds session fetches until released.
///
/// Each [`Gate::release`] lets one held fetch resolve. A release issued
/// before the fetch arrives is remembered.
#[derive(Debug, Clone)]
pub struct Gate(Arc<Notify>);

impl Gate {
    /// Let one held call resolve.
    pub fn release(&self) {
        self.0.notify_one();
    }
}

#[derive(Debug, Default)]
struct Backend {
    current: Option<User>,
    accounts: HashMap<String, (String, User)>,
    session_failure: Option<GatewayError>,
    signup_failure: Option<GatewayError>,
    logout_failure: Option<GatewayError>,
    calls: Vec<GatewayCall>,
}

/// Mock identity gateway.
///
/// Behaves like a tiny in-memory backend: `login` checks registered
/// accounts and opens a session, `logout_session` closes it and
/// `fetch_current_session` reports whoever is signed in. Results are
/// decided when the call is made, so a held fetch still carries the
/// session as it was at that moment.
#[derive(Debug, Clone, Default)]
pub struct MockIdentityGateway {
    backend: Arc<Mutex<Backend>>,
    session_gate: Arc<Mutex<Option<Gate>>>,
}

impl MockIdentityGateway {
    /// Create a gateway with no accounts and no session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `user` signed in.
    #[must_use]
    pub fn with_session(self, user: User) -> Self {
        self.backend().current = Some(user);
        self
    }

    /// Register an account that `login` accepts.
    #[must_use]
    pub fn with_account(self, password: impl Into<String>, user: User) -> Self {
        self.backend()
            .accounts
            .insert(user.email.clone(), (password.into(), user));
        self
    }

    /// Make every session fetch fail with `error`.
    #[must_use]
    pub fn failing_session(self, error: GatewayError) -> Self {
        self.backend().session_failure = Some(error);
        self
    }

    /// Make every signup fail with `error`.
    #[must_use]
    pub fn failing_signup(self, error: GatewayError) -> Self {
        self.backend().signup_failure = Some(error);
        self
    }

    /// Make every logout fail with `error`. The session stays open.
    #[must_use]
    pub fn failing_logout(self, error: GatewayError) -> Self {
        self.backend().logout_failure = Some(error);
        self
    }

    /// Hold every later session fetch until the returned gate releases it.
    #[must_use]
    pub fn hold_session_fetches(&self) -> Gate {
        let gate = Gate(Arc::new(Notify::new()));
        *self
            .session_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(gate.clone());
        gate
    }

    /// Currently open session, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.backend().current.clone()
    }

    /// Calls received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.backend().calls.clone()
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.backend().calls.len()
    }

    fn backend(&self) -> MutexGuard<'_, Backend> {
        self.backend.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl IdentityGateway for MockIdentityGateway {
    fn fetch_current_session(&self) -> impl Future<Output = Result<User>> + Send {
        let result = {
            let mut backend = self.backend();
            backend.calls.push(GatewayCall::FetchCurrentSession);
            match (&backend.session_failure, &backend.current) {
                (Some(error), _) => Err(error.clone()),
                (None, Some(user)) => Ok(user.clone()),
                (None, None) => Err(GatewayError::authentication(401, "Not authenticated")),
            }
        };
        let gate = self
            .session_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        async move {
            if let Some(Gate(notify)) = gate {
                notify.notified().await;
            }
            result
        }
    }

    fn login(&self, email: &str, password: &str) -> impl Future<Output = Result<User>> + Send {
        let result = {
            let mut backend = self.backend();
            backend.calls.push(GatewayCall::Login {
                email: email.to_string(),
            });
            let matched = backend
                .accounts
                .get(email)
                .filter(|(expected, _)| expected == password)
                .map(|(_, user)| user.clone());

            match matched {
                Some(user) => {
                    backend.current = Some(user.clone());
                    Ok(user)
                },
                None => Err(GatewayError::authentication(401, "Invalid email or password")),
            }
        };

        async move { result }
    }

    fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> impl Future<Output = Result<serde_json::Value>> + Send {
        let result = {
            let mut backend = self.backend();
            backend.calls.push(GatewayCall::Signup {
                name: name.to_string(),
                email: email.to_string(),
                role,
            });

            if let Some(error) = &backend.signup_failure {
                Err(error.clone())
            } else if backend.accounts.contains_key(email) {
                Err(GatewayError::authentication(409, "Email already registered"))
            } else {
                let user = User {
                    id: format!("u-{}", backend.accounts.len() + 1),
                    name: name.to_string(),
                    email: email.to_string(),
                    role,
                    avatar_url: None,
                };
                let body = serde_json::json!({ "data": { "user_id": user.id } });
                backend
                    .accounts
                    .insert(email.to_string(), (password.to_string(), user));
                Ok(body)
            }
        };

        async move { result }
    }

    fn logout_session(&self) -> impl Future<Output = Result<serde_json::Value>> + Send {
        let result = {
            let mut backend = self.backend();
            backend.calls.push(GatewayCall::Logout);
            if let Some(error) = &backend.logout_failure {
                Err(error.clone())
            } else {
                backend.current = None;
                Ok(serde_json::Value::Null)
            }
        };

        async move { result }
    }
}
