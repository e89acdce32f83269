//! Session reducer.
//!
//! Owns every transition of [`SessionState`].
//!
//! # Flow
//!
//! ```text
//! 1. Command → begin(kind) stamps the next generation → gateway effect
//! 2. Gateway effect resolves → completion event carrying that generation
//! 3. Completion for an older generation → dropped
//! 4. Current completion → commit user / settle / fail → optional navigation
//! ```

use crate::actions::SessionAction;
use crate::environment::SessionEnvironment;
use crate::error::GatewayError;
use crate::oauth::initiate_oauth;
use crate::providers::{IdentityGateway, Navigator};
use crate::routes::{AuthNotice, Route};
use crate::state::{AuthMode, OperationKind, SessionState, SessionStatus, User};
use crate::validation::{FieldErrors, LoginForm, SignupForm};
use relief_ops_core::effect::Effect;
use relief_ops_core::environment::Clock;
use relief_ops_core::reducer::Reducer;
use relief_ops_core::{smallvec, SmallVec};
use std::marker::PhantomData;

/// Session error after a failed logout.
pub const LOGOUT_FAILED: &str = "Logout failed";

/// Session error after a failed refresh.
pub const REFRESH_FAILED: &str = "Failed to refresh user";

/// Session reducer.
///
/// Stateless; all dependencies arrive through [`SessionEnvironment`].
pub struct SessionReducer<G, N, C> {
    _phantom: PhantomData<fn() -> (G, N, C)>,
}

impl<G, N, C> SessionReducer<G, N, C> {
    /// Create a new session reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<G, N, C> Default for SessionReducer<G, N, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G, N, C> Clone for SessionReducer<G, N, C> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<G, N, C> std::fmt::Debug for SessionReducer<G, N, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionReducer").finish()
    }
}

impl<G, N, C> SessionReducer<G, N, C>
where
    G: IdentityGateway + Clone + 'static,
    N: Navigator + Clone + 'static,
    C: Clock + Clone + 'static,
{
    /// Fetch the current session and wrap the outcome with `complete`.
    fn fetch_session<F>(env: &SessionEnvironment<G, N, C>, complete: F) -> Effect<SessionAction>
    where
        F: FnOnce(Result<User, GatewayError>) -> SessionAction + Send + 'static,
    {
        let gateway = env.gateway.clone();
        Effect::future(async move { Some(complete(gateway.fetch_current_session().await)) })
    }

    fn submit_login(
        env: &SessionEnvironment<G, N, C>,
        generation: u64,
        form: LoginForm,
    ) -> Effect<SessionAction> {
        let gateway = env.gateway.clone();
        Effect::future(async move {
            let result = gateway.login(&form.email, &form.password).await;
            Some(SessionAction::LoginCompleted { generation, result })
        })
    }

    fn submit_signup(
        env: &SessionEnvironment<G, N, C>,
        generation: u64,
        form: SignupForm,
    ) -> Effect<SessionAction> {
        let gateway = env.gateway.clone();
        let role = form.role();
        Effect::future(async move {
            let result = gateway
                .signup(&form.name, &form.email, &form.password, role)
                .await
                .map(|_| ());
            Some(SessionAction::SignupCompleted { generation, result })
        })
    }

    fn end_session(env: &SessionEnvironment<G, N, C>, generation: u64) -> Effect<SessionAction> {
        let gateway = env.gateway.clone();
        Effect::future(async move {
            let result = gateway.logout_session().await.map(|_| ());
            Some(SessionAction::LogoutCompleted { generation, result })
        })
    }

    fn navigate(env: &SessionEnvironment<G, N, C>, route: Route) -> Effect<SessionAction> {
        let navigator = env.navigator.clone();
        Effect::future(async move {
            navigator.navigate(&route);
            None
        })
    }

    /// Clear the banner and field errors ahead of a submission.
    fn reset_form(state: &mut SessionState, mode: AuthMode) {
        state.form.mode = mode;
        state.form.error = None;
        state.form.field_errors = FieldErrors::new();
    }
}

impl<G, N, C> Reducer for SessionReducer<G, N, C>
where
    G: IdentityGateway + Clone + 'static,
    N: Navigator + Clone + 'static,
    C: Clock + Clone + 'static,
{
    type State = SessionState;
    type Action = SessionAction;
    type Environment = SessionEnvironment<G, N, C>;

    #[allow(clippy::too_many_lines)] // one arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if let Some(generation) = action.generation() {
            if !state.is_current(generation) {
                tracing::debug!(
                    generation,
                    current = state.generation(),
                    "Ignoring completion of superseded operation"
                );
                return smallvec![Effect::None];
            }
        }

        match action {
            // ═══════════════════════════════════════════════════════════════════
            // Hydration
            // ═══════════════════════════════════════════════════════════════════
            SessionAction::Hydrate => {
                let generation = state.begin(OperationKind::Hydrate);
                smallvec![Self::fetch_session(env, move |result| {
                    SessionAction::SessionHydrated { generation, result }
                })]
            },

            SessionAction::SessionHydrated { result, .. } => {
                match result {
                    Ok(user) => {
                        tracing::debug!(user_id = %user.id, "Session hydrated");
                        state.commit_user(user, env.clock.now());
                    },
                    Err(error) => {
                        // No session is the normal case for a first visit
                        tracing::debug!(%error, "No active session");
                        state.pending = None;
                        state.status = SessionStatus::Anonymous;
                    },
                }
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════════
            // Login
            // ═══════════════════════════════════════════════════════════════════
            SessionAction::SubmitLogin { form } => {
                Self::reset_form(state, AuthMode::Login);

                if let Err(errors) = form.validate() {
                    tracing::debug!(fields = errors.len(), "Login form rejected");
                    state.form.field_errors = errors;
                    return smallvec![Effect::None];
                }

                let generation = state.begin(OperationKind::Login);
                smallvec![Self::submit_login(env, generation, form)]
            },

            SessionAction::LoginCompleted { result, .. } => match result {
                Ok(user) => {
                    tracing::info!(user_id = %user.id, role = %user.role, "Signed in");
                    state.commit_user(user, env.clock.now());
                    smallvec![Self::navigate(env, Route::Dashboard)]
                },
                Err(error) => {
                    tracing::warn!(%error, "Login failed");
                    state.form.error = Some(error.to_string());
                    state.settle();
                    smallvec![Effect::None]
                },
            },

            // ═══════════════════════════════════════════════════════════════════
            // Signup
            // ═══════════════════════════════════════════════════════════════════
            SessionAction::SubmitSignup { form } => {
                Self::reset_form(state, AuthMode::Signup);

                if let Err(errors) = form.validate() {
                    tracing::debug!(fields = errors.len(), "Signup form rejected");
                    state.form.field_errors = errors;
                    return smallvec![Effect::None];
                }

                let generation = state.begin(OperationKind::Signup);
                smallvec![Self::submit_signup(env, generation, form)]
            },

            SessionAction::SignupCompleted { result, .. } => match result {
                Ok(()) => {
                    tracing::info!("Account registered");
                    state.settle();
                    state.form.mode = AuthMode::Login;
                    smallvec![Self::navigate(env, Route::AUTH)]
                },
                Err(error) => {
                    tracing::warn!(%error, "Signup failed");
                    state.form.error = Some(error.to_string());
                    state.settle();
                    smallvec![Effect::None]
                },
            },

            // ═══════════════════════════════════════════════════════════════════
            // Logout
            // ═══════════════════════════════════════════════════════════════════
            SessionAction::Logout => {
                let generation = state.begin(OperationKind::Logout);
                state.status = SessionStatus::Anonymous;
                state.oauth_selection = None;
                smallvec![Self::end_session(env, generation)]
            },

            SessionAction::LogoutCompleted { result, .. } => {
                state.pending = None;
                match result {
                    Ok(()) => {
                        tracing::info!("Signed out");
                        state.status = SessionStatus::Anonymous;
                        smallvec![Self::navigate(env, Route::AUTH)]
                    },
                    Err(error) => {
                        tracing::warn!(%error, "Logout failed");
                        state.status = SessionStatus::Erroring {
                            message: LOGOUT_FAILED.to_string(),
                        };
                        smallvec![Effect::None]
                    },
                }
            },

            // ═══════════════════════════════════════════════════════════════════
            // Refresh
            // ═══════════════════════════════════════════════════════════════════
            SessionAction::RefreshUser => {
                let generation = state.begin(OperationKind::Refresh);
                smallvec![Self::fetch_session(env, move |result| {
                    SessionAction::UserRefreshed { generation, result }
                })]
            },

            SessionAction::UserRefreshed { result, .. } => {
                match result {
                    Ok(user) => state.commit_user(user, env.clock.now()),
                    Err(error) => {
                        tracing::warn!(%error, "Refresh failed");
                        state.pending = None;
                        state.status = SessionStatus::Erroring {
                            message: REFRESH_FAILED.to_string(),
                        };
                    },
                }
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════════
            // OAuth
            // ═══════════════════════════════════════════════════════════════════
            SessionAction::SelectOAuthProvider { provider } => {
                state.oauth_selection = Some(provider);
                smallvec![Effect::None]
            },

            SessionAction::ConfirmOAuthRole { role } => {
                let Some(provider) = state.oauth_selection.take() else {
                    tracing::debug!(%role, "Role confirmed without a provider selection");
                    return smallvec![Effect::None];
                };

                let navigator = env.navigator.clone();
                let config = env.config.clone();
                smallvec![Effect::future(async move {
                    initiate_oauth(&navigator, &config, provider, role);
                    None
                })]
            },

            SessionAction::CancelOAuthSelection => {
                state.oauth_selection = None;
                smallvec![Effect::None]
            },

            SessionAction::CompleteOAuth => {
                let generation = state.begin(OperationKind::OAuthCompletion);
                smallvec![Self::fetch_session(env, move |result| {
                    SessionAction::OAuthCompleted { generation, result }
                })]
            },

            SessionAction::OAuthCompleted { result, .. } => match result {
                Ok(user) => {
                    tracing::info!(user_id = %user.id, role = %user.role, "Signed in with OAuth");
                    state.commit_user(user, env.clock.now());
                    smallvec![Self::navigate(env, Route::Dashboard)]
                },
                Err(error) => {
                    tracing::warn!(%error, "OAuth sign-in could not be completed");
                    state.pending = None;
                    state.status = SessionStatus::Anonymous;
                    smallvec![Self::navigate(
                        env,
                        Route::Auth {
                            mode: AuthMode::Login,
                            notice: Some(AuthNotice::OAuthFailed),
                        }
                    )]
                },
            },

            // ═══════════════════════════════════════════════════════════════════
            // Form
            // ═══════════════════════════════════════════════════════════════════
            SessionAction::SwitchAuthMode { mode } => {
                Self::reset_form(state, mode);
                smallvec![Effect::None]
            },

            SessionAction::DismissError => {
                state.form.error = None;
                if matches!(state.status, SessionStatus::Erroring { .. }) {
                    state.status = SessionStatus::Anonymous;
                }
                smallvec![Effect::None]
            },
        }
    }
}
