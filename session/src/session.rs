//! Session handle.
//!
//! [`Session`] is the single owner of the signed-in user. Screens receive a
//! clone of it and go through its methods; there is no other way to change
//! session state.

use crate::actions::SessionAction;
use crate::environment::SessionEnvironment;
use crate::guard::{self, GuardDecision, RestrictedPage};
use crate::oauth;
use crate::providers::{IdentityGateway, Navigator};
use crate::reducers::SessionReducer;
use crate::routes::Route;
use crate::state::{AuthMode, OAuthProvider, Role, SessionPhase, SessionState, User};
use crate::validation::{CredentialForm, LoginForm, SignupForm};
use relief_ops_core::environment::Clock;
use relief_ops_runtime::{EffectHandle, Store, StoreError};
use std::time::Duration;
use tokio::sync::broadcast;

/// Store type behind a [`Session`].
pub type SessionStore<G, N, C> =
    Store<SessionState, SessionAction, SessionEnvironment<G, N, C>, SessionReducer<G, N, C>>;

/// Injectable session store.
///
/// Every mutator returns once the reducer has applied the command. The
/// returned [`EffectHandle`] resolves after the gateway call and any
/// follow-up navigation have finished.
///
/// # Example
///
/// ```ignore
/// let session = Session::new(SessionEnvironment::new(gateway, navigator, SystemClock, config));
/// session.hydrate().await?.wait().await;
///
/// if let Some(user) = session.user().await {
///     println!("signed in as {}", user.email);
/// }
/// ```
pub struct Session<G, N, C>
where
    G: IdentityGateway + Clone + 'static,
    N: Navigator + Clone + 'static,
    C: Clock + Clone + 'static,
{
    store: SessionStore<G, N, C>,
}

impl<G, N, C> Clone for Session<G, N, C>
where
    G: IdentityGateway + Clone + 'static,
    N: Navigator + Clone + 'static,
    C: Clock + Clone + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<G, N, C> Session<G, N, C>
where
    G: IdentityGateway + Clone + 'static,
    N: Navigator + Clone + 'static,
    C: Clock + Clone + 'static,
{
    /// Create a session that has not hydrated yet.
    #[must_use]
    pub fn new(environment: SessionEnvironment<G, N, C>) -> Self {
        Self::with_state(SessionState::new(), environment)
    }

    /// Create a session starting from `state`.
    #[must_use]
    pub fn with_state(state: SessionState, environment: SessionEnvironment<G, N, C>) -> Self {
        Self {
            store: Store::new(state, SessionReducer::new(), environment),
        }
    }

    async fn dispatch(&self, action: SessionAction) -> Result<EffectHandle, StoreError> {
        self.store.send(action).await
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Mutators
    // ═══════════════════════════════════════════════════════════════════════

    /// Load the user behind the current session cookie.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`Session::shutdown`].
    pub async fn hydrate(&self) -> Result<EffectHandle, StoreError> {
        self.dispatch(SessionAction::Hydrate).await
    }

    /// Validate and submit the login form.
    ///
    /// Field errors land in [`SessionState::form`] and no call is made.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`Session::shutdown`].
    pub async fn login(&self, form: LoginForm) -> Result<EffectHandle, StoreError> {
        self.dispatch(SessionAction::SubmitLogin { form }).await
    }

    /// Validate and submit the signup form.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`Session::shutdown`].
    pub async fn signup(&self, form: SignupForm) -> Result<EffectHandle, StoreError> {
        self.dispatch(SessionAction::SubmitSignup { form }).await
    }

    /// Submit whichever form the credential screen shows.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`Session::shutdown`].
    pub async fn submit(&self, form: CredentialForm) -> Result<EffectHandle, StoreError> {
        match form {
            CredentialForm::Login(form) => self.login(form).await,
            CredentialForm::Signup(form) => self.signup(form).await,
        }
    }

    /// Sign out. The user is cleared before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`Session::shutdown`].
    pub async fn logout(&self) -> Result<EffectHandle, StoreError> {
        self.dispatch(SessionAction::Logout).await
    }

    /// Re-fetch the current user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`Session::shutdown`].
    pub async fn refresh_user(&self) -> Result<EffectHandle, StoreError> {
        self.dispatch(SessionAction::RefreshUser).await
    }

    /// Finish an OAuth round trip.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`Session::shutdown`].
    pub async fn complete_oauth(&self) -> Result<EffectHandle, StoreError> {
        self.dispatch(SessionAction::CompleteOAuth).await
    }

    /// First OAuth step: remember the clicked provider.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`Session::shutdown`].
    pub async fn select_oauth_provider(
        &self,
        provider: OAuthProvider,
    ) -> Result<EffectHandle, StoreError> {
        self.dispatch(SessionAction::SelectOAuthProvider { provider })
            .await
    }

    /// Second OAuth step: leave for the selected provider with `role`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`Session::shutdown`].
    pub async fn confirm_oauth_role(&self, role: Role) -> Result<EffectHandle, StoreError> {
        self.dispatch(SessionAction::ConfirmOAuthRole { role }).await
    }

    /// Drop the OAuth provider selection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`Session::shutdown`].
    pub async fn cancel_oauth_selection(&self) -> Result<EffectHandle, StoreError> {
        self.dispatch(SessionAction::CancelOAuthSelection).await
    }

    /// Switch the credential screen between login and signup.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`Session::shutdown`].
    pub async fn switch_mode(&self, mode: AuthMode) -> Result<EffectHandle, StoreError> {
        self.dispatch(SessionAction::SwitchAuthMode { mode }).await
    }

    /// Clear the form banner and any session error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`Session::shutdown`].
    pub async fn dismiss_error(&self) -> Result<EffectHandle, StoreError> {
        self.dispatch(SessionAction::DismissError).await
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Readers
    // ═══════════════════════════════════════════════════════════════════════

    /// Copy of the whole session state.
    pub async fn snapshot(&self) -> SessionState {
        self.store.state(Clone::clone).await
    }

    /// Signed-in user, if any.
    pub async fn user(&self) -> Option<User> {
        self.store.state(|state| state.user().cloned()).await
    }

    /// Whether the session is resolving or a call is in flight.
    pub async fn is_loading(&self) -> bool {
        self.store.state(SessionState::is_loading).await
    }

    /// Coarse status.
    pub async fn phase(&self) -> SessionPhase {
        self.store.state(SessionState::phase).await
    }

    /// Session-level error message.
    pub async fn error(&self) -> Option<String> {
        self.store
            .state(|state| state.error().map(str::to_string))
            .await
    }

    /// Guard decision for `page`, without navigating.
    pub async fn guard(&self, page: RestrictedPage) -> GuardDecision {
        self.store.state(|state| guard::evaluate(page, state)).await
    }

    /// Guard decision for `page`, navigating away on a redirect.
    pub async fn enforce(&self, page: RestrictedPage) -> GuardDecision {
        let navigator = &self.store.environment().navigator;
        self.store
            .state(|state| guard::enforce(page, state, navigator))
            .await
    }

    /// Routes the navigation bar offers the current user.
    pub async fn visible_routes(&self) -> Vec<Route> {
        self.store
            .state(|state| guard::visible_routes(state.user()))
            .await
    }

    /// Backend sign-in URL for `provider` and `role`.
    #[must_use]
    pub fn authorization_url(&self, provider: OAuthProvider, role: Role) -> String {
        oauth::authorization_url(&self.store.environment().config, provider, role)
    }

    /// Completion events as the reducer applies them.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionAction> {
        self.store.subscribe_actions()
    }

    /// Stop accepting commands and wait for in-flight calls.
    ///
    /// A call still running when shutdown begins is not applied: its
    /// completion is dropped, so the operation stays pending and
    /// [`Session::is_loading`] keeps reporting `true`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if calls are still running
    /// after `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.store.shutdown(timeout).await
    }
}
