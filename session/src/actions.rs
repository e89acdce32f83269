//! Session actions.
//!
//! Commands carry user intent from the screens. Events carry the outcome of
//! a gateway call back into the reducer, stamped with the generation of the
//! operation that issued them.

use crate::error::GatewayError;
use crate::state::{AuthMode, OAuthProvider, Role, User};
use crate::validation::{LoginForm, SignupForm};

/// Session action.
///
/// The reducer is the only consumer. Completion events whose `generation`
/// no longer matches the latest issued operation are dropped unseen.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    // ═══════════════════════════════════════════════════════════════════════
    // Commands
    // ═══════════════════════════════════════════════════════════════════════
    /// Load the user behind the current session cookie on first mount.
    Hydrate,

    /// Validate and submit the login form.
    SubmitLogin {
        /// Form contents as entered.
        form: LoginForm,
    },

    /// Validate and submit the signup form.
    SubmitSignup {
        /// Form contents as entered.
        form: SignupForm,
    },

    /// End the session. The user is cleared immediately.
    Logout,

    /// Re-fetch the current user.
    RefreshUser,

    /// Finish an OAuth round trip after landing on the success page.
    CompleteOAuth,

    /// Remember the provider the user clicked; a role is asked for next.
    SelectOAuthProvider {
        /// Provider picked on the credential screen.
        provider: OAuthProvider,
    },

    /// Leave for the selected provider, requesting `role`.
    ConfirmOAuthRole {
        /// Role requested for the new account.
        role: Role,
    },

    /// Discard the provider selection.
    CancelOAuthSelection,

    /// Toggle the credential screen between login and signup.
    SwitchAuthMode {
        /// Mode to show.
        mode: AuthMode,
    },

    /// Clear the form banner and any session error.
    DismissError,

    // ═══════════════════════════════════════════════════════════════════════
    // Events
    // ═══════════════════════════════════════════════════════════════════════
    /// Hydration finished.
    SessionHydrated {
        /// Operation that issued the call.
        generation: u64,
        /// Gateway outcome.
        result: Result<User, GatewayError>,
    },

    /// Login call finished.
    LoginCompleted {
        /// Operation that issued the call.
        generation: u64,
        /// Gateway outcome.
        result: Result<User, GatewayError>,
    },

    /// Signup call finished.
    SignupCompleted {
        /// Operation that issued the call.
        generation: u64,
        /// Gateway outcome; the response body is not used.
        result: Result<(), GatewayError>,
    },

    /// Logout call finished.
    LogoutCompleted {
        /// Operation that issued the call.
        generation: u64,
        /// Gateway outcome; the response body is not used.
        result: Result<(), GatewayError>,
    },

    /// Refresh call finished.
    UserRefreshed {
        /// Operation that issued the call.
        generation: u64,
        /// Gateway outcome.
        result: Result<User, GatewayError>,
    },

    /// Session fetch after an OAuth round trip finished.
    OAuthCompleted {
        /// Operation that issued the call.
        generation: u64,
        /// Gateway outcome.
        result: Result<User, GatewayError>,
    },
}

impl SessionAction {
    /// Generation stamped on a completion event, `None` for commands.
    #[must_use]
    pub const fn generation(&self) -> Option<u64> {
        match self {
            Self::SessionHydrated { generation, .. }
            | Self::LoginCompleted { generation, .. }
            | Self::SignupCompleted { generation, .. }
            | Self::LogoutCompleted { generation, .. }
            | Self::UserRefreshed { generation, .. }
            | Self::OAuthCompleted { generation, .. } => Some(*generation),
            Self::Hydrate
            | Self::SubmitLogin { .. }
            | Self::SubmitSignup { .. }
            | Self::Logout
            | Self::RefreshUser
            | Self::CompleteOAuth
            | Self::SelectOAuthProvider { .. }
            | Self::ConfirmOAuthRole { .. }
            | Self::CancelOAuthSelection
            | Self::SwitchAuthMode { .. }
            | Self::DismissError => None,
        }
    }

    /// Whether this action reports the end of a gateway call.
    #[must_use]
    pub const fn is_completion(&self) -> bool {
        self.generation().is_some()
    }
}
