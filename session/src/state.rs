//! Session state types.
//!
//! The signed-in user lives inside [`SessionStatus::Authenticated`] and
//! nowhere else, so a half-populated session cannot be represented.

use crate::validation::FieldErrors;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════
// Identity
// ═══════════════════════════════════════════════════════════════════════

/// Role of a signed-in user.
///
/// Serialized with the backend's lower-case names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full access, including the admin panel.
    #[serde(rename = "admin")]
    Administrator,
    /// Regular account.
    #[default]
    #[serde(rename = "user")]
    Standard,
    /// Field volunteer; may file disaster reports.
    #[serde(rename = "volunteer")]
    Volunteer,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Self; 3] = [Self::Administrator, Self::Standard, Self::Volunteer];

    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "admin",
            Self::Standard => "user",
            Self::Volunteer => "volunteer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that names no known role or provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseNameError {
    kind: &'static str,
    value: String,
}

impl FromStr for Role {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" | "administrator" => Ok(Self::Administrator),
            "user" | "standard" => Ok(Self::Standard),
            "volunteer" => Ok(Self::Volunteer),
            _ => Err(ParseNameError {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

/// The signed-in user as reported by the identity gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Access role
    pub role: Role,
    /// Avatar image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Identity providers supported by the backend's OAuth sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    /// Google
    Google,
    /// GitHub
    #[serde(rename = "github")]
    GitHub,
}

impl OAuthProvider {
    /// Provider identifier used in query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::GitHub => "github",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "github" => Ok(Self::GitHub),
            _ => Err(ParseNameError {
                kind: "provider",
                value: s.to_string(),
            }),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Credential Screen
// ═══════════════════════════════════════════════════════════════════════

/// Which credential form the auth screen shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Sign-in form
    #[default]
    Login,
    /// Registration form
    Signup,
}

impl AuthMode {
    /// Query-string name of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
        }
    }
}

/// State of the credential screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthFormState {
    /// Form currently shown
    pub mode: AuthMode,
    /// Errors from the most recent validation pass
    pub field_errors: FieldErrors,
    /// Dismissible banner for gateway failures
    pub error: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════════════════

/// Settled status of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionStatus {
    /// Not yet hydrated from the gateway.
    #[default]
    Initializing,
    /// Signed in.
    Authenticated(User),
    /// Signed out.
    Anonymous,
    /// Signed out after a failed refresh or logout.
    Erroring {
        /// Message for the user
        message: String,
    },
}

/// Discriminant of [`SessionStatus`] without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Not yet hydrated
    Initializing,
    /// Signed in
    Authenticated,
    /// Signed out
    Anonymous,
    /// Signed out with an error message
    Erroring,
}

/// Gateway operations the session can have in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Initial session fetch
    Hydrate,
    /// Credential sign-in
    Login,
    /// Account registration
    Signup,
    /// Sign-out
    Logout,
    /// Session re-fetch
    Refresh,
    /// Session fetch after an OAuth redirect
    OAuthCompletion,
}

/// The most recently issued gateway operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingOperation {
    /// Generation stamped on the operation
    pub generation: u64,
    /// What was issued
    pub kind: OperationKind,
}

/// Session state owned by the session store.
///
/// Fields are only mutated by the session reducer. Readers use the
/// accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub(crate) status: SessionStatus,
    pub(crate) generation: u64,
    pub(crate) pending: Option<PendingOperation>,
    pub(crate) form: AuthFormState,
    pub(crate) oauth_selection: Option<OAuthProvider>,
    pub(crate) synced_at: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Fresh state for a page that has not hydrated yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State already signed in as `user`.
    #[must_use]
    pub fn authenticated(user: User) -> Self {
        Self {
            status: SessionStatus::Authenticated(user),
            ..Self::default()
        }
    }

    /// State already known to be signed out.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            status: SessionStatus::Anonymous,
            ..Self::default()
        }
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> &SessionStatus {
        &self.status
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        match self.status {
            SessionStatus::Initializing => SessionPhase::Initializing,
            SessionStatus::Authenticated(_) => SessionPhase::Authenticated,
            SessionStatus::Anonymous => SessionPhase::Anonymous,
            SessionStatus::Erroring { .. } => SessionPhase::Erroring,
        }
    }

    /// Signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match &self.status {
            SessionStatus::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Session error message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            SessionStatus::Erroring { message } => Some(message.as_str()),
            _ => None,
        }
    }

    /// `true` before hydration settles and while any gateway call is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.status, SessionStatus::Initializing) || self.pending.is_some()
    }

    /// `true` while a login or signup submission is in flight.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(
            self.pending,
            Some(PendingOperation {
                kind: OperationKind::Login | OperationKind::Signup,
                ..
            })
        )
    }

    /// Generation of the most recently issued operation.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Operation in flight, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<PendingOperation> {
        self.pending
    }

    /// Credential screen state.
    #[must_use]
    pub const fn form(&self) -> &AuthFormState {
        &self.form
    }

    /// Provider picked on the credential screen, awaiting a role.
    #[must_use]
    pub const fn oauth_selection(&self) -> Option<OAuthProvider> {
        self.oauth_selection
    }

    /// When a user was last committed from a gateway response.
    #[must_use]
    pub const fn synced_at(&self) -> Option<DateTime<Utc>> {
        self.synced_at
    }

    // ─── reducer helpers ───────────────────────────────────────────

    /// Issue a new operation; it supersedes any operation still in flight.
    pub(crate) fn begin(&mut self, kind: OperationKind) -> u64 {
        self.generation += 1;
        self.pending = Some(PendingOperation {
            generation: self.generation,
            kind,
        });
        self.generation
    }

    /// Whether a completion stamped with `generation` may commit.
    pub(crate) const fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Finish the current operation without assigning a user.
    ///
    /// A session that never hydrated is treated as signed out from here on.
    pub(crate) fn settle(&mut self) {
        self.pending = None;
        if matches!(self.status, SessionStatus::Initializing) {
            self.status = SessionStatus::Anonymous;
        }
    }

    /// Finish the current operation by committing a user.
    pub(crate) fn commit_user(&mut self, user: User, at: DateTime<Utc>) {
        self.pending = None;
        self.status = SessionStatus::Authenticated(user);
        self.synced_at = Some(at);
    }
}
