//! # Relief Ops Session
//!
//! Session and identity client for the Relief Ops disaster-relief web client.
//!
//! ## Features
//!
//! - **Identity gateway**: credentialed calls to the backend identity API
//! - **OAuth hand-off**: provider sign-in URLs carrying the requested role
//! - **Form validation**: per-field errors before anything is sent
//! - **Session store**: one owner of the signed-in user, last-issued-wins
//! - **Role guards**: restricted pages checked by exhaustive role matches
//!
//! ## Architecture
//!
//! The session is a reducer over [`SessionState`] running in a
//! `relief-ops-runtime` store. Gateway calls and navigation are effects;
//! their outcomes come back as completion actions stamped with the
//! generation of the operation that issued them. A completion whose
//! generation is no longer the latest is dropped, so a slow refresh can
//! never bring back a user that a later logout cleared.
//!
//! ```text
//! screen ──► Session::login(form) ──► SessionReducer ──► gateway effect
//!                                          ▲                  │
//!                                          └── LoginCompleted ◄┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use relief_ops_core::environment::SystemClock;
//! use relief_ops_session::{
//!     GatewayConfig, HttpIdentityGateway, HeadlessNavigator, LoginForm, Session,
//!     SessionEnvironment,
//! };
//!
//! let config = GatewayConfig::from_env();
//! let gateway = HttpIdentityGateway::new(config.clone())?;
//! let session = Session::new(SessionEnvironment::new(
//!     gateway,
//!     HeadlessNavigator::new(),
//!     SystemClock,
//!     config,
//! ));
//!
//! session.login(LoginForm::new("ada@relief.example", "secret")).await?.wait().await;
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod actions;
pub mod config;
pub mod environment;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod navigation;
pub mod oauth;
pub mod providers;
pub mod reducers;
pub mod routes;
pub mod session;
pub mod state;
pub mod validation;

#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-export main types for convenience
pub use actions::SessionAction;
pub use config::GatewayConfig;
pub use environment::SessionEnvironment;
pub use error::{GatewayError, Result};
pub use gateway::HttpIdentityGateway;
pub use guard::{GuardDecision, RestrictedPage};
pub use navigation::HeadlessNavigator;
pub use reducers::SessionReducer;
pub use routes::{AuthNotice, Route};
pub use session::Session;
pub use state::{AuthMode, OAuthProvider, Role, SessionPhase, SessionState, SessionStatus, User};
pub use validation::{CredentialForm, FieldErrors, LoginForm, SignupForm};
