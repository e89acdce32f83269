//! Session providers.
//!
//! Traits for everything the session reducer reaches outside the process:
//! the backend identity API and the browser's navigation surface. The
//! reducer depends only on these traits; applications inject concrete
//! implementations and tests inject the mocks.

pub mod identity;
pub mod navigator;

// Re-export provider traits
pub use identity::IdentityGateway;
pub use navigator::{Location, Navigator};
