//! Mock provider implementations for testing.
//!
//! In-memory implementations of the provider traits for unit and
//! integration tests. Enabled by the `test-utils` feature.

pub mod identity;
pub mod navigation;

pub use identity::{Gate, GatewayCall, MockIdentityGateway};
pub use navigation::{NavigationEvent, RecordingNavigator, StaticLocation};
