//! Session environment.
//!
//! Everything the session reducer needs from outside, injected at store
//! construction.

use crate::config::GatewayConfig;
use crate::providers::{IdentityGateway, Navigator};
use relief_ops_core::environment::Clock;

/// Session environment.
///
/// # Type Parameters
///
/// - `G`: Identity gateway
/// - `N`: Navigator
/// - `C`: Clock
#[derive(Clone)]
pub struct SessionEnvironment<G, N, C>
where
    G: IdentityGateway + Clone,
    N: Navigator + Clone,
    C: Clock + Clone,
{
    /// Backend identity API.
    pub gateway: G,

    /// Page navigation.
    pub navigator: N,

    /// Time source for `synced_at`.
    pub clock: C,

    /// Backend origin and request settings.
    pub config: GatewayConfig,
}

impl<G, N, C> SessionEnvironment<G, N, C>
where
    G: IdentityGateway + Clone,
    N: Navigator + Clone,
    C: Clock + Clone,
{
    /// Create a new session environment.
    #[must_use]
    pub const fn new(gateway: G, navigator: N, clock: C, config: GatewayConfig) -> Self {
        Self {
            gateway,
            navigator,
            clock,
            config,
        }
    }
}
