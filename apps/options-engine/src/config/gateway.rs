//! Market data gateway cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::services::GatewayConfig;

/// Cache lifetimes and capacity. A `null` TTL keeps entries until evicted
/// by capacity or invalidation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayCacheConfig {
    /// Quote TTL in seconds.
    #[serde(default = "default_quote_ttl_secs")]
    pub quote_ttl_secs: Option<u64>,
    /// Expiration list TTL in seconds.
    #[serde(default = "default_expirations_ttl_secs")]
    pub expirations_ttl_secs: Option<u64>,
    /// Chain TTL in seconds.
    #[serde(default = "default_chain_ttl_secs")]
    pub chain_ttl_secs: Option<u64>,
    /// Maximum entries per cache.
    #[serde(default = "default_max_entries")]
    pub max_entries: Option<usize>,
}

impl Default for GatewayCacheConfig {
    fn default() -> Self {
        Self {
            quote_ttl_secs: default_quote_ttl_secs(),
            expirations_ttl_secs: default_expirations_ttl_secs(),
            chain_ttl_secs: default_chain_ttl_secs(),
            max_entries: default_max_entries(),
        }
    }
}

impl GatewayCacheConfig {
    /// Convert to the gateway's runtime settings.
    #[must_use]
    pub fn to_gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            quote_ttl: self.quote_ttl_secs.map(Duration::from_secs),
            expirations_ttl: self.expirations_ttl_secs.map(Duration::from_secs),
            chain_ttl: self.chain_ttl_secs.map(Duration::from_secs),
            max_entries: self.max_entries,
        }
    }
}

const fn default_quote_ttl_secs() -> Option<u64> {
    Some(15)
}

const fn default_expirations_ttl_secs() -> Option<u64> {
    Some(3600)
}

const fn default_chain_ttl_secs() -> Option<u64> {
    Some(60)
}

const fn default_max_entries() -> Option<usize> {
    Some(1024)
}
