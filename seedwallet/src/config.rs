//! Balance provider configuration

use std::time::Duration;

const DEFAULT_SOLANA_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
const DEFAULT_ETHEREUM_RPC_URL: &str = "https://cloudflare-eth.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    /// JSON-RPC over HTTP
    Http,
}

/// Configuration for one RPC endpoint
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider type
    pub provider_type: ProviderType,
    /// Provider URL
    pub url: String,
    /// API key (if required), sent as a bearer token
    pub api_key: Option<String>,
    /// Timeout in seconds
    pub timeout: Option<u64>,
}

impl ProviderConfig {
    /// HTTP provider with the default timeout
    pub fn http(url: impl Into<String>) -> Self {
        Self {
            provider_type: ProviderType::Http,
            url: url.into(),
            api_key: None,
            timeout: Some(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Request timeout, falling back to the default
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

/// Endpoints for both balance oracles
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub solana: ProviderConfig,
    pub ethereum: ProviderConfig,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            solana: ProviderConfig::http(DEFAULT_SOLANA_RPC_URL),
            ethereum: ProviderConfig::http(DEFAULT_ETHEREUM_RPC_URL),
        }
    }
}

impl OracleConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup("SEEDWALLET_RPC_API_KEY").filter(|key| !key.is_empty());
        let timeout = lookup("SEEDWALLET_RPC_TIMEOUT_SECS")
            .and_then(|secs| secs.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let endpoint = |var: &str, default: &str| ProviderConfig {
            provider_type: ProviderType::Http,
            url: lookup(var).unwrap_or_else(|| default.to_string()),
            api_key: api_key.clone(),
            timeout: Some(timeout),
        };

        Self {
            solana: endpoint("SEEDWALLET_SOLANA_RPC_URL", DEFAULT_SOLANA_RPC_URL),
            ethereum: endpoint("SEEDWALLET_ETHEREUM_RPC_URL", DEFAULT_ETHEREUM_RPC_URL),
        }
    }
}
