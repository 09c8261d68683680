//! Solana balance oracle over JSON-RPC

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::crypto::keys::{solana, Chain};
use crate::error::{Error, Result};
use super::{Balance, BalanceOracle};

/// `getBalance` result envelope
#[derive(Debug, Deserialize)]
struct BalanceResult {
    value: u64,
}

/// Solana oracle
pub struct SolanaRpcOracle {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl SolanaRpcOracle {
    /// Create a new Solana oracle
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Send a JSON-RPC request
    async fn send_request<T: serde::de::DeserializeOwned>(&self, method: &str, params: Vec<serde_json::Value>) -> Result<T> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let mut builder = self.client.post(&self.config.url).json(&request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Failed to send request: {}", e)))?;

        let response_json: serde_json::Value = response.json()
            .await
            .map_err(|e| Error::Provider(format!("Failed to parse response: {}", e)))?;

        if let Some(error) = response_json.get("error") {
            return Err(Error::Provider(format!("JSON-RPC error: {}", error)));
        }

        let result = response_json.get("result")
            .ok_or_else(|| Error::Provider("No result in response".to_string()))?;

        serde_json::from_value(result.clone())
            .map_err(|e| Error::Provider(format!("Failed to parse result: {}", e)))
    }
}

#[async_trait]
impl BalanceOracle for SolanaRpcOracle {
    fn chain(&self) -> Chain {
        Chain::Solana
    }

    async fn fetch_balance(&self, public_id: &str) -> Result<Balance> {
        if !solana::is_valid_public_key(public_id) {
            return Err(Error::Provider(format!("Invalid Solana public key: {}", public_id)));
        }

        let result: BalanceResult = self
            .send_request("getBalance", vec![serde_json::Value::from(public_id)])
            .await?;
        debug!(public_id, lamports = result.value, "fetched solana balance");

        Balance::from_base_units(u128::from(result.value), Chain::Solana.decimals())
            .ok_or_else(|| Error::Provider(format!("Balance out of range: {} lamports", result.value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_public_key_is_rejected_before_request() {
        let oracle = SolanaRpcOracle::new(ProviderConfig::http("http://127.0.0.1:9")).unwrap();
        let err = oracle.fetch_balance("not-base58-0OIl").await.unwrap_err();
        assert!(err.to_string().contains("Invalid Solana public key"));
    }

    #[test]
    fn test_balance_result_parsing() {
        let json = serde_json::json!({ "context": { "slot": 1 }, "value": 2_500_000_000u64 });
        let result: BalanceResult = serde_json::from_value(json).unwrap();
        let balance = Balance::from_base_units(u128::from(result.value), 9).unwrap();
        assert_eq!(balance.to_string(), "2.5");
    }
}
