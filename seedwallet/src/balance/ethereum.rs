//! Ethereum balance oracle

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use ethers_core::types::{Address, U256};
use ethers_providers::{Authorization, Http, Middleware, Provider};
use reqwest::Url;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::crypto::keys::Chain;
use crate::error::{Error, Result};
use super::{Balance, BalanceOracle};

/// Ethereum oracle
pub struct EthereumRpcOracle {
    config: ProviderConfig,
    provider: Arc<Provider<Http>>,
}

impl EthereumRpcOracle {
    /// Create a new Ethereum oracle
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let provider = Provider::new(http_transport(&config)?);

        Ok(Self {
            config,
            provider: Arc::new(provider),
        })
    }
}

/// HTTP transport, authenticated with the API key when one is set
fn http_transport(config: &ProviderConfig) -> Result<Http> {
    let url = Url::parse(&config.url)
        .map_err(|e| Error::Config(format!("Failed to create Ethereum provider: {}", e)))?;

    match &config.api_key {
        Some(key) => Http::new_with_auth(url, Authorization::bearer(key.as_str()))
            .map_err(|e| Error::Config(format!("Failed to create Ethereum provider: {}", e))),
        None => Ok(Http::new(url)),
    }
}

/// Convert wei to a native-unit balance
fn wei_to_balance(wei: U256) -> Option<Balance> {
    if wei.bits() > 128 {
        return None;
    }
    Balance::from_base_units(wei.as_u128(), Chain::Ethereum.decimals())
}

#[async_trait]
impl BalanceOracle for EthereumRpcOracle {
    fn chain(&self) -> Chain {
        Chain::Ethereum
    }

    async fn fetch_balance(&self, public_id: &str) -> Result<Balance> {
        let address = Address::from_str(public_id)
            .map_err(|e| Error::Provider(format!("Invalid Ethereum address: {}", e)))?;

        let wei = tokio::time::timeout(self.config.timeout(), self.provider.get_balance(address, None))
            .await
            .map_err(|_| Error::Provider("Balance request timed out".to_string()))?
            .map_err(|e| Error::Provider(format!("Failed to fetch balance: {}", e)))?;
        debug!(public_id, %wei, "fetched ethereum balance");

        wei_to_balance(wei)
            .ok_or_else(|| Error::Provider(format!("Balance out of range: {} wei", wei)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wei_conversion() {
        let one_and_a_half = U256::from(1_500_000_000_000_000_000u128);
        assert_eq!(wei_to_balance(one_and_a_half).unwrap().to_string(), "1.5");
        assert_eq!(wei_to_balance(U256::zero()).unwrap(), Balance::ZERO);
        assert!(wei_to_balance(U256::MAX).is_none());
    }

    #[tokio::test]
    async fn test_invalid_address_is_rejected() {
        let oracle = EthereumRpcOracle::new(ProviderConfig::http("http://127.0.0.1:9")).unwrap();
        assert!(oracle.fetch_balance("not-an-address").await.is_err());
        assert_eq!(oracle.lookup("not-an-address").await, Balance::ZERO);
    }

    /// Serve one JSON-RPC response and hand back the request head
    async fn capture_request_head() -> (String, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let body = r#"{"jsonrpc":"2.0","id":1,"result":"0x0"}"#;
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            String::from_utf8_lossy(&request).to_lowercase()
        });

        (url, server)
    }

    const ADDRESS: &str = "0x9858EfFD232B4033E47d90003D41EC34EcaEda94";

    #[tokio::test]
    async fn test_api_key_is_sent_as_bearer_token() {
        let (url, server) = capture_request_head().await;
        let mut config = ProviderConfig::http(url);
        config.api_key = Some("secret-key".to_string());

        let oracle = EthereumRpcOracle::new(config).unwrap();
        let _ = oracle.fetch_balance(ADDRESS).await;

        let head = server.await.unwrap();
        assert!(head.contains("authorization: bearer secret-key"), "{}", head);
    }

    #[tokio::test]
    async fn test_no_authorization_without_api_key() {
        let (url, server) = capture_request_head().await;

        let oracle = EthereumRpcOracle::new(ProviderConfig::http(url)).unwrap();
        let _ = oracle.fetch_balance(ADDRESS).await;

        let head = server.await.unwrap();
        assert!(head.starts_with("post"));
        assert!(!head.contains("authorization:"));
    }

    #[test]
    fn test_invalid_url_is_a_config_error() {
        let result = EthereumRpcOracle::new(ProviderConfig::http("not a url"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
