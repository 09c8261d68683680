//! Balance lookups
//!
//! Each chain has a [`BalanceOracle`] that asks a remote node for an
//! account's holdings. Lookups never fail from the caller's point of view:
//! any provider error is logged and degraded to [`Balance::ZERO`].

mod ethereum;
mod solana;

pub use ethereum::EthereumRpcOracle;
pub use solana::SolanaRpcOracle;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::OracleConfig;
use crate::crypto::keys::Chain;
use crate::error::Result;

/// Account balance in the chain's native unit (SOL, ETH)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Balance(Decimal);

impl Balance {
    pub const ZERO: Balance = Balance(Decimal::ZERO);

    /// Build from base units (lamports, wei) with `decimals` fractional digits.
    ///
    /// Returns `None` when the value does not fit a `Decimal`.
    pub fn from_base_units(units: u128, decimals: u32) -> Option<Self> {
        let units = i128::try_from(units).ok()?;
        Decimal::try_from_i128_with_scale(units, decimals)
            .ok()
            .map(|value| Self(value.normalize()))
    }

    /// The value in the native unit
    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// Asynchronous balance lookup for one chain
#[async_trait]
pub trait BalanceOracle: Send + Sync {
    /// Chain this oracle queries
    fn chain(&self) -> Chain;

    /// Query the balance, surfacing provider failures
    async fn fetch_balance(&self, public_id: &str) -> Result<Balance>;

    /// Query the balance, degrading any failure to [`Balance::ZERO`]
    async fn lookup(&self, public_id: &str) -> Balance {
        match self.fetch_balance(public_id).await {
            Ok(balance) => balance,
            Err(e) => {
                warn!(chain = %self.chain(), public_id, error = %e, "balance lookup failed, using zero");
                Balance::ZERO
            }
        }
    }
}

/// One oracle per chain
#[derive(Clone)]
pub struct OracleSet {
    solana: Arc<dyn BalanceOracle>,
    ethereum: Arc<dyn BalanceOracle>,
}

impl OracleSet {
    pub fn new(solana: Arc<dyn BalanceOracle>, ethereum: Arc<dyn BalanceOracle>) -> Self {
        Self { solana, ethereum }
    }

    /// Build the HTTP oracles described by the configuration
    pub fn from_config(config: &OracleConfig) -> Result<Self> {
        Ok(Self {
            solana: Arc::new(SolanaRpcOracle::new(config.solana.clone())?),
            ethereum: Arc::new(EthereumRpcOracle::new(config.ethereum.clone())?),
        })
    }

    /// Get the oracle for a chain
    pub fn get(&self, chain: Chain) -> Arc<dyn BalanceOracle> {
        match chain {
            Chain::Solana => self.solana.clone(),
            Chain::Ethereum => self.ethereum.clone(),
        }
    }
}

impl fmt::Debug for OracleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OracleSet").finish_non_exhaustive()
    }
}
