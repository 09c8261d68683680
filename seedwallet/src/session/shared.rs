//! Session shared across tasks
//!
//! Registry mutations are serialized by one mutex. Balance lookups run in
//! their own tasks without holding it, and re-acquire it only to patch the
//! wallet they were started for.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::warn;
use zeroize::Zeroizing;

use crate::account::VisibilityTarget;
use crate::balance::OracleSet;
use crate::crypto::keys::Chain;
use crate::error::Result;
use super::{CopyTarget, SessionSnapshot, WalletSession};

/// An in-flight balance lookup for a newly derived wallet
#[derive(Debug)]
pub struct BalanceRefresh {
    /// Position the wallet was appended at
    pub index: usize,
    task: JoinHandle<bool>,
}

impl BalanceRefresh {
    /// Wait for the lookup. Returns `false` if the wallet was deleted first.
    pub async fn applied(self) -> bool {
        match self.task.await {
            Ok(applied) => applied,
            Err(e) => {
                warn!(error = %e, "balance refresh task failed");
                false
            }
        }
    }
}

/// Cloneable handle to a session and its balance oracles
#[derive(Debug, Clone)]
pub struct SessionHandle {
    session: Arc<Mutex<WalletSession>>,
    oracles: OracleSet,
}

impl SessionHandle {
    pub fn new(session: WalletSession, oracles: OracleSet) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            oracles,
        }
    }

    /// Exclusive access to the session
    pub async fn lock(&self) -> MutexGuard<'_, WalletSession> {
        self.session.lock().await
    }

    pub async fn generate_mnemonic(&self) -> Result<bool> {
        self.session.lock().await.generate_mnemonic()
    }

    /// Derive a wallet now and fetch its balance in the background
    pub async fn generate_wallet(&self, chain: Chain) -> Result<BalanceRefresh> {
        let pending = self.session.lock().await.derive_wallet(chain)?;
        let index = pending.index;

        let oracle = self.oracles.get(chain);
        let session = Arc::clone(&self.session);
        let task = tokio::spawn(async move {
            let balance = oracle.lookup(&pending.public_id).await;
            session.lock().await.apply_balance(&pending, balance)
        });

        Ok(BalanceRefresh { index, task })
    }

    pub async fn delete_wallet(&self, chain: Chain, index: usize) -> Result<()> {
        self.session.lock().await.delete_wallet(chain, index)
    }

    pub async fn toggle_visibility(&self, target: VisibilityTarget) -> Result<bool> {
        self.session.lock().await.toggle_visibility(target)
    }

    pub async fn copy_text(&self, target: CopyTarget) -> Result<Zeroizing<String>> {
        self.session.lock().await.copy_text(target)
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }
}
