//! Wallet accounts
//!
//! This module holds the wallets derived in a session, their reveal flags
//! and the controller that toggles them.

mod registry;
mod visibility;
mod wallet;

pub use registry::*;
pub use visibility::*;
pub use wallet::*;
