//! Progress notifications from a running deployment.

use alloy_primitives::{Address, U256};

use crate::{DeployedContract, OwnershipTransfer};

/// Receives each confirmed step as soon as it happens.
///
/// A run that fails part-way has already reported every step that made it on-chain.
pub trait DeployObserver {
    /// The deployer identity and chain are known; nothing has been submitted yet.
    fn on_start(&self, _deployer: Address, _chain_id: u64) {}

    /// The deployer balance was read.
    fn on_balance(&self, _deployer: Address, _balance: U256) {}

    /// A contract creation was confirmed.
    fn on_contract_deployed(&self, _contract: &DeployedContract) {}

    /// An ownership transfer was confirmed.
    fn on_ownership_transferred(&self, _transfer: &OwnershipTransfer) {}
}

/// Ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DeployObserver for NoopObserver {}
