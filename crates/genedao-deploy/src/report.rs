use std::collections::BTreeMap;

use alloy_primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};

/// A contract created during the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedContract {
    /// Plan label
    pub label: String,
    /// Artifact name
    pub contract: String,
    /// Address of the contract
    pub address: Address,
    /// Hash of the creation transaction
    pub tx_hash: TxHash,
    /// Addresses passed to the constructor, in order
    pub constructor_args: Vec<Address>,
}

/// A confirmed ownership transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipTransfer {
    /// Label of the contract whose owner changed
    pub label: String,
    /// Address of the contract whose owner changed
    pub contract: Address,
    /// Label of the new owner
    pub new_owner_label: String,
    /// Address of the new owner
    pub new_owner: Address,
    /// Hash of the `transferOwnership` transaction
    pub tx_hash: TxHash,
}

/// Everything a deployment run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentReport {
    /// Name of the network the run targeted, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// Chain the contracts live on
    pub chain_id: u64,
    /// Address that signed every transaction
    pub deployer: Address,
    /// Deployer balance read before the first transaction, if it was read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployer_balance: Option<U256>,
    /// Contracts in creation order
    pub contracts: Vec<DeployedContract>,
    /// Ownership transfers in submission order
    pub ownership_transfers: Vec<OwnershipTransfer>,
    /// Whether post-deployment verification ran and passed
    #[serde(default)]
    pub verified: bool,
}

impl DeploymentReport {
    /// Address recorded for `label`.
    pub fn address_of(&self, label: &str) -> Option<Address> {
        self.contracts.iter().find(|c| c.label == label).map(|c| c.address)
    }

    /// Label to address map of all created contracts.
    pub fn addresses(&self) -> BTreeMap<String, Address> {
        self.contracts.iter().map(|c| (c.label.clone(), c.address)).collect()
    }
}
