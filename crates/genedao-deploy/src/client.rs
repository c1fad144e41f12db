//! The chain client port consumed by the orchestrator.

use alloy_primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;

/// Errors reported by a [`ChainClient`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    /// The node rejected the request (JSON-RPC error response, e.g. insufficient funds or a
    /// revert during gas estimation)
    #[error("rejected by node: {0}")]
    Rejected(String),

    /// The transaction was mined but its receipt reports failure
    #[error("transaction {tx_hash} reverted")]
    Reverted {
        /// Hash of the failed transaction
        tx_hash: TxHash,
    },

    /// A contract-creation receipt carried no contract address
    #[error("receipt of creation transaction {tx_hash} has no contract address")]
    MissingAddress {
        /// Hash of the creation transaction
        tx_hash: TxHash,
    },

    /// The node returned data that could not be interpreted
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The node could not be reached
    #[error("network unreachable: {0}")]
    Connectivity(String),
}

impl ChainError {
    /// Whether this error means the network could not be reached at all.
    pub const fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity(_))
    }
}

/// A contract-creation transaction ready to be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    /// Name of the contract being created
    pub contract: String,
    /// Creation bytecode taken from the artifact
    pub bytecode: Bytes,
    /// ABI-encoded constructor arguments, appended to the bytecode on submission
    pub constructor_args: Bytes,
}

impl DeployRequest {
    /// The full init code: creation bytecode followed by the encoded constructor arguments.
    pub fn init_code(&self) -> Bytes {
        let mut code = Vec::with_capacity(self.bytecode.len() + self.constructor_args.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(&self.constructor_args);
        code.into()
    }
}

/// A confirmed contract creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployReceipt {
    /// Address of the created contract
    pub address: Address,
    /// Hash of the creation transaction
    pub tx_hash: TxHash,
}

/// A confirmed method call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallReceipt {
    /// Hash of the transaction
    pub tx_hash: TxHash,
    /// Gas consumed by the transaction
    pub gas_used: u64,
}

/// Signs and submits transactions to a network and reports confirmations.
///
/// Every mutating operation resolves only once the transaction is confirmed. Implementations
/// must not retry on their own.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// The address of the signing identity used for every transaction.
    fn signer(&self) -> Address;

    /// The chain id of the connected network.
    async fn chain_id(&self) -> Result<u64, ChainError>;

    /// Balance of `address` in wei.
    async fn balance(&self, address: Address) -> Result<U256, ChainError>;

    /// Submits a contract creation and waits for its confirmation.
    async fn deploy(&self, request: &DeployRequest) -> Result<DeployReceipt, ChainError>;

    /// Submits a method call to `to` with ABI-encoded `calldata` and waits for its confirmation.
    async fn send(&self, to: Address, calldata: Bytes) -> Result<CallReceipt, ChainError>;

    /// Executes a read-only call against the latest state.
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, ChainError>;
}
