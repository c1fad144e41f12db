use alloy_primitives::Address;

use crate::{ArtifactError, ChainError};

/// Error types for a deployment run.
///
/// Nothing is recovered locally: every variant aborts the remaining sequence.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Missing or invalid signing credential or network parameters
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A contract artifact could not be loaded
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// The deployment plan is inconsistent
    #[error("invalid deployment plan: {0}")]
    InvalidPlan(String),

    /// A submitted transaction was rejected or reverted
    #[error("{step} failed: {source}")]
    TransactionFailure {
        /// The step that submitted the transaction
        step: String,
        /// The underlying chain error
        source: ChainError,
    },

    /// The chain client could not reach the network
    #[error("{step} failed, network unreachable: {source}")]
    Connectivity {
        /// The step that was running
        step: String,
        /// The underlying chain error
        source: ChainError,
    },

    /// A label referenced by an expectation or report does not resolve to an address
    #[error("no address recorded for `{0}`")]
    UnknownLabel(String),

    /// On-chain state does not match what the deployment should have produced
    #[error("verification of {target} failed: {check} returned {actual}, expected {expected}")]
    Verification {
        /// Label of the contract that was queried
        target: String,
        /// The getter that was queried
        check: String,
        /// The address the getter returned
        actual: Address,
        /// The address the deployment should have produced
        expected: Address,
    },
}

impl DeployError {
    /// Classifies a chain client error raised while running `step`.
    pub fn from_chain(step: impl Into<String>, source: ChainError) -> Self {
        let step = step.into();
        if source.is_connectivity() {
            Self::Connectivity { step, source }
        } else {
            Self::TransactionFailure { step, source }
        }
    }
}

/// Result type for deployment operations
pub type Result<T> = std::result::Result<T, DeployError>;
