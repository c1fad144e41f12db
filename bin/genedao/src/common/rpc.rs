//! JSON-RPC backed [`ChainClient`].

use std::time::Duration;

use alloy_network::{Ethereum, EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::{
    DynProvider, PendingTransactionBuilder, PendingTransactionError, Provider, ProviderBuilder,
};
use alloy_rpc_types_eth::{TransactionReceipt, TransactionRequest};
use alloy_transport::{RpcError, TransportError};
use async_trait::async_trait;
use genedao_deploy::{CallReceipt, ChainClient, ChainError, DeployError, DeployReceipt, DeployRequest};
use tracing::{debug, info};

use super::NetworkConfig;

/// A [`ChainClient`] talking to a node over HTTP, signing locally with the deployer key.
#[derive(Debug, Clone)]
pub struct RpcChainClient {
    provider: DynProvider,
    signer: Address,
    confirmations: u64,
    tx_timeout: Option<Duration>,
}

impl RpcChainClient {
    /// Connects to the configured node and checks that it serves the configured chain.
    pub async fn connect(config: &NetworkConfig) -> Result<Self, DeployError> {
        let wallet = EthereumWallet::from(config.signer.clone());
        let provider = ProviderBuilder::new().wallet(wallet).connect_http(config.rpc_url.clone());
        let client = Self {
            provider: DynProvider::new(provider),
            signer: config.deployer(),
            confirmations: config.confirmations,
            tx_timeout: config.tx_timeout,
        };

        let chain_id =
            client.chain_id().await.map_err(|e| DeployError::from_chain("connect", e))?;
        if chain_id != config.chain_id {
            return Err(DeployError::Configuration(format!(
                "RPC endpoint {} serves chain {chain_id}, expected {}",
                config.rpc_url, config.chain_id
            )));
        }
        info!(rpc_url = %config.rpc_url, chain_id, "Connected");
        Ok(client)
    }

    /// Waits for `pending` to be confirmed and checks the receipt status.
    async fn confirm(
        &self,
        pending: PendingTransactionBuilder<Ethereum>,
    ) -> Result<TransactionReceipt, ChainError> {
        let tx_hash = *pending.tx_hash();
        debug!(%tx_hash, confirmations = self.confirmations, "Waiting for confirmation");

        let receipt = pending
            .with_required_confirmations(self.confirmations)
            .with_timeout(self.tx_timeout)
            .get_receipt()
            .await
            .map_err(classify_pending_error)?;
        let receipt = ensure_success(receipt)?;
        debug!(%tx_hash, gas_used = receipt.gas_used(), "Transaction confirmed");
        Ok(receipt)
    }
}

/// Rejects receipts of transactions that were mined but failed.
fn ensure_success(receipt: TransactionReceipt) -> Result<TransactionReceipt, ChainError> {
    if !receipt.status() {
        return Err(ChainError::Reverted { tx_hash: receipt.transaction_hash });
    }
    Ok(receipt)
}

/// Reads the created contract from a successful creation receipt.
fn deploy_receipt(receipt: &TransactionReceipt) -> Result<DeployReceipt, ChainError> {
    let address = receipt
        .contract_address
        .ok_or(ChainError::MissingAddress { tx_hash: receipt.transaction_hash })?;
    Ok(DeployReceipt { address, tx_hash: receipt.transaction_hash })
}

fn call_receipt(receipt: &TransactionReceipt) -> CallReceipt {
    CallReceipt { tx_hash: receipt.transaction_hash, gas_used: receipt.gas_used() }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    fn signer(&self) -> Address {
        self.signer
    }

    async fn chain_id(&self) -> Result<u64, ChainError> {
        self.provider.get_chain_id().await.map_err(classify_transport_error)
    }

    async fn balance(&self, address: Address) -> Result<U256, ChainError> {
        self.provider.get_balance(address).await.map_err(classify_transport_error)
    }

    async fn deploy(&self, request: &DeployRequest) -> Result<DeployReceipt, ChainError> {
        let tx = TransactionRequest::default()
            .with_from(self.signer)
            .with_deploy_code(request.init_code());
        let pending =
            self.provider.send_transaction(tx).await.map_err(classify_transport_error)?;
        let receipt = self.confirm(pending).await?;
        deploy_receipt(&receipt)
    }

    async fn send(&self, to: Address, calldata: Bytes) -> Result<CallReceipt, ChainError> {
        let tx =
            TransactionRequest::default().with_from(self.signer).with_to(to).with_input(calldata);
        let pending =
            self.provider.send_transaction(tx).await.map_err(classify_transport_error)?;
        let receipt = self.confirm(pending).await?;
        Ok(call_receipt(&receipt))
    }

    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, ChainError> {
        let tx = TransactionRequest::default().with_to(to).with_input(calldata);
        self.provider.call(tx).await.map_err(classify_transport_error)
    }
}

/// Splits transport errors into node rejections and connectivity failures.
pub fn classify_transport_error(err: TransportError) -> ChainError {
    match &err {
        RpcError::ErrorResp(payload) => ChainError::Rejected(payload.message.to_string()),
        RpcError::Transport(_) => ChainError::Connectivity(err.to_string()),
        _ => ChainError::MalformedResponse(err.to_string()),
    }
}

fn classify_pending_error(err: PendingTransactionError) -> ChainError {
    match err {
        PendingTransactionError::TransportError(err) => classify_transport_error(err),
        other => ChainError::Connectivity(other.to_string()),
    }
}
