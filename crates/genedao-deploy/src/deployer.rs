//! The deployment orchestrator.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use alloy_primitives::{Address, U256};
use tracing::{debug, info, warn};

use crate::{
    abi, verify, ArtifactSource, ChainClient, ContractArtifact, DeployError, DeployObserver,
    DeployRequest, DeployedContract, DeploymentPlan, DeploymentReport, NoopObserver,
    OwnershipTransfer, Result, Step,
};

/// What to do with the deployer balance before the first transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BalancePolicy {
    /// Do not read the balance
    Skip,
    /// Read and log the balance; a failed read is logged and ignored
    #[default]
    Report,
    /// Read the balance; a failed read or an empty account aborts the run
    Require,
}

/// Knobs for a deployment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployOptions {
    /// Balance handling
    pub balance: BalancePolicy,
    /// Whether to check on-chain state after the last step
    pub verify: bool,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self { balance: BalancePolicy::default(), verify: true }
    }
}

/// Executes a [`DeploymentPlan`] step by step against a [`ChainClient`].
///
/// Each step waits for its transaction to be confirmed before the next one is submitted. The
/// first failure aborts the run; confirmed steps are not undone, and a new run deploys new
/// contract instances. Confirmed steps are announced to the [`DeployObserver`] as they happen,
/// so a failed run still tells the caller what is already on-chain.
pub struct Deployer<'a, C: ?Sized, A: ?Sized> {
    client: &'a C,
    artifacts: &'a A,
    plan: &'a DeploymentPlan,
    options: DeployOptions,
    observer: &'a dyn DeployObserver,
}

impl<C: ?Sized, A: ?Sized> fmt::Debug for Deployer<'_, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deployer")
            .field("plan", self.plan)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'a, C, A> Deployer<'a, C, A>
where
    C: ChainClient + ?Sized,
    A: ArtifactSource + ?Sized,
{
    /// Creates a deployer with default options.
    pub fn new(client: &'a C, artifacts: &'a A, plan: &'a DeploymentPlan) -> Self {
        Self {
            client,
            artifacts,
            plan,
            options: DeployOptions::default(),
            observer: &NoopObserver,
        }
    }

    /// Replaces the options.
    pub fn with_options(mut self, options: DeployOptions) -> Self {
        self.options = options;
        self
    }

    /// Sends progress to `observer`.
    pub fn with_observer(mut self, observer: &'a dyn DeployObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Runs the plan to completion.
    pub async fn run(&self) -> Result<DeploymentReport> {
        // Step 1: Load every artifact before submitting anything
        let artifacts = self.load_artifacts()?;

        // Step 2: Resolve the deployer identity
        let deployer = self.client.signer();
        info!(%deployer, "Deploying contracts with the account");
        let chain_id =
            self.client.chain_id().await.map_err(|e| DeployError::from_chain("read chain id", e))?;
        self.observer.on_start(deployer, chain_id);
        let deployer_balance = self.read_balance(deployer).await?;

        let mut report = DeploymentReport {
            network: None,
            chain_id,
            deployer,
            deployer_balance,
            contracts: Vec::new(),
            ownership_transfers: Vec::new(),
            verified: false,
        };
        let mut addresses = BTreeMap::new();

        // Step 3: Execute the plan in order
        for step in self.plan.steps() {
            match step {
                Step::Deploy { label, contract, args } => {
                    let constructor_args = args
                        .iter()
                        .map(|arg| resolve(&addresses, arg))
                        .collect::<Result<Vec<_>>>()?;
                    let deployed = self
                        .deploy(step, label, &artifacts[contract.as_str()], constructor_args)
                        .await?;
                    addresses.insert(label.clone(), deployed.address);
                    self.observer.on_contract_deployed(&deployed);
                    report.contracts.push(deployed);
                }
                Step::TransferOwnership { target, new_owner } => {
                    let contract = resolve(&addresses, target)?;
                    let owner = resolve(&addresses, new_owner)?;
                    debug!(%contract, new_owner = %owner, "Transferring ownership");
                    let receipt = self
                        .client
                        .send(contract, abi::transfer_ownership_calldata(owner))
                        .await
                        .map_err(|e| DeployError::from_chain(step.to_string(), e))?;
                    info!(
                        label = %target,
                        new_owner = %new_owner,
                        tx_hash = %receipt.tx_hash,
                        gas_used = receipt.gas_used,
                        "Ownership transferred"
                    );
                    let transfer = OwnershipTransfer {
                        label: target.clone(),
                        contract,
                        new_owner_label: new_owner.clone(),
                        new_owner: owner,
                        tx_hash: receipt.tx_hash,
                    };
                    self.observer.on_ownership_transferred(&transfer);
                    report.ownership_transfers.push(transfer);
                }
            }
        }

        // Step 4: Check the result on-chain
        if self.options.verify {
            verify(self.client, &self.plan.expectations(), &addresses).await?;
            report.verified = true;
        }

        Ok(report)
    }

    fn load_artifacts(&self) -> Result<HashMap<String, ContractArtifact>> {
        let mut artifacts = HashMap::new();
        for name in self.plan.contracts() {
            if !artifacts.contains_key(name) {
                artifacts.insert(name.to_string(), self.artifacts.load(name)?);
            }
        }
        debug!(count = artifacts.len(), "Artifacts loaded");
        Ok(artifacts)
    }

    async fn read_balance(&self, deployer: Address) -> Result<Option<U256>> {
        match self.options.balance {
            BalancePolicy::Skip => Ok(None),
            BalancePolicy::Report => match self.client.balance(deployer).await {
                Ok(balance) => {
                    info!(%balance, "Account balance");
                    self.observer.on_balance(deployer, balance);
                    Ok(Some(balance))
                }
                Err(err) => {
                    warn!(%err, "Failed to read account balance, continuing");
                    Ok(None)
                }
            },
            BalancePolicy::Require => {
                let balance = self
                    .client
                    .balance(deployer)
                    .await
                    .map_err(|e| DeployError::from_chain("read deployer balance", e))?;
                info!(%balance, "Account balance");
                self.observer.on_balance(deployer, balance);
                if balance.is_zero() {
                    return Err(DeployError::Configuration(format!(
                        "deployer {deployer} has no funds"
                    )));
                }
                Ok(Some(balance))
            }
        }
    }

    async fn deploy(
        &self,
        step: &Step,
        label: &str,
        artifact: &ContractArtifact,
        constructor_args: Vec<Address>,
    ) -> Result<DeployedContract> {
        let request = DeployRequest {
            contract: artifact.name.clone(),
            bytecode: artifact.bytecode.clone(),
            constructor_args: abi::encode_address_params(&constructor_args),
        };
        debug!(
            contract = %artifact.name,
            args = ?constructor_args,
            init_code_len = request.init_code().len(),
            "Submitting contract creation"
        );

        let receipt = self
            .client
            .deploy(&request)
            .await
            .map_err(|e| DeployError::from_chain(step.to_string(), e))?;
        info!(
            contract = %artifact.name,
            address = %receipt.address,
            tx_hash = %receipt.tx_hash,
            "Contract deployed"
        );

        Ok(DeployedContract {
            label: label.into(),
            contract: artifact.name.clone(),
            address: receipt.address,
            tx_hash: receipt.tx_hash,
            constructor_args,
        })
    }
}

fn resolve(addresses: &BTreeMap<String, Address>, label: &str) -> Result<Address> {
    addresses.get(label).copied().ok_or_else(|| DeployError::UnknownLabel(label.into()))
}
