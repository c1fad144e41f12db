use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use alloy_primitives::{keccak256, Address, Bytes, Selector, TxHash, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;

use super::DEV_ACCOUNT;
use crate::{
    abi::{self, IOwnable},
    CallReceipt, ChainClient, ChainError, ContractNames, DeployReceipt, DeployRequest,
};

/// A transaction submitted to a [`MockChain`], recorded whether or not it succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// A contract creation
    Deploy {
        /// Contract name
        contract: String,
        /// Decoded constructor arguments
        constructor_args: Vec<Address>,
    },
    /// A method call
    Send {
        /// Callee
        to: Address,
        /// Calldata
        calldata: Bytes,
    },
}

impl Submission {
    /// Whether this is a `transferOwnership` call.
    pub fn is_ownership_transfer(&self) -> bool {
        matches!(self, Self::Send { calldata, .. }
            if calldata.starts_with(&IOwnable::transferOwnershipCall::SELECTOR))
    }
}

#[derive(Debug, Clone)]
struct MockContract {
    name: String,
    constructor_args: Vec<Address>,
    owner: Address,
}

#[derive(Debug)]
struct MockChainState {
    nonce: u64,
    balance: U256,
    contracts: HashMap<Address, MockContract>,
    submissions: Vec<Submission>,
    sends: usize,
    failing_deploys: HashSet<String>,
    failing_sends: HashSet<usize>,
    views: HashMap<(String, Selector), usize>,
    offline: bool,
    balance_unavailable: bool,
    ignore_transfers: bool,
}

/// An in-memory chain with `Ownable` contracts and fault injection.
///
/// Contract addresses follow the `CREATE` rule (`signer.create(nonce)`), so every deployment
/// gets a fresh address. Clones share state.
#[derive(Debug, Clone)]
pub struct MockChain {
    signer: Address,
    chain_id: u64,
    state: Arc<Mutex<MockChainState>>,
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new(DEV_ACCOUNT, 31337)
    }
}

impl MockChain {
    /// Creates a chain where `signer` holds 10 ether.
    pub fn new(signer: Address, chain_id: u64) -> Self {
        let state = MockChainState {
            nonce: 0,
            balance: U256::from(10).pow(U256::from(19)),
            contracts: HashMap::new(),
            submissions: Vec::new(),
            sends: 0,
            failing_deploys: HashSet::new(),
            failing_sends: HashSet::new(),
            views: HashMap::new(),
            offline: false,
            balance_unavailable: false,
            ignore_transfers: false,
        };
        Self { signer, chain_id, state: Arc::new(Mutex::new(state)) }
    }

    /// A chain whose controller contract answers `geneNFT()` and `pcspToken()` with its
    /// constructor arguments.
    pub fn genedao() -> Self {
        let names = ContractNames::default();
        Self::default()
            .with_view(&names.controller, "geneNFT()", 0)
            .with_view(&names.controller, "pcspToken()", 1)
    }

    fn state(&self) -> MutexGuard<'_, MockChainState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes the zero-argument getter `signature` of every `contract` instance return its
    /// constructor argument at `arg_index`.
    pub fn with_view(self, contract: &str, signature: &str, arg_index: usize) -> Self {
        self.state().views.insert((contract.into(), abi::selector(signature)), arg_index);
        self
    }

    /// Sets the signer balance.
    pub fn with_balance(self, balance: U256) -> Self {
        self.state().balance = balance;
        self
    }

    /// Makes the constructor of `contract` revert.
    pub fn fail_deploy(self, contract: &str) -> Self {
        self.state().failing_deploys.insert(contract.into());
        self
    }

    /// Makes the `index`-th method call (0-based) revert.
    pub fn fail_send(self, index: usize) -> Self {
        self.state().failing_sends.insert(index);
        self
    }

    /// Makes every request fail as unreachable.
    pub fn offline(self) -> Self {
        self.state().offline = true;
        self
    }

    /// Makes balance reads fail while everything else works.
    pub fn balance_unavailable(self) -> Self {
        self.state().balance_unavailable = true;
        self
    }

    /// Confirms `transferOwnership` calls without changing the owner.
    pub fn ignore_transfers(self) -> Self {
        self.state().ignore_transfers = true;
        self
    }

    /// Every submission so far, in order.
    pub fn submissions(&self) -> Vec<Submission> {
        self.state().submissions.clone()
    }

    /// Current owner of the contract at `address`.
    pub fn owner_of(&self, address: Address) -> Option<Address> {
        self.state().contracts.get(&address).map(|c| c.owner)
    }

    /// Constructor arguments the contract at `address` was created with.
    pub fn constructor_args_of(&self, address: Address) -> Option<Vec<Address>> {
        self.state().contracts.get(&address).map(|c| c.constructor_args.clone())
    }

    /// Number of contracts created.
    pub fn contract_count(&self) -> usize {
        self.state().contracts.len()
    }

    fn tx_hash(&self, nonce: u64) -> TxHash {
        let mut preimage = self.signer.to_vec();
        preimage.extend_from_slice(&nonce.to_be_bytes());
        keccak256(preimage)
    }

    fn check_online(&self) -> Result<(), ChainError> {
        if self.state().offline {
            return Err(ChainError::Connectivity("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ChainClient for MockChain {
    fn signer(&self) -> Address {
        self.signer
    }

    async fn chain_id(&self) -> Result<u64, ChainError> {
        self.check_online()?;
        Ok(self.chain_id)
    }

    async fn balance(&self, address: Address) -> Result<U256, ChainError> {
        self.check_online()?;
        let state = self.state();
        if state.balance_unavailable {
            return Err(ChainError::Rejected("eth_getBalance is not available".into()));
        }
        Ok(if address == self.signer { state.balance } else { U256::ZERO })
    }

    async fn deploy(&self, request: &DeployRequest) -> Result<DeployReceipt, ChainError> {
        self.check_online()?;
        let constructor_args = request
            .constructor_args
            .chunks(32)
            .map(abi::decode_address)
            .collect::<Result<Vec<_>, _>>()?;

        let mut state = self.state();
        state.submissions.push(Submission::Deploy {
            contract: request.contract.clone(),
            constructor_args: constructor_args.clone(),
        });
        let nonce = state.nonce;
        state.nonce += 1;
        let tx_hash = self.tx_hash(nonce);

        if state.failing_deploys.contains(&request.contract) {
            return Err(ChainError::Reverted { tx_hash });
        }

        let address = self.signer.create(nonce);
        state.contracts.insert(
            address,
            MockContract { name: request.contract.clone(), constructor_args, owner: self.signer },
        );
        Ok(DeployReceipt { address, tx_hash })
    }

    async fn send(&self, to: Address, calldata: Bytes) -> Result<CallReceipt, ChainError> {
        self.check_online()?;
        let mut state = self.state();
        state.submissions.push(Submission::Send { to, calldata: calldata.clone() });
        let index = state.sends;
        state.sends += 1;
        let nonce = state.nonce;
        state.nonce += 1;
        let tx_hash = self.tx_hash(nonce);

        if state.failing_sends.contains(&index) {
            return Err(ChainError::Reverted { tx_hash });
        }

        let ignore_transfers = state.ignore_transfers;
        let signer = self.signer;
        let Some(contract) = state.contracts.get_mut(&to) else {
            return Err(ChainError::Reverted { tx_hash });
        };
        if !calldata.starts_with(&IOwnable::transferOwnershipCall::SELECTOR) {
            return Err(ChainError::Reverted { tx_hash });
        }
        let Ok(new_owner) = abi::decode_address(&calldata[4..]) else {
            return Err(ChainError::Reverted { tx_hash });
        };
        // Ownable: only the current owner may hand over ownership
        if contract.owner != signer {
            return Err(ChainError::Reverted { tx_hash });
        }
        if !ignore_transfers {
            contract.owner = new_owner;
        }
        Ok(CallReceipt { tx_hash, gas_used: 28_000 })
    }

    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, ChainError> {
        self.check_online()?;
        let state = self.state();
        let contract = state
            .contracts
            .get(&to)
            .ok_or_else(|| ChainError::Rejected(format!("no contract at {to}")))?;
        if calldata.len() < 4 {
            return Err(ChainError::Rejected("execution reverted".into()));
        }
        let selector = Selector::from_slice(&calldata[..4]);

        let value = if calldata.starts_with(&IOwnable::ownerCall::SELECTOR) {
            contract.owner
        } else {
            let index = state
                .views
                .get(&(contract.name.clone(), selector))
                .ok_or_else(|| ChainError::Rejected("execution reverted".into()))?;
            *contract
                .constructor_args
                .get(*index)
                .ok_or_else(|| ChainError::Rejected("execution reverted".into()))?
        };
        Ok(Bytes::copy_from_slice(value.into_word().as_slice()))
    }
}
