use std::{
    cell::RefCell,
    io::{self, Write},
};

use alloy_primitives::{utils::format_ether, Address, U256};
use genedao_deploy::{DeployObserver, DeployedContract, DeploymentReport, OwnershipTransfer};

/// Prints every confirmed step as it happens and keeps what was confirmed, so a failed run can
/// still be written out as a partial report.
#[derive(Debug)]
pub struct ConsoleProgress<W = io::Stdout> {
    out: RefCell<W>,
    report: RefCell<DeploymentReport>,
}

impl ConsoleProgress {
    /// Prints to stdout.
    pub fn stdout(network: Option<String>) -> Self {
        Self::new(io::stdout(), network)
    }
}

impl<W: Write> ConsoleProgress<W> {
    /// Prints to `out`.
    pub fn new(out: W, network: Option<String>) -> Self {
        let report = DeploymentReport {
            network,
            chain_id: 0,
            deployer: Address::ZERO,
            deployer_balance: None,
            contracts: Vec::new(),
            ownership_transfers: Vec::new(),
            verified: false,
        };
        Self { out: RefCell::new(out), report: RefCell::new(report) }
    }

    /// Everything confirmed so far.
    pub fn report(&self) -> DeploymentReport {
        self.report.borrow().clone()
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn print(&self, line: std::fmt::Arguments<'_>) {
        // Progress output is best effort; a closed stdout must not abort a deployment
        let _ = writeln!(self.out.borrow_mut(), "{line}");
    }
}

impl<W: Write> DeployObserver for ConsoleProgress<W> {
    fn on_start(&self, deployer: Address, chain_id: u64) {
        let mut report = self.report.borrow_mut();
        report.deployer = deployer;
        report.chain_id = chain_id;
        self.print(format_args!("Deploying contracts with the account: {deployer}"));
    }

    fn on_balance(&self, _deployer: Address, balance: U256) {
        self.report.borrow_mut().deployer_balance = Some(balance);
        self.print(format_args!("Account balance: {} ETH", format_ether(balance)));
    }

    fn on_contract_deployed(&self, contract: &DeployedContract) {
        self.report.borrow_mut().contracts.push(contract.clone());
        self.print(format_args!(
            "{} deployed at address: {}",
            contract.contract, contract.address
        ));
    }

    fn on_ownership_transferred(&self, transfer: &OwnershipTransfer) {
        self.report.borrow_mut().ownership_transfers.push(transfer.clone());
        self.print(format_args!(
            "Ownership of {} ({}) transferred to {} ({})",
            transfer.label, transfer.contract, transfer.new_owner_label, transfer.new_owner
        ));
    }
}
