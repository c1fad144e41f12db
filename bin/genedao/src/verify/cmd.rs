use std::path::PathBuf;

use clap::Parser;
use genedao_deploy::{verify, ChainClient, DeploymentPlan, DeploymentReport, Expectation};

use crate::common::{read_report, CliError, LogArgs, NetworkArgs, Result, RpcChainClient};

/// Check a recorded deployment against on-chain state
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Report written by `genedao deploy --report`
    #[arg(long = "report", value_name = "FILE")]
    pub report: PathBuf,

    // Shared argument groups
    /// Network configuration
    #[command(flatten)]
    pub network_args: NetworkArgs,

    /// Logging configuration
    #[command(flatten)]
    pub log_args: LogArgs,
}

impl Cmd {
    /// Execute the verify command
    pub async fn run(&self) -> Result<()> {
        self.log_args.init()?;
        let config = self.network_args.resolve()?;
        let report = read_report(&self.report)?;
        if report.chain_id != config.chain_id {
            return Err(CliError::configuration(format!(
                "report is for chain {}, but the configured chain is {}",
                report.chain_id, config.chain_id
            )));
        }

        let client = RpcChainClient::connect(&config).await?;
        let checks = check(&client, &report).await?;
        println!("{checks} checks passed.");
        Ok(())
    }
}

/// Rebuilds the expectations from the report and checks them, returning how many passed.
///
/// Every recorded ownership transfer must still hold, and every recorded constructor argument
/// must be readable through the getters the GeneDAO plan declares.
pub async fn check<C>(client: &C, report: &DeploymentReport) -> Result<usize>
where
    C: ChainClient + ?Sized,
{
    let mut expectations: Vec<Expectation> = report
        .ownership_transfers
        .iter()
        .map(|transfer| Expectation::Owner {
            target: transfer.label.clone(),
            expected: transfer.new_owner_label.clone(),
        })
        .collect();

    let plan = DeploymentPlan::genedao(&Default::default())?;
    expectations.extend(plan.expectations().into_iter().filter(|expectation| {
        matches!(expectation, Expectation::AddressGetter { target, .. }
            if report.address_of(target).is_some())
    }));

    verify(client, &expectations, &report.addresses()).await?;
    Ok(expectations.len())
}
