use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use genedao_deploy::{
    BalancePolicy, ChainClient, ContractNames, DeployOptions, Deployer, DeploymentPlan,
    DeploymentReport, HardhatArtifacts,
};
use tracing::{info, warn};

use super::ConsoleProgress;
use crate::common::{write_report, LogArgs, NetworkArgs, Result, RpcChainClient};

/// How to treat the deployer balance before the first transaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BalanceCheck {
    /// Do not read the balance
    Skip,
    /// Print the balance; ignore read failures
    #[default]
    Report,
    /// Abort when the balance cannot be read or is zero
    Require,
}

impl From<BalanceCheck> for BalancePolicy {
    fn from(check: BalanceCheck) -> Self {
        match check {
            BalanceCheck::Skip => Self::Skip,
            BalanceCheck::Report => Self::Report,
            BalanceCheck::Require => Self::Require,
        }
    }
}

/// Deploy the contract suite
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Hardhat artifacts directory
    #[arg(long = "artifacts", default_value = "artifacts")]
    pub artifacts: PathBuf,

    /// Artifact name of the NFT contract
    #[arg(long = "nft-contract", default_value = "GeneNFT")]
    pub nft_contract: String,

    /// Artifact name of the token contract
    #[arg(long = "token-contract", default_value = "PostCovidStrokePrevention")]
    pub token_contract: String,

    /// Artifact name of the controller contract
    #[arg(long = "controller-contract", default_value = "Controller")]
    pub controller_contract: String,

    /// Deployer balance handling
    #[arg(long = "balance-check", value_enum, default_value_t = BalanceCheck::Report)]
    pub balance_check: BalanceCheck,

    /// Skip the on-chain ownership and wiring checks after deployment
    #[arg(long = "skip-verify")]
    pub skip_verify: bool,

    /// Write the deployment report (JSON) to this file
    #[arg(long = "report", value_name = "FILE")]
    pub report: Option<PathBuf>,

    // Shared argument groups
    /// Network configuration
    #[command(flatten)]
    pub network_args: NetworkArgs,

    /// Logging configuration
    #[command(flatten)]
    pub log_args: LogArgs,
}

impl Cmd {
    /// Execute the deploy command
    pub async fn run(&self) -> Result<()> {
        self.log_args.init()?;

        // Step 1: Resolve configuration; nothing has touched the network yet
        let config = self.network_args.resolve()?;

        // Step 2: Connect and check the chain id
        let client = RpcChainClient::connect(&config).await?;

        // Step 3: Run the deployment, printing each step as it confirms
        let report = self.execute(&client, Some(config.network.name())).await?;

        // Step 4: Output results
        self.output_results(&report)
    }

    /// Builds the plan and runs it against `client`.
    ///
    /// When the run fails after some steps were confirmed and `--report` is set, the confirmed
    /// part is written to the report file before the error is returned.
    pub async fn execute<C>(&self, client: &C, network: Option<&str>) -> Result<DeploymentReport>
    where
        C: ChainClient + ?Sized,
    {
        let names = ContractNames {
            nft: self.nft_contract.clone(),
            pcsp: self.token_contract.clone(),
            controller: self.controller_contract.clone(),
        };
        let plan = DeploymentPlan::genedao(&names)?;
        let artifacts = HardhatArtifacts::new(&self.artifacts);
        let options =
            DeployOptions { balance: self.balance_check.into(), verify: !self.skip_verify };
        let progress = ConsoleProgress::stdout(network.map(Into::into));

        let outcome = Deployer::new(client, &artifacts, &plan)
            .with_options(options)
            .with_observer(&progress)
            .run()
            .await;
        match outcome {
            Ok(mut report) => {
                report.network = network.map(Into::into);
                info!(
                    chain_id = report.chain_id,
                    contracts = report.contracts.len(),
                    "Deployment finished"
                );
                Ok(report)
            }
            Err(err) => {
                self.write_partial_report(&progress.report());
                Err(err.into())
            }
        }
    }

    /// Keeps a record of contracts that are on-chain even though the run failed.
    fn write_partial_report(&self, partial: &DeploymentReport) {
        let Some(ref path) = self.report else { return };
        if partial.contracts.is_empty() {
            return;
        }
        match write_report(path, partial) {
            Ok(()) => eprintln!("Partial report written to: {}", path.display()),
            Err(err) => warn!(%err, "Failed to write partial report"),
        }
    }

    /// Output execution results
    fn output_results(&self, report: &DeploymentReport) -> Result<()> {
        if report.verified {
            println!("Ownership and controller wiring verified on-chain.");
        }

        if let Some(ref path) = self.report {
            write_report(path, report)?;
            eprintln!("Report written to: {}", path.display());
        }

        Ok(())
    }
}
