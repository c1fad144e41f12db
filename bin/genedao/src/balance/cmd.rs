use alloy_primitives::utils::format_ether;
use clap::Parser;
use genedao_deploy::{ChainClient, DeployError};

use crate::common::{LogArgs, NetworkArgs, Result, RpcChainClient};

/// Show the deployer address and balance
#[derive(Parser, Debug)]
pub struct Cmd {
    // Shared argument groups
    /// Network configuration
    #[command(flatten)]
    pub network_args: NetworkArgs,

    /// Logging configuration
    #[command(flatten)]
    pub log_args: LogArgs,
}

impl Cmd {
    /// Execute the balance command
    pub async fn run(&self) -> Result<()> {
        self.log_args.init()?;
        let config = self.network_args.resolve()?;
        let client = RpcChainClient::connect(&config).await?;

        let deployer = client.signer();
        let balance = client
            .balance(deployer)
            .await
            .map_err(|e| DeployError::from_chain("read deployer balance", e))?;

        println!("Network: {} (chain {})", config.network.name(), config.chain_id);
        println!("Deployer: {deployer}");
        println!("Account balance: {} ETH", format_ether(balance));
        if balance.is_zero() {
            eprintln!("Warning: the deployer has no funds to pay for deployment");
        }
        Ok(())
    }
}
