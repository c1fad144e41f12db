use clap::Parser;

use crate::common::Result;

/// Main command enumeration for the genedao CLI tool
#[derive(Parser, Debug)]
#[command(infer_subcommands = true, version)]
pub enum MainCmd {
    /// Deploy the contract suite and transfer ownership to the controller
    Deploy(crate::deploy::Cmd),
    /// Check a previous deployment against on-chain state
    Verify(crate::verify::Cmd),
    /// Show the deployer address and balance
    Balance(crate::balance::Cmd),
}

impl MainCmd {
    /// Execute the main command
    pub async fn run(&self) -> Result<()> {
        match self {
            Self::Deploy(cmd) => cmd.run().await,
            Self::Verify(cmd) => cmd.run().await,
            Self::Balance(cmd) => cmd.run().await,
        }
    }

    /// Prefix for the error message printed when the command fails
    pub const fn error_context(&self) -> &'static str {
        match self {
            Self::Deploy(_) => "Error during deployment",
            Self::Verify(_) => "Error during verification",
            Self::Balance(_) => "Error reading balance",
        }
    }
}
