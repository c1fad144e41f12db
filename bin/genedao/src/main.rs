//! `genedao` CLI tool for deploying the GeneDAO contract suite
//!
//! Deploys the NFT, token and controller contracts in order and hands ownership of the first
//! two to the controller.

use clap::Parser;
use genedao_cli::MainCmd;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    genedao_cli::common::load_dotenv();

    let cmd = MainCmd::parse();
    if let Err(e) = cmd.run().await {
        eprintln!("{}: {e}", cmd.error_context());
        std::process::exit(1);
    }
}
