//! Argument parsing tests for the `genedao` command line.

use clap::Parser;
use genedao_cli::{
    common::NetworkPreset,
    deploy::{BalanceCheck, Cmd as DeployCmd},
    MainCmd,
};
use rstest::rstest;

const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn parse_deploy(extra: &[&str]) -> DeployCmd {
    let mut args = vec!["genedao", "deploy", "--private-key", DEV_KEY];
    args.extend_from_slice(extra);
    match MainCmd::try_parse_from(args).unwrap() {
        MainCmd::Deploy(cmd) => cmd,
        other => panic!("expected deploy, got {other:?}"),
    }
}

#[test]
fn test_deploy_defaults() {
    let cmd = parse_deploy(&[]);
    assert_eq!(cmd.artifacts.to_str(), Some("artifacts"));
    assert_eq!(cmd.nft_contract, "GeneNFT");
    assert_eq!(cmd.token_contract, "PostCovidStrokePrevention");
    assert_eq!(cmd.controller_contract, "Controller");
    assert_eq!(cmd.balance_check, BalanceCheck::Report);
    assert!(!cmd.skip_verify);
    assert!(cmd.report.is_none());
    assert_eq!(cmd.network_args.network, NetworkPreset::OptimismSepolia);
    assert_eq!(cmd.network_args.confirmations, 1);
    assert_eq!(cmd.log_args.verbose, 0);
}

#[test]
fn test_deploy_overrides() {
    let cmd = parse_deploy(&[
        "--network",
        "localhost",
        "--rpc-url",
        "http://10.0.0.2:8545",
        "--artifacts",
        "out/artifacts",
        "--controller-contract",
        "ControllerV2",
        "--balance-check",
        "require",
        "--skip-verify",
        "--report",
        "deployment.json",
        "--confirmations",
        "3",
        "--tx-timeout",
        "120",
        "-vvv",
    ]);
    assert_eq!(cmd.network_args.network, NetworkPreset::Localhost);
    assert_eq!(cmd.network_args.rpc_url.as_deref(), Some("http://10.0.0.2:8545"));
    assert_eq!(cmd.controller_contract, "ControllerV2");
    assert_eq!(cmd.balance_check, BalanceCheck::Require);
    assert!(cmd.skip_verify);
    assert_eq!(cmd.report.as_deref().and_then(|p| p.to_str()), Some("deployment.json"));
    assert_eq!(cmd.network_args.tx_timeout, Some(120));
    assert_eq!(cmd.log_args.verbose, 3);

    let config = cmd.network_args.resolve().unwrap();
    assert_eq!(config.chain_id, 31337);
    assert_eq!(config.confirmations, 3);
}

#[rstest]
#[case::optimism_sepolia("optimism-sepolia", "https://sepolia.optimism.io/", 11155420)]
#[case::localhost("localhost", "http://127.0.0.1:8545/", 31337)]
fn test_network_presets(#[case] network: &str, #[case] url: &str, #[case] chain_id: u64) {
    // Explicit values keep RPC_URL / CHAIN_ID from the environment out of the picture
    let cmd = parse_deploy(&["--network", network]);
    let mut args = cmd.network_args;
    args.rpc_url = None;
    args.chain_id = None;
    let config = args.resolve().unwrap();
    assert_eq!(config.rpc_url.as_str(), url);
    assert_eq!(config.chain_id, chain_id);
}

#[test]
fn test_subcommands() {
    let verify = MainCmd::try_parse_from(["genedao", "verify", "--report", "deployment.json"]);
    assert!(matches!(verify, Ok(MainCmd::Verify(_))));
    assert!(MainCmd::try_parse_from(["genedao", "verify"]).is_err());

    let balance = MainCmd::try_parse_from(["genedao", "bal", "--network", "localhost"]);
    assert!(matches!(balance, Ok(MainCmd::Balance(_))));

    assert!(MainCmd::try_parse_from(["genedao", "deploy", "--network", "mainnet"]).is_err());
    assert!(MainCmd::try_parse_from(["genedao", "deploy", "--balance-check", "maybe"]).is_err());
}

#[rstest]
#[case::deploy(&["genedao", "deploy"], "Error during deployment")]
#[case::verify(&["genedao", "verify", "--report", "r.json"], "Error during verification")]
#[case::balance(&["genedao", "balance"], "Error reading balance")]
fn test_error_context_names_the_command(#[case] args: &[&str], #[case] context: &str) {
    assert_eq!(MainCmd::try_parse_from(args.iter().copied()).unwrap().error_context(), context);
}
