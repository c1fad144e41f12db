//! Network configuration for genedao

use std::{fmt, path::PathBuf, str::FromStr, time::Duration};

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use clap::{Parser, ValueEnum};
use reqwest::Url;
use tracing::debug;

use super::{CliError, Result};

/// Loads `.env` from the working directory or its parents. Variables already set in the
/// environment are left untouched.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Named networks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum NetworkPreset {
    /// OP Sepolia testnet
    #[default]
    OptimismSepolia,
    /// A local development node (anvil, hardhat node)
    Localhost,
}

impl NetworkPreset {
    /// The preset's public RPC endpoint.
    pub const fn rpc_url(self) -> &'static str {
        match self {
            Self::OptimismSepolia => "https://sepolia.optimism.io",
            Self::Localhost => "http://127.0.0.1:8545",
        }
    }

    /// The preset's chain id.
    pub const fn chain_id(self) -> u64 {
        match self {
            Self::OptimismSepolia => 11155420,
            Self::Localhost => 31337,
        }
    }

    /// The name used on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::OptimismSepolia => "optimism-sepolia",
            Self::Localhost => "localhost",
        }
    }
}

/// Network and signer arguments
#[derive(Parser, Debug, Clone)]
pub struct NetworkArgs {
    /// Named network supplying the default RPC URL and chain id
    #[arg(long = "network", value_enum, default_value_t = NetworkPreset::OptimismSepolia)]
    pub network: NetworkPreset,

    /// RPC URL, overriding the network preset
    #[arg(long = "rpc-url", env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Chain id, overriding the network preset
    #[arg(long = "chain-id", env = "CHAIN_ID")]
    pub chain_id: Option<u64>,

    /// Hex-encoded private key of the deployer account
    #[arg(long = "private-key", env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Number of confirmations to wait for on every transaction
    #[arg(long = "confirmations", default_value = "1")]
    pub confirmations: u64,

    /// Seconds to wait for each confirmation; the client default applies when unset
    #[arg(long = "tx-timeout", value_name = "SECONDS")]
    pub tx_timeout: Option<u64>,
}

impl NetworkArgs {
    /// Resolves the arguments into a [`NetworkConfig`], validating every input before any
    /// network traffic happens.
    pub fn resolve(&self) -> Result<NetworkConfig> {
        let raw_url = self.rpc_url.as_deref().unwrap_or(self.network.rpc_url());
        let rpc_url = Url::parse(raw_url)
            .map_err(|e| CliError::configuration(format!("Invalid RPC URL '{raw_url}': {e}")))?;

        let chain_id = self.chain_id.unwrap_or(self.network.chain_id());
        if chain_id == 0 {
            return Err(CliError::configuration("Chain id must be non-zero"));
        }

        let key = self
            .private_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| CliError::configuration("PRIVATE_KEY is not set"))?;
        // The key itself must never end up in an error message
        let signer = PrivateKeySigner::from_str(key)
            .map_err(|_| CliError::configuration("PRIVATE_KEY is not a valid secp256k1 key"))?;

        if self.confirmations == 0 {
            return Err(CliError::configuration("--confirmations must be at least 1"));
        }

        debug!(network = self.network.name(), %rpc_url, chain_id, "Network configuration resolved");
        Ok(NetworkConfig {
            network: self.network,
            rpc_url,
            chain_id,
            signer,
            confirmations: self.confirmations,
            tx_timeout: self.tx_timeout.map(Duration::from_secs),
        })
    }
}

/// A validated network configuration.
#[derive(Clone)]
pub struct NetworkConfig {
    /// The preset the configuration started from
    pub network: NetworkPreset,
    /// JSON-RPC endpoint
    pub rpc_url: Url,
    /// Expected chain id
    pub chain_id: u64,
    /// Deployer key
    pub signer: PrivateKeySigner,
    /// Confirmations to wait for
    pub confirmations: u64,
    /// Confirmation timeout
    pub tx_timeout: Option<Duration>,
}

impl NetworkConfig {
    /// Address of the deployer.
    pub fn deployer(&self) -> Address {
        self.signer.address()
    }
}

impl fmt::Debug for NetworkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkConfig")
            .field("network", &self.network)
            .field("rpc_url", &self.rpc_url.as_str())
            .field("chain_id", &self.chain_id)
            .field("deployer", &self.deployer())
            .field("confirmations", &self.confirmations)
            .field("tx_timeout", &self.tx_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genedao_deploy::DeployError;

    // First development account of anvil / hardhat node
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn args(private_key: Option<&str>) -> NetworkArgs {
        NetworkArgs {
            network: NetworkPreset::OptimismSepolia,
            rpc_url: None,
            chain_id: None,
            private_key: private_key.map(Into::into),
            confirmations: 1,
            tx_timeout: None,
        }
    }

    fn is_configuration_error(result: Result<NetworkConfig>) -> bool {
        matches!(result, Err(CliError::Deploy(DeployError::Configuration(_))))
    }

    #[test]
    fn test_preset_defaults() {
        let config = args(Some(DEV_KEY)).resolve().unwrap();
        assert_eq!(config.rpc_url.as_str(), "https://sepolia.optimism.io/");
        assert_eq!(config.chain_id, 11155420);
        assert_eq!(config.deployer(), genedao_deploy::test_utils::DEV_ACCOUNT);
    }

    #[test]
    fn test_overrides_win_over_preset() {
        let mut args = args(Some(DEV_KEY));
        args.network = NetworkPreset::Localhost;
        args.rpc_url = Some("http://10.0.0.2:8545".into());
        args.tx_timeout = Some(30);
        let config = args.resolve().unwrap();
        assert_eq!(config.rpc_url.as_str(), "http://10.0.0.2:8545/");
        assert_eq!(config.chain_id, 31337);
        assert_eq!(config.tx_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_missing_or_invalid_key() {
        assert!(is_configuration_error(args(None).resolve()));
        assert!(is_configuration_error(args(Some("   ")).resolve()));
        assert!(is_configuration_error(args(Some("0x1234")).resolve()));
    }

    #[test]
    fn test_key_not_leaked() {
        let bad_key = "0xzz0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        let err = args(Some(bad_key)).resolve().unwrap_err();
        assert!(!err.to_string().contains("zz0974"));

        let config = args(Some(DEV_KEY)).resolve().unwrap();
        assert!(!format!("{config:?}").contains("ac0974"));
    }

    #[test]
    fn test_invalid_url_and_chain_id() {
        let mut bad_url = args(Some(DEV_KEY));
        bad_url.rpc_url = Some("not a url".into());
        assert!(is_configuration_error(bad_url.resolve()));

        let mut zero_chain = args(Some(DEV_KEY));
        zero_chain.chain_id = Some(0);
        assert!(is_configuration_error(zero_chain.resolve()));
    }
}
