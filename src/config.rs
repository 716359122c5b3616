//! Upgrade configuration
//!
//! Defaults reproduce the Polygon staking-diamond upgrade: the owner account,
//! the diamond address, the facets to add and the fork block. The RPC endpoint
//! comes from the `POLYGON_NETWORK` environment variable (a `.env` file is
//! honored) unless set explicitly.

use crate::errors::ConfigError;
use alloy::primitives::{address, Address};
use std::path::PathBuf;

/// Environment variable holding the RPC endpoint of the network to fork
pub const RPC_URL_ENV: &str = "POLYGON_NETWORK";

/// Owner of the staking diamond, impersonated to send the cut
pub const DEFAULT_OWNER: Address = address!("01F010a5e001fe9d6940758EA5e8c777885E351e");

/// The staking diamond being upgraded
pub const DEFAULT_DIAMOND: Address = address!("1fE64677Ab1397e20A1211AFae2758570fEa1B8c");

/// Account that deploys the facets (first development account)
pub const DEFAULT_DEPLOYER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// Block the network is forked at
pub const DEFAULT_FORK_BLOCK: u64 = 53_197_367;

/// Gas limit of the `diamondCut` transaction
pub const DEFAULT_CUT_GAS_LIMIT: u64 = 5_000_000;

/// Facets deployed and added by the upgrade, in order
pub const DEFAULT_FACETS: [&str; 2] = ["StakingFacet", "StakingTokenFacet"];

/// Everything needed to run an upgrade
#[derive(Debug, Clone)]
pub struct UpgradeConfig {
    /// RPC endpoint of the network to fork (HTTP/HTTPS or WS/WSS)
    pub rpc_url: Option<String>,
    /// Block to fork at; `None` forks at the latest block
    pub fork_block: Option<u64>,
    /// Diamond owner, impersonated to send the cut
    pub owner: Address,
    /// Account the facets are deployed from
    pub deployer: Address,
    /// Diamond proxy to upgrade
    pub diamond: Address,
    /// Contract names of the facets to deploy and add
    pub facets: Vec<String>,
    /// Directory holding the compiler's JSON artifacts
    pub artifacts_dir: PathBuf,
    /// Gas limit of the `diamondCut` transaction
    pub gas_limit: u64,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            fork_block: Some(DEFAULT_FORK_BLOCK),
            owner: DEFAULT_OWNER,
            deployer: DEFAULT_DEPLOYER,
            diamond: DEFAULT_DIAMOND,
            facets: DEFAULT_FACETS.iter().map(|s| s.to_string()).collect(),
            artifacts_dir: PathBuf::from("artifacts"),
            gas_limit: DEFAULT_CUT_GAS_LIMIT,
        }
    }
}

impl UpgradeConfig {
    /// Default configuration with the RPC URL taken from the environment
    ///
    /// Loads `.env` from the working directory (or a parent) first; a missing
    /// file is not an error.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self {
            rpc_url: std::env::var(RPC_URL_ENV).ok().filter(|url| !url.trim().is_empty()),
            ..Self::default()
        }
    }

    /// The configured RPC URL, or an error if none was set
    pub fn rpc_url(&self) -> Result<&str, ConfigError> {
        self.rpc_url.as_deref().ok_or(ConfigError::MissingRpcUrl)
    }

    /// Check the configuration is usable for an upgrade
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.facets.is_empty() {
            return Err(ConfigError::NoFacets);
        }
        Ok(())
    }
}
