//! # Diamond Upgrade
//!
//! Deploys facet contracts and cuts them into an EIP-2535 diamond proxy on a
//! simulated fork of a live chain.
//!
//! ## Core Features
//!
//! - **Forking**
//!   - State read lazily from any JSON-RPC endpoint, pinned at a block
//!   - Transactions sent as any account (owner impersonation) without keys
//!   - Nothing is broadcast; every write stays in a local cache
//!
//! - **Upgrades**
//!   - Facet artifacts loaded from compiler output
//!   - Function selectors extracted from the ABI
//!   - A single `Add` cut sent through `diamondCut`
//!   - Routing verified through the diamond loupe
//!
//! - **Post-upgrade checks**
//!   - ERC20 balance queries and transfers
//!   - Facet views read through the diamond
//!
//! ## Features
//!
//! - `rustls-tls`: Uses rustls as the TLS implementation instead of native-tls (OpenSSL).
//! - `foundry-fork`: Builds forks over foundry-fork-db's `SharedBackend`.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use diamond_upgrade::{deploy_upgrade, verify_routing, EvmBuilder, UpgradeConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = UpgradeConfig::from_env();
//!
//! // Fork the chain at the configured block
//! let mut evm = EvmBuilder::new_alloy(config.rpc_url()?)
//!     .with_optional_block_number(config.fork_block)
//!     .build()
//!     .await?;
//!
//! // Deploy facets and cut them in as the diamond owner
//! let report = deploy_upgrade(&mut evm, &config)?;
//! for facet in &report.facets {
//!     println!("{} at {} ({} selectors)", facet.name, facet.address, facet.selectors.len());
//! }
//!
//! verify_routing(&mut evm, &report)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - `config`: Upgrade parameters and their defaults
//! - `artifacts`: Compiler artifact discovery and selector extraction
//! - `cut`: Diamond interfaces and cut construction
//! - `evm`: Forked EVM construction and transaction processing
//! - `upgrade`: The upgrade itself and routing verification
//! - `types`: Core data structures
//! - `errors`: Error types and handling
//! - `utils`: Token, diamond and revert helpers

pub mod artifacts;
pub mod config;
pub mod cut;
pub mod errors;
pub mod evm;
pub mod types;
pub mod upgrade;
pub mod utils;

// Re-export only the essential types and functions
pub use config::UpgradeConfig;
pub use errors::UpgradeError;
pub use evm::{create_in_memory_evm, EvmBuilder, ForkEvm};
pub use types::UpgradeReport;
pub use upgrade::{deploy_upgrade, verify_routing};
