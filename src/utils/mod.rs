//! Helpers for executing contract calls on the fork
//!
//! # Modules
//!
//! - [`erc20_utils`]: ERC20 token interaction
//!   - Balance queries
//!   - Transfers sent as an impersonated holder
//!
//! - [`diamond_utils`]: Reads through a diamond proxy
//!   - Loupe lookups (`facetAddress`)
//!   - Facet views such as `totalPending`
//!
//! - [`error_utils`]: Revert reason extraction
//!   - `Error(string)` and `Panic(uint256)` decoding
//!   - Halt descriptions
//!
//! - [`block_utils`]: Block environment construction
//!
//! # Example
//!
//! ```no_run
//! use diamond_upgrade::{
//!     utils::{diamond_utils, erc20_utils},
//!     EvmBuilder,
//! };
//! use alloy::primitives::address;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut evm = EvmBuilder::new_alloy("https://polygon-rpc.com")
//!     .with_block_number(53_197_367)
//!     .build()
//!     .await?;
//!
//! let fud = address!("403E967b044d4Be25170310157cB1A4Bf10bdD0f");
//! let diamond = address!("1fE64677Ab1397e20A1211AFae2758570fEa1B8c");
//! let balance = erc20_utils::query_erc20_balance(&mut evm, fud, diamond)?;
//! let pending = diamond_utils::total_pending(&mut evm, diamond)?;
//! println!("FUD held by diamond: {balance}, pending: {pending}");
//! # Ok(())
//! # }
//! ```

/// Block environment utilities
pub mod block_utils;

/// Diamond proxy reads
pub mod diamond_utils;

/// ERC20 token interaction utilities
pub mod erc20_utils;

/// Error parsing utilities
pub mod error_utils;
