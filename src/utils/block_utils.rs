//! Block environment for the fork
//!
//! Executions on the fork see the pinned block's header values through
//! `NUMBER`, `TIMESTAMP`, `COINBASE`, `GASLIMIT`, `DIFFICULTY` and `PREVRANDAO`.

use crate::types::ForkInfo;
use revm::context::BlockEnv;

/// Gas limit used when the fork carries none (in-memory forks)
pub const FALLBACK_BLOCK_GAS_LIMIT: u64 = 30_000_000;

/// Build the block environment matching `info`
///
/// Base fee is left at zero: the fork runs with base fee checks disabled and
/// transactions carry no gas price.
///
/// # Example
/// ```rust
/// # use diamond_upgrade::{types::ForkInfo, utils::block_utils::fork_block_env};
/// let info = ForkInfo { chain_id: 137, block_number: 53_197_367, ..Default::default() };
/// let block = fork_block_env(&info);
/// assert_eq!(block.number, 53_197_367);
/// assert_eq!(block.gas_limit, 30_000_000);
/// ```
pub fn fork_block_env(info: &ForkInfo) -> BlockEnv {
    let gas_limit = if info.gas_limit == 0 {
        FALLBACK_BLOCK_GAS_LIMIT
    } else {
        info.gas_limit
    };

    BlockEnv {
        number: info.block_number,
        timestamp: info.timestamp,
        beneficiary: info.coinbase,
        gas_limit,
        difficulty: info.difficulty,
        prevrandao: Some(info.prevrandao),
        ..Default::default()
    }
}
