//! Reads through a diamond proxy
//!
//! Calls are made on the diamond itself and dispatched by selector to
//! whichever facet currently owns it.

use crate::{
    cut::interfaces::IDiamondLoupe::facetAddressCall,
    errors::RuntimeError,
    evm::ForkEvm,
    types::{Address, Bytes, Selector, U256},
};
use alloy::{sol, sol_types::SolCall};
use revm::database::{CacheDB, DatabaseRef};

sol! {
    /// Pending rewards view of the farm facet
    function totalPending() external view returns (uint256);
}

/// Facet the diamond routes `selector` to, zero if unrouted
pub fn facet_address<DB>(
    evm: &mut ForkEvm<CacheDB<DB>>,
    diamond: Address,
    selector: Selector,
) -> Result<Address, RuntimeError>
where
    DB: DatabaseRef,
{
    let data: Bytes = facetAddressCall {
        _functionSelector: selector,
    }
    .abi_encode()
    .into();
    let output = evm.call(diamond, data)?;
    facetAddressCall::abi_decode_returns(&output).map_err(|e| RuntimeError::Decode {
        call: "facetAddress",
        reason: e.to_string(),
    })
}

/// Total rewards pending across the farm, read through `diamond`
pub fn total_pending<DB>(
    evm: &mut ForkEvm<CacheDB<DB>>,
    diamond: Address,
) -> Result<U256, RuntimeError>
where
    DB: DatabaseRef,
{
    let output = evm.call(diamond, totalPendingCall {}.abi_encode().into())?;
    totalPendingCall::abi_decode_returns(&output).map_err(|e| RuntimeError::Decode {
        call: "totalPending",
        reason: e.to_string(),
    })
}
