//! ERC20 token utilities
//!
//! Balance queries and transfers executed on the fork. Transfers are sent as
//! the holder without a signature, which is how accounts are funded from a
//! known holder before exercising the upgraded diamond.

use crate::{
    errors::TokenError,
    evm::ForkEvm,
    types::{Address, Bytes, U256},
    utils::error_utils::describe_failure,
};
use alloy::{sol, sol_types::SolCall};
use revm::{
    context_interface::result::{ExecutionResult, Output},
    database::{CacheDB, DatabaseRef},
};

// ERC20 interface subset
//
// Generates Rust bindings for:
// - balanceOf(address): Returns token balance for an address
// - transfer(address,uint256): Moves tokens from the caller
sol! {
    function balanceOf(address owner) public returns (uint256);
    function transfer(address to, uint256 amount) public returns (bool);
}

/// Query ERC20 token balance for a specific address
///
/// Executes the `balanceOf(address)` function on the specified token contract.
///
/// # Arguments
/// - `evm`: Fork to query
/// - `token_address`: Address of the ERC20 token contract
/// - `owner`: Address to query balance for
///
/// # Returns
/// - `Ok(U256)`: Token balance in the token's smallest unit
/// - `Err(TokenError)`: If the call fails or returns invalid data
pub fn query_erc20_balance<DB>(
    evm: &mut ForkEvm<CacheDB<DB>>,
    token_address: Address,
    owner: Address,
) -> Result<U256, TokenError>
where
    DB: DatabaseRef,
{
    let data: Bytes = balanceOfCall { owner }.abi_encode().into();
    let value = evm
        .call(token_address, data)
        .map_err(|e| TokenError::QueryFailed {
            address: token_address,
            reason: e.to_string(),
        })?;

    balanceOfCall::abi_decode_returns(&value).map_err(|e| TokenError::QueryFailed {
        address: token_address,
        reason: format!("Failed to decode balanceOf: {e}"),
    })
}

/// Transfer `amount` tokens from `from` to `to`
///
/// The transfer is committed to the fork. Tokens that return no data from
/// `transfer` (pre-standard implementations) are treated as successful.
///
/// # Returns
/// - `Ok(())`: The transfer succeeded
/// - `Err(TokenError::TransferFailed)`: The transaction could not be executed
/// - `Err(TokenError::CallReverted)`: The token reverted or halted
/// - `Err(TokenError::TransferRejected)`: The token returned `false`
pub fn transfer_erc20<DB>(
    evm: &mut ForkEvm<CacheDB<DB>>,
    token_address: Address,
    from: Address,
    to: Address,
    amount: U256,
) -> Result<(), TokenError>
where
    DB: DatabaseRef,
{
    let data: Bytes = transferCall { to, amount }.abi_encode().into();
    let result = evm
        .transact(from, token_address, data, None)
        .map_err(|e| TokenError::TransferFailed {
            address: token_address,
            reason: e.to_string(),
        })?;

    let output = match result {
        ExecutionResult::Success {
            output: Output::Call(value),
            ..
        } => value,
        ExecutionResult::Success { .. } => Bytes::new(),
        failed => {
            return Err(TokenError::CallReverted {
                address: token_address,
                reason: describe_failure(&failed),
            })
        }
    };

    if output.is_empty() {
        return Ok(());
    }
    let accepted =
        transferCall::abi_decode_returns(&output).map_err(|e| TokenError::QueryFailed {
            address: token_address,
            reason: format!("Failed to decode transfer: {e}"),
        })?;
    if !accepted {
        return Err(TokenError::TransferRejected {
            address: token_address,
            from,
            amount,
        });
    }

    log::debug!("Transferred {amount} of {token_address} from {from} to {to}");
    Ok(())
}
