//! Transaction processing for ForkEvm
//!
//! Three entry points cover everything an upgrade does on the fork:
//! - `deploy`: contract creation from any account
//! - `transact`: a committed call from any account
//! - `call`: a read-only call whose state changes are discarded

use crate::{
    errors::RuntimeError,
    evm::ForkEvm,
    types::{Address, Bytes, TxKind, U256},
    utils::error_utils::describe_failure,
};
use revm::{
    context::TxEnv,
    context_interface::{
        result::{ExecutionResult, Output},
        ContextTr,
    },
    database::{CacheDB, DatabaseRef},
    ExecuteCommitEvm, ExecuteEvm,
};

/// A contract created on the fork
#[derive(Debug, Clone)]
pub struct Deployment {
    /// Address of the new contract
    pub address: Address,
    /// Gas used by the creation transaction
    pub gas_used: u64,
}

impl<DB> ForkEvm<CacheDB<DB>>
where
    DB: DatabaseRef,
{
    /// Current nonce of `account`, zero for unknown accounts
    pub fn nonce(&mut self, account: Address) -> Result<u64, RuntimeError> {
        let nonce = self
            .evm
            .ctx
            .db()
            .basic_ref(account)
            .map_err(|e| RuntimeError::AccountAccess(format!("Get account {account} failed: {e}")))?
            .map(|acc| acc.nonce)
            .unwrap_or_default();
        Ok(nonce)
    }

    /// Build a transaction from `caller` using its current nonce
    fn build_tx(
        &mut self,
        caller: Address,
        kind: TxKind,
        data: Bytes,
        gas_limit: Option<u64>,
    ) -> Result<TxEnv, RuntimeError> {
        let nonce = self.nonce(caller)?;
        let chain_id = self.info().chain_id;
        let mut builder = TxEnv::builder()
            .caller(caller)
            .kind(kind)
            .data(data)
            .value(U256::ZERO)
            .nonce(nonce)
            .chain_id(Some(chain_id));
        if let Some(gas_limit) = gas_limit {
            builder = builder.gas_limit(gas_limit);
        }
        Ok(builder.build_fill())
    }

    /// Deploy `initcode` from `caller`
    ///
    /// # Returns
    /// * `Ok(Deployment)` - Address and gas of the created contract
    /// * `Err(RuntimeError)` - If the constructor reverted or halted
    pub fn deploy(&mut self, caller: Address, initcode: Bytes) -> Result<Deployment, RuntimeError> {
        let tx = self.build_tx(caller, TxKind::Create, initcode, None)?;
        let result = self
            .evm
            .transact_commit(tx)
            .map_err(|e| RuntimeError::ExecutionFailed(format!("Deployment failed: {e}")))?;

        match result {
            ExecutionResult::Success {
                output: Output::Create(_, Some(address)),
                gas_used,
                ..
            } => Ok(Deployment { address, gas_used }),
            ExecutionResult::Success { .. } => Err(RuntimeError::ExecutionFailed(
                "Contract creation returned no address".to_string(),
            )),
            failed => Err(into_runtime_error(&failed)),
        }
    }

    /// Send a committed call to `to` from `caller`
    ///
    /// Returns the execution result whatever its outcome; only errors that
    /// prevent execution altogether (invalid transaction, state access) are
    /// reported as `Err`.
    pub fn transact(
        &mut self,
        caller: Address,
        to: Address,
        data: Bytes,
        gas_limit: Option<u64>,
    ) -> Result<ExecutionResult, RuntimeError> {
        let tx = self.build_tx(caller, TxKind::Call(to), data, gas_limit)?;
        self.evm
            .transact_commit(tx)
            .map_err(|e| RuntimeError::ExecutionFailed(format!("Transaction to {to} failed: {e}")))
    }

    /// Execute a read-only call to `to` and return its output
    ///
    /// State changes made by the call are discarded.
    pub fn call(&mut self, to: Address, data: Bytes) -> Result<Bytes, RuntimeError> {
        let tx = self.build_tx(Address::ZERO, TxKind::Call(to), data, None)?;
        let result = self
            .evm
            .transact(tx)
            .map_err(|e| RuntimeError::ExecutionFailed(format!("Call to {to} failed: {e}")))?
            .result;

        match result {
            ExecutionResult::Success {
                output: Output::Call(value),
                ..
            } => Ok(value),
            ExecutionResult::Success { .. } => Err(RuntimeError::ExecutionFailed(format!(
                "Call to {to} produced no call output"
            ))),
            failed => Err(into_runtime_error(&failed)),
        }
    }
}

/// Map a failed execution to the matching runtime error
fn into_runtime_error(result: &ExecutionResult) -> RuntimeError {
    match result {
        ExecutionResult::Halt { .. } => RuntimeError::Halt(describe_failure(result)),
        _ => RuntimeError::Revert(describe_failure(result)),
    }
}
