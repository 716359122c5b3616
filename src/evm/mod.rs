//! EVM over forked chain state
//!
//! This module provides the `ForkEvm` wrapper around revm's `MainnetEvm` and
//! convenient type aliases for the supported state backends.
//!
//! ## Key Components
//!
//! - **`ForkEvm`**: wrapper that executes transactions as any account, the
//!   in-process equivalent of an impersonated signer on a forked node
//! - **`EvmBuilder`**: connects to an RPC endpoint and pins the fork block
//! - **Processor**: deployment, committed transactions and read-only calls
//!
//! ## Usage Examples
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use diamond_upgrade::EvmBuilder;
//!
//! let mut evm = EvmBuilder::new_alloy("https://polygon-rpc.com")
//!     .with_block_number(53_197_367)
//!     .build()
//!     .await?;
//! println!("Forked chain {} at block {}", evm.info().chain_id, evm.info().block_number);
//! # Ok(())
//! # }
//! ```

use crate::types::{Address, Bytes, ForkInfo};
use crate::errors::RuntimeError;
use revm::{
    context_interface::ContextTr,
    database::{AccountState, CacheDB, Database, DatabaseRef},
    handler::MainnetContext,
    inspector::NoOpInspector,
    state::Bytecode,
    MainnetEvm,
};
use std::ops::{Deref, DerefMut};

pub mod builder;
pub mod processor;

pub use builder::{create_in_memory_evm, EvmBuilder};
pub use processor::Deployment;

/// EVM wrapper used to deploy and cut facets
///
/// Transactions run with an arbitrary `caller` and no signature. The context
/// is configured so that the caller needs neither ETH nor code-free status
/// (EIP-3607), which is what impersonating an account on a fork amounts to.
///
/// # Type Parameters
/// - `DB`: Database backend implementing the `Database` trait
pub struct ForkEvm<DB: Database> {
    evm: MainnetEvm<MainnetContext<DB>, NoOpInspector>,
    info: ForkInfo,
}

impl<DB> ForkEvm<DB>
where
    DB: Database,
{
    /// Wrap a configured `MainnetEvm`
    ///
    /// Prefer [`EvmBuilder`] or [`create_in_memory_evm`], which apply the
    /// simulation settings this wrapper relies on.
    pub fn new(evm: MainnetEvm<MainnetContext<DB>, NoOpInspector>, info: ForkInfo) -> Self {
        Self { evm, info }
    }

    /// Chain and block the fork is pinned to
    pub fn info(&self) -> ForkInfo {
        self.info
    }
}

impl<DB> Deref for ForkEvm<DB>
where
    DB: Database,
{
    type Target = MainnetEvm<MainnetContext<DB>, NoOpInspector>;

    fn deref(&self) -> &Self::Target {
        &self.evm
    }
}

impl<DB> DerefMut for ForkEvm<DB>
where
    DB: Database,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.evm
    }
}

// ========================= State Overrides =========================

impl<DB> ForkEvm<CacheDB<DB>>
where
    DB: DatabaseRef,
{
    /// Replace the runtime code of `address` in the local cache
    ///
    /// Balance and nonce are preserved. Nothing is written upstream.
    pub fn set_code(&mut self, address: Address, code: Bytes) -> Result<(), RuntimeError> {
        let db = self.evm.ctx.db();
        let mut info = db
            .basic_ref(address)
            .map_err(|e| RuntimeError::AccountAccess(format!("Get account {address} failed: {e}")))?
            .unwrap_or_default();
        let bytecode = Bytecode::new_raw(code);
        info.code_hash = bytecode.hash_slow();
        info.code = Some(bytecode);
        db.insert_account_info(address, info);

        // A lookup that missed upstream leaves the account marked as
        // non-existent, which hides the inserted info from execution
        if let Some(account) = db.cache.accounts.get_mut(&address) {
            if account.account_state == AccountState::NotExisting {
                account.account_state = AccountState::None;
            }
        }
        Ok(())
    }

    /// Runtime code currently at `address`, empty for accounts without code
    pub fn code_at(&mut self, address: Address) -> Result<Bytes, RuntimeError> {
        let db = self.evm.ctx.db();
        let Some(info) = db
            .basic_ref(address)
            .map_err(|e| RuntimeError::AccountAccess(format!("Get account {address} failed: {e}")))?
        else {
            return Ok(Bytes::new());
        };
        let code = match info.code {
            Some(code) => code,
            None => db.code_by_hash_ref(info.code_hash).map_err(|e| {
                RuntimeError::AccountAccess(format!("Get code of {address} failed: {e}"))
            })?,
        };
        Ok(code.original_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evm::create_in_memory_evm;
    use alloy::primitives::hex;

    #[test]
    fn test_set_code_on_fresh_account() {
        let mut evm = create_in_memory_evm();
        let target = Address::with_last_byte(0x42);
        let code = Bytes::from(hex::decode("60006000fd").unwrap());

        evm.set_code(target, code.clone()).unwrap();
        assert_eq!(evm.code_at(target).unwrap(), code);
    }

    #[test]
    fn test_set_code_after_missed_lookup() {
        let mut evm = create_in_memory_evm();
        let target = Address::with_last_byte(0x43);
        // Caches the account as non-existent
        evm.ctx.db().basic(target).unwrap();

        evm.set_code(target, Bytes::from(hex::decode("60006000fd").unwrap()))
            .unwrap();
        let err = evm.call(target, Bytes::new()).unwrap_err();
        assert!(matches!(err, RuntimeError::Revert(_)));
    }
}
