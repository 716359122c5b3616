//! SharedBackend (foundry-fork-db) support
//!
//! When the `foundry-fork` feature is enabled, forks can be built on
//! foundry-fork-db's `SharedBackend` instead of `AlloyDB`. The backend runs
//! RPC fetches on a dedicated thread and caches state it has already seen,
//! which pays off when the same fork is queried repeatedly (for instance when
//! verifying routing for every cut selector).

use std::marker::PhantomData;
use std::sync::Arc;

pub use foundry_fork_db::SharedBackend;
use foundry_fork_db::{cache::BlockchainDbMeta, BlockchainDb};

use alloy::eips::{BlockId, BlockNumberOrTag};
use revm::database::CacheDB;

use super::{build_fork_evm, get_block, get_provider, EvmBuilder};
use crate::{errors::UpgradeError, evm::ForkEvm, utils::block_utils::fork_block_env};

/// Fork backed by foundry's `SharedBackend`
pub type SharedForkEvm = ForkEvm<CacheDB<SharedBackend>>;

impl EvmBuilder<SharedBackend> {
    /// Creates a builder backed by `SharedBackend`
    ///
    /// # Arguments
    /// - `url`: RPC endpoint URL (HTTP/HTTPS or WS/WSS)
    pub fn new_shared(url: &str) -> Self {
        Self {
            rpc_url: url.to_string(),
            block_number: None,
            _marker: PhantomData,
        }
    }

    /// Builds the fork
    ///
    /// Spawns the backend thread pinned to the fork block and layers a
    /// `CacheDB` on top so local writes never reach the shared cache.
    pub async fn build(self) -> Result<SharedForkEvm, UpgradeError> {
        let EvmBuilder {
            rpc_url,
            block_number,
            _marker,
        } = self;

        let provider = get_provider(&rpc_url).await?;
        let info = get_block(&provider, block_number).await?;
        let block_id = BlockId::Number(BlockNumberOrTag::Number(info.block_number));

        let meta = BlockchainDbMeta::new(fork_block_env(&info), rpc_url);
        let blockchain_db = BlockchainDb::new(meta, None); // None = in-memory cache

        let shared_backend =
            SharedBackend::spawn_backend_thread(Arc::new(provider), blockchain_db, Some(block_id));

        log::info!(
            "Forked chain {} at block {} with shared backend",
            info.chain_id,
            info.block_number
        );
        Ok(build_fork_evm(CacheDB::new(shared_backend), info))
    }
}
