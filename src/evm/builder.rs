//! Fork construction
//!
//! `EvmBuilder` connects to an RPC endpoint, pins a block, and builds a
//! `ForkEvm` whose state is read lazily from that block and cached locally.
//! Writes (deployments, the cut, token transfers) only ever land in the local
//! cache.

use std::marker::PhantomData;

use alloy::{
    eips::{BlockId, BlockNumberOrTag},
    network::AnyNetwork,
    providers::{DynProvider, Provider, ProviderBuilder, WsConnect},
};
use revm::{
    context::Context,
    database::{AlloyDB, CacheDB, Database},
    database_interface::{EmptyDB, WrapDatabaseAsync},
    handler::{MainBuilder, MainContext},
    inspector::NoOpInspector,
};

use crate::{
    errors::{InitError, UpgradeError},
    evm::ForkEvm,
    types::ForkInfo,
    utils::block_utils::fork_block_env,
};

#[cfg(feature = "foundry-fork")]
pub mod fork_db;

/// Provider type shared by every RPC-backed fork
pub type AnyNetworkProvider = DynProvider<AnyNetwork>;

/// Lazily-fetched RPC state, made synchronous for revm
pub type AlloyForkDb = WrapDatabaseAsync<AlloyDB<AnyNetwork, AnyNetworkProvider>>;

/// Fork backed by an RPC endpoint
pub type AlloyForkEvm = ForkEvm<CacheDB<AlloyForkDb>>;

/// Fork over empty state, for offline runs and tests
pub type MemoryForkEvm = ForkEvm<CacheDB<EmptyDB>>;

/// Builder for RPC-backed forks
///
/// The `DB` marker selects the state backend; [`EvmBuilder::new_alloy`] uses
/// revm's `AlloyDB`, `new_shared` (feature `foundry-fork`) uses foundry's
/// `SharedBackend`.
pub struct EvmBuilder<DB> {
    pub(crate) rpc_url: String,
    pub(crate) block_number: Option<u64>,
    pub(crate) _marker: PhantomData<DB>,
}

impl EvmBuilder<AlloyForkDb> {
    /// Creates a builder backed by `AlloyDB`
    ///
    /// # Arguments
    /// - `url`: RPC endpoint URL (HTTP/HTTPS or WS/WSS)
    pub fn new_alloy(url: &str) -> Self {
        Self {
            rpc_url: url.to_string(),
            block_number: None,
            _marker: PhantomData,
        }
    }
}

impl<DB> EvmBuilder<DB> {
    /// Pin the fork to `block_number` instead of the latest block
    ///
    /// Forking an old block needs an archive node.
    pub fn with_block_number(mut self, block_number: u64) -> Self {
        self.block_number = Some(block_number);
        self
    }

    /// Pin the fork to `block_number`, or to the latest block if `None`
    pub fn with_optional_block_number(mut self, block_number: Option<u64>) -> Self {
        self.block_number = block_number;
        self
    }
}

impl EvmBuilder<AlloyForkDb> {
    /// Builds the fork
    ///
    /// 1. Creates the provider (HTTP or WebSocket, by URL scheme)
    /// 2. Fetches chain ID, block number and timestamp
    /// 3. Wraps `AlloyDB` pinned at that block in a `CacheDB`
    /// 4. Configures a mainnet context for simulation
    ///
    /// Must run on a multi-threaded tokio runtime: state reads block on the
    /// runtime handle from inside synchronous EVM execution.
    pub async fn build(self) -> Result<AlloyForkEvm, UpgradeError> {
        let provider = get_provider(&self.rpc_url).await?;
        let info = get_block(&provider, self.block_number).await?;

        let alloy_db = AlloyDB::new(provider, BlockId::number(info.block_number));
        let wrapped = WrapDatabaseAsync::new(alloy_db).ok_or_else(|| {
            InitError::DatabaseError(
                "no multi-threaded tokio runtime available; use \
                 #[tokio::main] or #[tokio::test(flavor = \"multi_thread\")]"
                    .to_string(),
            )
        })?;

        log::info!(
            "Forked chain {} at block {} (timestamp {})",
            info.chain_id,
            info.block_number,
            info.timestamp
        );
        Ok(build_fork_evm(CacheDB::new(wrapped), info))
    }
}

/// Create an EVM over empty in-memory state
///
/// Chain ID 1, block 0. Useful for dry runs with stubbed contracts.
pub fn create_in_memory_evm() -> MemoryForkEvm {
    let info = ForkInfo {
        chain_id: 1,
        ..Default::default()
    };
    build_fork_evm(CacheDB::new(EmptyDB::default()), info)
}

/// Connect to `rpc_url`, choosing the transport from the URL scheme
pub async fn get_provider(rpc_url: &str) -> Result<AnyNetworkProvider, InitError> {
    if rpc_url.starts_with("http") {
        let url = rpc_url
            .parse()
            .map_err(|_| InitError::InvalidRpcUrl(format!("Failed to parse RPC URL {rpc_url}")))?;
        Ok(ProviderBuilder::new()
            .network::<AnyNetwork>()
            .connect_http(url)
            .erased())
    } else if rpc_url.starts_with("ws") {
        let provider = ProviderBuilder::new()
            .network::<AnyNetwork>()
            .connect_ws(WsConnect::new(rpc_url))
            .await
            .map_err(|e| InitError::InvalidRpcUrl(format!("Failed to connect to WebSocket: {e}")))?;
        Ok(provider.erased())
    } else {
        Err(InitError::InvalidRpcUrl(format!(
            "Unsupported scheme in {rpc_url}; expected http(s):// or ws(s)://"
        )))
    }
}

/// Fetch chain ID and the header fields of the block to fork at
///
/// `None` resolves the latest block, so the fork is still pinned to a
/// concrete block number.
pub async fn get_block<P>(provider: &P, block_number: Option<u64>) -> Result<ForkInfo, InitError>
where
    P: Provider<AnyNetwork>,
{
    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| InitError::ChainIdFetchError(e.to_string()))?;

    let tag = match block_number {
        Some(number) => BlockNumberOrTag::Number(number),
        None => BlockNumberOrTag::Latest,
    };
    let block = provider
        .get_block_by_number(tag)
        .await
        .map_err(|e| InitError::BlockFetchError {
            number: tag.to_string(),
            reason: e.to_string(),
        })?
        .ok_or_else(|| InitError::BlockFetchError {
            number: tag.to_string(),
            reason: "block not found".to_string(),
        })?;

    let header = &block.header;
    Ok(ForkInfo {
        chain_id,
        block_number: header.number,
        timestamp: header.timestamp,
        coinbase: header.beneficiary,
        gas_limit: header.gas_limit,
        difficulty: header.difficulty,
        prevrandao: header.mix_hash.unwrap_or_default(),
    })
}

/// Configure a mainnet context over `db` for simulation
pub(crate) fn build_fork_evm<DB>(db: DB, info: ForkInfo) -> ForkEvm<DB>
where
    DB: Database,
{
    let mut ctx = Context::mainnet().with_db(db);
    let cfg = &mut ctx.cfg;

    // Network configuration
    cfg.chain_id = info.chain_id;

    // Any account may send: no signature, no balance, no EIP-3607 code check
    cfg.disable_eip3607 = true;
    cfg.disable_balance_check = true;
    cfg.limit_contract_code_size = None;
    cfg.disable_block_gas_limit = true;
    cfg.disable_base_fee = true;

    ctx.block = fork_block_env(&info);

    let evm = ctx.build_mainnet_with_inspector(NoOpInspector);
    ForkEvm::new(evm, info)
}
