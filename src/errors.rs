//! Error types for forking, deployment and diamond upgrades
//!
//! This module defines the error handling system that covers:
//! - Fork initialization errors
//! - Runtime execution errors
//! - Artifact loading and cut construction errors
//! - Token-related errors
//! - Upgrade outcome errors

use alloy::primitives::{Address, Selector};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the upgrade tool
///
/// Every fallible operation in the crate rolls up into this type, so callers
/// only need to handle a single error.
#[derive(Debug, Error)]
pub enum UpgradeError {
    /// Errors occurring while setting up the forked EVM
    #[error("Failed to initialize fork: {0}")]
    Init(#[from] InitError),

    /// Errors occurring during transaction execution
    #[error("Error during execution: {0}")]
    Runtime(#[from] RuntimeError),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Compiled contract artifacts could not be used
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// The cut list is malformed and would be rejected by the diamond
    #[error("Invalid cut: {0}")]
    Cut(#[from] CutError),

    /// Errors related to token operations
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// The `diamondCut` transaction did not succeed
    #[error("Diamond upgrade failed on {diamond}: {reason}")]
    CutFailed { diamond: Address, reason: String },

    /// A cut selector does not route to the facet it was cut to
    #[error("Selector {selector} routes to {actual}, expected {expected}")]
    Misrouted {
        selector: Selector,
        expected: Address,
        actual: Address,
    },
}

/// Initialization-specific errors
///
/// These errors occur during the setup phase of the fork,
/// typically related to network connectivity and configuration.
#[derive(Debug, Error)]
pub enum InitError {
    /// Invalid or malformed RPC URL
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    /// Database setup or connection errors
    #[error("Database initialization failed: {0}")]
    DatabaseError(String),

    /// Chain ID retrieval errors
    #[error("Failed to get chain ID: {0}")]
    ChainIdFetchError(String),

    /// Block header retrieval errors
    #[error("Failed to get block {number}: {reason}")]
    BlockFetchError { number: String, reason: String },
}

/// Runtime execution errors
///
/// These errors occur during actual transaction execution,
/// including reverts, halts and state access problems.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The EVM refused or failed to run the transaction
    #[error("Transaction execution failed: {0}")]
    ExecutionFailed(String),

    /// Errors accessing account information
    #[error("Account access error: {0}")]
    AccountAccess(String),

    /// Transaction explicitly reverted
    #[error("Reverted: {0}")]
    Revert(String),

    /// Execution halted (out of gas, invalid opcode, ...)
    #[error("Halted: {0}")]
    Halt(String),

    /// Return data could not be decoded
    #[error("Failed to decode return data of {call}: {reason}")]
    Decode { call: &'static str, reason: String },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No RPC endpoint was configured for the fork
    #[error("No RPC URL configured; set POLYGON_NETWORK or pass --rpc-url")]
    MissingRpcUrl,

    /// No facets were listed for deployment
    #[error("No facets configured")]
    NoFacets,
}

/// Compiled artifact errors
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// No `<name>.json` artifact under the artifacts directory
    #[error("Artifact for {name} not found under {dir}")]
    NotFound { name: String, dir: PathBuf },

    /// Several `<name>.json` artifacts exist under the artifacts directory
    #[error("Multiple artifacts found for {name}: {paths:?}")]
    Ambiguous { name: String, paths: Vec<PathBuf> },

    /// Reading the artifact file failed
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact is not valid compiler output
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The artifact has no ABI
    #[error("Artifact {name} has no ABI")]
    MissingAbi { name: String },

    /// The artifact has no creation bytecode (interface or abstract contract)
    #[error("Artifact {name} has no creation bytecode")]
    MissingBytecode { name: String },
}

/// Cut construction errors
#[derive(Debug, Error)]
pub enum CutError {
    /// A facet exposes no external functions
    #[error("Facet {facet} exposes no function selectors")]
    EmptySelectors { facet: String },

    /// The same selector is listed by two cut entries
    #[error("Selector {selector} is listed by both {first} and {second}")]
    DuplicateSelector {
        selector: Selector,
        first: String,
        second: String,
    },
}

/// Token-specific errors
#[derive(Debug, Error)]
pub enum TokenError {
    /// General token query failures
    #[error("Failed to query token {address}: {reason}")]
    QueryFailed { address: Address, reason: String },

    /// Token call reverted
    #[error("Token call reverted for {address}: {reason}")]
    CallReverted { address: Address, reason: String },

    /// The transfer transaction could not be executed
    #[error("Transfer on {address} could not be executed: {reason}")]
    TransferFailed { address: Address, reason: String },

    /// `transfer` returned `false`
    #[error("Transfer of {amount} from {from} on {address} returned false")]
    TransferRejected {
        address: Address,
        from: Address,
        amount: alloy::primitives::U256,
    },
}
