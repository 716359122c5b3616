//! Core types for facet deployment and diamond upgrades
//!
//! This module defines the data structures shared across the crate:
//! - Fork metadata
//! - Facet cut actions and deployed facets
//! - The report produced by an upgrade

pub use alloy::primitives::{Address, Bytes, Log, Selector, TxKind, B256, U256};
use serde::Serialize;

/// Block context the fork is pinned to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForkInfo {
    /// Chain ID reported by the RPC endpoint
    pub chain_id: u64,
    /// Pinned block number
    pub block_number: u64,
    /// Pinned block timestamp (Unix timestamp)
    pub timestamp: u64,
    /// Block producer
    pub coinbase: Address,
    /// Block gas limit
    pub gas_limit: u64,
    /// Block difficulty (zero after the merge)
    pub difficulty: U256,
    /// Header `mixHash`, used as `PREVRANDAO`
    pub prevrandao: B256,
}

/// Action applied to a group of selectors by `diamondCut`
///
/// Discriminants match the `IDiamondCut.FacetCutAction` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FacetCutAction {
    Add = 0,
    Replace = 1,
    Remove = 2,
}

impl From<FacetCutAction> for u8 {
    fn from(action: FacetCutAction) -> u8 {
        action as u8
    }
}

/// A facet contract deployed during an upgrade
#[derive(Debug, Clone, Serialize)]
pub struct DeployedFacet {
    /// Contract name the facet was built from
    pub name: String,
    /// Address the facet was deployed to
    pub address: Address,
    /// Selectors of every external function of the facet
    pub selectors: Vec<Selector>,
    /// Gas used by the deployment
    pub gas_used: u64,
}

/// Outcome of a successful upgrade
#[derive(Debug, Clone, Serialize)]
pub struct UpgradeReport {
    /// Diamond that was cut
    pub diamond: Address,
    /// Account the cut was sent from
    pub owner: Address,
    /// Facets deployed and added, in deployment order
    pub facets: Vec<DeployedFacet>,
    /// Gas used by the `diamondCut` transaction
    pub gas_used: u64,
    /// Whether the diamond emitted a `DiamondCut` event matching the cut
    pub cut_event_seen: bool,
    /// Logs emitted by the `diamondCut` transaction
    #[serde(skip)]
    pub logs: Vec<Log>,
}

impl UpgradeReport {
    /// Total number of selectors cut into the diamond
    pub fn selector_count(&self) -> usize {
        self.facets.iter().map(|f| f.selectors.len()).sum()
    }
}
