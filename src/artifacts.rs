//! Compiled contract artifacts
//!
//! Facets are compiled by an external toolchain. This module reads the JSON
//! artifacts it emits and extracts the two things an upgrade needs: the
//! creation bytecode and the function selectors.
//!
//! Supported layouts under the artifacts directory:
//! - Hardhat: `contracts/<File>.sol/<Name>.json`
//! - Foundry: `<File>.sol/<Name>.json`
//! - Flat: `<Name>.json`

use crate::errors::ArtifactError;
use alloy::{
    json_abi::{ContractObject, Function},
    primitives::{Bytes, Selector},
};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A compiled facet contract
#[derive(Debug, Clone)]
pub struct FacetArtifact {
    /// Contract name
    pub name: String,
    /// Selectors of every function, in ABI declaration order
    pub selectors: Vec<Selector>,
    /// Creation bytecode
    pub bytecode: Bytes,
}

impl FacetArtifact {
    /// Parse a facet from the contents of an artifact file
    pub fn from_json(name: &str, path: &Path, json: &str) -> Result<Self, ArtifactError> {
        let parse_error = |source| ArtifactError::Parse {
            path: path.to_path_buf(),
            source,
        };
        let value: Value = serde_json::from_str(json).map_err(parse_error)?;

        let abi = value
            .get("abi")
            .and_then(Value::as_array)
            .ok_or_else(|| ArtifactError::MissingAbi {
                name: name.to_string(),
            })?;
        let selectors = selectors(abi).map_err(parse_error)?;

        let object = ContractObject::deserialize(&value).map_err(parse_error)?;
        let bytecode = object
            .bytecode
            .filter(|code| !code.is_empty())
            .ok_or_else(|| ArtifactError::MissingBytecode {
                name: name.to_string(),
            })?;

        Ok(Self {
            name: name.to_string(),
            selectors,
            bytecode,
        })
    }
}

/// Collect the selector of every function in a raw ABI array
///
/// Events, errors, the constructor, fallback and receive have no selector
/// routed by a diamond and are skipped. Overloads each get their own selector.
/// Order follows the ABI array, which is the contract's declaration order.
pub fn selectors(abi: &[Value]) -> Result<Vec<Selector>, serde_json::Error> {
    abi.iter()
        .filter(|item| item.get("type").and_then(Value::as_str) == Some("function"))
        .map(|item| Function::deserialize(item).map(|function| function.selector()))
        .collect()
}

/// Lookup of compiled artifacts by contract name
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory searched for artifacts
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find the artifact file for `name`
    ///
    /// Debug (`*.dbg.json`) and build-info files share the stem pattern and
    /// are never matched. More than one remaining match is an error: the
    /// contract name alone cannot tell them apart.
    pub fn find(&self, name: &str) -> Result<PathBuf, ArtifactError> {
        let file_name = format!("{name}.json");
        let mut paths: Vec<PathBuf> = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.file_name().to_str() == Some(file_name.as_str()))
            .filter(|entry| {
                !entry
                    .path()
                    .components()
                    .any(|c| c.as_os_str() == "build-info")
            })
            .map(|entry| entry.into_path())
            .collect();

        match paths.len() {
            0 => Err(ArtifactError::NotFound {
                name: name.to_string(),
                dir: self.root.clone(),
            }),
            1 => Ok(paths.remove(0)),
            _ => {
                paths.sort();
                Err(ArtifactError::Ambiguous {
                    name: name.to_string(),
                    paths,
                })
            }
        }
    }

    /// Load and parse the artifact for `name`
    pub fn load(&self, name: &str) -> Result<FacetArtifact, ArtifactError> {
        let path = self.find(name)?;
        log::debug!("Loading artifact {} from {}", name, path.display());
        let json = std::fs::read_to_string(&path).map_err(|source| ArtifactError::Io {
            path: path.clone(),
            source,
        })?;
        FacetArtifact::from_json(name, &path, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::keccak256;

    const STAKING_ARTIFACT: &str = r#"{
        "_format": "hh-sol-artifact-1",
        "contractName": "StakingFacet",
        "sourceName": "contracts/facets/StakingFacet.sol",
        "abi": [
            {"type": "constructor", "inputs": [], "stateMutability": "nonpayable"},
            {"type": "event", "name": "Staked", "anonymous": false,
             "inputs": [{"name": "user", "type": "address", "indexed": true}]},
            {"type": "error", "name": "NotOwner", "inputs": []},
            {"type": "function", "name": "stake", "stateMutability": "nonpayable",
             "inputs": [{"name": "amount", "type": "uint256"}], "outputs": []},
            {"type": "function", "name": "stake", "stateMutability": "nonpayable",
             "inputs": [{"name": "token", "type": "address"},
                        {"name": "amount", "type": "uint256"}],
             "outputs": []},
            {"type": "function", "name": "totalStaked", "stateMutability": "view",
             "inputs": [], "outputs": [{"name": "", "type": "uint256"}]},
            {"type": "receive", "stateMutability": "payable"}
        ],
        "bytecode": "0x6001600c60003960016000f300",
        "deployedBytecode": "0x00",
        "linkReferences": {},
        "deployedLinkReferences": {}
    }"#;

    const INTERFACE_ARTIFACT: &str = r#"{
        "contractName": "IStaking",
        "abi": [
            {"type": "function", "name": "stake", "stateMutability": "nonpayable",
             "inputs": [{"name": "amount", "type": "uint256"}], "outputs": []}
        ],
        "bytecode": "0x",
        "deployedBytecode": "0x"
    }"#;

    fn selector_of(signature: &str) -> Selector {
        Selector::from_slice(&keccak256(signature.as_bytes())[..4])
    }

    #[test]
    fn test_selectors_cover_functions_only() {
        let path = Path::new("StakingFacet.json");
        let artifact = FacetArtifact::from_json("StakingFacet", path, STAKING_ARTIFACT).unwrap();

        assert_eq!(
            artifact.selectors,
            vec![
                selector_of("stake(uint256)"),
                selector_of("stake(address,uint256)"),
                selector_of("totalStaked()"),
            ]
        );
        assert_eq!(artifact.bytecode.len(), 13);
    }

    #[test]
    fn test_interface_has_no_bytecode() {
        let path = Path::new("IStaking.json");
        let err = FacetArtifact::from_json("IStaking", path, INTERFACE_ARTIFACT).unwrap_err();
        assert!(matches!(err, ArtifactError::MissingBytecode { name } if name == "IStaking"));
    }

    #[test]
    fn test_invalid_json() {
        let path = Path::new("Broken.json");
        let err = FacetArtifact::from_json("Broken", path, "{ not json").unwrap_err();
        assert!(matches!(err, ArtifactError::Parse { .. }));
    }

    #[test]
    fn test_store_finds_nested_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("contracts/facets/StakingFacet.sol");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("StakingFacet.json"), STAKING_ARTIFACT).unwrap();
        std::fs::write(nested.join("StakingFacet.dbg.json"), "{}").unwrap();
        let build_info = dir.path().join("build-info");
        std::fs::create_dir_all(&build_info).unwrap();
        std::fs::write(build_info.join("StakingFacet.json"), "{}").unwrap();

        let store = ArtifactStore::new(dir.path());
        assert_eq!(store.find("StakingFacet").unwrap(), nested.join("StakingFacet.json"));

        let artifact = store.load("StakingFacet").unwrap();
        assert_eq!(artifact.name, "StakingFacet");
        assert_eq!(artifact.selectors.len(), 3);
    }

    #[test]
    fn test_store_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let err = store.load("FarmFacet").unwrap_err();
        assert!(matches!(err, ArtifactError::NotFound { name, .. } if name == "FarmFacet"));
    }

    #[test]
    fn test_selectors_follow_declaration_order() {
        let abi: Vec<Value> = serde_json::from_str(
            r#"[
                {"type": "function", "name": "withdrawFromPool", "stateMutability": "nonpayable",
                 "inputs": [{"name": "amount", "type": "uint256"}], "outputs": []},
                {"type": "event", "name": "Withdrawn", "anonymous": false, "inputs": []},
                {"type": "function", "name": "claim", "stateMutability": "nonpayable",
                 "inputs": [], "outputs": []}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            selectors(&abi).unwrap(),
            vec![selector_of("withdrawFromPool(uint256)"), selector_of("claim()")]
        );
    }

    #[test]
    fn test_store_rejects_ambiguous_name() {
        let dir = tempfile::tempdir().unwrap();
        for folder in ["contracts/facets", "contracts/legacy"] {
            let nested = dir.path().join(folder).join("StakingFacet.sol");
            std::fs::create_dir_all(&nested).unwrap();
            std::fs::write(nested.join("StakingFacet.json"), STAKING_ARTIFACT).unwrap();
        }

        let store = ArtifactStore::new(dir.path());
        match store.find("StakingFacet").unwrap_err() {
            ArtifactError::Ambiguous { name, paths } => {
                assert_eq!(name, "StakingFacet");
                assert_eq!(paths.len(), 2);
                assert!(paths[0].starts_with(dir.path().join("contracts/facets")));
                assert!(paths[1].starts_with(dir.path().join("contracts/legacy")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
