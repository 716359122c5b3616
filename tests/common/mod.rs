#![allow(dead_code)]

use std::path::Path;

use serde_json::{json, Value};

/// Creation code that deploys the single-byte runtime `STOP`
pub const STOP_INITCODE: &str = "0x6001600c60003960016000f300";

/// Write a Hardhat-style artifact for `name` exposing `functions`
///
/// Each function is given as `(name, "type,type,...")`.
pub fn write_artifact(root: &Path, name: &str, functions: &[(&str, &str)]) {
    let mut abi: Vec<Value> = functions
        .iter()
        .map(|(function, inputs)| {
            let inputs: Vec<Value> = inputs
                .split(',')
                .filter(|ty| !ty.is_empty())
                .enumerate()
                .map(|(i, ty)| json!({ "name": format!("arg{i}"), "type": ty }))
                .collect();
            json!({
                "type": "function",
                "name": function,
                "inputs": inputs,
                "outputs": [],
                "stateMutability": "nonpayable"
            })
        })
        .collect();
    abi.push(json!({
        "type": "event",
        "name": "Staked",
        "anonymous": false,
        "inputs": [{
            "name": "amount",
            "type": "uint256",
            "indexed": false,
            "internalType": "uint256"
        }]
    }));

    let artifact = json!({
        "_format": "hh-sol-artifact-1",
        "contractName": name,
        "sourceName": format!("contracts/facets/{name}.sol"),
        "abi": abi,
        "bytecode": STOP_INITCODE,
        "deployedBytecode": "0x00",
        "linkReferences": {},
        "deployedLinkReferences": {}
    });

    let dir = root.join("contracts").join("facets").join(format!("{name}.sol"));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join(format!("{name}.json")),
        serde_json::to_string_pretty(&artifact).unwrap(),
    )
    .unwrap();
}

/// Artifacts for the two staking facets with disjoint selectors
pub fn write_staking_artifacts(root: &Path) {
    write_artifact(
        root,
        "StakingFacet",
        &[("stakeIntoPool", "address,uint256"), ("withdrawFromPool", "address,uint256")],
    );
    write_artifact(root, "StakingTokenFacet", &[("claimTickets", "uint256[],uint256[]")]);
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
