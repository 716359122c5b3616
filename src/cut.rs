//! Diamond cut construction
//!
//! Builds the `FacetCut[]` argument of `diamondCut` from deployed facets and
//! encodes the call. The diamond interfaces are declared here with `sol!`:
//! - `IDiamondCut`: the upgrade entry point and its `DiamondCut` event
//! - `IDiamondLoupe`: selector-to-facet lookups used to verify routing

use crate::{
    errors::CutError,
    types::{Address, Bytes, DeployedFacet, FacetCutAction, Log, Selector},
};
use alloy::sol_types::{SolCall, SolEvent};
use std::collections::HashMap;

pub mod interfaces {
    use alloy::sol;

    sol! {
        #[derive(Debug, PartialEq, Eq)]
        struct FacetCut {
            address facetAddress;
            uint8 action;
            bytes4[] functionSelectors;
        }

        interface IDiamondCut {
            function diamondCut(
                FacetCut[] calldata _diamondCut,
                address _init,
                bytes calldata _calldata
            ) external;

            event DiamondCut(FacetCut[] _diamondCut, address _init, bytes _calldata);
        }

        interface IDiamondLoupe {
            function facetAddress(bytes4 _functionSelector)
                external
                view
                returns (address facetAddress_);
        }
    }
}

pub use interfaces::FacetCut;
use interfaces::IDiamondCut::{diamondCutCall, DiamondCut};

impl FacetCut {
    /// Cut entry applying `action` to `selectors` on `facet`
    pub fn new(facet: Address, action: FacetCutAction, selectors: Vec<Selector>) -> Self {
        Self {
            facetAddress: facet,
            action: action.into(),
            functionSelectors: selectors,
        }
    }
}

/// Build an `Add` cut for every deployed facet
///
/// Rejects facets without selectors and selectors claimed by two facets;
/// the diamond reverts on both.
pub fn build_add_cut(facets: &[DeployedFacet]) -> Result<Vec<FacetCut>, CutError> {
    let mut owners: HashMap<Selector, &str> = HashMap::new();
    let mut cut = Vec::with_capacity(facets.len());

    for facet in facets {
        if facet.selectors.is_empty() {
            return Err(CutError::EmptySelectors {
                facet: facet.name.clone(),
            });
        }
        for selector in &facet.selectors {
            if let Some(first) = owners.insert(*selector, &facet.name) {
                return Err(CutError::DuplicateSelector {
                    selector: *selector,
                    first: first.to_string(),
                    second: facet.name.clone(),
                });
            }
        }
        cut.push(FacetCut::new(
            facet.address,
            FacetCutAction::Add,
            facet.selectors.clone(),
        ));
    }

    Ok(cut)
}

/// Encode `diamondCut(cut, address(0), "")`
pub fn encode_diamond_cut(cut: Vec<FacetCut>) -> Bytes {
    diamondCutCall {
        _diamondCut: cut,
        _init: Address::ZERO,
        _calldata: Bytes::new(),
    }
    .abi_encode()
    .into()
}

/// Find the `DiamondCut` event emitted by `diamond` among `logs`
pub fn find_cut_event(diamond: Address, logs: &[Log]) -> Option<Vec<FacetCut>> {
    logs.iter()
        .filter(|log| log.address == diamond)
        .filter(|log| log.data.topics().first() == Some(&DiamondCut::SIGNATURE_HASH))
        .find_map(|log| DiamondCut::decode_log_data(&log.data).ok())
        .map(|event| event._diamondCut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, LogData};

    fn facet(name: &str, address: Address, selectors: &[[u8; 4]]) -> DeployedFacet {
        DeployedFacet {
            name: name.to_string(),
            address,
            selectors: selectors.iter().map(|s| Selector::from(*s)).collect(),
            gas_used: 0,
        }
    }

    #[test]
    fn test_build_add_cut() {
        let facets = vec![
            facet(
                "StakingFacet",
                address!("00000000000000000000000000000000000000a1"),
                &[[1, 2, 3, 4], [5, 6, 7, 8]],
            ),
            facet(
                "StakingTokenFacet",
                address!("00000000000000000000000000000000000000a2"),
                &[[9, 9, 9, 9]],
            ),
        ];
        let cut = build_add_cut(&facets).unwrap();

        assert_eq!(cut.len(), 2);
        assert_eq!(cut[0].facetAddress, facets[0].address);
        assert_eq!(cut[0].action, 0);
        assert_eq!(cut[0].functionSelectors, facets[0].selectors);
        assert_eq!(cut[1].facetAddress, facets[1].address);
        assert_eq!(cut[1].functionSelectors.len(), 1);
    }

    #[test]
    fn test_duplicate_selector_rejected() {
        let facets = vec![
            facet("StakingFacet", Address::with_last_byte(1), &[[1, 2, 3, 4]]),
            facet("StakingTokenFacet", Address::with_last_byte(2), &[[1, 2, 3, 4]]),
        ];
        let err = build_add_cut(&facets).unwrap_err();
        assert!(matches!(
            err,
            CutError::DuplicateSelector { first, second, .. }
                if first == "StakingFacet" && second == "StakingTokenFacet"
        ));
    }

    #[test]
    fn test_empty_facet_rejected() {
        let facets = vec![facet("EmptyFacet", Address::with_last_byte(1), &[])];
        assert!(matches!(
            build_add_cut(&facets),
            Err(CutError::EmptySelectors { facet }) if facet == "EmptyFacet"
        ));
    }

    #[test]
    fn test_encode_diamond_cut() {
        let cut = vec![FacetCut::new(
            Address::with_last_byte(7),
            FacetCutAction::Add,
            vec![Selector::from([0xde, 0xad, 0xbe, 0xef])],
        )];
        let data = encode_diamond_cut(cut.clone());

        // diamondCut((address,uint8,bytes4[])[],address,bytes)
        assert_eq!(&data[..4], &[0x1f, 0x93, 0x1c, 0x1c]);
        let decoded = diamondCutCall::abi_decode(&data).unwrap();
        assert_eq!(decoded._diamondCut, cut);
        assert_eq!(decoded._init, Address::ZERO);
        assert!(decoded._calldata.is_empty());
    }

    #[test]
    fn test_find_cut_event() {
        let diamond = Address::with_last_byte(0xd1);
        let cut = vec![FacetCut::new(
            Address::with_last_byte(7),
            FacetCutAction::Add,
            vec![Selector::from([1, 2, 3, 4])],
        )];
        let event = DiamondCut {
            _diamondCut: cut.clone(),
            _init: Address::ZERO,
            _calldata: Bytes::new(),
        };
        let logs = vec![
            Log {
                address: Address::with_last_byte(0x99),
                data: event.encode_log_data(),
            },
            Log {
                address: diamond,
                data: LogData::new_unchecked(vec![], Bytes::new()),
            },
            Log {
                address: diamond,
                data: event.encode_log_data(),
            },
        ];

        assert_eq!(find_cut_event(diamond, &logs), Some(cut));
        assert_eq!(find_cut_event(diamond, &logs[..2]), None);
    }
}
