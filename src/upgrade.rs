//! Facet deployment and diamond upgrade
//!
//! [`deploy_upgrade`] deploys every configured facet, cuts all of their
//! selectors into the diamond with a single `Add` cut, and sends the cut as the
//! diamond owner. [`verify_routing`] checks afterwards that the diamond's loupe
//! routes each selector to the facet it was cut to.

use crate::{
    artifacts::ArtifactStore,
    config::UpgradeConfig,
    cut::{build_add_cut, encode_diamond_cut, find_cut_event},
    errors::UpgradeError,
    evm::ForkEvm,
    types::{DeployedFacet, UpgradeReport},
    utils::{diamond_utils::facet_address, error_utils::describe_failure},
};
use log::{debug, info, warn};
use revm::{
    context_interface::result::ExecutionResult,
    database::{CacheDB, DatabaseRef},
};

/// Deploy the configured facets and add them to the diamond
///
/// 1. Loads each facet's artifact and deploys it from `config.deployer`
/// 2. Builds an `Add` cut covering every selector of every facet
/// 3. Sends `diamondCut(cut, address(0), "")` from `config.owner` with
///    `config.gas_limit`
///
/// # Returns
/// * `Ok(UpgradeReport)` - Deployed facets and the cut receipt
/// * `Err(UpgradeError::CutFailed)` - If the cut reverted or halted
/// * `Err(UpgradeError)` - Any configuration, artifact or deployment failure
pub fn deploy_upgrade<DB>(
    evm: &mut ForkEvm<CacheDB<DB>>,
    config: &UpgradeConfig,
) -> Result<UpgradeReport, UpgradeError>
where
    DB: DatabaseRef,
{
    config.validate()?;
    let store = ArtifactStore::new(&config.artifacts_dir);

    info!("Deploying facets");
    let mut facets = Vec::with_capacity(config.facets.len());
    for name in &config.facets {
        let artifact = store.load(name)?;
        let selectors = artifact.selectors;
        let deployment = evm.deploy(config.deployer, artifact.bytecode)?;
        info!("{} deployed: {}", name, deployment.address);
        debug!(
            "{} exposes {} selectors, deployment used {} gas",
            name,
            selectors.len(),
            deployment.gas_used
        );
        facets.push(DeployedFacet {
            name: name.clone(),
            address: deployment.address,
            selectors,
            gas_used: deployment.gas_used,
        });
    }

    let cut = build_add_cut(&facets)?;
    let data = encode_diamond_cut(cut.clone());
    let result = evm.transact(config.owner, config.diamond, data, Some(config.gas_limit))?;

    let (gas_used, logs) = match result {
        ExecutionResult::Success { gas_used, logs, .. } => (gas_used, logs),
        failed => {
            return Err(UpgradeError::CutFailed {
                diamond: config.diamond,
                reason: describe_failure(&failed),
            })
        }
    };

    let cut_event_seen = find_cut_event(config.diamond, &logs).as_ref() == Some(&cut);
    if !cut_event_seen {
        warn!("No matching DiamondCut event emitted by {}", config.diamond);
    }
    info!("Diamond upgrade complete");

    Ok(UpgradeReport {
        diamond: config.diamond,
        owner: config.owner,
        facets,
        gas_used,
        cut_event_seen,
        logs,
    })
}

/// Check that every cut selector routes to its new facet
///
/// Stops at the first selector the diamond's loupe maps elsewhere.
pub fn verify_routing<DB>(
    evm: &mut ForkEvm<CacheDB<DB>>,
    report: &UpgradeReport,
) -> Result<(), UpgradeError>
where
    DB: DatabaseRef,
{
    for facet in &report.facets {
        for selector in &facet.selectors {
            let actual = facet_address(evm, report.diamond, *selector)?;
            if actual != facet.address {
                return Err(UpgradeError::Misrouted {
                    selector: *selector,
                    expected: facet.address,
                    actual,
                });
            }
        }
        debug!("{} routes all {} selectors", facet.name, facet.selectors.len());
    }
    info!("Verified routing of {} selectors", report.selector_count());
    Ok(())
}
