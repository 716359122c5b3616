use std::path::PathBuf;

use alloy::primitives::Address;
use anyhow::Context;
use clap::Parser;
use diamond_upgrade::{
    config::{
        DEFAULT_CUT_GAS_LIMIT, DEFAULT_DEPLOYER, DEFAULT_DIAMOND, DEFAULT_FACETS,
        DEFAULT_FORK_BLOCK, DEFAULT_OWNER, RPC_URL_ENV,
    },
    deploy_upgrade, verify_routing, EvmBuilder, UpgradeConfig, UpgradeReport,
};
use log::{error, info};

/// Deploy facets and cut them into a diamond on a forked chain
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RPC endpoint of the network to fork (http(s):// or ws(s)://)
    #[arg(long, env = RPC_URL_ENV)]
    rpc_url: Option<String>,

    /// Block to fork at
    #[arg(long, default_value_t = DEFAULT_FORK_BLOCK, conflicts_with = "latest")]
    fork_block: u64,

    /// Fork at the latest block instead of a pinned one
    #[arg(long)]
    latest: bool,

    /// Diamond owner, impersonated to send the cut
    #[arg(long, default_value_t = DEFAULT_OWNER)]
    owner: Address,

    /// Account the facets are deployed from
    #[arg(long, default_value_t = DEFAULT_DEPLOYER)]
    deployer: Address,

    /// Diamond to upgrade
    #[arg(long, default_value_t = DEFAULT_DIAMOND)]
    diamond: Address,

    /// Facet contract to deploy and add; repeat for several
    #[arg(long = "facet", value_name = "NAME")]
    facets: Vec<String>,

    /// Directory holding the compiled artifacts
    #[arg(long, default_value = "artifacts")]
    artifacts: PathBuf,

    /// Gas limit of the diamondCut transaction
    #[arg(long, default_value_t = DEFAULT_CUT_GAS_LIMIT)]
    gas_limit: u64,

    /// Check every cut selector through the diamond loupe afterwards
    #[arg(long)]
    verify: bool,

    /// Print the upgrade report as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn into_config(self) -> UpgradeConfig {
        let facets = if self.facets.is_empty() {
            DEFAULT_FACETS.iter().map(|s| s.to_string()).collect()
        } else {
            self.facets
        };
        UpgradeConfig {
            rpc_url: self.rpc_url,
            fork_block: (!self.latest).then_some(self.fork_block),
            owner: self.owner,
            deployer: self.deployer,
            diamond: self.diamond,
            facets,
            artifacts_dir: self.artifacts,
            gas_limit: self.gas_limit,
        }
    }
}

#[tokio::main]
async fn main() {
    // `.env` has to be loaded before clap reads POLYGON_NETWORK
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let json = args.json;
    let verify = args.verify;
    let config = args.into_config();

    let mut evm = EvmBuilder::new_alloy(config.rpc_url()?)
        .with_optional_block_number(config.fork_block)
        .build()
        .await
        .context("Failed to fork network")?;

    let report = deploy_upgrade(&mut evm, &config)?;
    if verify {
        verify_routing(&mut evm, &report)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &UpgradeReport) {
    info!(
        "Cut {} selectors into {} (gas used: {})",
        report.selector_count(),
        report.diamond,
        report.gas_used
    );
    for facet in &report.facets {
        println!("{:<24} {} ({} selectors)", facet.name, facet.address, facet.selectors.len());
    }
}
