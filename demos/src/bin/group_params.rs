use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use testnet_driver_core::{NetworkBuilder, NetworkConfig, RandomnessSource, SchemeRegistry};
use testnet_driver_demos::defaults::init_tracing;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Build a notary test network and print its group parameters")]
struct Args {
    /// YAML network config.
    config: PathBuf,
    /// Override the key scheme named in the config.
    #[arg(long)]
    scheme: Option<String>,
    /// Seed key generation for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Print entries as JSON instead of `key=value` lines.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Args::parse();

    let mut config = NetworkConfig::load_from_file(&cli.config)
        .with_context(|| format!("failed to load network config {}", cli.config.display()))?
        .with_env_overrides();
    if let Some(scheme) = cli.scheme {
        config = config.with_scheme_name(scheme);
    }
    if let Some(seed) = cli.seed {
        config = config.with_randomness(RandomnessSource::Seeded(seed));
    }

    let registry = SchemeRegistry::platform();
    let network = NetworkBuilder::new(&registry)
        .build(&config)
        .context("failed to build network")?;

    info!(
        members = network.members().len(),
        notary_workers = network.notary_workers().len(),
        entries = network.group_parameters().len(),
        "network built"
    );

    if cli.json {
        let rendered = serde_json::to_string_pretty(network.group_parameters())
            .context("failed to render group parameters")?;
        println!("{rendered}");
    } else {
        for entry in network.group_parameters() {
            println!("{entry}");
        }
    }

    Ok(())
}
