use rand::{SeedableRng as _, rngs::StdRng};
use testnet_driver_config::constants::NON_VALIDATING_NOTARY_PROTOCOL;
use testnet_driver_core::{Identity, NetworkBuilder, NetworkConfig, SchemeRegistry};

fn notary() -> anyhow::Result<Identity> {
    Ok("CN=Notary, O=Notary Service, L=Zurich, C=CH".parse()?)
}

fn config() -> anyhow::Result<NetworkConfig> {
    Ok(
        NetworkConfig::with_members(["CN=Alice, O=Alice Corp, L=London, C=GB".parse()?])
            .with_notary(notary()?, 1, [2]),
    )
}

#[test]
fn single_service_entries_in_order() -> anyhow::Result<()> {
    let registry = SchemeRegistry::platform();
    let network = NetworkBuilder::new(&registry).build_with_rng(&config()?, StdRng::seed_from_u64(3))?;

    let service = notary()?;
    let worker = network
        .notary_worker_for(&service)
        .ok_or_else(|| anyhow::anyhow!("no worker"))?;
    let worker_key = network
        .notary_workers()
        .get(worker)
        .ok_or_else(|| anyhow::anyhow!("no worker key"))?;
    let encoded = registry.encode_public_key(worker_key.public())?;

    let entries: Vec<(&str, &str)> = network
        .group_parameters()
        .iter()
        .map(|entry| (entry.key(), entry.value()))
        .collect();
    let service_name = service.to_string();
    assert_eq!(
        entries,
        vec![
            ("service.0.name", service_name.as_str()),
            ("service.0.keys.0", encoded.as_str()),
            ("service.0.flow.protocol.name", NON_VALIDATING_NOTARY_PROTOCOL),
            ("service.0.flow.protocol.version.0", "1"),
            ("service.0.flow.protocol.version.1", "2"),
        ]
    );
    assert!(encoded.starts_with("-----BEGIN PUBLIC KEY-----"));
    Ok(())
}

#[test]
fn rebuilds_keep_keys_and_replace_key_material() -> anyhow::Result<()> {
    let registry = SchemeRegistry::platform();
    let builder = NetworkBuilder::new(&registry);
    let config = config()?;

    let first = builder.build(&config)?;
    let second = builder.build(&config)?;

    assert!(
        first
            .group_parameters()
            .keys()
            .eq(second.group_parameters().keys())
    );
    for (a, b) in first
        .group_parameters()
        .iter()
        .zip(second.group_parameters().iter())
    {
        if a.key().ends_with(".keys.0") {
            assert_ne!(a.value(), b.value());
        } else {
            assert_eq!(a.value(), b.value());
        }
    }
    Ok(())
}
