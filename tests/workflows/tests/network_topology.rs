use std::collections::HashSet;

use testnet_driver_config::{
    keys::KeyPairs,
    topology::invariants::TopologyInvariantError,
};
use testnet_driver_core::{
    Identity, NetworkBuildError, NetworkBuilder, NetworkConfig, RandomnessSource, SchemeRegistry,
};

fn identity(raw: &str) -> anyhow::Result<Identity> {
    Ok(raw.parse()?)
}

fn two_services() -> anyhow::Result<NetworkConfig> {
    Ok(NetworkConfig::with_members([
        identity("CN=Alice, O=Alice Corp, L=London, C=GB")?,
        identity("CN=Bob, O=Bob Corp, L=New York, C=US")?,
        identity("CN=Carol, O=Carol Corp, L=Paris, C=FR")?,
    ])
    .with_notary(identity("CN=Notary A, O=Notary Service, L=Zurich, C=CH")?, 1, [2])
    .with_notary(identity("CN=Notary B, O=Notary Service, L=Zurich, C=CH")?, 1, []))
}

fn identities(keys: &KeyPairs) -> HashSet<&Identity> {
    keys.identities().collect()
}

#[test]
fn cardinalities_match_declarations() -> anyhow::Result<()> {
    let registry = SchemeRegistry::platform();
    let config = two_services()?;
    let network = NetworkBuilder::new(&registry).build(&config)?;

    assert_eq!(network.members().len(), config.members.len());
    assert_eq!(network.notary_workers().len(), config.notaries.len());
    assert_eq!(network.notary_topology().len(), config.notaries.len());
    for service in config.notaries.services() {
        let worker = network
            .notary_worker_for(service)
            .ok_or_else(|| anyhow::anyhow!("no worker for {service}"))?;
        assert!(network.notary_workers().contains(worker));
    }
    Ok(())
}

#[test]
fn members_and_workers_are_disjoint() -> anyhow::Result<()> {
    let registry = SchemeRegistry::platform();
    let network = NetworkBuilder::new(&registry).build(&two_services()?)?;

    let members = identities(network.members());
    let workers = identities(network.notary_workers());
    assert!(members.is_disjoint(&workers));
    assert_eq!(
        network.node_identities().count(),
        members.len() + workers.len()
    );
    Ok(())
}

#[test]
fn member_declared_as_notary_is_rejected() -> anyhow::Result<()> {
    let shared = identity("CN=Alice, O=Alice Corp, L=London, C=GB")?;
    let config = NetworkConfig::with_members([shared.clone()]).with_notary(shared.clone(), 1, []);
    let registry = SchemeRegistry::platform();

    let err = NetworkBuilder::new(&registry)
        .build(&config)
        .expect_err("overlapping member must be rejected");

    match err {
        NetworkBuildError::Invariants(TopologyInvariantError::MemberNotaryOverlap { overlap }) => {
            assert_eq!(overlap, vec![shared]);
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[test]
fn reserved_worker_marker_is_rejected() -> anyhow::Result<()> {
    let config = NetworkConfig::with_members([identity(
        "CN=Sneaky NotaryWorker, O=Alice Corp, L=London, C=GB",
    )?]);
    let registry = SchemeRegistry::platform();

    let err = NetworkBuilder::new(&registry)
        .build(&config)
        .expect_err("reserved marker must be rejected");

    assert!(matches!(
        err,
        NetworkBuildError::Invariants(TopologyInvariantError::InvalidIdentity { .. })
    ));
    Ok(())
}

#[test]
fn unknown_scheme_is_rejected() -> anyhow::Result<()> {
    let config = two_services()?.with_scheme_name("CORDA.RSA.NOPE");
    let registry = SchemeRegistry::platform();

    let err = NetworkBuilder::new(&registry)
        .build(&config)
        .expect_err("unknown scheme must be rejected");

    assert!(matches!(err, NetworkBuildError::Scheme(_)));
    assert!(err.to_string().contains("CORDA.RSA.NOPE"));
    Ok(())
}

#[test]
fn no_notaries_means_no_workers_and_no_parameters() -> anyhow::Result<()> {
    let config = NetworkConfig::with_members([identity("CN=Alice, O=Alice Corp, L=London, C=GB")?]);
    let registry = SchemeRegistry::platform();
    let network = NetworkBuilder::new(&registry).build(&config)?;

    assert_eq!(network.members().len(), 1);
    assert!(network.notary_workers().is_empty());
    assert!(network.notary_topology().is_empty());
    assert!(network.group_parameters().is_empty());
    Ok(())
}

#[test]
fn every_platform_scheme_builds() -> anyhow::Result<()> {
    let registry = SchemeRegistry::platform();
    let builder = NetworkBuilder::new(&registry);

    for code_name in registry.code_names() {
        let config = two_services()?.with_scheme_name(code_name);
        let network = builder.build(&config)?;
        assert_eq!(network.scheme().code_name(), code_name);
        assert_eq!(network.group_parameters().len(), 5 + 4);
    }
    Ok(())
}

#[test]
fn seeded_builds_are_reproducible() -> anyhow::Result<()> {
    let registry = SchemeRegistry::platform();
    let builder = NetworkBuilder::new(&registry);
    let config = two_services()?.with_randomness(RandomnessSource::Seeded(42));

    let first = builder.build(&config)?;
    let second = builder.build(&config)?;

    assert_eq!(first.group_parameters(), second.group_parameters());
    Ok(())
}
