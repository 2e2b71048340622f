use std::sync::Arc;

use testnet_driver_config::{keys::KeyPairs, topology::group_params::GroupParameters};
use testnet_driver_core::{
    Identity, NetworkBuilder, NetworkConfig, SchemeRegistry,
    driver::{DriverError, DriverNodes, DynError, NetworkScope, NodeFactory},
};

struct CountingFactory;

impl NodeFactory for CountingFactory {
    type Nodes = usize;

    fn create_nodes(
        &self,
        members: &KeyPairs,
        notary_workers: &KeyPairs,
        _group_parameters: &GroupParameters,
    ) -> Result<Self::Nodes, DynError> {
        Ok(members.len() + notary_workers.len())
    }
}

struct FailingFactory;

impl NodeFactory for FailingFactory {
    type Nodes = ();

    fn create_nodes(
        &self,
        _members: &KeyPairs,
        _notary_workers: &KeyPairs,
        _group_parameters: &GroupParameters,
    ) -> Result<Self::Nodes, DynError> {
        Err("embedded node refused to start".into())
    }
}

fn config() -> anyhow::Result<NetworkConfig> {
    let alice: Identity = "CN=Alice, O=Alice Corp, L=London, C=GB".parse()?;
    let notary: Identity = "CN=Notary, O=Notary Service, L=Zurich, C=CH".parse()?;
    Ok(NetworkConfig::with_members([alice]).with_notary(notary, 1, []))
}

#[test]
fn per_suite_networks_are_shared() -> anyhow::Result<()> {
    let registry = SchemeRegistry::platform();
    let driver = DriverNodes::for_all_tests(NetworkBuilder::new(&registry), config()?)?;

    assert_eq!(driver.scope(), NetworkScope::PerSuite);
    assert!(Arc::ptr_eq(&driver.network()?, &driver.network()?));
    Ok(())
}

#[test]
fn per_test_networks_get_fresh_keys() -> anyhow::Result<()> {
    let registry = SchemeRegistry::platform();
    let driver = DriverNodes::for_each_test(NetworkBuilder::new(&registry), config()?)?;

    let first = driver.network()?;
    let second = driver.network()?;

    assert_eq!(driver.scope(), NetworkScope::PerTest);
    assert_ne!(first.group_parameters(), second.group_parameters());
    Ok(())
}

#[test]
fn factory_receives_every_node() -> anyhow::Result<()> {
    let registry = SchemeRegistry::platform();
    let driver = DriverNodes::for_each_test(NetworkBuilder::new(&registry), config()?)?;

    let started = driver.run_with(&CountingFactory, |nodes, _network| *nodes)?;

    assert_eq!(started, 2);
    Ok(())
}

#[test]
fn factory_failures_are_surfaced() -> anyhow::Result<()> {
    let registry = SchemeRegistry::platform();
    let driver = DriverNodes::for_all_tests(NetworkBuilder::new(&registry), config()?)?;

    let err = driver
        .run_with(&FailingFactory, |_, _| ())
        .expect_err("factory error must propagate");

    assert!(matches!(err, DriverError::NodeFactory(_)));
    Ok(())
}
