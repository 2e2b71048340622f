use std::sync::Arc;

use tracing::debug;

use super::{DriverError, nodes::NodeFactory};
use crate::topology::{
    config::{NetworkBuildError, NetworkBuilder, NetworkConfig},
    generation::Network,
};

/// How long a generated network lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkScope {
    /// Built once, shared read-only by every test in the suite.
    PerSuite,
    /// Rebuilt with fresh key material for every test.
    PerTest,
}

/// Hands networks to tests according to a [`NetworkScope`].
pub struct DriverNodes<'a> {
    builder: NetworkBuilder<'a>,
    config: NetworkConfig,
    scope: NetworkScope,
    suite_network: Option<Arc<Network>>,
}

impl<'a> DriverNodes<'a> {
    /// For [`NetworkScope::PerSuite`] the network is built here, so setup
    /// errors surface before any test runs.
    pub fn new(
        builder: NetworkBuilder<'a>,
        config: NetworkConfig,
        scope: NetworkScope,
    ) -> Result<Self, NetworkBuildError> {
        let suite_network = match scope {
            NetworkScope::PerSuite => Some(Arc::new(builder.build(&config)?)),
            NetworkScope::PerTest => None,
        };

        Ok(Self {
            builder,
            config,
            scope,
            suite_network,
        })
    }

    pub fn for_all_tests(
        builder: NetworkBuilder<'a>,
        config: NetworkConfig,
    ) -> Result<Self, NetworkBuildError> {
        Self::new(builder, config, NetworkScope::PerSuite)
    }

    pub fn for_each_test(
        builder: NetworkBuilder<'a>,
        config: NetworkConfig,
    ) -> Result<Self, NetworkBuildError> {
        Self::new(builder, config, NetworkScope::PerTest)
    }

    #[must_use]
    pub const fn scope(&self) -> NetworkScope {
        self.scope
    }

    #[must_use]
    pub const fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// The suite network, or a freshly built one for per-test scope.
    pub fn network(&self) -> Result<Arc<Network>, NetworkBuildError> {
        if let Some(network) = &self.suite_network {
            return Ok(Arc::clone(network));
        }

        debug!("building per-test network");
        Ok(Arc::new(self.builder.build(&self.config)?))
    }

    /// Start nodes for the scoped network and run `test` against them.
    pub fn run_with<F, T>(
        &self,
        factory: &F,
        test: impl FnOnce(&F::Nodes, &Network) -> T,
    ) -> Result<T, DriverError>
    where
        F: NodeFactory,
    {
        let network = self.network()?;
        let nodes = factory
            .create_nodes(
                network.members(),
                network.notary_workers(),
                network.group_parameters(),
            )
            .map_err(DriverError::NodeFactory)?;

        Ok(test(&nodes, &network))
    }
}
