use testnet_driver_config::{
    identity::Identity,
    keys::{KeyPairs, KeyScheme},
    topology::{group_params::GroupParameters, notary::NotaryTopology},
};

/// Immutable description of a generated test network: member keys, notary
/// worker keys, and the group parameters advertising the notary services.
#[derive(Clone, Debug)]
pub struct Network {
    scheme: KeyScheme,
    members: KeyPairs,
    notary_workers: KeyPairs,
    notary_topology: NotaryTopology,
    group_parameters: GroupParameters,
}

impl Network {
    pub(crate) const fn new(
        scheme: KeyScheme,
        members: KeyPairs,
        notary_workers: KeyPairs,
        notary_topology: NotaryTopology,
        group_parameters: GroupParameters,
    ) -> Self {
        Self {
            scheme,
            members,
            notary_workers,
            notary_topology,
            group_parameters,
        }
    }

    /// Scheme every key in this network was generated with.
    #[must_use]
    pub const fn scheme(&self) -> &KeyScheme {
        &self.scheme
    }

    #[must_use]
    pub const fn members(&self) -> &KeyPairs {
        &self.members
    }

    #[must_use]
    pub const fn notary_workers(&self) -> &KeyPairs {
        &self.notary_workers
    }

    #[must_use]
    pub const fn notary_topology(&self) -> &NotaryTopology {
        &self.notary_topology
    }

    #[must_use]
    pub const fn group_parameters(&self) -> &GroupParameters {
        &self.group_parameters
    }

    /// Worker identity holding the signing key of a notary service.
    #[must_use]
    pub fn notary_worker_for(&self, service: &Identity) -> Option<&Identity> {
        self.notary_topology.worker_for(service)
    }

    /// Every identity that will run as a node, members first.
    pub fn node_identities(&self) -> impl Iterator<Item = &Identity> {
        self.members
            .identities()
            .chain(self.notary_workers.identities())
    }
}
