use testnet_driver_config::{keys::KeyPairs, topology::group_params::GroupParameters};

use super::DynError;

/// Turns generated key material into running embedded nodes.
///
/// Implemented by the node embedding layer; this crate only hands over the
/// three values below.
pub trait NodeFactory {
    type Nodes;

    fn create_nodes(
        &self,
        members: &KeyPairs,
        notary_workers: &KeyPairs,
        group_parameters: &GroupParameters,
    ) -> Result<Self::Nodes, DynError>;
}
