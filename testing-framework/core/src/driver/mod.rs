pub mod nodes;
pub mod scope;

use thiserror::Error;

pub use nodes::NodeFactory;
pub use scope::{DriverNodes, NetworkScope};

use crate::topology::config::NetworkBuildError;

pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Network(#[from] NetworkBuildError),
    #[error("node factory failed to start nodes")]
    NodeFactory(#[source] DynError),
}
