pub mod driver;
pub mod topology;

pub use testnet_driver_config::{
    IS_DEBUG_TRACING,
    identity::Identity,
    keys::{DEFAULT_SCHEME_NAME, RandomnessSource, SchemeRegistry},
};
pub use topology::{
    config::{NetworkBuildError, NetworkBuilder, NetworkConfig},
    generation::Network,
};
