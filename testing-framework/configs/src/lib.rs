use std::sync::LazyLock;

use testnet_driver_env as tf_env;

pub mod constants;
pub mod identity;
pub mod keys;
pub mod topology;

pub use identity::{Identity, IdentityParseError};

pub static IS_DEBUG_TRACING: LazyLock<bool> = LazyLock::new(tf_env::debug_tracing);
