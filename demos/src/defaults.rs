use testnet_driver_core::IS_DEBUG_TRACING;
use testnet_driver_env as tf_env;
use tracing_subscriber::{EnvFilter, fmt};

/// Install a fmt subscriber filtered by `RUST_LOG`. Without it, falls back
/// to `info`, or to `debug` for the driver crates when debug tracing is on.
pub fn init_tracing() {
    let directives = tf_env::rust_log().unwrap_or_else(|| {
        if *IS_DEBUG_TRACING {
            "info,testnet_driver_config=debug,testnet_driver_core=debug".to_owned()
        } else {
            "info".to_owned()
        }
    });
    let _ = fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_target(true)
        .try_init();
}
