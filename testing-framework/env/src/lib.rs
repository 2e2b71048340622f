use std::env;

/// Overrides the key scheme used by every network built from config.
pub const SCHEME_ENV: &str = "TESTNET_DRIVER_SCHEME";

/// Seeds key generation so fixtures can be reproduced across runs.
pub const KEY_SEED_ENV: &str = "TESTNET_DRIVER_KEY_SEED";

pub const DEBUG_TRACING_ENV: &str = "TESTNET_DRIVER_TRACING";

#[must_use]
pub fn scheme_override() -> Option<String> {
    env::var(SCHEME_ENV)
        .ok()
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
}

#[must_use]
pub fn key_seed() -> Option<u64> {
    env::var(KEY_SEED_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
}

#[must_use]
pub fn debug_tracing() -> bool {
    env::var(DEBUG_TRACING_ENV).is_ok_and(|val| val.eq_ignore_ascii_case("true"))
}

#[must_use]
pub fn rust_log() -> Option<String> {
    env::var("RUST_LOG").ok()
}
