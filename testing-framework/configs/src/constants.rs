/// Reserved marker carried in the common name of every notary worker.
/// Member and notary service names must not contain it.
pub const NOTARY_WORKER_TAG: &str = "NotaryWorker";

/// Protocol advertised by every encoded notary service.
pub const NON_VALIDATING_NOTARY_PROTOCOL: &str = "com.r3.corda.notary.plugin.nonvalidating";

/// Leading segment of every notary group parameter key.
pub const NOTARY_SERVICE_KEY_PREFIX: &str = "service";
