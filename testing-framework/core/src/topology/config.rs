use std::{fs, path::Path};

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use testnet_driver_config::{
    identity::Identity,
    keys::{
        DEFAULT_SCHEME_NAME, KeyMaterialError, KeyProvisioner, RandomnessSource, SchemeError,
        SchemeRegistry,
    },
    topology::{
        group_params::{GroupParametersError, encode_group_parameters},
        invariants::{TopologyInvariantError, validate_identities},
        notary::{
            MemberSet, NotaryDeclaration, NotaryDeclarations, TaggedWorkerNaming, WorkerNaming,
            resolve_notary_topology,
        },
    },
};
use testnet_driver_env as tf_env;
use thiserror::Error;
use tracing::{debug, info};

use crate::topology::generation::Network;

#[derive(Debug, Error)]
pub enum NetworkBuildError {
    #[error(transparent)]
    Invariants(#[from] TopologyInvariantError),
    #[error(transparent)]
    Scheme(#[from] SchemeError),
    #[error(transparent)]
    KeyMaterial(#[from] KeyMaterialError),
    #[error(transparent)]
    GroupParameters(#[from] GroupParametersError),
}

#[derive(Debug, Error)]
pub enum NetworkConfigError {
    #[error("failed to read network config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse network config {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
}

fn default_scheme_name() -> String {
    DEFAULT_SCHEME_NAME.to_owned()
}

/// Everything needed to build a network: who participates, which notary
/// services exist, and how keys are generated.
///
/// Assembled up front by the caller and handed whole to
/// [`NetworkBuilder::build`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub members: MemberSet,
    #[serde(default)]
    pub notaries: NotaryDeclarations,
    #[serde(default = "default_scheme_name")]
    pub scheme_name: String,
    #[serde(default, rename = "key_seed")]
    pub randomness: RandomnessSource,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::empty()
    }
}

impl NetworkConfig {
    /// No members, no notaries, default scheme, OS entropy.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            members: MemberSet::new(),
            notaries: NotaryDeclarations::new(),
            scheme_name: default_scheme_name(),
            randomness: RandomnessSource::Os,
        }
    }

    #[must_use]
    pub fn with_members(members: impl IntoIterator<Item = Identity>) -> Self {
        Self {
            members: members.into_iter().collect(),
            ..Self::empty()
        }
    }

    #[must_use]
    pub fn with_member(mut self, member: Identity) -> Self {
        self.members.insert(member);
        self
    }

    /// Declare a non-validating notary service supporting the given protocol
    /// versions.
    #[must_use]
    pub fn with_notary(
        mut self,
        service: Identity,
        protocol_version: u32,
        other_versions: impl IntoIterator<Item = u32>,
    ) -> Self {
        self.notaries.declare(NotaryDeclaration::new(
            service,
            protocol_version,
            other_versions,
        ));
        self
    }

    #[must_use]
    pub fn with_scheme_name(mut self, scheme_name: impl Into<String>) -> Self {
        self.scheme_name = scheme_name.into();
        self
    }

    #[must_use]
    pub const fn with_randomness(mut self, randomness: RandomnessSource) -> Self {
        self.randomness = randomness;
        self
    }

    /// Apply `TESTNET_DRIVER_SCHEME` and `TESTNET_DRIVER_KEY_SEED` when set.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(scheme_name) = tf_env::scheme_override() {
            debug!(scheme = %scheme_name, "scheme overridden from environment");
            self.scheme_name = scheme_name;
        }
        if let RandomnessSource::Seeded(seed) = RandomnessSource::from_env() {
            debug!(seed, "key seed overridden from environment");
            self.randomness = RandomnessSource::Seeded(seed);
        }
        self
    }

    pub fn load_from_file(path: &Path) -> Result<Self, NetworkConfigError> {
        let content = fs::read_to_string(path).map_err(|source| NetworkConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| NetworkConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Builds immutable [`Network`] descriptors from a [`NetworkConfig`].
pub struct NetworkBuilder<'a> {
    registry: &'a SchemeRegistry,
    naming: Box<dyn WorkerNaming + Send + Sync + 'a>,
}

impl<'a> NetworkBuilder<'a> {
    #[must_use]
    pub fn new(registry: &'a SchemeRegistry) -> Self {
        Self {
            registry,
            naming: Box::new(TaggedWorkerNaming),
        }
    }

    /// Replace the function deriving notary worker identities.
    #[must_use]
    pub fn with_worker_naming(mut self, naming: impl WorkerNaming + Send + Sync + 'a) -> Self {
        self.naming = Box::new(naming);
        self
    }

    #[must_use]
    pub const fn registry(&self) -> &SchemeRegistry {
        self.registry
    }

    /// Build with the randomness source named in the config.
    pub fn build(&self, config: &NetworkConfig) -> Result<Network, NetworkBuildError> {
        self.build_with_rng(config, config.randomness.rng())
    }

    /// Build drawing key material from `rng`. Nothing is generated unless
    /// every identity, the scheme and the notary topology check out.
    pub fn build_with_rng<R: RngCore + CryptoRng>(
        &self,
        config: &NetworkConfig,
        rng: R,
    ) -> Result<Network, NetworkBuildError> {
        let NetworkConfig {
            members,
            notaries,
            scheme_name,
            ..
        } = config;

        validate_identities(members.iter().chain(notaries.services()))?;

        let scheme = self.registry.find_scheme(scheme_name)?;
        let mut provisioner = KeyProvisioner::new(scheme, rng)?;

        let topology = resolve_notary_topology(members, notaries, self.naming.as_ref())?;

        info!(
            members = members.len(),
            notaries = notaries.len(),
            scheme = %scheme.code_name(),
            "building notary network"
        );

        let member_keys = provisioner.generate_key_pairs(members.iter());
        let worker_keys = provisioner.generate_key_pairs(topology.workers());

        let group_parameters =
            encode_group_parameters(self.registry, notaries, &topology, &worker_keys)?;

        debug!(entries = group_parameters.len(), "encoded group parameters");

        Ok(Network::new(
            scheme.clone(),
            member_keys,
            worker_keys,
            topology,
            group_parameters,
        ))
    }
}
