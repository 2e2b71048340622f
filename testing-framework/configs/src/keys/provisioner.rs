use rand::{CryptoRng, RngCore, SeedableRng as _, rngs::StdRng};
use serde::{Deserialize, Serialize};
use testnet_driver_env as tf_env;
use tracing::{debug, warn};

use super::{
    material::{KeyMaterialError, KeyPair, KeyPairGenerator},
    scheme::KeyScheme,
};
use crate::identity::Identity;

/// Where key generation draws its entropy from.
///
/// Serialized as an optional seed: absent means `Os`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum RandomnessSource {
    /// Fresh operating-system entropy for every build.
    #[default]
    Os,
    /// Deterministic stream, for reproducible fixtures.
    Seeded(u64),
}

impl RandomnessSource {
    /// `Seeded` when `TESTNET_DRIVER_KEY_SEED` is set, otherwise `Os`.
    #[must_use]
    pub fn from_env() -> Self {
        tf_env::key_seed().into()
    }

    #[must_use]
    pub fn rng(self) -> StdRng {
        match self {
            Self::Os => StdRng::from_entropy(),
            Self::Seeded(seed) => {
                warn!(seed, "using seeded key generation; keys are not secret");
                StdRng::seed_from_u64(seed)
            }
        }
    }
}

impl From<Option<u64>> for RandomnessSource {
    fn from(seed: Option<u64>) -> Self {
        seed.map_or(Self::Os, Self::Seeded)
    }
}

impl From<RandomnessSource> for Option<u64> {
    fn from(source: RandomnessSource) -> Self {
        match source {
            RandomnessSource::Os => None,
            RandomnessSource::Seeded(seed) => Some(seed),
        }
    }
}

/// Insertion-ordered mapping from identity to its key pair.
#[derive(Clone, Debug, Default)]
pub struct KeyPairs {
    entries: Vec<(Identity, KeyPair)>,
}

impl KeyPairs {
    #[must_use]
    pub fn get(&self, identity: &Identity) -> Option<&KeyPair> {
        self.entries
            .iter()
            .find(|(owner, _)| owner == identity)
            .map(|(_, pair)| pair)
    }

    #[must_use]
    pub fn contains(&self, identity: &Identity) -> bool {
        self.get(identity).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Identity, &KeyPair)> {
        self.entries.iter().map(|(identity, pair)| (identity, pair))
    }

    pub fn identities(&self) -> impl Iterator<Item = &Identity> {
        self.entries.iter().map(|(identity, _)| identity)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Generates key pairs for identities under one scheme, drawing from an
/// injected randomness source.
pub struct KeyProvisioner<'a, R> {
    scheme: &'a KeyScheme,
    generator: KeyPairGenerator,
    rng: R,
}

impl<'a, R: RngCore + CryptoRng> KeyProvisioner<'a, R> {
    /// Fails with `KeyGenerationFailure` when no generator exists for the
    /// scheme, before any entropy is consumed.
    pub fn new(scheme: &'a KeyScheme, rng: R) -> Result<Self, KeyMaterialError> {
        let generator = KeyPairGenerator::for_scheme(scheme)?;
        Ok(Self {
            scheme,
            generator,
            rng,
        })
    }

    #[must_use]
    pub const fn scheme(&self) -> &KeyScheme {
        self.scheme
    }

    /// One fresh key pair per identity, in iteration order. Repeated
    /// identities keep their first key.
    pub fn generate_key_pairs<'i, I>(&mut self, identities: I) -> KeyPairs
    where
        I: IntoIterator<Item = &'i Identity>,
    {
        let mut pairs = KeyPairs::default();

        for identity in identities {
            if pairs.contains(identity) {
                continue;
            }

            let pair = self.generator.generate(&mut self.rng);
            match pair.public().short_id() {
                Ok(key_id) => debug!(%identity, key_id = %key_id, "generated key pair"),
                Err(error) => debug!(%identity, %error, "generated key pair"),
            }
            pairs.entries.push((identity.clone(), pair));
        }

        pairs
    }
}
