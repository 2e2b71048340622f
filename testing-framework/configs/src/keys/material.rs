use std::fmt;

use p256::pkcs8::{EncodePublicKey as _, LineEnding};
use rand::{CryptoRng, RngCore};
use sha2::{Digest as _, Sha256};
use thiserror::Error;

use super::scheme::KeyScheme;

const SHORT_ID_LEN: usize = 12;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyMaterialError {
    #[error("cannot generate key pairs for scheme '{scheme}': {reason}")]
    KeyGenerationFailure { scheme: String, reason: String },
    #[error("failed to encode {algorithm} public key: {reason}")]
    Encoding {
        algorithm: &'static str,
        reason: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublicKey {
    Secp256r1(p256::PublicKey),
    Secp256k1(k256::PublicKey),
    Ed25519(ed25519_dalek::VerifyingKey),
}

impl PublicKey {
    #[must_use]
    pub const fn algorithm(&self) -> &'static str {
        match self {
            Self::Secp256r1(_) => "secp256r1",
            Self::Secp256k1(_) => "secp256k1",
            Self::Ed25519(_) => "Ed25519",
        }
    }

    /// DER encoded SubjectPublicKeyInfo.
    pub fn to_der(&self) -> Result<Vec<u8>, KeyMaterialError> {
        let document = match self {
            Self::Secp256r1(key) => key.to_public_key_der(),
            Self::Secp256k1(key) => key.to_public_key_der(),
            Self::Ed25519(key) => key.to_public_key_der(),
        }
        .map_err(|err| self.encoding_error(&err))?;

        Ok(document.as_bytes().to_vec())
    }

    /// PEM encoded SubjectPublicKeyInfo.
    pub fn to_pem(&self) -> Result<String, KeyMaterialError> {
        match self {
            Self::Secp256r1(key) => key.to_public_key_pem(LineEnding::LF),
            Self::Secp256k1(key) => key.to_public_key_pem(LineEnding::LF),
            Self::Ed25519(key) => key.to_public_key_pem(LineEnding::LF),
        }
        .map_err(|err| self.encoding_error(&err))
    }

    /// First 12 hex characters of the SHA-256 of the encoded key.
    pub fn short_id(&self) -> Result<String, KeyMaterialError> {
        let digest = Sha256::digest(self.to_der()?);
        let mut id = hex::encode(digest);
        id.truncate(SHORT_ID_LEN);
        Ok(id)
    }

    fn encoding_error(&self, err: &dyn fmt::Display) -> KeyMaterialError {
        KeyMaterialError::Encoding {
            algorithm: self.algorithm(),
            reason: err.to_string(),
        }
    }
}

#[derive(Clone)]
pub enum PrivateKey {
    Secp256r1(p256::SecretKey),
    Secp256k1(k256::SecretKey),
    Ed25519(ed25519_dalek::SigningKey),
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let algorithm = match self {
            Self::Secp256r1(_) => "secp256r1",
            Self::Secp256k1(_) => "secp256k1",
            Self::Ed25519(_) => "Ed25519",
        };
        f.debug_struct("PrivateKey")
            .field("algorithm", &algorithm)
            .finish_non_exhaustive()
    }
}

/// Key pair owned by exactly one identity of the generated network.
#[derive(Clone, Debug)]
pub struct KeyPair {
    public: PublicKey,
    private: PrivateKey,
}

impl KeyPair {
    #[must_use]
    pub const fn public(&self) -> &PublicKey {
        &self.public
    }

    #[must_use]
    pub const fn private(&self) -> &PrivateKey {
        &self.private
    }
}

/// Key-pair generator bound to one resolved scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyPairGenerator {
    Secp256r1,
    Secp256k1,
    Ed25519,
}

impl KeyPairGenerator {
    /// Pick the backend able to produce keys for `scheme`.
    pub fn for_scheme(scheme: &KeyScheme) -> Result<Self, KeyMaterialError> {
        let curve = scheme.curve().map(str::to_ascii_lowercase);
        match (scheme.algorithm_name(), curve.as_deref()) {
            ("EC", Some("secp256r1" | "p-256" | "prime256v1")) => Ok(Self::Secp256r1),
            ("EC", Some("secp256k1")) => Ok(Self::Secp256k1),
            ("EdDSA", Some("ed25519") | None) => Ok(Self::Ed25519),
            (algorithm, curve) => Err(KeyMaterialError::KeyGenerationFailure {
                scheme: scheme.code_name().to_owned(),
                reason: format!(
                    "no key pair generator for algorithm '{algorithm}' with curve '{}'",
                    curve.unwrap_or("<none>")
                ),
            }),
        }
    }

    pub fn generate<R: RngCore + CryptoRng>(self, rng: &mut R) -> KeyPair {
        match self {
            Self::Secp256r1 => {
                let secret = p256::SecretKey::random(rng);
                KeyPair {
                    public: PublicKey::Secp256r1(secret.public_key()),
                    private: PrivateKey::Secp256r1(secret),
                }
            }
            Self::Secp256k1 => {
                let secret = k256::SecretKey::random(rng);
                KeyPair {
                    public: PublicKey::Secp256k1(secret.public_key()),
                    private: PrivateKey::Secp256k1(secret),
                }
            }
            Self::Ed25519 => {
                let signing = ed25519_dalek::SigningKey::generate(rng);
                KeyPair {
                    public: PublicKey::Ed25519(signing.verifying_key()),
                    private: PrivateKey::Ed25519(signing),
                }
            }
        }
    }
}
