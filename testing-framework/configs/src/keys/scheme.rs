use thiserror::Error;

use super::material::{KeyMaterialError, PublicKey};

pub const ECDSA_SECP256R1_CODE_NAME: &str = "CORDA.ECDSA.SECP256R1";
pub const ECDSA_SECP256K1_CODE_NAME: &str = "CORDA.ECDSA.SECP256K1";
pub const EDDSA_ED25519_CODE_NAME: &str = "CORDA.EDDSA.ED25519";

/// Scheme used when a network config does not name one.
pub const DEFAULT_SCHEME_NAME: &str = ECDSA_SECP256R1_CODE_NAME;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemeError {
    #[error("unknown key scheme '{name}'")]
    UnknownScheme { name: String },
}

/// Description of a named key scheme: the algorithm family plus the curve
/// parameters a key-pair generator must be initialised with.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyScheme {
    code_name: String,
    algorithm_name: String,
    curve: Option<String>,
}

impl KeyScheme {
    #[must_use]
    pub fn new(
        code_name: impl Into<String>,
        algorithm_name: impl Into<String>,
        curve: Option<&str>,
    ) -> Self {
        Self {
            code_name: code_name.into(),
            algorithm_name: algorithm_name.into(),
            curve: curve.map(str::to_owned),
        }
    }

    #[must_use]
    pub fn code_name(&self) -> &str {
        &self.code_name
    }

    #[must_use]
    pub fn algorithm_name(&self) -> &str {
        &self.algorithm_name
    }

    #[must_use]
    pub fn curve(&self) -> Option<&str> {
        self.curve.as_deref()
    }
}

/// Registry of the key schemes a network may be built with.
///
/// Constructed once (usually via [`SchemeRegistry::platform`]) and passed by
/// reference to every builder.
#[derive(Clone, Debug, Default)]
pub struct SchemeRegistry {
    schemes: Vec<KeyScheme>,
}

impl SchemeRegistry {
    /// Empty registry; every lookup fails until schemes are registered.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            schemes: Vec::new(),
        }
    }

    /// Registry with the platform signing schemes.
    #[must_use]
    pub fn platform() -> Self {
        Self::empty()
            .register(KeyScheme::new(
                ECDSA_SECP256R1_CODE_NAME,
                "EC",
                Some("secp256r1"),
            ))
            .register(KeyScheme::new(
                ECDSA_SECP256K1_CODE_NAME,
                "EC",
                Some("secp256k1"),
            ))
            .register(KeyScheme::new(
                EDDSA_ED25519_CODE_NAME,
                "EdDSA",
                Some("Ed25519"),
            ))
    }

    /// Add a scheme, replacing any scheme already registered under the same
    /// code name.
    #[must_use]
    pub fn register(mut self, scheme: KeyScheme) -> Self {
        match self
            .schemes
            .iter_mut()
            .find(|existing| existing.code_name == scheme.code_name)
        {
            Some(existing) => *existing = scheme,
            None => self.schemes.push(scheme),
        }
        self
    }

    pub fn find_scheme(&self, name: &str) -> Result<&KeyScheme, SchemeError> {
        self.schemes
            .iter()
            .find(|scheme| scheme.code_name == name)
            .ok_or_else(|| SchemeError::UnknownScheme {
                name: name.to_owned(),
            })
    }

    pub fn code_names(&self) -> impl Iterator<Item = &str> {
        self.schemes.iter().map(|scheme| scheme.code_name.as_str())
    }

    /// Canonical string form of a public key, as published in group
    /// parameters.
    pub fn encode_public_key(&self, key: &PublicKey) -> Result<String, KeyMaterialError> {
        key.to_pem()
    }
}
