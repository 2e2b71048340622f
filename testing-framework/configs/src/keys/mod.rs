pub mod material;
pub mod provisioner;
pub mod scheme;

pub use material::{KeyMaterialError, KeyPair, KeyPairGenerator, PrivateKey, PublicKey};
pub use provisioner::{KeyPairs, KeyProvisioner, RandomnessSource};
pub use scheme::{
    DEFAULT_SCHEME_NAME, ECDSA_SECP256K1_CODE_NAME, ECDSA_SECP256R1_CODE_NAME,
    EDDSA_ED25519_CODE_NAME, KeyScheme, SchemeError, SchemeRegistry,
};
