//! # keywire-algorithm — Algorithm Descriptors and Key Attributes
//!
//! In-memory descriptions of the cryptographic algorithms and key policies a
//! caller asks the service to use, and the codecs that translate them to and
//! from their wire identifiers:
//!
//! - **Descriptors** (`algorithm.rs`): a tagged union over hash, MAC,
//!   cipher, AEAD, asymmetric signature, asymmetric encryption, key
//!   agreement and key derivation algorithms. Variants carry their own
//!   parameters, e.g. signature schemes carry the hash they sign with.
//!
//! - **AlgorithmCodec** (`codec.rs`): `encode` maps every descriptor to
//!   exactly one 32-bit identifier or refuses it with
//!   [`AlgorithmError::Unsupported`]; `decode` maps identifiers back and
//!   rejects anything unknown. `decode(encode(d)) == d` for every encodable
//!   descriptor.
//!
//! - **Key attributes** (`attributes.rs`): key type, size, lifetime and
//!   usage policy, validated and packed into a single wire message before
//!   any request is built.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `keywire-*` crates.
//! - Validation is purely local; nothing here performs I/O.

pub mod algorithm;
pub mod attributes;
pub mod codec;
pub mod error;

pub use algorithm::{
    Aead, AeadWithDefaultLengthTag, Algorithm, AsymmetricEncryption, AsymmetricSignature, Cipher,
    FullLengthMac, Hash, KeyAgreement, KeyDerivation, Mac, RawKeyAgreement, SignHash,
};
pub use attributes::{
    DhFamily, EccFamily, KeyAttributes, KeyPolicy, KeyType, Lifetime, Persistence, UsageFlags,
    WireKeyAttributes,
};
pub use codec::WireAlgorithm;
pub use error::{AlgorithmError, AttributeError};
