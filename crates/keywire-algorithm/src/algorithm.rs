//! # Algorithm Descriptors
//!
//! Tagged, parameterized descriptions of algorithm choices. A descriptor is
//! only a name for an algorithm; the service executes it.
//!
//! Every type here derives `Serialize`/`Deserialize` so descriptors can be
//! stored in caller configuration. On the wire they always travel as
//! [`WireAlgorithm`](crate::codec::WireAlgorithm) identifiers.

use serde::{Deserialize, Serialize};

/// Hash algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum Hash {
    /// MD2. Legacy; has no wire identifier.
    Md2,
    /// MD4. Legacy; has no wire identifier.
    Md4,
    Md5,
    Ripemd160,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha512_224,
    Sha512_256,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
}

impl Hash {
    /// Digest size in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            Self::Md2 | Self::Md4 | Self::Md5 => 16,
            Self::Ripemd160 | Self::Sha1 => 20,
            Self::Sha224 | Self::Sha512_224 | Self::Sha3_224 => 28,
            Self::Sha256 | Self::Sha512_256 | Self::Sha3_256 => 32,
            Self::Sha384 | Self::Sha3_384 => 48,
            Self::Sha512 | Self::Sha3_512 => 64,
        }
    }
}

/// Hash parameter of a signature scheme.
///
/// `Any` is a wildcard that is only meaningful in a key policy: it permits
/// the scheme with every hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignHash {
    Any,
    Specific(Hash),
}

impl From<Hash> for SignHash {
    fn from(hash: Hash) -> Self {
        Self::Specific(hash)
    }
}

/// MAC algorithms producing their natural output length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FullLengthMac {
    Hmac { hash_alg: Hash },
    CbcMac,
    Cmac,
}

/// MAC algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mac {
    FullLength(FullLengthMac),
    /// Output truncated to `mac_length` bytes (1-63).
    Truncated {
        mac_alg: FullLengthMac,
        mac_length: usize,
    },
}

impl Mac {
    /// The underlying untruncated algorithm.
    pub fn full_length_mac(&self) -> FullLengthMac {
        match self {
            Self::FullLength(alg) | Self::Truncated { mac_alg: alg, .. } => *alg,
        }
    }
}

/// Unauthenticated cipher modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cipher {
    StreamCipher,
    Ctr,
    Cfb,
    Ofb,
    Xts,
    EcbNoPadding,
    CbcNoPadding,
    CbcPkcs7,
}

/// AEAD modes with their default (16-byte) tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AeadWithDefaultLengthTag {
    Ccm,
    Gcm,
    Chacha20Poly1305,
}

/// AEAD algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aead {
    AeadWithDefaultLengthTag(AeadWithDefaultLengthTag),
    /// Tag shortened to `tag_length` bytes (1-15).
    AeadWithShortenedTag {
        aead_alg: AeadWithDefaultLengthTag,
        tag_length: usize,
    },
}

impl Aead {
    /// The mode without tag length adjustment.
    pub fn base(&self) -> AeadWithDefaultLengthTag {
        match self {
            Self::AeadWithDefaultLengthTag(alg) | Self::AeadWithShortenedTag { aead_alg: alg, .. } => {
                *alg
            }
        }
    }
}

impl From<AeadWithDefaultLengthTag> for Aead {
    fn from(alg: AeadWithDefaultLengthTag) -> Self {
        Self::AeadWithDefaultLengthTag(alg)
    }
}

/// Asymmetric signature schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsymmetricSignature {
    RsaPkcs1v15Sign { hash_alg: SignHash },
    /// PKCS#1 v1.5 over an already-encoded digest.
    RsaPkcs1v15SignRaw,
    RsaPss { hash_alg: SignHash },
    Ecdsa { hash_alg: SignHash },
    /// ECDSA without hashing; the caller supplies the digest.
    EcdsaAny,
    DeterministicEcdsa { hash_alg: SignHash },
}

impl AsymmetricSignature {
    /// Whether the scheme requires an RSA key.
    pub fn is_rsa_alg(&self) -> bool {
        matches!(
            self,
            Self::RsaPkcs1v15Sign { .. } | Self::RsaPkcs1v15SignRaw | Self::RsaPss { .. }
        )
    }

    /// Whether the scheme requires an elliptic-curve key.
    pub fn is_ecc_alg(&self) -> bool {
        matches!(
            self,
            Self::Ecdsa { .. } | Self::EcdsaAny | Self::DeterministicEcdsa { .. }
        )
    }

    /// The hash parameter, for schemes that have one.
    pub fn hash(&self) -> Option<SignHash> {
        match self {
            Self::RsaPkcs1v15Sign { hash_alg }
            | Self::RsaPss { hash_alg }
            | Self::Ecdsa { hash_alg }
            | Self::DeterministicEcdsa { hash_alg } => Some(*hash_alg),
            Self::RsaPkcs1v15SignRaw | Self::EcdsaAny => None,
        }
    }
}

/// Asymmetric encryption schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsymmetricEncryption {
    RsaPkcs1v15Crypt,
    RsaOaep { hash_alg: Hash },
}

/// Key agreement primitives producing a raw shared secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawKeyAgreement {
    Ffdh,
    Ecdh,
}

/// Key derivation functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyDerivation {
    Hkdf { hash_alg: Hash },
    Tls12Prf { hash_alg: Hash },
    Tls12PskToMs { hash_alg: Hash },
}

/// Key agreement algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAgreement {
    Raw(RawKeyAgreement),
    /// Agreement whose shared secret is fed straight into a KDF.
    WithKeyDerivation {
        ka_alg: RawKeyAgreement,
        kdf_alg: KeyDerivation,
    },
}

impl KeyAgreement {
    /// The agreement primitive.
    pub fn raw(&self) -> RawKeyAgreement {
        match self {
            Self::Raw(ka) | Self::WithKeyDerivation { ka_alg: ka, .. } => *ka,
        }
    }
}

/// Any algorithm descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// No algorithm; used in key policies that permit nothing.
    None,
    Hash(Hash),
    Mac(Mac),
    Cipher(Cipher),
    Aead(Aead),
    AsymmetricSignature(AsymmetricSignature),
    AsymmetricEncryption(AsymmetricEncryption),
    KeyAgreement(KeyAgreement),
    KeyDerivation(KeyDerivation),
}

impl Algorithm {
    /// Short family name, used in error messages.
    pub fn family(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Hash(_) => "hash",
            Self::Mac(_) => "mac",
            Self::Cipher(_) => "cipher",
            Self::Aead(_) => "aead",
            Self::AsymmetricSignature(_) => "asymmetric signature",
            Self::AsymmetricEncryption(_) => "asymmetric encryption",
            Self::KeyAgreement(_) => "key agreement",
            Self::KeyDerivation(_) => "key derivation",
        }
    }
}

impl From<Hash> for Algorithm {
    fn from(alg: Hash) -> Self {
        Self::Hash(alg)
    }
}

impl From<Mac> for Algorithm {
    fn from(alg: Mac) -> Self {
        Self::Mac(alg)
    }
}

impl From<Cipher> for Algorithm {
    fn from(alg: Cipher) -> Self {
        Self::Cipher(alg)
    }
}

impl From<Aead> for Algorithm {
    fn from(alg: Aead) -> Self {
        Self::Aead(alg)
    }
}

impl From<AsymmetricSignature> for Algorithm {
    fn from(alg: AsymmetricSignature) -> Self {
        Self::AsymmetricSignature(alg)
    }
}

impl From<AsymmetricEncryption> for Algorithm {
    fn from(alg: AsymmetricEncryption) -> Self {
        Self::AsymmetricEncryption(alg)
    }
}

impl From<KeyAgreement> for Algorithm {
    fn from(alg: KeyAgreement) -> Self {
        Self::KeyAgreement(alg)
    }
}

impl From<KeyDerivation> for Algorithm {
    fn from(alg: KeyDerivation) -> Self {
        Self::KeyDerivation(alg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_key_family() {
        let pss = AsymmetricSignature::RsaPss {
            hash_alg: Hash::Sha256.into(),
        };
        assert!(pss.is_rsa_alg());
        assert!(!pss.is_ecc_alg());
        assert!(AsymmetricSignature::EcdsaAny.is_ecc_alg());
        assert_eq!(pss.hash(), Some(SignHash::Specific(Hash::Sha256)));
        assert_eq!(AsymmetricSignature::RsaPkcs1v15SignRaw.hash(), None);
    }

    #[test]
    fn nested_accessors() {
        let mac = Mac::Truncated {
            mac_alg: FullLengthMac::Cmac,
            mac_length: 8,
        };
        assert_eq!(mac.full_length_mac(), FullLengthMac::Cmac);
        let aead = Aead::AeadWithShortenedTag {
            aead_alg: AeadWithDefaultLengthTag::Ccm,
            tag_length: 8,
        };
        assert_eq!(aead.base(), AeadWithDefaultLengthTag::Ccm);
        let ka = KeyAgreement::WithKeyDerivation {
            ka_alg: RawKeyAgreement::Ecdh,
            kdf_alg: KeyDerivation::Hkdf {
                hash_alg: Hash::Sha256,
            },
        };
        assert_eq!(ka.raw(), RawKeyAgreement::Ecdh);
    }

    #[test]
    fn digest_sizes() {
        assert_eq!(Hash::Sha256.output_len(), 32);
        assert_eq!(Hash::Sha3_512.output_len(), 64);
        assert_eq!(Hash::Ripemd160.output_len(), 20);
    }
}
