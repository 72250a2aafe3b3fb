//! # AlgorithmCodec
//!
//! Bidirectional mapping between [`Algorithm`] descriptors and 32-bit wire
//! identifiers laid out as in the PSA Crypto API:
//!
//! ```text
//!  31      24 23          16 15           8 7            0
//! +----------+--------------+--------------+--------------+
//! | category | family bits / length field  | variant | hash|
//! +----------+--------------+--------------+--------------+
//! ```
//!
//! - bits 24-30 select the category (hash, MAC, cipher, ...);
//! - for hash-parameterized schemes the low byte is the hash's own low byte
//!   (`0xff` = any hash, only valid nested in a signature scheme);
//! - truncated MACs and shortened AEAD tags store the length in bits 16-21.
//!
//! ## Invariants
//!
//! - Every descriptor encodes to exactly one identifier, or `encode` refuses
//!   it with [`AlgorithmError::Unsupported`].
//! - `decode` accepts only identifiers `encode` can produce, so
//!   `decode(encode(d)) == d` and `encode(decode(v)) == v` whenever the
//!   inner call succeeds.

use serde::{Deserialize, Serialize};

use crate::algorithm::{
    Aead, AeadWithDefaultLengthTag, Algorithm, AsymmetricEncryption, AsymmetricSignature, Cipher,
    FullLengthMac, Hash, KeyAgreement, KeyDerivation, Mac, RawKeyAgreement, SignHash,
};
use crate::error::AlgorithmError;

/// Wire identifier of an algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireAlgorithm(pub u32);

impl WireAlgorithm {
    /// Identifier of [`Algorithm::None`].
    pub const NONE: WireAlgorithm = WireAlgorithm(0);

    /// Standalone byte form, little-endian.
    pub fn to_le_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Parse the standalone byte form.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self, AlgorithmError> {
        let arr: [u8; 4] = bytes
            .try_into()
            .map_err(|_| AlgorithmError::BadLength(bytes.len()))?;
        Ok(Self(u32::from_le_bytes(arr)))
    }
}

impl std::fmt::Display for WireAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

// ─── Layout constants ────────────────────────────────────────────────

const CATEGORY_HASH: u32 = 0x0200_0000;
const CATEGORY_KEY_DERIVATION: u32 = 0x0800_0000;

const HASH_MASK: u32 = 0x0000_00ff;
const ANY_HASH: u32 = 0x0000_00ff;
const LENGTH_MASK: u32 = 0x003f_0000;
const LENGTH_OFFSET: u32 = 16;
const KEY_AGREEMENT_MASK: u32 = 0xffff_0000;

const HMAC_BASE: u32 = 0x0380_0000;
const CBC_MAC: u32 = 0x03c0_0100;
const CMAC: u32 = 0x03c0_0200;

const STREAM_CIPHER: u32 = 0x0480_0100;
const CTR: u32 = 0x04c0_1000;
const CFB: u32 = 0x04c0_1100;
const OFB: u32 = 0x04c0_1200;
const XTS: u32 = 0x0440_ff00;
const ECB_NO_PADDING: u32 = 0x0440_4400;
const CBC_NO_PADDING: u32 = 0x0440_4000;
const CBC_PKCS7: u32 = 0x0440_4100;

// AEAD bases with the tag length field cleared.
const CCM_BASE: u32 = 0x0540_0100;
const GCM_BASE: u32 = 0x0540_0200;
const CHACHA20_POLY1305_BASE: u32 = 0x0500_0500;
const AEAD_DEFAULT_TAG: usize = 16;

const RSA_PKCS1V15_SIGN_BASE: u32 = 0x0600_0200;
const RSA_PSS_BASE: u32 = 0x0600_0300;
const ECDSA_BASE: u32 = 0x0600_0600;
const DETERMINISTIC_ECDSA_BASE: u32 = 0x0600_0700;

const RSA_PKCS1V15_CRYPT: u32 = 0x0700_0200;
const RSA_OAEP_BASE: u32 = 0x0700_0300;

const HKDF_BASE: u32 = 0x0800_0100;
const TLS12_PRF_BASE: u32 = 0x0800_0200;
const TLS12_PSK_TO_MS_BASE: u32 = 0x0800_0300;

const FFDH: u32 = 0x0901_0000;
const ECDH: u32 = 0x0902_0000;

const HASH_IDS: [(Hash, u32); 13] = [
    (Hash::Md5, 0x03),
    (Hash::Ripemd160, 0x04),
    (Hash::Sha1, 0x05),
    (Hash::Sha224, 0x08),
    (Hash::Sha256, 0x09),
    (Hash::Sha384, 0x0a),
    (Hash::Sha512, 0x0b),
    (Hash::Sha512_224, 0x0c),
    (Hash::Sha512_256, 0x0d),
    (Hash::Sha3_224, 0x10),
    (Hash::Sha3_256, 0x11),
    (Hash::Sha3_384, 0x12),
    (Hash::Sha3_512, 0x13),
];

const CIPHER_IDS: [(Cipher, u32); 8] = [
    (Cipher::StreamCipher, STREAM_CIPHER),
    (Cipher::Ctr, CTR),
    (Cipher::Cfb, CFB),
    (Cipher::Ofb, OFB),
    (Cipher::Xts, XTS),
    (Cipher::EcbNoPadding, ECB_NO_PADDING),
    (Cipher::CbcNoPadding, CBC_NO_PADDING),
    (Cipher::CbcPkcs7, CBC_PKCS7),
];

// ─── Encoding ────────────────────────────────────────────────────────

/// Encode any descriptor.
pub fn encode(alg: &Algorithm) -> Result<WireAlgorithm, AlgorithmError> {
    match alg {
        Algorithm::None => Ok(WireAlgorithm::NONE),
        Algorithm::Hash(h) => encode_hash(*h),
        Algorithm::Mac(m) => encode_mac(m),
        Algorithm::Cipher(c) => Ok(encode_cipher(*c)),
        Algorithm::Aead(a) => encode_aead(a),
        Algorithm::AsymmetricSignature(s) => encode_asymmetric_signature(s),
        Algorithm::AsymmetricEncryption(e) => encode_asymmetric_encryption(e),
        Algorithm::KeyAgreement(ka) => encode_key_agreement(ka),
        Algorithm::KeyDerivation(kdf) => encode_key_derivation(kdf),
    }
}

/// Encode a hash algorithm.
pub fn encode_hash(hash: Hash) -> Result<WireAlgorithm, AlgorithmError> {
    Ok(WireAlgorithm(CATEGORY_HASH | hash_low(hash)?))
}

/// Encode a MAC algorithm.
pub fn encode_mac(mac: &Mac) -> Result<WireAlgorithm, AlgorithmError> {
    match mac {
        Mac::FullLength(alg) => full_length_mac_id(alg).map(WireAlgorithm),
        Mac::Truncated {
            mac_alg,
            mac_length,
        } => {
            let len = length_field(*mac_length, 1, 63)
                .ok_or_else(|| unsupported(format!("MAC truncated to {mac_length} bytes")))?;
            Ok(WireAlgorithm(full_length_mac_id(mac_alg)? | len))
        }
    }
}

/// Encode a cipher mode. Every cipher mode has an identifier.
pub fn encode_cipher(cipher: Cipher) -> WireAlgorithm {
    WireAlgorithm(match cipher {
        Cipher::StreamCipher => STREAM_CIPHER,
        Cipher::Ctr => CTR,
        Cipher::Cfb => CFB,
        Cipher::Ofb => OFB,
        Cipher::Xts => XTS,
        Cipher::EcbNoPadding => ECB_NO_PADDING,
        Cipher::CbcNoPadding => CBC_NO_PADDING,
        Cipher::CbcPkcs7 => CBC_PKCS7,
    })
}

/// Encode an AEAD algorithm.
pub fn encode_aead(aead: &Aead) -> Result<WireAlgorithm, AlgorithmError> {
    let tag_length = match aead {
        Aead::AeadWithDefaultLengthTag(_) => AEAD_DEFAULT_TAG,
        // A shortened tag of the default length would collide with the
        // default form, so only strictly shorter tags are encodable.
        Aead::AeadWithShortenedTag { tag_length, .. } => *tag_length,
    };
    let len = match aead {
        Aead::AeadWithDefaultLengthTag(_) => length_field(tag_length, 16, 16),
        Aead::AeadWithShortenedTag { .. } => length_field(tag_length, 1, AEAD_DEFAULT_TAG - 1),
    }
    .ok_or_else(|| unsupported(format!("AEAD tag shortened to {tag_length} bytes")))?;
    Ok(WireAlgorithm(aead_base(aead.base()) | len))
}

/// Encode an asymmetric signature scheme, including its nested hash.
pub fn encode_asymmetric_signature(
    sig: &AsymmetricSignature,
) -> Result<WireAlgorithm, AlgorithmError> {
    let id = match sig {
        AsymmetricSignature::RsaPkcs1v15Sign { hash_alg } => {
            RSA_PKCS1V15_SIGN_BASE | sign_hash_low(*hash_alg)?
        }
        AsymmetricSignature::RsaPkcs1v15SignRaw => RSA_PKCS1V15_SIGN_BASE,
        AsymmetricSignature::RsaPss { hash_alg } => RSA_PSS_BASE | sign_hash_low(*hash_alg)?,
        AsymmetricSignature::Ecdsa { hash_alg } => ECDSA_BASE | sign_hash_low(*hash_alg)?,
        AsymmetricSignature::EcdsaAny => ECDSA_BASE,
        AsymmetricSignature::DeterministicEcdsa { hash_alg } => {
            DETERMINISTIC_ECDSA_BASE | sign_hash_low(*hash_alg)?
        }
    };
    Ok(WireAlgorithm(id))
}

/// Encode an asymmetric encryption scheme.
pub fn encode_asymmetric_encryption(
    enc: &AsymmetricEncryption,
) -> Result<WireAlgorithm, AlgorithmError> {
    let id = match enc {
        AsymmetricEncryption::RsaPkcs1v15Crypt => RSA_PKCS1V15_CRYPT,
        AsymmetricEncryption::RsaOaep { hash_alg } => RSA_OAEP_BASE | hash_low(*hash_alg)?,
    };
    Ok(WireAlgorithm(id))
}

/// Encode a raw key agreement primitive.
pub fn encode_raw_key_agreement(ka: RawKeyAgreement) -> WireAlgorithm {
    WireAlgorithm(match ka {
        RawKeyAgreement::Ffdh => FFDH,
        RawKeyAgreement::Ecdh => ECDH,
    })
}

/// Encode a key agreement, optionally combined with a KDF.
pub fn encode_key_agreement(ka: &KeyAgreement) -> Result<WireAlgorithm, AlgorithmError> {
    match ka {
        KeyAgreement::Raw(raw) => Ok(encode_raw_key_agreement(*raw)),
        KeyAgreement::WithKeyDerivation { ka_alg, kdf_alg } => {
            let kdf = encode_key_derivation(kdf_alg)?;
            Ok(WireAlgorithm(
                encode_raw_key_agreement(*ka_alg).0 | (kdf.0 & !KEY_AGREEMENT_MASK),
            ))
        }
    }
}

/// Encode a key derivation function.
pub fn encode_key_derivation(kdf: &KeyDerivation) -> Result<WireAlgorithm, AlgorithmError> {
    let id = match kdf {
        KeyDerivation::Hkdf { hash_alg } => HKDF_BASE | hash_low(*hash_alg)?,
        KeyDerivation::Tls12Prf { hash_alg } => TLS12_PRF_BASE | hash_low(*hash_alg)?,
        KeyDerivation::Tls12PskToMs { hash_alg } => TLS12_PSK_TO_MS_BASE | hash_low(*hash_alg)?,
    };
    Ok(WireAlgorithm(id))
}

// ─── Decoding ────────────────────────────────────────────────────────

/// Decode any identifier.
pub fn decode(wire: WireAlgorithm) -> Result<Algorithm, AlgorithmError> {
    let v = wire.0;
    if v == 0 {
        return Ok(Algorithm::None);
    }
    let unknown = || AlgorithmError::UnknownIdentifier(v);
    let alg = match v >> 24 {
        0x02 => {
            if v & !HASH_MASK != CATEGORY_HASH {
                return Err(unknown());
            }
            Algorithm::Hash(hash_from_low(v & HASH_MASK).ok_or_else(unknown)?)
        }
        0x03 => Algorithm::Mac(decode_mac(v).ok_or_else(unknown)?),
        0x04 => Algorithm::Cipher(
            CIPHER_IDS
                .iter()
                .find(|(_, id)| *id == v)
                .map(|(c, _)| *c)
                .ok_or_else(unknown)?,
        ),
        0x05 => Algorithm::Aead(decode_aead(v).ok_or_else(unknown)?),
        0x06 => Algorithm::AsymmetricSignature(decode_signature(v).ok_or_else(unknown)?),
        0x07 => Algorithm::AsymmetricEncryption(decode_asymmetric_encryption(v).ok_or_else(unknown)?),
        0x08 => Algorithm::KeyDerivation(decode_key_derivation(v).ok_or_else(unknown)?),
        0x09 => Algorithm::KeyAgreement(decode_key_agreement(v).ok_or_else(unknown)?),
        _ => return Err(unknown()),
    };
    Ok(alg)
}

/// Decode the standalone 4-byte form.
pub fn decode_bytes(bytes: &[u8]) -> Result<Algorithm, AlgorithmError> {
    decode(WireAlgorithm::from_le_bytes(bytes)?)
}

fn decode_mac(v: u32) -> Option<Mac> {
    let length = ((v & LENGTH_MASK) >> LENGTH_OFFSET) as usize;
    let mac_alg = match v & !LENGTH_MASK {
        CBC_MAC => FullLengthMac::CbcMac,
        CMAC => FullLengthMac::Cmac,
        base if base & !HASH_MASK == HMAC_BASE => FullLengthMac::Hmac {
            hash_alg: hash_from_low(base & HASH_MASK)?,
        },
        _ => return None,
    };
    Some(if length == 0 {
        Mac::FullLength(mac_alg)
    } else {
        Mac::Truncated {
            mac_alg,
            mac_length: length,
        }
    })
}

fn decode_aead(v: u32) -> Option<Aead> {
    let aead_alg = match v & !LENGTH_MASK {
        CCM_BASE => AeadWithDefaultLengthTag::Ccm,
        GCM_BASE => AeadWithDefaultLengthTag::Gcm,
        CHACHA20_POLY1305_BASE => AeadWithDefaultLengthTag::Chacha20Poly1305,
        _ => return None,
    };
    match ((v & LENGTH_MASK) >> LENGTH_OFFSET) as usize {
        AEAD_DEFAULT_TAG => Some(Aead::AeadWithDefaultLengthTag(aead_alg)),
        tag_length @ 1..=15 => Some(Aead::AeadWithShortenedTag {
            aead_alg,
            tag_length,
        }),
        _ => None,
    }
}

fn decode_signature(v: u32) -> Option<AsymmetricSignature> {
    let low = v & HASH_MASK;
    let sig = match (v & !HASH_MASK, low) {
        (RSA_PKCS1V15_SIGN_BASE, 0) => AsymmetricSignature::RsaPkcs1v15SignRaw,
        (RSA_PKCS1V15_SIGN_BASE, _) => AsymmetricSignature::RsaPkcs1v15Sign {
            hash_alg: sign_hash_from_low(low)?,
        },
        (RSA_PSS_BASE, 0) => return None,
        (RSA_PSS_BASE, _) => AsymmetricSignature::RsaPss {
            hash_alg: sign_hash_from_low(low)?,
        },
        (ECDSA_BASE, 0) => AsymmetricSignature::EcdsaAny,
        (ECDSA_BASE, _) => AsymmetricSignature::Ecdsa {
            hash_alg: sign_hash_from_low(low)?,
        },
        (DETERMINISTIC_ECDSA_BASE, 0) => return None,
        (DETERMINISTIC_ECDSA_BASE, _) => AsymmetricSignature::DeterministicEcdsa {
            hash_alg: sign_hash_from_low(low)?,
        },
        _ => return None,
    };
    Some(sig)
}

fn decode_asymmetric_encryption(v: u32) -> Option<AsymmetricEncryption> {
    if v == RSA_PKCS1V15_CRYPT {
        return Some(AsymmetricEncryption::RsaPkcs1v15Crypt);
    }
    if v & !HASH_MASK == RSA_OAEP_BASE {
        return Some(AsymmetricEncryption::RsaOaep {
            hash_alg: hash_from_low(v & HASH_MASK)?,
        });
    }
    None
}

fn decode_key_derivation(v: u32) -> Option<KeyDerivation> {
    let hash_alg = hash_from_low(v & HASH_MASK)?;
    match v & !HASH_MASK {
        HKDF_BASE => Some(KeyDerivation::Hkdf { hash_alg }),
        TLS12_PRF_BASE => Some(KeyDerivation::Tls12Prf { hash_alg }),
        TLS12_PSK_TO_MS_BASE => Some(KeyDerivation::Tls12PskToMs { hash_alg }),
        _ => None,
    }
}

fn decode_key_agreement(v: u32) -> Option<KeyAgreement> {
    let ka_alg = match v & KEY_AGREEMENT_MASK {
        FFDH => RawKeyAgreement::Ffdh,
        ECDH => RawKeyAgreement::Ecdh,
        _ => return None,
    };
    let kdf_bits = v & !KEY_AGREEMENT_MASK;
    if kdf_bits == 0 {
        return Some(KeyAgreement::Raw(ka_alg));
    }
    Some(KeyAgreement::WithKeyDerivation {
        ka_alg,
        kdf_alg: decode_key_derivation(CATEGORY_KEY_DERIVATION | kdf_bits)?,
    })
}

// ─── Helpers ─────────────────────────────────────────────────────────

fn unsupported(what: String) -> AlgorithmError {
    AlgorithmError::Unsupported(what)
}

fn hash_low(hash: Hash) -> Result<u32, AlgorithmError> {
    HASH_IDS
        .iter()
        .find(|(h, _)| *h == hash)
        .map(|(_, low)| *low)
        .ok_or_else(|| unsupported(format!("{hash:?} has no wire identifier")))
}

fn hash_from_low(low: u32) -> Option<Hash> {
    HASH_IDS.iter().find(|(_, l)| *l == low).map(|(h, _)| *h)
}

fn sign_hash_low(hash: SignHash) -> Result<u32, AlgorithmError> {
    match hash {
        SignHash::Any => Ok(ANY_HASH),
        SignHash::Specific(h) => hash_low(h),
    }
}

fn sign_hash_from_low(low: u32) -> Option<SignHash> {
    if low == ANY_HASH {
        Some(SignHash::Any)
    } else {
        hash_from_low(low).map(SignHash::Specific)
    }
}

fn full_length_mac_id(mac: &FullLengthMac) -> Result<u32, AlgorithmError> {
    match mac {
        FullLengthMac::Hmac { hash_alg } => Ok(HMAC_BASE | hash_low(*hash_alg)?),
        FullLengthMac::CbcMac => Ok(CBC_MAC),
        FullLengthMac::Cmac => Ok(CMAC),
    }
}

fn aead_base(alg: AeadWithDefaultLengthTag) -> u32 {
    match alg {
        AeadWithDefaultLengthTag::Ccm => CCM_BASE,
        AeadWithDefaultLengthTag::Gcm => GCM_BASE,
        AeadWithDefaultLengthTag::Chacha20Poly1305 => CHACHA20_POLY1305_BASE,
    }
}

/// Length packed into bits 16-21, if it lies in `min..=max`.
fn length_field(len: usize, min: usize, max: usize) -> Option<u32> {
    (min..=max)
        .contains(&len)
        .then(|| (len as u32) << LENGTH_OFFSET)
}
