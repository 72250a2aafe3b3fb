//! # Key Attributes
//!
//! Key type, size, lifetime and usage policy of a key, and their single wire
//! message [`WireKeyAttributes`].
//!
//! ## Security Invariant
//!
//! [`KeyAttributes::to_wire`] is the only way to obtain a wire message from
//! caller-built attributes, and it validates the whole combination first.
//! An attribute set the service would have to reject (conflicting usage
//! families, a policy algorithm that cannot operate on the key type, an
//! illegal key size) fails locally and never reaches the transport.

use serde::{Deserialize, Serialize};

use crate::algorithm::{
    Aead, AeadWithDefaultLengthTag, Algorithm, Cipher, FullLengthMac, RawKeyAgreement,
};
use crate::codec::{self, WireAlgorithm};
use crate::error::AttributeError;

/// Elliptic curve families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EccFamily {
    SecpK1,
    SecpR1,
    SecpR2,
    SectK1,
    SectR1,
    SectR2,
    BrainpoolPR1,
    Frp,
    Montgomery,
}

const ECC_FAMILY_IDS: [(EccFamily, u16); 9] = [
    (EccFamily::SecpK1, 0x17),
    (EccFamily::SecpR1, 0x12),
    (EccFamily::SecpR2, 0x1b),
    (EccFamily::SectK1, 0x27),
    (EccFamily::SectR1, 0x22),
    (EccFamily::SectR2, 0x2b),
    (EccFamily::BrainpoolPR1, 0x30),
    (EccFamily::Frp, 0x33),
    (EccFamily::Montgomery, 0x41),
];

impl EccFamily {
    fn to_wire(self) -> u16 {
        ECC_FAMILY_IDS
            .iter()
            .find(|(f, _)| *f == self)
            .map_or(0, |(_, id)| *id)
    }

    fn from_wire(id: u16) -> Option<Self> {
        ECC_FAMILY_IDS.iter().find(|(_, i)| *i == id).map(|(f, _)| *f)
    }
}

/// Finite-field Diffie-Hellman group families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DhFamily {
    Rfc7919,
}

impl DhFamily {
    fn to_wire(self) -> u16 {
        match self {
            Self::Rfc7919 => 0x03,
        }
    }

    fn from_wire(id: u16) -> Option<Self> {
        (id == 0x03).then_some(Self::Rfc7919)
    }
}

/// Key types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    /// Unformatted bytes, usable only as derivation input or for export.
    RawData,
    Hmac,
    /// Secret input to a key derivation function.
    Derive,
    Aes,
    Des,
    Camellia,
    Chacha20,
    RsaPublicKey,
    RsaKeyPair,
    EccKeyPair { curve_family: EccFamily },
    EccPublicKey { curve_family: EccFamily },
    DhKeyPair { group_family: DhFamily },
    DhPublicKey { group_family: DhFamily },
}

const ECC_PUBLIC_KEY_BASE: u16 = 0x4100;
const ECC_KEY_PAIR_BASE: u16 = 0x7100;
const DH_PUBLIC_KEY_BASE: u16 = 0x4200;
const DH_KEY_PAIR_BASE: u16 = 0x7200;
const FAMILY_MASK: u16 = 0x00ff;

impl KeyType {
    /// 16-bit wire identifier.
    pub fn to_wire(self) -> u16 {
        match self {
            Self::RawData => 0x1001,
            Self::Hmac => 0x1100,
            Self::Derive => 0x1200,
            Self::Aes => 0x2400,
            Self::Des => 0x2301,
            Self::Camellia => 0x2403,
            Self::Chacha20 => 0x2004,
            Self::RsaPublicKey => 0x4001,
            Self::RsaKeyPair => 0x7001,
            Self::EccPublicKey { curve_family } => ECC_PUBLIC_KEY_BASE | curve_family.to_wire(),
            Self::EccKeyPair { curve_family } => ECC_KEY_PAIR_BASE | curve_family.to_wire(),
            Self::DhPublicKey { group_family } => DH_PUBLIC_KEY_BASE | group_family.to_wire(),
            Self::DhKeyPair { group_family } => DH_KEY_PAIR_BASE | group_family.to_wire(),
        }
    }

    /// Parse a wire identifier.
    pub fn from_wire(id: u16) -> Option<Self> {
        let key_type = match id {
            0x1001 => Self::RawData,
            0x1100 => Self::Hmac,
            0x1200 => Self::Derive,
            0x2400 => Self::Aes,
            0x2301 => Self::Des,
            0x2403 => Self::Camellia,
            0x2004 => Self::Chacha20,
            0x4001 => Self::RsaPublicKey,
            0x7001 => Self::RsaKeyPair,
            _ => {
                let family = id & FAMILY_MASK;
                match id & !FAMILY_MASK {
                    ECC_PUBLIC_KEY_BASE => Self::EccPublicKey {
                        curve_family: EccFamily::from_wire(family)?,
                    },
                    ECC_KEY_PAIR_BASE => Self::EccKeyPair {
                        curve_family: EccFamily::from_wire(family)?,
                    },
                    DH_PUBLIC_KEY_BASE => Self::DhPublicKey {
                        group_family: DhFamily::from_wire(family)?,
                    },
                    DH_KEY_PAIR_BASE => Self::DhKeyPair {
                        group_family: DhFamily::from_wire(family)?,
                    },
                    _ => return None,
                }
            }
        };
        Some(key_type)
    }

    pub fn is_public_key(&self) -> bool {
        matches!(
            self,
            Self::RsaPublicKey | Self::EccPublicKey { .. } | Self::DhPublicKey { .. }
        )
    }

    pub fn is_key_pair(&self) -> bool {
        matches!(
            self,
            Self::RsaKeyPair | Self::EccKeyPair { .. } | Self::DhKeyPair { .. }
        )
    }

    /// Keys for unauthenticated and authenticated symmetric ciphers.
    pub fn is_symmetric_cipher(&self) -> bool {
        matches!(self, Self::Aes | Self::Des | Self::Camellia | Self::Chacha20)
    }

    fn is_rsa(&self) -> bool {
        matches!(self, Self::RsaPublicKey | Self::RsaKeyPair)
    }

    fn is_ecc(&self) -> bool {
        matches!(self, Self::EccPublicKey { .. } | Self::EccKeyPair { .. })
    }

    /// Legal sizes in bits; `None` means any size.
    fn legal_bits(&self) -> Option<&'static [usize]> {
        match self {
            Self::Aes | Self::Camellia => Some(&[128, 192, 256]),
            Self::Des => Some(&[64, 128, 192]),
            Self::Chacha20 => Some(&[256]),
            _ => None,
        }
    }
}

/// What a key may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct UsageFlags {
    pub export: bool,
    pub copy: bool,
    pub cache: bool,
    pub encrypt: bool,
    pub decrypt: bool,
    pub sign_message: bool,
    pub verify_message: bool,
    pub sign_hash: bool,
    pub verify_hash: bool,
    pub derive: bool,
}

const USAGE_EXPORT: u32 = 0x0001;
const USAGE_COPY: u32 = 0x0002;
const USAGE_CACHE: u32 = 0x0004;
const USAGE_ENCRYPT: u32 = 0x0100;
const USAGE_DECRYPT: u32 = 0x0200;
const USAGE_SIGN_MESSAGE: u32 = 0x0400;
const USAGE_VERIFY_MESSAGE: u32 = 0x0800;
const USAGE_SIGN_HASH: u32 = 0x1000;
const USAGE_VERIFY_HASH: u32 = 0x2000;
const USAGE_DERIVE: u32 = 0x4000;

impl UsageFlags {
    /// Pack into the wire bitmask.
    pub fn to_bits(&self) -> u32 {
        [
            (self.export, USAGE_EXPORT),
            (self.copy, USAGE_COPY),
            (self.cache, USAGE_CACHE),
            (self.encrypt, USAGE_ENCRYPT),
            (self.decrypt, USAGE_DECRYPT),
            (self.sign_message, USAGE_SIGN_MESSAGE),
            (self.verify_message, USAGE_VERIFY_MESSAGE),
            (self.sign_hash, USAGE_SIGN_HASH),
            (self.verify_hash, USAGE_VERIFY_HASH),
            (self.derive, USAGE_DERIVE),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .fold(0, |acc, (_, bit)| acc | bit)
    }

    /// Unpack a wire bitmask; unknown bits are an error.
    pub fn from_bits(bits: u32) -> Result<Self, AttributeError> {
        const KNOWN: u32 = USAGE_EXPORT
            | USAGE_COPY
            | USAGE_CACHE
            | USAGE_ENCRYPT
            | USAGE_DECRYPT
            | USAGE_SIGN_MESSAGE
            | USAGE_VERIFY_MESSAGE
            | USAGE_SIGN_HASH
            | USAGE_VERIFY_HASH
            | USAGE_DERIVE;
        if bits & !KNOWN != 0 {
            return Err(AttributeError::Malformed(format!(
                "unknown usage flags {:#x}",
                bits & !KNOWN
            )));
        }
        Ok(Self {
            export: bits & USAGE_EXPORT != 0,
            copy: bits & USAGE_COPY != 0,
            cache: bits & USAGE_CACHE != 0,
            encrypt: bits & USAGE_ENCRYPT != 0,
            decrypt: bits & USAGE_DECRYPT != 0,
            sign_message: bits & USAGE_SIGN_MESSAGE != 0,
            verify_message: bits & USAGE_VERIFY_MESSAGE != 0,
            sign_hash: bits & USAGE_SIGN_HASH != 0,
            verify_hash: bits & USAGE_VERIFY_HASH != 0,
            derive: bits & USAGE_DERIVE != 0,
        })
    }

    fn signs(&self) -> bool {
        self.sign_message || self.sign_hash
    }

    fn verifies(&self) -> bool {
        self.verify_message || self.verify_hash
    }

    fn families(&self) -> Vec<UsageFamily> {
        let mut families = Vec::new();
        if self.signs() || self.verifies() {
            families.push(UsageFamily::Signature);
        }
        if self.encrypt || self.decrypt {
            families.push(UsageFamily::Encryption);
        }
        if self.derive {
            families.push(UsageFamily::Derivation);
        }
        families
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UsageFamily {
    Signature,
    Encryption,
    Derivation,
}

/// How long a key lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Persistence {
    /// Destroyed when the service restarts.
    #[default]
    Volatile,
    /// Stored by the service.
    Default,
    /// Provisioned keys the service reports but callers cannot create.
    ReadOnly,
}

impl Persistence {
    fn to_wire(self) -> u8 {
        match self {
            Self::Volatile => 0x00,
            Self::Default => 0x01,
            Self::ReadOnly => 0xff,
        }
    }

    fn from_wire(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::Volatile),
            0x01 => Some(Self::Default),
            0xff => Some(Self::ReadOnly),
            _ => None,
        }
    }
}

/// Persistence plus storage location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Lifetime {
    pub persistence: Persistence,
    /// Storage location; 0 is the service's own store. 24 bits on the wire.
    pub location: u32,
}

const MAX_LOCATION: u32 = 0x00ff_ffff;

impl Lifetime {
    pub fn volatile() -> Self {
        Self::default()
    }

    pub fn persistent() -> Self {
        Self {
            persistence: Persistence::Default,
            location: 0,
        }
    }

    fn to_wire(self) -> u32 {
        u32::from(self.persistence.to_wire()) | (self.location << 8)
    }

    fn from_wire(lifetime: u32) -> Option<Self> {
        Some(Self {
            persistence: Persistence::from_wire((lifetime & 0xff) as u8)?,
            location: lifetime >> 8,
        })
    }
}

/// Usage flags and the single algorithm a key may be used with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPolicy {
    pub usage_flags: UsageFlags,
    pub permitted_algorithms: Algorithm,
}

/// Complete description of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyAttributes {
    pub key_type: KeyType,
    /// Size in bits; 0 lets the service choose where the type allows it.
    pub bits: usize,
    pub lifetime: Lifetime,
    pub policy: KeyPolicy,
}

/// The single attribute message carried in key management requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireKeyAttributes {
    pub key_type: u16,
    pub bits: u32,
    pub lifetime: u32,
    pub usage_flags: u32,
    pub permitted_algorithm: WireAlgorithm,
}

impl WireKeyAttributes {
    /// Length of the standalone byte form.
    pub const ENCODED_LEN: usize = 18;

    /// Standalone little-endian byte form.
    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[0..2].copy_from_slice(&self.key_type.to_le_bytes());
        out[2..6].copy_from_slice(&self.bits.to_le_bytes());
        out[6..10].copy_from_slice(&self.lifetime.to_le_bytes());
        out[10..14].copy_from_slice(&self.usage_flags.to_le_bytes());
        out[14..18].copy_from_slice(&self.permitted_algorithm.to_le_bytes());
        out
    }

    /// Parse the standalone byte form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AttributeError> {
        if bytes.len() != Self::ENCODED_LEN {
            return Err(AttributeError::Malformed(format!(
                "attribute message must be {} bytes, got {}",
                Self::ENCODED_LEN,
                bytes.len()
            )));
        }
        let u32_at = |at: usize| u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
        Ok(Self {
            key_type: u16::from_le_bytes([bytes[0], bytes[1]]),
            bits: u32_at(2),
            lifetime: u32_at(6),
            usage_flags: u32_at(10),
            permitted_algorithm: WireAlgorithm(u32_at(14)),
        })
    }
}

impl KeyAttributes {
    /// Validate and encode into the wire message.
    pub fn to_wire(&self) -> Result<WireKeyAttributes, AttributeError> {
        let flags = &self.policy.usage_flags;
        let families = flags.families();
        if families.len() > 1 {
            return Err(invalid(format!(
                "usage flags mix incompatible operations: {families:?}"
            )));
        }
        self.check_flags_against_key_type()?;
        let family = families.first().copied();
        self.check_algorithm(family)?;
        let permitted_algorithm = codec::encode(&self.policy.permitted_algorithms)?;

        let bits = u32::try_from(self.bits)
            .map_err(|_| invalid(format!("key size {} does not fit in 32 bits", self.bits)))?;
        if let Some(legal) = self.key_type.legal_bits() {
            if self.bits != 0 && !legal.contains(&self.bits) {
                return Err(invalid(format!(
                    "{:?} keys cannot be {} bits",
                    self.key_type, self.bits
                )));
            }
        }

        if self.lifetime.persistence == Persistence::ReadOnly {
            return Err(invalid("read-only keys cannot be requested".into()));
        }
        if self.lifetime.location > MAX_LOCATION {
            return Err(invalid(format!(
                "location {:#x} exceeds 24 bits",
                self.lifetime.location
            )));
        }

        Ok(WireKeyAttributes {
            key_type: self.key_type.to_wire(),
            bits,
            lifetime: self.lifetime.to_wire(),
            usage_flags: flags.to_bits(),
            permitted_algorithm,
        })
    }

    /// Decode a wire message as reported by the service.
    ///
    /// Only the encoding is checked, not the combination: the service may
    /// report keys (read-only provisioned keys, for one) that a caller could
    /// not create.
    pub fn from_wire(wire: &WireKeyAttributes) -> Result<Self, AttributeError> {
        let key_type = KeyType::from_wire(wire.key_type)
            .ok_or_else(|| AttributeError::Malformed(format!("unknown key type {:#06x}", wire.key_type)))?;
        let lifetime = Lifetime::from_wire(wire.lifetime)
            .ok_or_else(|| AttributeError::Malformed(format!("unknown lifetime {:#x}", wire.lifetime)))?;
        Ok(Self {
            key_type,
            bits: wire.bits as usize,
            lifetime,
            policy: KeyPolicy {
                usage_flags: UsageFlags::from_bits(wire.usage_flags)?,
                permitted_algorithms: codec::decode(wire.permitted_algorithm)?,
            },
        })
    }

    fn check_flags_against_key_type(&self) -> Result<(), AttributeError> {
        let kt = self.key_type;
        let flags = &self.policy.usage_flags;
        let refuse = |what: &str| Err(invalid(format!("{kt:?} keys cannot be used to {what}")));

        let can_sign = (kt.is_rsa() && kt.is_key_pair())
            || (kt.is_ecc() && kt.is_key_pair())
            || kt == KeyType::Hmac
            || matches!(kt, KeyType::Aes | KeyType::Des | KeyType::Camellia);
        let can_verify = can_sign || kt == KeyType::RsaPublicKey || kt.is_ecc();
        let can_encrypt = kt.is_symmetric_cipher() || kt.is_rsa();
        let can_decrypt = kt.is_symmetric_cipher() || kt == KeyType::RsaKeyPair;
        let can_derive = matches!(
            kt,
            KeyType::Derive | KeyType::RawData | KeyType::EccKeyPair { .. } | KeyType::DhKeyPair { .. }
        );

        if flags.signs() && !can_sign {
            return refuse("sign");
        }
        if flags.verifies() && !can_verify {
            return refuse("verify");
        }
        if flags.encrypt && !can_encrypt {
            return refuse("encrypt");
        }
        if flags.decrypt && !can_decrypt {
            return refuse("decrypt");
        }
        if flags.derive && !can_derive {
            return refuse("derive");
        }
        Ok(())
    }

    fn check_algorithm(&self, usage: Option<UsageFamily>) -> Result<(), AttributeError> {
        let kt = self.key_type;
        let alg = self.policy.permitted_algorithms;
        // Symmetric cipher keys only sign as MAC keys.
        if kt.is_symmetric_cipher()
            && usage == Some(UsageFamily::Signature)
            && !matches!(alg, Algorithm::Mac(_))
        {
            return Err(invalid(format!("{kt:?} keys can only sign with a MAC")));
        }
        let (fits_key, family) = match alg {
            Algorithm::None => return Ok(()),
            Algorithm::Hash(_) => {
                return Err(invalid("a hash algorithm cannot be a key policy".into()));
            }
            Algorithm::Mac(mac) => {
                let fits = match mac.full_length_mac() {
                    FullLengthMac::Hmac { .. } => kt == KeyType::Hmac,
                    FullLengthMac::CbcMac | FullLengthMac::Cmac => {
                        matches!(kt, KeyType::Aes | KeyType::Des | KeyType::Camellia)
                    }
                };
                (fits, UsageFamily::Signature)
            }
            Algorithm::Cipher(cipher) => {
                let fits = match cipher {
                    Cipher::StreamCipher => kt == KeyType::Chacha20,
                    _ => matches!(kt, KeyType::Aes | KeyType::Des | KeyType::Camellia),
                };
                (fits, UsageFamily::Encryption)
            }
            Algorithm::Aead(aead) => (aead_fits(&aead, kt), UsageFamily::Encryption),
            Algorithm::AsymmetricSignature(sig) => (
                (sig.is_rsa_alg() && kt.is_rsa()) || (sig.is_ecc_alg() && kt.is_ecc()),
                UsageFamily::Signature,
            ),
            Algorithm::AsymmetricEncryption(_) => (kt.is_rsa(), UsageFamily::Encryption),
            Algorithm::KeyAgreement(ka) => {
                let fits = match ka.raw() {
                    RawKeyAgreement::Ffdh => matches!(kt, KeyType::DhKeyPair { .. }),
                    RawKeyAgreement::Ecdh => matches!(kt, KeyType::EccKeyPair { .. }),
                };
                (fits, UsageFamily::Derivation)
            }
            Algorithm::KeyDerivation(_) => (
                matches!(kt, KeyType::Derive | KeyType::RawData),
                UsageFamily::Derivation,
            ),
        };
        if !fits_key {
            return Err(invalid(format!(
                "{} algorithm {alg:?} cannot operate on {kt:?} keys",
                alg.family()
            )));
        }
        if let Some(usage) = usage {
            if usage != family {
                return Err(invalid(format!(
                    "{} algorithm does not match {usage:?} usage flags",
                    alg.family()
                )));
            }
        }
        Ok(())
    }
}

fn aead_fits(aead: &Aead, kt: KeyType) -> bool {
    match aead.base() {
        AeadWithDefaultLengthTag::Ccm | AeadWithDefaultLengthTag::Gcm => {
            matches!(kt, KeyType::Aes | KeyType::Camellia)
        }
        AeadWithDefaultLengthTag::Chacha20Poly1305 => kt == KeyType::Chacha20,
    }
}

fn invalid(reason: String) -> AttributeError {
    AttributeError::InvalidAttributes(reason)
}
