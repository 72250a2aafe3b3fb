//! # Operation Codes
//!
//! Numeric identifiers of the operations a provider can execute. The values
//! are fixed by the wire protocol and never renumbered.

use serde::{Deserialize, Serialize};

/// Operation selector carried in the request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
#[repr(u32)]
pub enum Opcode {
    Ping = 1,
    PsaGenerateKey = 2,
    PsaDestroyKey = 3,
    PsaSignHash = 4,
    PsaVerifyHash = 5,
    PsaImportKey = 6,
    PsaExportPublicKey = 7,
    ListProviders = 8,
    ListOpcodes = 9,
    PsaAsymmetricEncrypt = 10,
    PsaAsymmetricDecrypt = 11,
    PsaExportKey = 12,
    PsaGenerateRandom = 13,
    ListAuthenticators = 14,
    PsaHashCompute = 15,
    PsaHashCompare = 16,
    PsaAeadEncrypt = 17,
    PsaAeadDecrypt = 18,
    PsaRawKeyAgreement = 19,
    PsaCipherEncrypt = 20,
    PsaCipherDecrypt = 21,
    PsaMacCompute = 22,
    PsaMacVerify = 23,
    PsaSignMessage = 24,
    PsaVerifyMessage = 25,
    ListKeys = 26,
}

impl Opcode {
    /// Every defined opcode, in numeric order.
    pub const ALL: [Opcode; 26] = [
        Self::Ping,
        Self::PsaGenerateKey,
        Self::PsaDestroyKey,
        Self::PsaSignHash,
        Self::PsaVerifyHash,
        Self::PsaImportKey,
        Self::PsaExportPublicKey,
        Self::ListProviders,
        Self::ListOpcodes,
        Self::PsaAsymmetricEncrypt,
        Self::PsaAsymmetricDecrypt,
        Self::PsaExportKey,
        Self::PsaGenerateRandom,
        Self::ListAuthenticators,
        Self::PsaHashCompute,
        Self::PsaHashCompare,
        Self::PsaAeadEncrypt,
        Self::PsaAeadDecrypt,
        Self::PsaRawKeyAgreement,
        Self::PsaCipherEncrypt,
        Self::PsaCipherDecrypt,
        Self::PsaMacCompute,
        Self::PsaMacVerify,
        Self::PsaSignMessage,
        Self::PsaVerifyMessage,
        Self::ListKeys,
    ];

    /// The wire value.
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Service-level operation, always addressed to the core provider.
    pub fn is_core(self) -> bool {
        matches!(
            self,
            Self::Ping
                | Self::ListProviders
                | Self::ListOpcodes
                | Self::ListAuthenticators
                | Self::ListKeys
        )
    }

    /// Operation the service accepts without authentication. These are sent
    /// with `NoAuth` and an empty token whatever authenticator is bound.
    pub fn is_auth_exempt(self) -> bool {
        matches!(
            self,
            Self::Ping | Self::ListProviders | Self::ListOpcodes | Self::ListAuthenticators
        )
    }
}

impl TryFrom<u32> for Opcode {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_u32() == value)
            .ok_or(value)
    }
}

impl From<Opcode> for u32 {
    fn from(value: Opcode) -> Self {
        value.as_u32()
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}({})", self.as_u32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_dense_and_ordered() {
        for (i, op) in Opcode::ALL.iter().enumerate() {
            assert_eq!(op.as_u32(), i as u32 + 1);
            assert_eq!(Opcode::try_from(op.as_u32()), Ok(*op));
        }
        assert_eq!(Opcode::try_from(0), Err(0));
        assert_eq!(Opcode::try_from(27), Err(27));
    }

    #[test]
    fn auth_exempt_operations_are_core() {
        for op in Opcode::ALL {
            if op.is_auth_exempt() {
                assert!(op.is_core(), "{op} is auth-exempt but not core");
            }
        }
        assert!(Opcode::ListKeys.is_core());
        assert!(!Opcode::ListKeys.is_auth_exempt());
        assert!(!Opcode::PsaSignHash.is_core());
    }
}
