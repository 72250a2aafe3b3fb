//! # Provider Identifiers
//!
//! A provider is the backend that executes cryptographic operations on the
//! service side. Requests select one by numeric id; id 0 is reserved for the
//! service's own core operations (ping, discovery).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Numeric provider selector carried in every request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(pub u32);

impl ProviderId {
    /// The service core. Handles ping, discovery and key listing.
    pub const CORE: ProviderId = ProviderId(0);
    /// Software provider backed by Mbed Crypto.
    pub const MBED_CRYPTO: ProviderId = ProviderId(1);
    /// PKCS #11 token provider.
    pub const PKCS11: ProviderId = ProviderId(2);
    /// TPM 2.0 provider.
    pub const TPM: ProviderId = ProviderId(3);
    /// Trusted-services provider.
    pub const TRUSTED_SERVICE: ProviderId = ProviderId(4);
    /// Microchip CryptoAuthentication provider.
    pub const CRYPTO_AUTH_LIB: ProviderId = ProviderId(5);

    /// Access the raw id.
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Whether this is the reserved core provider.
    pub fn is_core(&self) -> bool {
        *self == Self::CORE
    }
}

impl From<u32> for ProviderId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "provider:{}", self.0)
    }
}

/// Description of a provider as reported by the service's list-providers
/// operation. A read-only snapshot with no identity beyond its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Stable provider implementation identifier.
    pub uuid: Uuid,
    /// Human-readable description.
    pub description: String,
    /// Vendor of the underlying implementation.
    pub vendor: String,
    /// Major version of the provider.
    pub version_maj: u32,
    /// Minor version of the provider.
    pub version_min: u32,
    /// Revision of the provider.
    pub version_rev: u32,
    /// Numeric id used to address the provider in requests.
    pub id: ProviderId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_is_zero_and_default() {
        assert_eq!(ProviderId::default(), ProviderId::CORE);
        assert!(ProviderId::CORE.is_core());
        assert!(!ProviderId::TPM.is_core());
    }

    #[test]
    fn display_and_serde() {
        assert_eq!(ProviderId::PKCS11.to_string(), "provider:2");
        assert_eq!(serde_json::to_string(&ProviderId(7)).unwrap(), "7");
    }
}
