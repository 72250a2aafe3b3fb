//! Service-level operations: discovery and key listing.
//!
//! These always go to the core provider. All but [`ListKeys`] are sent
//! without authentication.

use keywire_algorithm::{AttributeError, KeyAttributes, WireKeyAttributes};
use keywire_auth::AuthenticatorInfo;
use keywire_core::{Opcode, ProviderId, ProviderInfo};
use serde::{Deserialize, Serialize};

use super::Operation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ping;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResult {
    pub wire_protocol_version_maj: u8,
    pub wire_protocol_version_min: u8,
}

impl Operation for Ping {
    const OPCODE: Opcode = Opcode::Ping;
    type Output = PingResult;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListProviders;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListProvidersResult {
    pub providers: Vec<ProviderInfo>,
}

impl Operation for ListProviders {
    const OPCODE: Opcode = Opcode::ListProviders;
    type Output = ListProvidersResult;
}

/// Opcodes supported by one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOpcodes {
    pub provider_id: ProviderId,
}

/// Raw opcode numbers, which may include opcodes newer than this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOpcodesResult {
    pub opcodes: Vec<u32>,
}

impl Operation for ListOpcodes {
    const OPCODE: Opcode = Opcode::ListOpcodes;
    type Output = ListOpcodesResult;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAuthenticators;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAuthenticatorsResult {
    pub authenticators: Vec<AuthenticatorInfo>,
}

impl Operation for ListAuthenticators {
    const OPCODE: Opcode = Opcode::ListAuthenticators;
    type Output = ListAuthenticatorsResult;
}

/// Keys owned by the authenticated application, across all providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListKeys;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireKeyInfo {
    pub provider_id: ProviderId,
    pub name: String,
    pub attributes: WireKeyAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListKeysResult {
    pub keys: Vec<WireKeyInfo>,
}

impl Operation for ListKeys {
    const OPCODE: Opcode = Opcode::ListKeys;
    type Output = ListKeysResult;
}

/// A listed key with its attributes decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    pub provider_id: ProviderId,
    pub name: String,
    pub attributes: KeyAttributes,
}

impl TryFrom<WireKeyInfo> for KeyInfo {
    type Error = AttributeError;

    fn try_from(wire: WireKeyInfo) -> Result<Self, Self::Error> {
        Ok(Self {
            attributes: KeyAttributes::from_wire(&wire.attributes)?,
            provider_id: wire.provider_id,
            name: wire.name,
        })
    }
}
