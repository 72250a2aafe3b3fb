//! # Authentication Type Identifiers
//!
//! The closed set of authentication kinds carried in the request header.
//!
//! ## Invariant
//!
//! A value of `AuthenticationType` is always one of the five defined
//! identifiers. Numeric input goes through `TryFrom`, which fails with
//! [`InvalidAuthType`] for anything above 4. Deserialization follows the same
//! path, so an out-of-range value cannot be smuggled in through serde.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::InvalidAuthType;

/// Authentication kind used for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum AuthenticationType {
    /// No authentication; requests run under the service's anonymous identity.
    NoAuth = 0,
    /// Shared-secret application identity.
    Direct = 1,
    /// JSON Web Token.
    Jwt = 2,
    /// Operating-system peer credentials of the connecting process.
    UnixPeerCredentials = 3,
    /// JWT SPIFFE Verifiable Identity Document.
    JwtSvid = 4,
}

impl AuthenticationType {
    /// All identifiers in wire order.
    pub const ALL: [AuthenticationType; 5] = [
        Self::NoAuth,
        Self::Direct,
        Self::Jwt,
        Self::UnixPeerCredentials,
        Self::JwtSvid,
    ];

    /// The wire value of this identifier.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Stable lowercase name, also accepted by [`AuthenticationType::from_name`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoAuth => "none",
            Self::Direct => "direct",
            Self::Jwt => "jwt",
            Self::UnixPeerCredentials => "unix-peer-credentials",
            Self::JwtSvid => "jwt-svid",
        }
    }

    /// Look up an identifier by its [`as_str`](AuthenticationType::as_str) name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl TryFrom<u32> for AuthenticationType {
    type Error = InvalidAuthType;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NoAuth),
            1 => Ok(Self::Direct),
            2 => Ok(Self::Jwt),
            3 => Ok(Self::UnixPeerCredentials),
            4 => Ok(Self::JwtSvid),
            other => Err(InvalidAuthType(other)),
        }
    }
}

impl TryFrom<u8> for AuthenticationType {
    type Error = InvalidAuthType;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from(u32::from(value))
    }
}

impl From<AuthenticationType> for u32 {
    fn from(value: AuthenticationType) -> Self {
        u32::from(value.as_u8())
    }
}

impl std::fmt::Display for AuthenticationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AuthenticationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for AuthenticationType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u32::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}
