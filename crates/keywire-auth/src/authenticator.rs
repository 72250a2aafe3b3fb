//! # Authenticators
//!
//! The closed set of authentication strategies. Each variant knows its
//! [`AuthenticationType`], describes itself with an [`AuthenticatorInfo`],
//! and produces a fresh [`RequestAuthToken`] per request.
//!
//! ## Security Invariant
//!
//! `Direct`, `Jwt` and `JwtSvid` wrap the uninhabited [`Reserved`] type. The
//! wire protocol names them but this client cannot produce their tokens, and
//! the type system guarantees no value of those variants exists.

use keywire_core::AuthenticationType;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::AuthError;

/// Uninhabited marker for authentication kinds without a client
/// implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reserved {}

/// Per-request identity strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authenticator {
    /// Requests carry no credentials.
    NoAuth,
    /// Requests carry the caller's effective user id; the service checks it
    /// against the peer credentials of the connection.
    UnixPeerCredentials,
    Direct(Reserved),
    Jwt(Reserved),
    JwtSvid(Reserved),
}

/// Description of an authenticator, as reported locally or by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatorInfo {
    pub id: AuthenticationType,
    pub description: String,
    pub version_maj: u32,
    pub version_min: u32,
    pub version_rev: u32,
}

/// Authentication field of one request.
///
/// The payload is wiped when the token is dropped. `Debug` shows only its
/// length.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestAuthToken {
    auth_type: AuthenticationType,
    payload: Zeroizing<Vec<u8>>,
}

impl RequestAuthToken {
    /// A token with no payload, as sent for unauthenticated requests.
    pub fn empty() -> Self {
        Self {
            auth_type: AuthenticationType::NoAuth,
            payload: Zeroizing::new(Vec::new()),
        }
    }

    pub fn auth_type(&self) -> AuthenticationType {
        self.auth_type
    }

    /// Bytes to place in the request's authentication field.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

impl std::fmt::Debug for RequestAuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestAuthToken")
            .field("auth_type", &self.auth_type)
            .field("payload", &format_args!("[{} bytes REDACTED]", self.payload.len()))
            .finish()
    }
}

impl Authenticator {
    /// The authentication type this authenticator produces tokens for.
    pub fn auth_type(&self) -> AuthenticationType {
        match self {
            Self::NoAuth => AuthenticationType::NoAuth,
            Self::UnixPeerCredentials => AuthenticationType::UnixPeerCredentials,
            Self::Direct(r) | Self::Jwt(r) | Self::JwtSvid(r) => match *r {},
        }
    }

    pub fn info(&self) -> AuthenticatorInfo {
        let description = match self {
            Self::NoAuth => "No authentication",
            Self::UnixPeerCredentials => {
                "Uses Unix peer credentials to authenticate the client. Verifies that the \
                 self-declared Unix user identifier in the request matches the one found \
                 from the peer credentials."
            }
            Self::Direct(r) | Self::Jwt(r) | Self::JwtSvid(r) => match *r {},
        };
        AuthenticatorInfo {
            id: self.auth_type(),
            description: description.to_string(),
            version_maj: 0,
            version_min: 1,
            version_rev: 0,
        }
    }

    /// Build the authentication field for one request.
    ///
    /// Peer credentials are read from the OS on every call, so a process
    /// that changes its effective user id is reflected immediately.
    pub fn new_request_auth(&self) -> Result<RequestAuthToken, AuthError> {
        let payload = match self {
            Self::NoAuth => Vec::new(),
            Self::UnixPeerCredentials => effective_uid()?.to_le_bytes().to_vec(),
            Self::Direct(r) | Self::Jwt(r) | Self::JwtSvid(r) => match *r {},
        };
        tracing::trace!(auth_type = %self.auth_type(), len = payload.len(), "built request auth token");
        Ok(RequestAuthToken {
            auth_type: self.auth_type(),
            payload: Zeroizing::new(payload),
        })
    }
}

#[cfg(unix)]
fn effective_uid() -> Result<u32, AuthError> {
    Ok(nix::unistd::geteuid().as_raw())
}

#[cfg(not(unix))]
fn effective_uid() -> Result<u32, AuthError> {
    Err(AuthError::CredentialsUnavailable(
        "this platform has no Unix user ids".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_auth_token_is_empty() {
        let token = Authenticator::NoAuth.new_request_auth().unwrap();
        assert_eq!(token.auth_type(), AuthenticationType::NoAuth);
        assert!(token.is_empty());
        assert_eq!(token, RequestAuthToken::empty());
    }

    #[cfg(unix)]
    #[test]
    fn peer_credentials_token_is_little_endian_euid() {
        let token = Authenticator::UnixPeerCredentials.new_request_auth().unwrap();
        let euid = nix::unistd::geteuid().as_raw();
        assert_eq!(token.auth_type(), AuthenticationType::UnixPeerCredentials);
        assert_eq!(token.payload(), euid.to_le_bytes());
    }

    #[cfg(unix)]
    #[test]
    fn tokens_are_independent() {
        let auth = Authenticator::UnixPeerCredentials;
        let a = auth.new_request_auth().unwrap();
        let b = auth.new_request_auth().unwrap();
        drop(a);
        assert_eq!(b.payload().len(), 4);
    }

    #[test]
    fn info_matches_type() {
        let info = Authenticator::UnixPeerCredentials.info();
        assert_eq!(info.id, AuthenticationType::UnixPeerCredentials);
        assert!(!info.description.is_empty());
        assert_eq!(Authenticator::NoAuth.info().id, AuthenticationType::NoAuth);
    }

    #[test]
    fn info_json_uses_numeric_id() {
        let json = serde_json::to_value(Authenticator::NoAuth.info()).unwrap();
        assert_eq!(json["id"], 0);
    }

    #[test]
    fn debug_redacts_payload() {
        let token = RequestAuthToken {
            auth_type: AuthenticationType::UnixPeerCredentials,
            payload: Zeroizing::new(vec![0xaa, 0xbb, 0xcc, 0xdd]),
        };
        let shown = format!("{token:?}");
        assert!(shown.contains("4 bytes REDACTED"));
        assert!(!shown.contains("170"));
    }
}
