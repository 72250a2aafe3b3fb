//! # Client Errors
//!
//! [`ClientError`] is the single error type of every client call. Its
//! variants separate where a failure happened:
//!
//! - before anything was sent (`InvalidAuthType`, `UnsupportedAuthType`,
//!   `CredentialsUnavailable`, `Serialization`);
//! - on the connection (`Transport`), after which the server-side effect of
//!   the call is unknown;
//! - in the service's answer (`Protocol`, `AuthenticationFailure`,
//!   `Operation`).

use keywire_algorithm::{AlgorithmError, AttributeError};
use keywire_auth::AuthError;
use keywire_core::{AuthenticationType, InvalidAuthType, ResponseStatus, WireError};
use thiserror::Error;

use crate::transport::TransportError;

/// Failure to produce a request body or frame locally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// An algorithm descriptor has no wire identifier.
    #[error("algorithm encoding failed: {0}")]
    Algorithm(#[from] AlgorithmError),

    /// Key attributes failed validation.
    #[error("key attribute encoding failed: {0}")]
    Attributes(#[from] AttributeError),

    /// The operation codec could not produce or parse a body.
    #[error("body codec error: {0}")]
    Body(String),

    /// The encoded body exceeds the configured limit.
    #[error("request body of {size} bytes exceeds the {limit} byte limit")]
    BodyTooLarge { size: usize, limit: usize },

    /// The request could not be framed.
    #[error("framing failed: {0}")]
    Frame(#[from] WireError),
}

/// Error returned by every [`OperationClient`](crate::OperationClient) call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error(transparent)]
    InvalidAuthType(#[from] InvalidAuthType),

    #[error("authentication type {0} is not supported by this client")]
    UnsupportedAuthType(AuthenticationType),

    /// The service rejected the request's credentials.
    #[error("authentication failed: {0}")]
    AuthenticationFailure(ResponseStatus),

    #[error("local credentials unavailable: {0}")]
    CredentialsUnavailable(String),

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The service's response violated the wire protocol.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The service executed the request and reported a failure status.
    #[error("operation failed: {0}")]
    Operation(ResponseStatus),
}

impl ClientError {
    /// The service-reported status, if the failure came from the service.
    pub fn status(&self) -> Option<ResponseStatus> {
        match self {
            Self::AuthenticationFailure(s) | Self::Operation(s) => Some(*s),
            _ => None,
        }
    }

    /// The service reported that the named key or resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Operation(ResponseStatus::PsaErrorDoesNotExist))
    }

    /// The service reported that the key already exists.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::Operation(ResponseStatus::PsaErrorAlreadyExists))
    }

    /// The service refused the operation under the key's policy.
    pub fn is_not_permitted(&self) -> bool {
        matches!(self, Self::Operation(ResponseStatus::PsaErrorNotPermitted))
    }

    /// The failure happened on the connection; the request may or may not
    /// have taken effect.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<AuthError> for ClientError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidAuthType(e) => Self::InvalidAuthType(e),
            AuthError::UnsupportedAuthType(t) => Self::UnsupportedAuthType(t),
            AuthError::CredentialsUnavailable(reason) => Self::CredentialsUnavailable(reason),
        }
    }
}

impl From<AlgorithmError> for ClientError {
    fn from(err: AlgorithmError) -> Self {
        Self::Serialization(err.into())
    }
}

impl From<AttributeError> for ClientError {
    fn from(err: AttributeError) -> Self {
        Self::Serialization(err.into())
    }
}
