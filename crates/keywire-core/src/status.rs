//! # Response Status Codes
//!
//! Status carried in the response header. `Success` (0) is the only code
//! that comes with a result body. Codes 1-21 are service-level failures
//! (framing, routing, authentication); codes 1132-1153 are failures reported
//! by the provider's cryptographic backend.

use serde::{Deserialize, Serialize};

/// Service-reported outcome of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum ResponseStatus {
    Success,
    WrongProviderId,
    ContentTypeNotSupported,
    AcceptTypeNotSupported,
    WireProtocolVersionNotSupported,
    ProviderNotRegistered,
    ProviderDoesNotExist,
    DeserializingBodyFailed,
    SerializingBodyFailed,
    OpcodeDoesNotExist,
    ResponseTooLarge,
    AuthenticationError,
    AuthenticatorDoesNotExist,
    AuthenticatorNotRegistered,
    KeyInfoManagerError,
    ConnectionError,
    InvalidEncoding,
    InvalidHeader,
    WrongProviderUuid,
    NotAuthenticated,
    BodySizeExceedsLimit,
    AdminOperation,
    PsaErrorGenericError,
    PsaErrorNotPermitted,
    PsaErrorNotSupported,
    PsaErrorInvalidArgument,
    PsaErrorInvalidHandle,
    PsaErrorBadState,
    PsaErrorBufferTooSmall,
    PsaErrorAlreadyExists,
    PsaErrorDoesNotExist,
    PsaErrorInsufficientMemory,
    PsaErrorInsufficientStorage,
    PsaErrorInsufficientData,
    PsaErrorCommunicationFailure,
    PsaErrorStorageFailure,
    PsaErrorHardwareFailure,
    PsaErrorInsufficientEntropy,
    PsaErrorInvalidSignature,
    PsaErrorInvalidPadding,
    PsaErrorCorruptionDetected,
    PsaErrorDataCorrupt,
    PsaErrorDataInvalid,
    /// Forward-compatible catch-all for codes newer than this client.
    Unrecognized(u16),
}

/// Known codes, kept in one table so both directions stay in sync.
const KNOWN: [(ResponseStatus, u16); 43] = [
    (ResponseStatus::Success, 0),
    (ResponseStatus::WrongProviderId, 1),
    (ResponseStatus::ContentTypeNotSupported, 2),
    (ResponseStatus::AcceptTypeNotSupported, 3),
    (ResponseStatus::WireProtocolVersionNotSupported, 4),
    (ResponseStatus::ProviderNotRegistered, 5),
    (ResponseStatus::ProviderDoesNotExist, 6),
    (ResponseStatus::DeserializingBodyFailed, 7),
    (ResponseStatus::SerializingBodyFailed, 8),
    (ResponseStatus::OpcodeDoesNotExist, 9),
    (ResponseStatus::ResponseTooLarge, 10),
    (ResponseStatus::AuthenticationError, 11),
    (ResponseStatus::AuthenticatorDoesNotExist, 12),
    (ResponseStatus::AuthenticatorNotRegistered, 13),
    (ResponseStatus::KeyInfoManagerError, 14),
    (ResponseStatus::ConnectionError, 15),
    (ResponseStatus::InvalidEncoding, 16),
    (ResponseStatus::InvalidHeader, 17),
    (ResponseStatus::WrongProviderUuid, 18),
    (ResponseStatus::NotAuthenticated, 19),
    (ResponseStatus::BodySizeExceedsLimit, 20),
    (ResponseStatus::AdminOperation, 21),
    (ResponseStatus::PsaErrorGenericError, 1132),
    (ResponseStatus::PsaErrorNotPermitted, 1133),
    (ResponseStatus::PsaErrorNotSupported, 1134),
    (ResponseStatus::PsaErrorInvalidArgument, 1135),
    (ResponseStatus::PsaErrorInvalidHandle, 1136),
    (ResponseStatus::PsaErrorBadState, 1137),
    (ResponseStatus::PsaErrorBufferTooSmall, 1138),
    (ResponseStatus::PsaErrorAlreadyExists, 1139),
    (ResponseStatus::PsaErrorDoesNotExist, 1140),
    (ResponseStatus::PsaErrorInsufficientMemory, 1141),
    (ResponseStatus::PsaErrorInsufficientStorage, 1142),
    (ResponseStatus::PsaErrorInsufficientData, 1143),
    (ResponseStatus::PsaErrorCommunicationFailure, 1145),
    (ResponseStatus::PsaErrorStorageFailure, 1146),
    (ResponseStatus::PsaErrorHardwareFailure, 1147),
    (ResponseStatus::PsaErrorInsufficientEntropy, 1148),
    (ResponseStatus::PsaErrorInvalidSignature, 1149),
    (ResponseStatus::PsaErrorInvalidPadding, 1150),
    (ResponseStatus::PsaErrorCorruptionDetected, 1151),
    (ResponseStatus::PsaErrorDataCorrupt, 1152),
    (ResponseStatus::PsaErrorDataInvalid, 1153),
];

impl ResponseStatus {
    /// Map a wire code to a status. Never fails; unknown codes become
    /// [`ResponseStatus::Unrecognized`].
    pub fn from_code(code: u16) -> Self {
        KNOWN
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(s, _)| *s)
            .unwrap_or(Self::Unrecognized(code))
    }

    /// The wire code.
    pub fn code(&self) -> u16 {
        match self {
            Self::Unrecognized(code) => *code,
            known => KNOWN
                .iter()
                .find(|(s, _)| s == known)
                .map(|(_, c)| *c)
                .unwrap_or_default(),
        }
    }

    /// Whether the request succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Whether the service rejected the caller's identity rather than the
    /// operation itself.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationError
                | Self::AuthenticatorDoesNotExist
                | Self::AuthenticatorNotRegistered
                | Self::NotAuthenticated
        )
    }
}

impl From<u16> for ResponseStatus {
    fn from(code: u16) -> Self {
        Self::from_code(code)
    }
}

impl From<ResponseStatus> for u16 {
    fn from(status: ResponseStatus) -> Self {
        status.code()
    }
}

impl std::fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unrecognized(code) => write!(f, "unrecognized status {code}"),
            known => write!(f, "{known:?} ({})", known.code()),
        }
    }
}
