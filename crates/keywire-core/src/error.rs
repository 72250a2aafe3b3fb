//! # Error Types
//!
//! Errors raised while constructing protocol identifiers or while framing
//! and parsing wire messages. All errors use `thiserror`.

use thiserror::Error;

/// A numeric value outside the closed `AuthenticationType` enumeration.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid authentication type {0}: valid values are 0-4")]
pub struct InvalidAuthType(pub u32);

/// Error while encoding or decoding a request/response frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// The frame does not start with the protocol magic number.
    #[error("bad magic number {0:#010x}")]
    BadMagic(u32),

    /// The header size field does not match this protocol revision.
    #[error("unsupported header size {0}")]
    HeaderSize(u16),

    /// The peer speaks a wire protocol major version this client cannot parse.
    #[error("unsupported wire protocol version {major}.{minor}")]
    UnsupportedVersion {
        /// Major version found in the header.
        major: u8,
        /// Minor version found in the header.
        minor: u8,
    },

    /// The frame ended before the lengths announced in its header.
    #[error("frame truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required by the header.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// The frame carries bytes beyond the lengths announced in its header.
    #[error("frame has {0} trailing bytes")]
    TrailingBytes(usize),

    /// The auth type byte is outside the closed enumeration.
    #[error(transparent)]
    InvalidAuthType(#[from] InvalidAuthType),

    /// The content or accept type byte is not a known body encoding.
    #[error("unknown content type {0}")]
    UnknownContentType(u8),

    /// The body does not fit in the 32-bit body length field.
    #[error("body of {0} bytes exceeds the frame limit")]
    BodyTooLarge(usize),

    /// The auth token does not fit in the 16-bit auth length field.
    #[error("auth token of {0} bytes exceeds the frame limit")]
    AuthTooLarge(usize),
}
