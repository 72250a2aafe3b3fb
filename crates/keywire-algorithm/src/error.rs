//! Algorithm and attribute codec errors.

use thiserror::Error;

/// Error translating an algorithm descriptor to or from its wire identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmError {
    /// The descriptor exists in memory but has no wire identifier.
    #[error("unsupported algorithm: {0}")]
    Unsupported(String),

    /// The identifier does not name any algorithm this codec knows.
    #[error("unknown algorithm identifier {0:#010x}")]
    UnknownIdentifier(u32),

    /// A standalone identifier was not exactly four bytes long.
    #[error("algorithm identifier must be 4 bytes, got {0}")]
    BadLength(usize),
}

/// Error validating or translating key attributes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributeError {
    /// The attribute combination has no valid wire representation.
    #[error("invalid key attributes: {0}")]
    InvalidAttributes(String),

    /// The permitted algorithm in the policy could not be encoded or decoded.
    #[error("invalid key policy algorithm: {0}")]
    Algorithm(#[from] AlgorithmError),

    /// A wire attribute message holds a value this codec does not know.
    #[error("malformed key attributes: {0}")]
    Malformed(String),
}
