//! # Operations
//!
//! One parameter type per service operation. Each implements [`Operation`],
//! binding its opcode and result type, so the client can dispatch all of
//! them through a single generic `invoke`.
//!
//! Parameter types carry algorithms and key attributes in their wire form
//! ([`WireAlgorithm`](keywire_algorithm::WireAlgorithm),
//! [`WireKeyAttributes`](keywire_algorithm::WireKeyAttributes)). The
//! convenience methods on the client do that translation, so a descriptor
//! that cannot be encoded never produces a request.

use keywire_core::Opcode;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod asymmetric;
pub mod keys;
pub mod service;
pub mod symmetric;

/// A request the service can execute.
pub trait Operation: Serialize {
    /// Operation selector placed in the request header.
    const OPCODE: Opcode;

    /// Result decoded from a successful response body. Operations with no
    /// result use `()`.
    type Output: DeserializeOwned;
}
