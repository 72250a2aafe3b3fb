//! # keywire-core — Foundational Protocol Types
//!
//! This crate is the leaf of the keywire workspace. It defines the
//! identifiers and framing shared by every other crate:
//!
//! 1. **`AuthenticationType`.** Closed enumeration of the five authentication
//!    kinds the wire protocol recognizes. The only constructors are the enum
//!    literals and `TryFrom`, which rejects out-of-range values.
//!
//! 2. **`ProviderId` / `Opcode`.** Numeric selectors for the backend
//!    provider and the requested operation. `Opcode` knows which operations
//!    are service-level (`is_core`) and which are sent unauthenticated
//!    (`is_auth_exempt`).
//!
//! 3. **`ResponseStatus`.** Every status code the service can report, with a
//!    forward-compatible catch-all for codes newer than this client.
//!
//! 4. **Wire framing.** The fixed little-endian request/response header and
//!    the `Request` / `Response` frames built on it (`wire` module).
//!
//! ## Crate Policy
//!
//! - No dependencies on other `keywire-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod auth_type;
pub mod error;
pub mod opcode;
pub mod provider;
pub mod status;
pub mod wire;

// Re-export primary types for ergonomic imports.
pub use auth_type::AuthenticationType;
pub use error::{InvalidAuthType, WireError};
pub use opcode::Opcode;
pub use provider::{ProviderId, ProviderInfo};
pub use status::ResponseStatus;
pub use wire::{ContentType, FrameHeader, Request, Response, WIRE_VERSION_MAJOR, WIRE_VERSION_MINOR};
