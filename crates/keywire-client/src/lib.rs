//! # keywire-client — Security Service Client
//!
//! Blocking client for a local security service that stores keys and runs
//! cryptographic operations on the caller's behalf. Callers name keys and
//! algorithms; key material stays in the service.
//!
//! ## Architecture
//!
//! - **OperationClient** (`client.rs`): session state (implicit provider,
//!   bound authenticator) and one connection. Every operation goes through
//!   the generic `invoke`, which picks the provider, builds the auth token,
//!   frames the request, and maps the response status.
//!
//! - **Operations** (`operations/`): one parameter type per opcode with its
//!   result type. `api.rs` layers a typed convenience method over each.
//!
//! - **Transport** (`transport.rs`): the framed byte channel. Supply any
//!   implementation; `StreamTransport` adapts a blocking `Read + Write`.
//!
//! - **OperationCodec** (`codec.rs`): request and result body encoding.
//!   `JsonCodec` is the default.
//!
//! ## Crate Policy
//!
//! - Connection setup is out of scope: callers hand in a connected
//!   transport.
//! - No retries. A transport failure closes the connection for good.
//! - Logs through `tracing`; no subscriber is installed here.

mod api;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod operations;
pub mod transport;

pub use client::OperationClient;
pub use codec::{JsonCodec, OperationCodec};
pub use config::{ClientConfig, ConfigError};
pub use error::{ClientError, SerializationError};
pub use operations::service::KeyInfo;
pub use operations::Operation;
pub use transport::{StreamTransport, Transport, TransportError};
