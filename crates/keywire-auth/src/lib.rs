//! # keywire-auth — Request Authenticators
//!
//! Every request to the service carries an authentication field whose shape
//! depends on the session's [`AuthenticationType`](keywire_core::AuthenticationType).
//! This crate owns that mapping:
//!
//! - **Authenticator** (`authenticator.rs`): a closed enum over every
//!   authentication kind. Kinds this client cannot produce tokens for are
//!   uninhabited, so no value of them can ever be constructed.
//!
//! - **Registry** (`registry.rs`): [`resolve`] turns an authentication type
//!   into a working [`Authenticator`] or a typed refusal.
//!
//! ## Crate Policy
//!
//! - Depends on `keywire-core` only.
//! - Token payloads are wiped on drop (`zeroize`).
//! - No shared mutable state; every function here is safe to call from any
//!   thread.

pub mod authenticator;
pub mod error;
pub mod registry;

pub use authenticator::{Authenticator, AuthenticatorInfo, RequestAuthToken, Reserved};
pub use error::AuthError;
pub use registry::{resolve, resolve_id};
