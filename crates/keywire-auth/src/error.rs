//! Authentication errors.

use keywire_core::{AuthenticationType, InvalidAuthType};
use thiserror::Error;

/// Failure to resolve an authenticator or to build a request token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The numeric id is not an authentication type at all.
    #[error(transparent)]
    InvalidAuthType(#[from] InvalidAuthType),

    /// A valid authentication type this client has no implementation for.
    #[error("authentication type {0} is not supported by this client")]
    UnsupportedAuthType(AuthenticationType),

    /// The operating system could not report the caller's credentials.
    #[error("local credentials unavailable: {0}")]
    CredentialsUnavailable(String),
}
