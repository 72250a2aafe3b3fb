//! Resolution of authentication types to authenticators.

use keywire_core::AuthenticationType;

use crate::authenticator::Authenticator;
use crate::error::AuthError;

/// Resolve an authentication type to a working authenticator.
pub fn resolve(auth_type: AuthenticationType) -> Result<Authenticator, AuthError> {
    match auth_type {
        AuthenticationType::NoAuth => Ok(Authenticator::NoAuth),
        AuthenticationType::UnixPeerCredentials => Ok(Authenticator::UnixPeerCredentials),
        AuthenticationType::Direct | AuthenticationType::Jwt | AuthenticationType::JwtSvid => {
            tracing::debug!(%auth_type, "no client implementation for authentication type");
            Err(AuthError::UnsupportedAuthType(auth_type))
        }
    }
}

/// Resolve a raw numeric authentication type.
pub fn resolve_id(id: u32) -> Result<Authenticator, AuthError> {
    resolve(AuthenticationType::try_from(id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keywire_core::InvalidAuthType;

    #[test]
    fn implemented_types_resolve() {
        assert_eq!(resolve(AuthenticationType::NoAuth), Ok(Authenticator::NoAuth));
        assert_eq!(
            resolve(AuthenticationType::UnixPeerCredentials),
            Ok(Authenticator::UnixPeerCredentials)
        );
        for t in AuthenticationType::ALL {
            if let Ok(auth) = resolve(t) {
                assert_eq!(auth.auth_type(), t);
            }
        }
    }

    #[test]
    fn reserved_types_are_unsupported() {
        for t in [
            AuthenticationType::Direct,
            AuthenticationType::Jwt,
            AuthenticationType::JwtSvid,
        ] {
            assert_eq!(resolve(t), Err(AuthError::UnsupportedAuthType(t)));
        }
    }

    #[test]
    fn numeric_ids() {
        assert_eq!(resolve_id(3), Ok(Authenticator::UnixPeerCredentials));
        assert_eq!(
            resolve_id(1),
            Err(AuthError::UnsupportedAuthType(AuthenticationType::Direct))
        );
        assert_eq!(
            resolve_id(5),
            Err(AuthError::InvalidAuthType(InvalidAuthType(5)))
        );
        assert_eq!(
            resolve_id(u32::MAX),
            Err(AuthError::InvalidAuthType(InvalidAuthType(u32::MAX)))
        );
    }
}
