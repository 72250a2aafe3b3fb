//! Client configuration.
//!
//! Holds the initial session settings and local limits. Build one
//! explicitly, use `Default`, or load it from the environment.

use keywire_core::{AuthenticationType, ProviderId};

/// Default limit on an encoded request body.
pub const DEFAULT_MAX_BODY_SIZE: usize = 1 << 20;

/// Initial session settings for an [`OperationClient`](crate::OperationClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Provider used for non-core operations that name no provider.
    pub implicit_provider: ProviderId,
    /// Authentication type the client binds on construction.
    pub auth_type: AuthenticationType,
    /// Largest request body the client will send.
    pub max_body_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            implicit_provider: ProviderId::CORE,
            auth_type: AuthenticationType::NoAuth,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `KEYWIRE_PROVIDER` numeric provider id (default: 0)
    /// - `KEYWIRE_AUTH_TYPE` numeric id or name such as
    ///   `unix-peer-credentials` (default: `none`)
    /// - `KEYWIRE_MAX_BODY_SIZE` in bytes (default: 1 MiB)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup("KEYWIRE_PROVIDER") {
            let id = raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::invalid("KEYWIRE_PROVIDER", &raw))?;
            config.implicit_provider = ProviderId(id);
        }
        if let Some(raw) = lookup("KEYWIRE_AUTH_TYPE") {
            config.auth_type = parse_auth_type(raw.trim())
                .ok_or_else(|| ConfigError::invalid("KEYWIRE_AUTH_TYPE", &raw))?;
        }
        if let Some(raw) = lookup("KEYWIRE_MAX_BODY_SIZE") {
            config.max_body_size = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("KEYWIRE_MAX_BODY_SIZE", &raw))?;
        }
        Ok(config)
    }
}

fn parse_auth_type(raw: &str) -> Option<AuthenticationType> {
    match raw.parse::<u32>() {
        Ok(id) => AuthenticationType::try_from(id).ok(),
        Err(_) => AuthenticationType::from_name(raw),
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    InvalidValue { var: &'static str, value: String },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str) -> Self {
        Self::InvalidValue {
            var,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_vars(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(load(&[]).unwrap(), ClientConfig::default());
        assert_eq!(ClientConfig::default().max_body_size, 1_048_576);
    }

    #[test]
    fn reads_all_variables() {
        let config = load(&[
            ("KEYWIRE_PROVIDER", "1"),
            ("KEYWIRE_AUTH_TYPE", "unix-peer-credentials"),
            ("KEYWIRE_MAX_BODY_SIZE", "4096"),
        ])
        .unwrap();
        assert_eq!(config.implicit_provider, ProviderId::MBED_CRYPTO);
        assert_eq!(config.auth_type, AuthenticationType::UnixPeerCredentials);
        assert_eq!(config.max_body_size, 4096);
    }

    #[test]
    fn numeric_auth_type() {
        let config = load(&[("KEYWIRE_AUTH_TYPE", "3")]).unwrap();
        assert_eq!(config.auth_type, AuthenticationType::UnixPeerCredentials);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            load(&[("KEYWIRE_AUTH_TYPE", "5")]),
            Err(ConfigError::InvalidValue { var: "KEYWIRE_AUTH_TYPE", .. })
        ));
        assert!(load(&[("KEYWIRE_AUTH_TYPE", "kerberos")]).is_err());
        assert!(load(&[("KEYWIRE_PROVIDER", "-1")]).is_err());
        assert!(load(&[("KEYWIRE_MAX_BODY_SIZE", "lots")]).is_err());
    }
}
