//! Session state: authentication type binding and service-driven
//! configuration.

mod support;

use keywire_client::{ClientConfig, ClientError};
use keywire_core::{AuthenticationType, InvalidAuthType, ProviderId};

#[test]
fn default_session() {
    let (client, _service) = support::client();
    assert_eq!(client.implicit_provider(), ProviderId::CORE);
    assert_eq!(client.auth_type(), AuthenticationType::NoAuth);
    assert_eq!(client.authenticator_info().id, AuthenticationType::NoAuth);
}

#[test]
fn unsupported_auth_type_leaves_session_unchanged() {
    let (client, _service) = support::client();
    client
        .set_auth_type(AuthenticationType::UnixPeerCredentials)
        .unwrap();

    for reserved in [
        AuthenticationType::Direct,
        AuthenticationType::Jwt,
        AuthenticationType::JwtSvid,
    ] {
        assert_eq!(
            client.set_auth_type(reserved),
            Err(ClientError::UnsupportedAuthType(reserved))
        );
        assert_eq!(client.auth_type(), AuthenticationType::UnixPeerCredentials);
    }
}

#[test]
fn out_of_range_auth_id_is_invalid() {
    let (client, _service) = support::client();
    assert_eq!(
        client.set_auth_type_id(5),
        Err(ClientError::InvalidAuthType(InvalidAuthType(5)))
    );
    assert_eq!(client.auth_type(), AuthenticationType::NoAuth);

    client.set_auth_type_id(3).unwrap();
    assert_eq!(client.auth_type(), AuthenticationType::UnixPeerCredentials);
}

#[test]
fn provider_can_be_changed() {
    let (client, _service) = support::client();
    client.set_implicit_provider(ProviderId::PKCS11);
    assert_eq!(client.implicit_provider(), ProviderId::PKCS11);
    assert_eq!(client.auth_type(), AuthenticationType::NoAuth);
}

#[cfg(unix)]
#[test]
fn peer_credentials_travel_with_non_exempt_requests() {
    let (client, service) = support::client_with(ClientConfig {
        implicit_provider: ProviderId::MBED_CRYPTO,
        auth_type: AuthenticationType::UnixPeerCredentials,
        ..Default::default()
    });
    let euid = nix::unistd::geteuid().as_raw();

    let _ = client.destroy_key("absent");
    let request = service.last_request().unwrap();
    assert_eq!(request.header.auth_type, AuthenticationType::UnixPeerCredentials);
    assert_eq!(request.auth, euid.to_le_bytes());

    client.ping().unwrap();
    let request = service.last_request().unwrap();
    assert_eq!(request.header.auth_type, AuthenticationType::NoAuth);
    assert!(request.auth.is_empty());
}

#[test]
fn configure_from_service_picks_usable_settings() {
    let (client, service) = support::client();
    let chosen = client.configure_from_service().unwrap();
    assert_eq!(
        chosen,
        (ProviderId::MBED_CRYPTO, AuthenticationType::UnixPeerCredentials)
    );
    assert_eq!(client.implicit_provider(), ProviderId::MBED_CRYPTO);
    assert_eq!(client.auth_type(), AuthenticationType::UnixPeerCredentials);
    // Discovery itself is unauthenticated.
    service.with(|s| {
        assert!(s
            .requests
            .iter()
            .all(|r| r.header.auth_type == AuthenticationType::NoAuth));
    });
}

#[test]
fn failed_configuration_leaves_session_unchanged() {
    let (client, service) = support::client();
    service.with(|s| s.wrong_opcode_next = true);
    assert!(client.configure_from_service().is_err());
    assert_eq!(client.implicit_provider(), ProviderId::CORE);
    assert_eq!(client.auth_type(), AuthenticationType::NoAuth);
}
