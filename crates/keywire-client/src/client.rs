//! # OperationClient
//!
//! Session state plus one connection, and the single generic dispatch path
//! every operation goes through.
//!
//! ## Concurrency
//!
//! - The session (implicit provider and bound authenticator) lives behind
//!   one `RwLock`. Each call takes a single read snapshot, so a concurrent
//!   `set_auth_type` is seen either entirely or not at all.
//! - The connection lives behind one `Mutex`. A request's send and the
//!   matching receive happen in the same critical section, so responses
//!   are never handed to the wrong caller. Calls on one client are
//!   serialized on the wire.
//! - Any transport failure or protocol violation marks the connection
//!   broken and closes the transport. Every later call then fails with
//!   `Transport(Closed)` without touching it. No call is ever retried.

use keywire_auth::{Authenticator, AuthenticatorInfo, RequestAuthToken};
use keywire_core::{
    AuthenticationType, FrameHeader, Opcode, ProviderId, Request, Response,
};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};
use zeroize::{Zeroize, Zeroizing};

use crate::codec::{JsonCodec, OperationCodec};
use crate::config::ClientConfig;
use crate::error::{ClientError, SerializationError};
use crate::operations::service::{ListAuthenticators, ListProviders, Ping};
use crate::operations::Operation;
use crate::transport::{Transport, TransportError};

#[derive(Debug, Clone, Copy)]
struct Session {
    provider: ProviderId,
    authenticator: Authenticator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectionState {
    Open,
    Broken,
    Closed,
}

struct Connection<T> {
    transport: T,
    state: ConnectionState,
}

impl<T: Transport> Connection<T> {
    /// Stop using the connection and release the transport. The transport
    /// is closed at most once across `mark_broken` and `release`.
    fn mark_broken(&mut self, reason: &str) {
        if self.state == ConnectionState::Open {
            warn!(reason, "connection marked broken");
            self.state = ConnectionState::Broken;
            if let Err(e) = self.transport.close() {
                warn!(error = %e, "failed to close broken connection");
            }
        }
    }

    fn release(&mut self) -> Result<(), TransportError> {
        let was_open = self.state == ConnectionState::Open;
        self.state = ConnectionState::Closed;
        if was_open {
            self.transport.close()
        } else {
            Ok(())
        }
    }
}

/// Client for the security service over one transport.
///
/// `Send + Sync` when the transport is `Send`; share it across threads with
/// `Arc`.
pub struct OperationClient<T, C = JsonCodec> {
    session: RwLock<Session>,
    connection: Mutex<Connection<T>>,
    codec: C,
    max_body_size: usize,
}

impl<T, C> std::fmt::Debug for OperationClient<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = *self.session.read();
        f.debug_struct("OperationClient")
            .field("provider", &session.provider)
            .field("auth_type", &session.authenticator.auth_type())
            .field("max_body_size", &self.max_body_size)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> OperationClient<T> {
    /// Build a client with JSON bodies, binding the configured
    /// authentication type.
    pub fn new(transport: T, config: ClientConfig) -> Result<Self, ClientError> {
        Self::with_codec(transport, JsonCodec, config)
    }
}

impl<T: Transport, C: OperationCodec> OperationClient<T, C> {
    /// Build a client with a specific body codec.
    pub fn with_codec(transport: T, codec: C, config: ClientConfig) -> Result<Self, ClientError> {
        let authenticator = keywire_auth::resolve(config.auth_type)?;
        debug!(
            provider = %config.implicit_provider,
            auth_type = %config.auth_type,
            "client bound"
        );
        Ok(Self {
            session: RwLock::new(Session {
                provider: config.implicit_provider,
                authenticator,
            }),
            connection: Mutex::new(Connection {
                transport,
                state: ConnectionState::Open,
            }),
            codec,
            max_body_size: config.max_body_size,
        })
    }

    /// Provider used for non-core operations that name none.
    pub fn implicit_provider(&self) -> ProviderId {
        self.session.read().provider
    }

    pub fn set_implicit_provider(&self, provider: ProviderId) {
        self.session.write().provider = provider;
    }

    pub fn auth_type(&self) -> AuthenticationType {
        self.session.read().authenticator.auth_type()
    }

    /// Description of the bound authenticator.
    pub fn authenticator_info(&self) -> AuthenticatorInfo {
        self.session.read().authenticator.info()
    }

    /// Bind a new authentication type. On failure the session is unchanged.
    pub fn set_auth_type(&self, auth_type: AuthenticationType) -> Result<(), ClientError> {
        let authenticator = keywire_auth::resolve(auth_type)?;
        self.session.write().authenticator = authenticator;
        debug!(%auth_type, "authentication type changed");
        Ok(())
    }

    /// [`set_auth_type`](Self::set_auth_type) from a raw numeric id.
    pub fn set_auth_type_id(&self, id: u32) -> Result<(), ClientError> {
        self.set_auth_type(AuthenticationType::try_from(id)?)
    }

    /// Execute an operation on the implicit provider.
    pub fn invoke<O: Operation>(&self, op: &O) -> Result<O::Output, ClientError> {
        self.dispatch(None, op)
    }

    /// Execute an operation on an explicit provider. Core operations ignore
    /// `provider` and always go to the core provider.
    pub fn invoke_on<O: Operation>(
        &self,
        provider: ProviderId,
        op: &O,
    ) -> Result<O::Output, ClientError> {
        self.dispatch(Some(provider), op)
    }

    /// Wire protocol version the service speaks, as `(major, minor)`.
    pub fn ping(&self) -> Result<(u8, u8), ClientError> {
        let result = self.invoke(&Ping)?;
        Ok((
            result.wire_protocol_version_maj,
            result.wire_protocol_version_min,
        ))
    }

    /// Close the connection. Later calls fail with `Transport(Closed)`.
    /// Closing twice is a no-op.
    pub fn close(&self) -> Result<(), ClientError> {
        debug!("closing connection");
        self.connection.lock().release()?;
        Ok(())
    }

    /// Pick the first non-core provider the service lists and the first
    /// service-advertised authenticator this client implements, then bind
    /// both at once.
    ///
    /// On failure the session is left unchanged.
    pub fn configure_from_service(&self) -> Result<(ProviderId, AuthenticationType), ClientError> {
        let providers = self.invoke(&ListProviders)?.providers;
        let provider = providers
            .iter()
            .map(|p| p.id)
            .find(|id| !id.is_core())
            .ok_or_else(|| ClientError::Protocol("service lists no crypto provider".into()))?;

        let advertised = self.invoke(&ListAuthenticators)?.authenticators;
        let authenticator = advertised
            .iter()
            .find_map(|info| keywire_auth::resolve(info.id).ok())
            .ok_or_else(|| match advertised.first() {
                Some(info) => ClientError::UnsupportedAuthType(info.id),
                None => ClientError::Protocol("service lists no authenticator".into()),
            })?;

        let auth_type = authenticator.auth_type();
        *self.session.write() = Session {
            provider,
            authenticator,
        };
        debug!(%provider, %auth_type, "configured from service");
        Ok((provider, auth_type))
    }

    fn dispatch<O: Operation>(
        &self,
        explicit: Option<ProviderId>,
        op: &O,
    ) -> Result<O::Output, ClientError> {
        let opcode = O::OPCODE;
        let session = *self.session.read();
        let provider = if opcode.is_core() {
            ProviderId::CORE
        } else {
            explicit.unwrap_or(session.provider)
        };

        let body = self.codec.encode(op)?;
        if body.len() > self.max_body_size {
            return Err(SerializationError::BodyTooLarge {
                size: body.len(),
                limit: self.max_body_size,
            }
            .into());
        }

        let token = if opcode.is_auth_exempt() {
            RequestAuthToken::empty()
        } else {
            session.authenticator.new_request_auth()?
        };

        let header = FrameHeader::request(
            provider,
            opcode,
            token.auth_type(),
            self.codec.content_type(),
        );
        let mut request = Request {
            header,
            body,
            auth: token.payload().to_vec(),
        };
        let frame = request.to_bytes().map(Zeroizing::new);
        request.auth.zeroize();
        let frame = frame.map_err(SerializationError::from)?;

        debug!(
            %opcode,
            %provider,
            auth_type = %header.auth_type,
            body_len = request.body.len(),
            "dispatching request"
        );
        let response = self.exchange(&header, &frame)?;

        let status = response.header.status;
        if status.is_success() {
            return self.codec.decode::<O>(&response.body).map_err(|e| {
                ClientError::Protocol(format!("undecodable {opcode} result: {e}"))
            });
        }
        debug!(%opcode, %provider, %status, "service reported failure");
        if status.is_authentication_failure() {
            Err(ClientError::AuthenticationFailure(status))
        } else {
            Err(ClientError::Operation(status))
        }
    }

    /// Send one frame and receive its response under the connection lock.
    fn exchange(&self, request: &FrameHeader, frame: &[u8]) -> Result<Response, ClientError> {
        let mut guard = self.connection.lock();
        let conn = &mut *guard;
        if conn.state != ConnectionState::Open {
            return Err(TransportError::Closed.into());
        }

        let received = match conn.transport.send(frame) {
            Ok(()) => conn.transport.receive(),
            Err(e) => Err(e),
        };
        let raw = match received {
            Ok(raw) => raw,
            Err(e) => {
                conn.mark_broken(&e.to_string());
                return Err(e.into());
            }
        };

        check_response(request, &raw).map_err(|reason| {
            conn.mark_broken(&reason);
            ClientError::Protocol(reason)
        })
    }
}

/// Parse a response frame and check it answers `request`.
fn check_response(request: &FrameHeader, raw: &[u8]) -> Result<Response, String> {
    let response = Response::from_bytes(raw).map_err(|e| format!("malformed response: {e}"))?;
    let header = &response.header;
    if header.opcode != request.opcode {
        let shown = Opcode::try_from(header.opcode)
            .map(|o| o.to_string())
            .unwrap_or_else(|raw| raw.to_string());
        return Err(format!(
            "response opcode {shown} does not match request opcode {}",
            request.opcode
        ));
    }
    if header.provider != request.provider {
        return Err(format!(
            "response from {} to a request for {}",
            header.provider, request.provider
        ));
    }
    if header.status.is_success() && header.content_type != request.accept_type {
        return Err(format!(
            "response content type {:?} was not requested",
            header.content_type
        ));
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keywire_core::{ContentType, ResponseStatus};
    use std::collections::VecDeque;

    /// Replays canned responses and records sent frames.
    #[derive(Default)]
    struct Scripted {
        sent: Vec<Vec<u8>>,
        replies: VecDeque<Result<Vec<u8>, TransportError>>,
        closed: usize,
    }

    impl Transport for Scripted {
        fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
            self.sent.push(frame.to_vec());
            Ok(())
        }

        fn receive(&mut self) -> Result<Vec<u8>, TransportError> {
            self.replies.pop_front().unwrap_or(Err(TransportError::Closed))
        }

        fn close(&mut self) -> Result<(), TransportError> {
            self.closed += 1;
            Ok(())
        }
    }

    fn reply(opcode: Opcode, provider: ProviderId, status: ResponseStatus, body: &str) -> Vec<u8> {
        let request = FrameHeader::request(
            provider,
            opcode,
            AuthenticationType::NoAuth,
            ContentType::Json,
        );
        Response {
            header: FrameHeader::response_to(&request, status),
            body: body.as_bytes().to_vec(),
        }
        .to_bytes()
        .unwrap()
    }

    fn client_with(replies: Vec<Vec<u8>>) -> OperationClient<Scripted> {
        let transport = Scripted {
            replies: replies.into_iter().map(Ok).collect(),
            ..Default::default()
        };
        OperationClient::new(transport, ClientConfig::default()).unwrap()
    }

    #[test]
    fn ping_goes_to_core_without_auth() {
        let client = client_with(vec![reply(
            Opcode::Ping,
            ProviderId::CORE,
            ResponseStatus::Success,
            r#"{"wire_protocol_version_maj":1,"wire_protocol_version_min":0}"#,
        )]);
        client.set_implicit_provider(ProviderId::MBED_CRYPTO);
        assert_eq!(client.ping().unwrap(), (1, 0));

        let conn = client.connection.lock();
        let sent = Request::from_bytes(&conn.transport.sent[0]).unwrap();
        assert_eq!(sent.header.provider, ProviderId::CORE);
        assert_eq!(sent.header.auth_type, AuthenticationType::NoAuth);
        assert!(sent.auth.is_empty());
    }

    #[test]
    fn status_mapping() {
        let client = client_with(vec![
            reply(
                Opcode::PsaDestroyKey,
                ProviderId::CORE,
                ResponseStatus::PsaErrorDoesNotExist,
                "",
            ),
            reply(
                Opcode::PsaDestroyKey,
                ProviderId::CORE,
                ResponseStatus::NotAuthenticated,
                "",
            ),
        ]);
        let op = crate::operations::keys::PsaDestroyKey {
            key_name: "k".into(),
        };
        assert!(client.invoke(&op).unwrap_err().is_not_found());
        assert_eq!(
            client.invoke(&op).unwrap_err(),
            ClientError::AuthenticationFailure(ResponseStatus::NotAuthenticated)
        );
    }

    #[test]
    fn mismatched_provider_breaks_connection() {
        let client = client_with(vec![reply(
            Opcode::PsaDestroyKey,
            ProviderId::TPM,
            ResponseStatus::Success,
            "",
        )]);
        let op = crate::operations::keys::PsaDestroyKey {
            key_name: "k".into(),
        };
        assert!(matches!(client.invoke(&op), Err(ClientError::Protocol(_))));
        assert_eq!(
            client.invoke(&op),
            Err(ClientError::Transport(TransportError::Closed))
        );
        assert_eq!(client.connection.lock().transport.sent.len(), 1);
        assert_eq!(client.connection.lock().transport.closed, 1);
    }

    #[test]
    fn transport_failure_releases_the_transport_once() {
        let transport = Scripted {
            replies: VecDeque::from([Err(TransportError::Reset("peer gone".into()))]),
            ..Default::default()
        };
        let client = OperationClient::new(transport, ClientConfig::default()).unwrap();
        assert!(client.ping().unwrap_err().is_transport());
        assert_eq!(client.connection.lock().state, ConnectionState::Broken);
        assert_eq!(client.connection.lock().transport.closed, 1);

        client.close().unwrap();
        assert_eq!(client.connection.lock().state, ConnectionState::Closed);
        assert_eq!(client.connection.lock().transport.closed, 1);
    }

    #[test]
    fn undecodable_result_is_protocol_error_but_keeps_connection() {
        let client = client_with(vec![
            reply(Opcode::Ping, ProviderId::CORE, ResponseStatus::Success, "[]"),
            reply(
                Opcode::Ping,
                ProviderId::CORE,
                ResponseStatus::Success,
                r#"{"wire_protocol_version_maj":1,"wire_protocol_version_min":0}"#,
            ),
        ]);
        assert!(matches!(client.ping(), Err(ClientError::Protocol(_))));
        assert_eq!(client.ping().unwrap(), (1, 0));
    }

    #[test]
    fn close_is_idempotent() {
        let client = client_with(Vec::new());
        client.close().unwrap();
        client.close().unwrap();
        assert_eq!(client.connection.lock().transport.closed, 1);
        assert_eq!(
            client.ping(),
            Err(ClientError::Transport(TransportError::Closed))
        );
    }

    #[test]
    fn unsupported_configured_auth_type_fails_construction() {
        let config = ClientConfig {
            auth_type: AuthenticationType::Jwt,
            ..Default::default()
        };
        assert_eq!(
            OperationClient::new(Scripted::default(), config).err(),
            Some(ClientError::UnsupportedAuthType(AuthenticationType::Jwt))
        );
    }

    #[test]
    fn client_is_shareable() {
        fn assert_send_sync<X: Send + Sync>() {}
        assert_send_sync::<OperationClient<Scripted>>();
    }
}
