//! In-memory stand-in for the security service.
//!
//! `StubService` implements `Transport` by decoding each request frame,
//! running it against a small key store, and queueing the response frame.
//! A cloned `ServiceHandle` lets tests inspect what reached the service and
//! inject faults.

#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use keywire_algorithm::WireKeyAttributes;
use keywire_auth::{Authenticator, AuthenticatorInfo};
use keywire_client::operations::asymmetric::{PsaSignHash, PsaVerifyHash, SignatureResult};
use keywire_client::operations::keys::{
    ExportPublicKeyResult, PsaDestroyKey, PsaExportPublicKey, PsaGenerateKey, PsaImportKey,
};
use keywire_client::operations::service::{
    ListAuthenticatorsResult, ListKeysResult, ListOpcodes, ListOpcodesResult, ListProvidersResult,
    PingResult, WireKeyInfo,
};
use keywire_client::operations::symmetric::{GenerateRandomResult, PsaGenerateRandom};
use keywire_client::{ClientConfig, OperationClient, Transport, TransportError};
use keywire_core::{
    AuthenticationType, FrameHeader, Opcode, ProviderId, ProviderInfo, Request, Response,
    ResponseStatus,
};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// Observable and adjustable service state.
#[derive(Default)]
pub struct ServiceState {
    /// Stored keys by name.
    pub keys: BTreeMap<String, WireKeyAttributes>,
    /// Every request that reached the service, in arrival order.
    pub requests: Vec<Request>,
    /// Reject non-exempt requests that carry no credentials.
    pub require_auth: bool,
    /// Fail the next receive with a connection reset.
    pub reset_next_receive: bool,
    /// Answer the next request with a different opcode.
    pub wrong_opcode_next: bool,
    pub close_calls: usize,
}

#[derive(Clone, Default)]
pub struct ServiceHandle(Arc<Mutex<ServiceState>>);

impl ServiceHandle {
    pub fn with<R>(&self, f: impl FnOnce(&mut ServiceState) -> R) -> R {
        f(&mut self.0.lock())
    }

    pub fn request_count(&self) -> usize {
        self.with(|s| s.requests.len())
    }

    pub fn last_request(&self) -> Option<Request> {
        self.with(|s| s.requests.last().cloned())
    }
}

pub struct StubService {
    state: ServiceHandle,
    pending: VecDeque<Vec<u8>>,
}

/// A stub transport and a handle onto its state.
pub fn stub() -> (StubService, ServiceHandle) {
    let handle = ServiceHandle::default();
    let service = StubService {
        state: handle.clone(),
        pending: VecDeque::new(),
    };
    (service, handle)
}

/// A client over a fresh stub with the default configuration.
pub fn client() -> (OperationClient<StubService>, ServiceHandle) {
    client_with(ClientConfig::default())
}

pub fn client_with(config: ClientConfig) -> (OperationClient<StubService>, ServiceHandle) {
    let (service, handle) = stub();
    let client = OperationClient::new(service, config).unwrap();
    (client, handle)
}

impl Transport for StubService {
    fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        let request = Request::from_bytes(frame).map_err(TransportError::Framing)?;
        let mut state = self.state.0.lock();
        state.requests.push(request.clone());

        let (status, body) = handle(&mut state, &request);
        let mut header = FrameHeader::response_to(&request.header, status);
        if std::mem::take(&mut state.wrong_opcode_next) {
            header.opcode = Opcode::PsaSignHash.as_u32();
        }
        let frame = Response { header, body }
            .to_bytes()
            .map_err(TransportError::Framing)?;
        self.pending.push_back(frame);
        Ok(())
    }

    fn receive(&mut self) -> Result<Vec<u8>, TransportError> {
        if std::mem::take(&mut self.state.0.lock().reset_next_receive) {
            return Err(TransportError::Reset("stub reset".into()));
        }
        self.pending.pop_front().ok_or(TransportError::Closed)
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.state.0.lock().close_calls += 1;
        Ok(())
    }
}

type Reply = (ResponseStatus, Vec<u8>);

fn ok<T: Serialize>(result: &T) -> Reply {
    match serde_json::to_vec(result) {
        Ok(body) => (ResponseStatus::Success, body),
        Err(_) => fail(ResponseStatus::SerializingBodyFailed),
    }
}

fn done() -> Reply {
    (ResponseStatus::Success, Vec::new())
}

fn fail(status: ResponseStatus) -> Reply {
    (status, Vec::new())
}

fn parse<T: DeserializeOwned>(request: &Request) -> Result<T, Reply> {
    serde_json::from_slice(&request.body).map_err(|_| fail(ResponseStatus::DeserializingBodyFailed))
}

pub fn provider_list() -> Vec<ProviderInfo> {
    vec![
        ProviderInfo {
            uuid: Uuid::nil(),
            description: "Core provider".into(),
            vendor: "keywire".into(),
            version_maj: 1,
            version_min: 0,
            version_rev: 0,
            id: ProviderId::CORE,
        },
        ProviderInfo {
            uuid: Uuid::from_u128(0x1c1139dc_ad7c_47dc_ad6b_db6fdb466552),
            description: "Software crypto provider".into(),
            vendor: "keywire".into(),
            version_maj: 0,
            version_min: 1,
            version_rev: 0,
            id: ProviderId::MBED_CRYPTO,
        },
    ]
}

fn handle(state: &mut ServiceState, request: &Request) -> Reply {
    let opcode = match request.header.known_opcode() {
        Ok(opcode) => opcode,
        Err(_) => return fail(ResponseStatus::OpcodeDoesNotExist),
    };
    if state.require_auth
        && !opcode.is_auth_exempt()
        && request.header.auth_type == AuthenticationType::NoAuth
    {
        return fail(ResponseStatus::NotAuthenticated);
    }
    match run(state, opcode, request) {
        Ok(reply) | Err(reply) => reply,
    }
}

fn run(state: &mut ServiceState, opcode: Opcode, request: &Request) -> Result<Reply, Reply> {
    let reply = match opcode {
        Opcode::Ping => ok(&PingResult {
            wire_protocol_version_maj: 1,
            wire_protocol_version_min: 0,
        }),
        Opcode::ListProviders => ok(&ListProvidersResult {
            providers: provider_list(),
        }),
        Opcode::ListAuthenticators => {
            let direct = AuthenticatorInfo {
                id: AuthenticationType::Direct,
                description: "Direct authentication".into(),
                version_maj: 0,
                version_min: 1,
                version_rev: 0,
            };
            ok(&ListAuthenticatorsResult {
                authenticators: vec![direct, Authenticator::UnixPeerCredentials.info()],
            })
        }
        Opcode::ListOpcodes => {
            let op: ListOpcodes = parse(request)?;
            let opcodes = if op.provider_id.is_core() {
                Opcode::ALL
                    .iter()
                    .filter(|o| o.is_core())
                    .map(|o| o.as_u32())
                    .collect()
            } else {
                let mut all: Vec<u32> = Opcode::ALL
                    .iter()
                    .filter(|o| !o.is_core())
                    .map(|o| o.as_u32())
                    .collect();
                all.push(99);
                all
            };
            ok(&ListOpcodesResult { opcodes })
        }
        Opcode::ListKeys => ok(&ListKeysResult {
            keys: state
                .keys
                .iter()
                .map(|(name, attributes)| WireKeyInfo {
                    provider_id: ProviderId::MBED_CRYPTO,
                    name: name.clone(),
                    attributes: *attributes,
                })
                .collect(),
        }),
        Opcode::PsaGenerateKey => {
            let op: PsaGenerateKey = parse(request)?;
            store(state, op.key_name, op.attributes)
        }
        Opcode::PsaImportKey => {
            let op: PsaImportKey = parse(request)?;
            store(state, op.key_name, op.attributes)
        }
        Opcode::PsaDestroyKey => {
            let op: PsaDestroyKey = parse(request)?;
            match state.keys.remove(&op.key_name) {
                Some(_) => done(),
                None => fail(ResponseStatus::PsaErrorDoesNotExist),
            }
        }
        Opcode::PsaExportPublicKey => {
            let op: PsaExportPublicKey = parse(request)?;
            require_key(state, &op.key_name)?;
            ok(&ExportPublicKeyResult {
                data: op.key_name.into_bytes(),
            })
        }
        Opcode::PsaSignHash => {
            let op: PsaSignHash = parse(request)?;
            require_key(state, &op.key_name)?;
            let mut signature = op.hash;
            signature.reverse();
            ok(&SignatureResult { signature })
        }
        Opcode::PsaVerifyHash => {
            let op: PsaVerifyHash = parse(request)?;
            require_key(state, &op.key_name)?;
            let mut expected = op.hash;
            expected.reverse();
            if expected == op.signature {
                done()
            } else {
                fail(ResponseStatus::PsaErrorInvalidSignature)
            }
        }
        Opcode::PsaGenerateRandom => {
            let op: PsaGenerateRandom = parse(request)?;
            ok(&GenerateRandomResult {
                random_bytes: (0..op.size).map(|i| i as u8).collect(),
            })
        }
        _ => fail(ResponseStatus::PsaErrorNotSupported),
    };
    Ok(reply)
}

fn store(state: &mut ServiceState, name: String, attributes: WireKeyAttributes) -> Reply {
    if state.keys.contains_key(&name) {
        return fail(ResponseStatus::PsaErrorAlreadyExists);
    }
    state.keys.insert(name, attributes);
    done()
}

fn require_key(state: &ServiceState, name: &str) -> Result<(), Reply> {
    if state.keys.contains_key(name) {
        Ok(())
    } else {
        Err(fail(ResponseStatus::PsaErrorDoesNotExist))
    }
}
