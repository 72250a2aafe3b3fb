//! Operation body codecs.

use keywire_core::ContentType;

use crate::error::SerializationError;
use crate::operations::Operation;

/// Encodes operation parameters into request bodies and decodes result
/// bodies, for one content type.
pub trait OperationCodec: Send + Sync {
    /// Content type announced in request headers.
    fn content_type(&self) -> ContentType;

    fn encode<O: Operation>(&self, op: &O) -> Result<Vec<u8>, SerializationError>;

    fn decode<O: Operation>(&self, body: &[u8]) -> Result<O::Output, SerializationError>;
}

/// JSON bodies via `serde_json`.
///
/// An empty result body decodes as JSON `null`, so operations without a
/// result accept both an empty body and `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl OperationCodec for JsonCodec {
    fn content_type(&self) -> ContentType {
        ContentType::Json
    }

    fn encode<O: Operation>(&self, op: &O) -> Result<Vec<u8>, SerializationError> {
        serde_json::to_vec(op).map_err(|e| SerializationError::Body(e.to_string()))
    }

    fn decode<O: Operation>(&self, body: &[u8]) -> Result<O::Output, SerializationError> {
        let result = if body.is_empty() {
            serde_json::from_value(serde_json::Value::Null)
        } else {
            serde_json::from_slice(body)
        };
        result.map_err(|e| SerializationError::Body(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::service::{Ping, PingResult};
    use crate::operations::keys::PsaDestroyKey;

    #[test]
    fn unit_results_accept_empty_body() {
        let codec = JsonCodec;
        codec.decode::<PsaDestroyKey>(b"").unwrap();
        codec.decode::<PsaDestroyKey>(b"null").unwrap();
    }

    #[test]
    fn struct_results_reject_empty_body() {
        assert!(JsonCodec.decode::<Ping>(b"").is_err());
        let ok = JsonCodec
            .decode::<Ping>(br#"{"wire_protocol_version_maj":1,"wire_protocol_version_min":0}"#)
            .unwrap();
        assert_eq!(
            ok,
            PingResult {
                wire_protocol_version_maj: 1,
                wire_protocol_version_min: 0
            }
        );
    }

    #[test]
    fn encodes_parameters_as_json_object() {
        let body = JsonCodec
            .encode(&PsaDestroyKey {
                key_name: "k".into(),
            })
            .unwrap();
        assert_eq!(body, br#"{"key_name":"k"}"#);
    }
}
