//! Signature, asymmetric encryption and key agreement operations.

use keywire_algorithm::WireAlgorithm;
use keywire_core::Opcode;
use serde::{Deserialize, Serialize};

use super::Operation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureResult {
    pub signature: Vec<u8>,
}

/// Sign a precomputed digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaSignHash {
    pub key_name: String,
    pub alg: WireAlgorithm,
    pub hash: Vec<u8>,
}

impl Operation for PsaSignHash {
    const OPCODE: Opcode = Opcode::PsaSignHash;
    type Output = SignatureResult;
}

/// Hash and sign a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaSignMessage {
    pub key_name: String,
    pub alg: WireAlgorithm,
    pub message: Vec<u8>,
}

impl Operation for PsaSignMessage {
    const OPCODE: Opcode = Opcode::PsaSignMessage;
    type Output = SignatureResult;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaVerifyHash {
    pub key_name: String,
    pub alg: WireAlgorithm,
    pub hash: Vec<u8>,
    pub signature: Vec<u8>,
}

impl Operation for PsaVerifyHash {
    const OPCODE: Opcode = Opcode::PsaVerifyHash;
    type Output = ();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaVerifyMessage {
    pub key_name: String,
    pub alg: WireAlgorithm,
    pub message: Vec<u8>,
    pub signature: Vec<u8>,
}

impl Operation for PsaVerifyMessage {
    const OPCODE: Opcode = Opcode::PsaVerifyMessage;
    type Output = ();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaAsymmetricEncrypt {
    pub key_name: String,
    pub alg: WireAlgorithm,
    pub plaintext: Vec<u8>,
    /// OAEP label; ignored by PKCS#1 v1.5.
    pub salt: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsymmetricEncryptResult {
    pub ciphertext: Vec<u8>,
}

impl Operation for PsaAsymmetricEncrypt {
    const OPCODE: Opcode = Opcode::PsaAsymmetricEncrypt;
    type Output = AsymmetricEncryptResult;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaAsymmetricDecrypt {
    pub key_name: String,
    pub alg: WireAlgorithm,
    pub ciphertext: Vec<u8>,
    pub salt: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsymmetricDecryptResult {
    pub plaintext: Vec<u8>,
}

impl Operation for PsaAsymmetricDecrypt {
    const OPCODE: Opcode = Opcode::PsaAsymmetricDecrypt;
    type Output = AsymmetricDecryptResult;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaRawKeyAgreement {
    pub alg: WireAlgorithm,
    pub private_key_name: String,
    /// Peer public key in the export format of its key type.
    pub peer_key: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawKeyAgreementResult {
    pub shared_secret: Vec<u8>,
}

impl Operation for PsaRawKeyAgreement {
    const OPCODE: Opcode = Opcode::PsaRawKeyAgreement;
    type Output = RawKeyAgreementResult;
}
