//! Hash, symmetric cipher, AEAD, MAC and random number operations.

use keywire_algorithm::WireAlgorithm;
use keywire_core::Opcode;
use serde::{Deserialize, Serialize};

use super::Operation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaHashCompute {
    pub alg: WireAlgorithm,
    pub input: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashComputeResult {
    pub hash: Vec<u8>,
}

impl Operation for PsaHashCompute {
    const OPCODE: Opcode = Opcode::PsaHashCompute;
    type Output = HashComputeResult;
}

/// Succeeds only if `hash` is the digest of `input`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaHashCompare {
    pub alg: WireAlgorithm,
    pub input: Vec<u8>,
    pub hash: Vec<u8>,
}

impl Operation for PsaHashCompare {
    const OPCODE: Opcode = Opcode::PsaHashCompare;
    type Output = ();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaCipherEncrypt {
    pub key_name: String,
    pub alg: WireAlgorithm,
    pub plaintext: Vec<u8>,
}

/// IV followed by the ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherEncryptResult {
    pub ciphertext: Vec<u8>,
}

impl Operation for PsaCipherEncrypt {
    const OPCODE: Opcode = Opcode::PsaCipherEncrypt;
    type Output = CipherEncryptResult;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaCipherDecrypt {
    pub key_name: String,
    pub alg: WireAlgorithm,
    pub ciphertext: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherDecryptResult {
    pub plaintext: Vec<u8>,
}

impl Operation for PsaCipherDecrypt {
    const OPCODE: Opcode = Opcode::PsaCipherDecrypt;
    type Output = CipherDecryptResult;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaAeadEncrypt {
    pub key_name: String,
    pub alg: WireAlgorithm,
    pub nonce: Vec<u8>,
    pub additional_data: Vec<u8>,
    pub plaintext: Vec<u8>,
}

/// Ciphertext with the tag appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AeadEncryptResult {
    pub ciphertext: Vec<u8>,
}

impl Operation for PsaAeadEncrypt {
    const OPCODE: Opcode = Opcode::PsaAeadEncrypt;
    type Output = AeadEncryptResult;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaAeadDecrypt {
    pub key_name: String,
    pub alg: WireAlgorithm,
    pub nonce: Vec<u8>,
    pub additional_data: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AeadDecryptResult {
    pub plaintext: Vec<u8>,
}

impl Operation for PsaAeadDecrypt {
    const OPCODE: Opcode = Opcode::PsaAeadDecrypt;
    type Output = AeadDecryptResult;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaMacCompute {
    pub key_name: String,
    pub alg: WireAlgorithm,
    pub input: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacComputeResult {
    pub mac: Vec<u8>,
}

impl Operation for PsaMacCompute {
    const OPCODE: Opcode = Opcode::PsaMacCompute;
    type Output = MacComputeResult;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaMacVerify {
    pub key_name: String,
    pub alg: WireAlgorithm,
    pub input: Vec<u8>,
    pub mac: Vec<u8>,
}

impl Operation for PsaMacVerify {
    const OPCODE: Opcode = Opcode::PsaMacVerify;
    type Output = ();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaGenerateRandom {
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRandomResult {
    pub random_bytes: Vec<u8>,
}

impl Operation for PsaGenerateRandom {
    const OPCODE: Opcode = Opcode::PsaGenerateRandom;
    type Output = GenerateRandomResult;
}
