//! Key management operations.

use keywire_algorithm::WireKeyAttributes;
use keywire_core::Opcode;
use serde::{Deserialize, Serialize};

use super::Operation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaGenerateKey {
    pub key_name: String,
    pub attributes: WireKeyAttributes,
}

impl Operation for PsaGenerateKey {
    const OPCODE: Opcode = Opcode::PsaGenerateKey;
    type Output = ();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaDestroyKey {
    pub key_name: String,
}

impl Operation for PsaDestroyKey {
    const OPCODE: Opcode = Opcode::PsaDestroyKey;
    type Output = ();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaImportKey {
    pub key_name: String,
    pub attributes: WireKeyAttributes,
    pub data: Vec<u8>,
}

impl Operation for PsaImportKey {
    const OPCODE: Opcode = Opcode::PsaImportKey;
    type Output = ();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaExportKey {
    pub key_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportKeyResult {
    pub data: Vec<u8>,
}

impl Operation for PsaExportKey {
    const OPCODE: Opcode = Opcode::PsaExportKey;
    type Output = ExportKeyResult;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaExportPublicKey {
    pub key_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPublicKeyResult {
    pub data: Vec<u8>,
}

impl Operation for PsaExportPublicKey {
    const OPCODE: Opcode = Opcode::PsaExportPublicKey;
    type Output = ExportPublicKeyResult;
}
