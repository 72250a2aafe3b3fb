//! Typed convenience methods, one per service operation.
//!
//! Each method translates its descriptors and attributes to wire form
//! first, so an unencodable algorithm or an invalid attribute combination
//! fails with `Serialization` before any request exists. Secret results
//! (exported keys, plaintexts, shared secrets, random bytes) are returned
//! in `Zeroizing` buffers.

use keywire_algorithm::codec::{
    encode_aead, encode_asymmetric_encryption, encode_asymmetric_signature, encode_cipher,
    encode_hash, encode_mac, encode_raw_key_agreement,
};
use keywire_algorithm::{
    Aead, AsymmetricEncryption, AsymmetricSignature, Cipher, Hash, KeyAttributes, Mac,
    RawKeyAgreement,
};
use keywire_auth::AuthenticatorInfo;
use keywire_core::{Opcode, ProviderId, ProviderInfo};
use zeroize::Zeroizing;

use crate::client::OperationClient;
use crate::codec::OperationCodec;
use crate::error::ClientError;
use crate::operations::asymmetric::{
    PsaAsymmetricDecrypt, PsaAsymmetricEncrypt, PsaRawKeyAgreement, PsaSignHash, PsaSignMessage,
    PsaVerifyHash, PsaVerifyMessage,
};
use crate::operations::keys::{
    PsaDestroyKey, PsaExportKey, PsaExportPublicKey, PsaGenerateKey, PsaImportKey,
};
use crate::operations::service::{KeyInfo, ListAuthenticators, ListKeys, ListOpcodes, ListProviders};
use crate::operations::symmetric::{
    PsaAeadDecrypt, PsaAeadEncrypt, PsaCipherDecrypt, PsaCipherEncrypt, PsaGenerateRandom,
    PsaHashCompare, PsaHashCompute, PsaMacCompute, PsaMacVerify,
};
use crate::transport::Transport;

impl<T: Transport, C: OperationCodec> OperationClient<T, C> {
    // ─── Service discovery ───────────────────────────────────────────

    pub fn list_providers(&self) -> Result<Vec<ProviderInfo>, ClientError> {
        Ok(self.invoke(&ListProviders)?.providers)
    }

    /// Opcodes `provider` supports. Opcodes newer than this client are
    /// left out.
    pub fn list_opcodes(&self, provider: ProviderId) -> Result<Vec<Opcode>, ClientError> {
        let result = self.invoke(&ListOpcodes {
            provider_id: provider,
        })?;
        Ok(result
            .opcodes
            .into_iter()
            .filter_map(|raw| Opcode::try_from(raw).ok())
            .collect())
    }

    pub fn list_authenticators(&self) -> Result<Vec<AuthenticatorInfo>, ClientError> {
        Ok(self.invoke(&ListAuthenticators)?.authenticators)
    }

    /// Keys owned by the caller. A key whose attributes this client cannot
    /// decode fails the whole call with `Protocol`.
    pub fn list_keys(&self) -> Result<Vec<KeyInfo>, ClientError> {
        self.invoke(&ListKeys)?
            .keys
            .into_iter()
            .map(|wire| {
                let name = wire.name.clone();
                KeyInfo::try_from(wire).map_err(|e| {
                    ClientError::Protocol(format!("key {name:?} has undecodable attributes: {e}"))
                })
            })
            .collect()
    }

    // ─── Key management ──────────────────────────────────────────────

    pub fn generate_key(&self, key_name: &str, attributes: &KeyAttributes) -> Result<(), ClientError> {
        let attributes = attributes.to_wire()?;
        self.invoke(&PsaGenerateKey {
            key_name: key_name.to_string(),
            attributes,
        })
    }

    pub fn destroy_key(&self, key_name: &str) -> Result<(), ClientError> {
        self.invoke(&PsaDestroyKey {
            key_name: key_name.to_string(),
        })
    }

    pub fn import_key(
        &self,
        key_name: &str,
        attributes: &KeyAttributes,
        data: &[u8],
    ) -> Result<(), ClientError> {
        let attributes = attributes.to_wire()?;
        self.invoke(&PsaImportKey {
            key_name: key_name.to_string(),
            attributes,
            data: data.to_vec(),
        })
    }

    pub fn export_key(&self, key_name: &str) -> Result<Zeroizing<Vec<u8>>, ClientError> {
        let result = self.invoke(&PsaExportKey {
            key_name: key_name.to_string(),
        })?;
        Ok(Zeroizing::new(result.data))
    }

    pub fn export_public_key(&self, key_name: &str) -> Result<Vec<u8>, ClientError> {
        Ok(self
            .invoke(&PsaExportPublicKey {
                key_name: key_name.to_string(),
            })?
            .data)
    }

    // ─── Hashing ─────────────────────────────────────────────────────

    pub fn hash_compute(&self, alg: Hash, input: &[u8]) -> Result<Vec<u8>, ClientError> {
        let alg = encode_hash(alg)?;
        Ok(self
            .invoke(&PsaHashCompute {
                alg,
                input: input.to_vec(),
            })?
            .hash)
    }

    /// Fails with `Operation(PsaErrorInvalidSignature)` when `hash` is not
    /// the digest of `input`.
    pub fn hash_compare(&self, alg: Hash, input: &[u8], hash: &[u8]) -> Result<(), ClientError> {
        let alg = encode_hash(alg)?;
        self.invoke(&PsaHashCompare {
            alg,
            input: input.to_vec(),
            hash: hash.to_vec(),
        })
    }

    // ─── Signatures ──────────────────────────────────────────────────

    pub fn sign_message(
        &self,
        key_name: &str,
        alg: AsymmetricSignature,
        message: &[u8],
    ) -> Result<Vec<u8>, ClientError> {
        let alg = encode_asymmetric_signature(&alg)?;
        Ok(self
            .invoke(&PsaSignMessage {
                key_name: key_name.to_string(),
                alg,
                message: message.to_vec(),
            })?
            .signature)
    }

    pub fn sign_hash(
        &self,
        key_name: &str,
        alg: AsymmetricSignature,
        hash: &[u8],
    ) -> Result<Vec<u8>, ClientError> {
        let alg = encode_asymmetric_signature(&alg)?;
        Ok(self
            .invoke(&PsaSignHash {
                key_name: key_name.to_string(),
                alg,
                hash: hash.to_vec(),
            })?
            .signature)
    }

    pub fn verify_message(
        &self,
        key_name: &str,
        alg: AsymmetricSignature,
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), ClientError> {
        let alg = encode_asymmetric_signature(&alg)?;
        self.invoke(&PsaVerifyMessage {
            key_name: key_name.to_string(),
            alg,
            message: message.to_vec(),
            signature: signature.to_vec(),
        })
    }

    pub fn verify_hash(
        &self,
        key_name: &str,
        alg: AsymmetricSignature,
        hash: &[u8],
        signature: &[u8],
    ) -> Result<(), ClientError> {
        let alg = encode_asymmetric_signature(&alg)?;
        self.invoke(&PsaVerifyHash {
            key_name: key_name.to_string(),
            alg,
            hash: hash.to_vec(),
            signature: signature.to_vec(),
        })
    }

    // ─── Symmetric encryption ────────────────────────────────────────

    /// Returns the generated IV followed by the ciphertext.
    pub fn cipher_encrypt(
        &self,
        key_name: &str,
        alg: Cipher,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, ClientError> {
        Ok(self
            .invoke(&PsaCipherEncrypt {
                key_name: key_name.to_string(),
                alg: encode_cipher(alg),
                plaintext: plaintext.to_vec(),
            })?
            .ciphertext)
    }

    pub fn cipher_decrypt(
        &self,
        key_name: &str,
        alg: Cipher,
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, ClientError> {
        let result = self.invoke(&PsaCipherDecrypt {
            key_name: key_name.to_string(),
            alg: encode_cipher(alg),
            ciphertext: ciphertext.to_vec(),
        })?;
        Ok(Zeroizing::new(result.plaintext))
    }

    pub fn aead_encrypt(
        &self,
        key_name: &str,
        alg: Aead,
        nonce: &[u8],
        additional_data: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, ClientError> {
        let alg = encode_aead(&alg)?;
        Ok(self
            .invoke(&PsaAeadEncrypt {
                key_name: key_name.to_string(),
                alg,
                nonce: nonce.to_vec(),
                additional_data: additional_data.to_vec(),
                plaintext: plaintext.to_vec(),
            })?
            .ciphertext)
    }

    pub fn aead_decrypt(
        &self,
        key_name: &str,
        alg: Aead,
        nonce: &[u8],
        additional_data: &[u8],
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, ClientError> {
        let alg = encode_aead(&alg)?;
        let result = self.invoke(&PsaAeadDecrypt {
            key_name: key_name.to_string(),
            alg,
            nonce: nonce.to_vec(),
            additional_data: additional_data.to_vec(),
            ciphertext: ciphertext.to_vec(),
        })?;
        Ok(Zeroizing::new(result.plaintext))
    }

    // ─── MAC and randomness ──────────────────────────────────────────

    pub fn mac_compute(&self, key_name: &str, alg: Mac, input: &[u8]) -> Result<Vec<u8>, ClientError> {
        let alg = encode_mac(&alg)?;
        Ok(self
            .invoke(&PsaMacCompute {
                key_name: key_name.to_string(),
                alg,
                input: input.to_vec(),
            })?
            .mac)
    }

    pub fn mac_verify(
        &self,
        key_name: &str,
        alg: Mac,
        input: &[u8],
        mac: &[u8],
    ) -> Result<(), ClientError> {
        let alg = encode_mac(&alg)?;
        self.invoke(&PsaMacVerify {
            key_name: key_name.to_string(),
            alg,
            input: input.to_vec(),
            mac: mac.to_vec(),
        })
    }

    pub fn generate_random(&self, size: usize) -> Result<Zeroizing<Vec<u8>>, ClientError> {
        let result = self.invoke(&PsaGenerateRandom { size: size as u64 })?;
        Ok(Zeroizing::new(result.random_bytes))
    }

    // ─── Asymmetric encryption and key agreement ─────────────────────

    pub fn asymmetric_encrypt(
        &self,
        key_name: &str,
        alg: AsymmetricEncryption,
        plaintext: &[u8],
        salt: Option<&[u8]>,
    ) -> Result<Vec<u8>, ClientError> {
        let alg = encode_asymmetric_encryption(&alg)?;
        Ok(self
            .invoke(&PsaAsymmetricEncrypt {
                key_name: key_name.to_string(),
                alg,
                plaintext: plaintext.to_vec(),
                salt: salt.map(<[u8]>::to_vec),
            })?
            .ciphertext)
    }

    pub fn asymmetric_decrypt(
        &self,
        key_name: &str,
        alg: AsymmetricEncryption,
        ciphertext: &[u8],
        salt: Option<&[u8]>,
    ) -> Result<Zeroizing<Vec<u8>>, ClientError> {
        let alg = encode_asymmetric_encryption(&alg)?;
        let result = self.invoke(&PsaAsymmetricDecrypt {
            key_name: key_name.to_string(),
            alg,
            ciphertext: ciphertext.to_vec(),
            salt: salt.map(<[u8]>::to_vec),
        })?;
        Ok(Zeroizing::new(result.plaintext))
    }

    /// Raw shared secret between `private_key_name` and `peer_key`.
    pub fn raw_key_agreement(
        &self,
        alg: RawKeyAgreement,
        private_key_name: &str,
        peer_key: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, ClientError> {
        let result = self.invoke(&PsaRawKeyAgreement {
            alg: encode_raw_key_agreement(alg),
            private_key_name: private_key_name.to_string(),
            peer_key: peer_key.to_vec(),
        })?;
        Ok(Zeroizing::new(result.shared_secret))
    }
}
