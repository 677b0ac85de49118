//! Transaction signature assembly
//!
//! A submittable signature is a self-describing blob:
//!
//! ```text
//! [scheme_flag: 1][raw_signature][public_key]
//! ```
//!
//! The raw signature covers `blake2b_256(intent || tx_bytes)` where the
//! intent is the 3-byte `[scope, version, app_id]` prefix, all zero for
//! transaction data on Sui.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use super::keypair::{Ed25519KeyPair, KeyPair};
use crate::error::{ErrorCode, PtbError, PtbResult};

/// Intent prefix for transaction data: [TransactionData, V0, Sui]
pub const TRANSACTION_INTENT: [u8; 3] = [0, 0, 0];

/// Signature schemes understood on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureScheme {
    Ed25519,
    Secp256k1,
    Secp256r1,
}

impl SignatureScheme {
    /// Scheme byte placed at the front of a serialized signature
    pub fn flag(&self) -> u8 {
        match self {
            Self::Ed25519 => 0x00,
            Self::Secp256k1 => 0x01,
            Self::Secp256r1 => 0x02,
        }
    }

    pub fn from_flag(flag: u8) -> PtbResult<Self> {
        match flag {
            0x00 => Ok(Self::Ed25519),
            0x01 => Ok(Self::Secp256k1),
            0x02 => Ok(Self::Secp256r1),
            other => Err(PtbError::crypto_error(format!(
                "Unknown signature scheme flag: 0x{:02x}",
                other
            ))),
        }
    }

    pub fn signature_length(&self) -> usize {
        64
    }

    pub fn public_key_length(&self) -> usize {
        match self {
            Self::Ed25519 => 32,
            Self::Secp256k1 | Self::Secp256r1 => 33,
        }
    }

    /// Total serialized signature length for this scheme
    pub fn serialized_length(&self) -> usize {
        1 + self.signature_length() + self.public_key_length()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ed25519 => "ed25519",
            Self::Secp256k1 => "secp256k1",
            Self::Secp256r1 => "secp256r1",
        }
    }
}

/// `intent || payload`
pub fn intent_message(payload: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(TRANSACTION_INTENT.len() + payload.len());
    message.extend_from_slice(&TRANSACTION_INTENT);
    message.extend_from_slice(payload);
    message
}

/// The 32-byte digest a key pair signs for `payload`
pub fn signing_digest(payload: &[u8]) -> [u8; 32] {
    super::blake2b256_parts(&[&TRANSACTION_INTENT, payload])
}

/// Fixed-layout signature blob: scheme flag, raw signature, public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedSignature {
    pub scheme_flag: u8,
    pub signature: Vec<u8>,
    pub public_key: Vec<u8>,
}

impl SerializedSignature {
    pub fn new(scheme_flag: u8, signature: Vec<u8>, public_key: Vec<u8>) -> Self {
        Self {
            scheme_flag,
            signature,
            public_key,
        }
    }

    pub fn serialized_len(&self) -> usize {
        1 + self.signature.len() + self.public_key.len()
    }

    pub fn scheme(&self) -> PtbResult<SignatureScheme> {
        SignatureScheme::from_flag(self.scheme_flag)
    }

    /// `scheme_flag || signature || public_key`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_len());
        out.push(self.scheme_flag);
        out.extend_from_slice(&self.signature);
        out.extend_from_slice(&self.public_key);
        out
    }

    /// Base64 form expected by `sui_executeTransactionBlock`
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Split a blob back into its fields; lengths come from the scheme byte
    pub fn from_bytes(bytes: &[u8]) -> PtbResult<Self> {
        let (&flag, rest) = bytes
            .split_first()
            .ok_or_else(|| PtbError::parse_error("Empty signature"))?;
        let scheme = SignatureScheme::from_flag(flag)?;

        if bytes.len() != scheme.serialized_length() {
            return Err(PtbError::parse_error(format!(
                "{} signature must be {} bytes, got {}",
                scheme.name(),
                scheme.serialized_length(),
                bytes.len()
            )));
        }

        let (signature, public_key) = rest.split_at(scheme.signature_length());
        Ok(Self::new(flag, signature.to_vec(), public_key.to_vec()))
    }

    pub fn from_base64(encoded: &str) -> PtbResult<Self> {
        Self::from_bytes(&STANDARD.decode(encoded.trim())?)
    }

    /// Check this signature against transaction bytes
    ///
    /// Only Ed25519 blobs can be verified locally.
    pub fn verify(&self, payload: &[u8]) -> PtbResult<bool> {
        match self.scheme()? {
            SignatureScheme::Ed25519 => {
                let digest = signing_digest(payload);
                Ed25519KeyPair::verify(&self.public_key, &digest, &self.signature)
            }
            other => Err(PtbError::new(
                ErrorCode::VerificationFailed,
                format!("Local verification not supported for {}", other.name()),
            )),
        }
    }
}

/// Produce a submittable signature blob for `payload`
///
/// `scheme_id` is written as-is; it is not checked against the key pair.
pub fn assemble_signature<K>(payload: &[u8], key_pair: &K, scheme_id: u8) -> PtbResult<Vec<u8>>
where
    K: KeyPair + ?Sized,
{
    let digest = signing_digest(payload);
    let raw_signature = key_pair.sign(&digest)?;
    let public_key = key_pair.public_key_bytes();

    Ok(SerializedSignature::new(scheme_id, raw_signature, public_key).to_bytes())
}

/// Sign transaction bytes with the key pair's own scheme
pub fn sign_transaction<K>(payload: &[u8], key_pair: &K) -> PtbResult<SerializedSignature>
where
    K: KeyPair + ?Sized,
{
    let blob = assemble_signature(payload, key_pair, key_pair.scheme().flag())?;
    SerializedSignature::from_bytes(&blob)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_key() -> Ed25519KeyPair {
        Ed25519KeyPair::from_seed(&[7u8; 32])
    }

    #[test]
    fn test_ten_zero_byte_payload() {
        let blob = assemble_signature(&[0u8; 10], &fixed_key(), 0).unwrap();
        assert_eq!(blob.len(), 97);
        assert_eq!(blob[0], 0);
        assert_eq!(
            hex::encode(&blob),
            "00502d0a9b0e4fad723d843170c01195119c21c6f0aaac289b40a6b92713407dba51\
             698b1854bc95ee0529ecabe18707e0c4da34ed8e98dd91967f925cc38be206ea4a6c\
             63e29c520abef5507b132ec5f9954776aebebe7b92421eea691446d22c"
        );
    }

    #[test]
    fn test_layout_fields() {
        let key = fixed_key();
        let payload = b"transaction bytes";
        let blob = assemble_signature(payload, &key, 0).unwrap();

        let expected_sig = key.sign_bytes(&signing_digest(payload));
        assert_eq!(&blob[1..65], &expected_sig[..]);
        assert_eq!(&blob[65..], &key.public_key()[..]);
    }

    #[test]
    fn test_scheme_byte_written_verbatim() {
        let blob = assemble_signature(b"abc", &fixed_key(), 0x2a).unwrap();
        assert_eq!(blob[0], 0x2a);
        assert_eq!(blob.len(), 97);
        // unknown flags cannot be parsed back
        assert!(SerializedSignature::from_bytes(&blob).is_err());
    }

    #[test]
    fn test_intent_message_prefix() {
        let msg = intent_message(&[1, 2, 3]);
        assert_eq!(msg, vec![0, 0, 0, 1, 2, 3]);
        assert_eq!(signing_digest(&[1, 2, 3]), crate::crypto::blake2b256(&msg));
    }

    #[test]
    fn test_parse_and_verify() {
        let key = fixed_key();
        let signed = sign_transaction(b"payload", &key).unwrap();
        assert_eq!(signed.scheme().unwrap(), SignatureScheme::Ed25519);
        assert!(signed.verify(b"payload").unwrap());
        assert!(!signed.verify(b"payloae").unwrap());

        let reparsed = SerializedSignature::from_base64(&signed.to_base64()).unwrap();
        assert_eq!(reparsed, signed);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(SerializedSignature::from_bytes(&[]).is_err());
        assert!(SerializedSignature::from_bytes(&[0u8; 96]).is_err());
        // secp256k1 blobs are 98 bytes
        assert!(SerializedSignature::from_bytes(&[1u8; 98]).is_ok());
    }
}
