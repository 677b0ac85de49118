//! Key pair provider
//!
//! Signing keys are owned by the caller (normally a `ClientContext`) and
//! expose only what the signature assembler needs: a scheme, a signing
//! operation over a 32-byte digest, and the public key bytes.

use base64::{engine::general_purpose::STANDARD, Engine};
use bech32::{FromBase32, ToBase32, Variant};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;
use zeroize::Zeroizing;

use super::signature::SignatureScheme;
use crate::error::{PtbError, PtbResult};
use crate::types::SuiAddress;

/// Human-readable part of Bech32-encoded private keys
pub const SUI_PRIVATE_KEY_PREFIX: &str = "suiprivkey";

/// Signing capability consumed by the signature assembler
pub trait KeyPair {
    /// Signature scheme this key signs with
    fn scheme(&self) -> SignatureScheme;

    /// Sign a message (for transactions, the 32-byte intent digest)
    fn sign(&self, message: &[u8]) -> PtbResult<Vec<u8>>;

    /// Raw public key bytes
    fn public_key_bytes(&self) -> Vec<u8>;

    /// Sui address of this key
    fn address(&self) -> SuiAddress {
        address_from_public_key(self.scheme(), &self.public_key_bytes())
    }
}

/// Derive a Sui address from a public key
/// address = blake2b_256(scheme_flag || public_key)
pub fn address_from_public_key(scheme: SignatureScheme, public_key: &[u8]) -> SuiAddress {
    SuiAddress::new(super::blake2b256_parts(&[&[scheme.flag()], public_key]))
}

/// Ed25519 key pair
#[derive(Clone)]
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
    public_key: [u8; 32],
}

impl Ed25519KeyPair {
    /// Create from a 32-byte seed
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let verifying_key: VerifyingKey = (&signing_key).into();
        Self {
            public_key: verifying_key.to_bytes(),
            signing_key,
        }
    }

    /// Generate a fresh random key pair
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let public_key = signing_key.verifying_key().to_bytes();
        Self { signing_key, public_key }
    }

    /// Create from raw secret key bytes
    ///
    /// Accepts a 32-byte seed, the 33-byte keystore form (`0x00 || seed`),
    /// or the legacy 64-byte form (`seed || public_key`).
    pub fn from_secret_key(bytes: &[u8]) -> PtbResult<Self> {
        match bytes.len() {
            32 => {
                let seed = Zeroizing::new(copy_seed(bytes));
                Ok(Self::from_seed(&seed))
            }
            33 => {
                if bytes[0] != SignatureScheme::Ed25519.flag() {
                    return Err(PtbError::invalid_private_key(format!(
                        "Unsupported key scheme flag: 0x{:02x}",
                        bytes[0]
                    )));
                }
                let seed = Zeroizing::new(copy_seed(&bytes[1..]));
                Ok(Self::from_seed(&seed))
            }
            64 => {
                let seed = Zeroizing::new(copy_seed(&bytes[..32]));
                let key_pair = Self::from_seed(&seed);
                if key_pair.public_key[..] != bytes[32..] {
                    return Err(PtbError::invalid_private_key(
                        "Provided secret key does not match its public key",
                    ));
                }
                Ok(key_pair)
            }
            n => Err(PtbError::invalid_private_key(format!(
                "Secret key must be 32, 33 or 64 bytes, got {}",
                n
            ))),
        }
    }

    /// Parse a base64-encoded secret key
    pub fn from_base64(encoded: &str) -> PtbResult<Self> {
        let bytes = Zeroizing::new(STANDARD.decode(encoded.trim())?);
        Self::from_secret_key(&bytes)
    }

    /// Parse a `suiprivkey1...` Bech32 secret key
    pub fn from_bech32(encoded: &str) -> PtbResult<Self> {
        let (hrp, data, variant) = bech32::decode(encoded.trim())?;
        if hrp != SUI_PRIVATE_KEY_PREFIX {
            return Err(PtbError::invalid_private_key(format!(
                "Unexpected key prefix: {}",
                hrp
            )));
        }
        if variant != Variant::Bech32 {
            return Err(PtbError::invalid_private_key("Key must use Bech32, not Bech32m"));
        }
        let bytes = Zeroizing::new(Vec::<u8>::from_base32(&data)?);
        if bytes.len() != 33 {
            return Err(PtbError::invalid_private_key(format!(
                "Bech32 key must carry 33 bytes, got {}",
                bytes.len()
            )));
        }
        Self::from_secret_key(&bytes)
    }

    /// Parse either encoding, picking by prefix
    pub fn decode(encoded: &str) -> PtbResult<Self> {
        if encoded.trim().starts_with(SUI_PRIVATE_KEY_PREFIX) {
            Self::from_bech32(encoded)
        } else {
            Self::from_base64(encoded)
        }
    }

    /// Export as a `suiprivkey1...` string
    pub fn to_bech32(&self) -> PtbResult<String> {
        let mut flagged = Zeroizing::new(Vec::with_capacity(33));
        flagged.push(SignatureScheme::Ed25519.flag());
        flagged.extend_from_slice(self.signing_key.as_bytes());
        Ok(bech32::encode(
            SUI_PRIVATE_KEY_PREFIX,
            flagged.as_slice().to_base32(),
            Variant::Bech32,
        )?)
    }

    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    /// Sign a message, returning the fixed-size signature
    pub fn sign_bytes(&self, message: &[u8]) -> [u8; 64] {
        let signature: Signature = self.signing_key.sign(message);
        signature.to_bytes()
    }

    /// Verify an Ed25519 signature against a public key
    pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> PtbResult<bool> {
        let pk_bytes: [u8; 32] = public_key.try_into().map_err(|_| {
            PtbError::crypto_error(format!(
                "Public key must be 32 bytes, got {}",
                public_key.len()
            ))
        })?;
        let sig_bytes: [u8; 64] = signature.try_into().map_err(|_| {
            PtbError::crypto_error(format!(
                "Signature must be 64 bytes, got {}",
                signature.len()
            ))
        })?;

        let verifying_key = VerifyingKey::from_bytes(&pk_bytes)?;
        let sig = Signature::from_bytes(&sig_bytes);

        Ok(verifying_key.verify(message, &sig).is_ok())
    }
}

impl KeyPair for Ed25519KeyPair {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::Ed25519
    }

    fn sign(&self, message: &[u8]) -> PtbResult<Vec<u8>> {
        Ok(self.sign_bytes(message).to_vec())
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        self.public_key.to_vec()
    }
}

impl fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519KeyPair")
            .field("public_key", &hex::encode(self.public_key))
            .finish_non_exhaustive()
    }
}

fn copy_seed(bytes: &[u8]) -> [u8; 32] {
    let mut seed = [0u8; 32];
    seed.copy_from_slice(bytes);
    seed
}
