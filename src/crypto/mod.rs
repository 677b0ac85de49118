//! Signing primitives
//!
//! - `keypair`: the `KeyPair` provider trait and the Ed25519 implementation
//! - `signature`: intent hashing and the self-describing signature blob
//!
//! # Example
//!
//! ```rust,ignore
//! use sui_ptb::crypto::{Ed25519KeyPair, assemble_signature};
//!
//! let key_pair = Ed25519KeyPair::from_seed(&[7u8; 32]);
//! let blob = assemble_signature(&tx_bytes, &key_pair, 0x00)?;
//! assert_eq!(blob.len(), 97);
//! ```

pub mod keypair;
pub mod signature;

pub use keypair::*;
pub use signature::*;

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// BLAKE2b with a 32-byte digest, no key, no personalization
pub fn blake2b256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// BLAKE2b-256 over several parts without concatenating them first
pub fn blake2b256_parts(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
