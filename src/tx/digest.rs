//! Transaction digests
//!
//! The digest a fullnode reports for an executed transaction can be
//! computed locally before submission:
//! `base58(blake2b_256("TransactionData::" || tx_bytes))`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::crypto::blake2b256_parts;
use crate::error::{PtbError, PtbResult};

const TRANSACTION_DATA_SALT: &[u8] = b"TransactionData::";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionDigest(#[serde(with = "crate::serde_bytes::base58_32")] pub [u8; 32]);

impl TransactionDigest {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }

    pub fn from_base58(s: &str) -> PtbResult<Self> {
        let bytes = bs58::decode(s.trim()).into_vec()?;
        let arr: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            PtbError::parse_error(format!("Digest must be 32 bytes, got {}", v.len()))
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Display for TransactionDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl FromStr for TransactionDigest {
    type Err = PtbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

/// Digest of serialized `TransactionData` bytes
pub fn transaction_digest(tx_bytes: &[u8]) -> TransactionDigest {
    TransactionDigest(blake2b256_parts(&[TRANSACTION_DATA_SALT, tx_bytes]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_salted_hash() {
        let digest = transaction_digest(b"abc");
        let expected = crate::crypto::blake2b256(b"TransactionData::abc");
        assert_eq!(digest.0, expected);
    }

    #[test]
    fn test_base58_roundtrip() {
        let digest = transaction_digest(&[1, 2, 3]);
        let parsed: TransactionDigest = digest.to_string().parse().unwrap();
        assert_eq!(parsed, digest);
    }

    #[test]
    fn test_json_is_base58_string() {
        let digest = TransactionDigest::new([0u8; 32]);
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{}\"", "1".repeat(32)));
    }
}
