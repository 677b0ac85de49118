//! Shared Sui types
//!
//! Addresses, object identifiers and object references as they appear both
//! in BCS transaction bytes and in fullnode JSON responses.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{PtbError, PtbResult};

/// Sui address is 32 bytes, displayed as 0x-prefixed hex
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuiAddress {
    pub bytes: [u8; 32],
}

impl SuiAddress {
    pub const LENGTH: usize = 32;

    pub const ZERO: SuiAddress = SuiAddress { bytes: [0u8; 32] };

    /// Create from raw bytes
    pub fn new(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Parse from hex string (with or without 0x prefix)
    pub fn from_string(s: &str) -> PtbResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);

        if s.is_empty() || s.len() > 64 {
            return Err(PtbError::invalid_address(format!(
                "Invalid address length: {} hex chars",
                s.len()
            )));
        }

        // Handle short addresses (pad with zeros)
        let padded = format!("{:0>64}", s);

        let bytes = hex::decode(&padded)
            .map_err(|e| PtbError::invalid_address(format!("Invalid hex: {}", e)))?;

        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self::new(arr))
    }

    /// Convert to hex string with 0x prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.bytes))
    }

    /// Check if this is the zero address
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for SuiAddress {
    type Err = PtbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl Serialize for SuiAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SuiAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SuiAddress::from_string(&s).map_err(serde::de::Error::custom)
    }
}

/// Sui Object ID (same format as address)
pub type ObjectId = SuiAddress;

/// 32-byte object digest, rendered as base58
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectDigest(#[serde(with = "crate::serde_bytes::base58_32")] pub [u8; 32]);

impl ObjectDigest {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a base58 digest
    pub fn from_base58(s: &str) -> PtbResult<Self> {
        let bytes = bs58::decode(s.trim()).into_vec()?;
        let arr: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            PtbError::parse_error(format!("Digest must be 32 bytes, got {}", v.len()))
        })?;
        Ok(Self(arr))
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl fmt::Display for ObjectDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

/// Sui Object Reference (ID, version, digest)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub object_id: ObjectId,
    #[serde(with = "crate::serde_bytes::u64_string")]
    pub version: u64,
    pub digest: ObjectDigest,
}

impl ObjectRef {
    pub fn new(object_id: ObjectId, version: u64, digest: ObjectDigest) -> Self {
        Self { object_id, version, digest }
    }
}

/// Coin type string for the native token
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// 1 SUI = 10^9 MIST
pub const MIST_PER_SUI: u64 = 1_000_000_000;
