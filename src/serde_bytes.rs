//! Serde helpers for wire encodings
//!
//! The fullnode JSON-RPC renders digests as base58 and 64-bit integers as
//! decimal strings. These adapters are used as
//! `#[serde(with = "...")]` field attributes.

use serde::{Deserialize, Deserializer, Serializer};

/// Serialize/deserialize [u8; 32] as base58 string (object and transaction digests)
pub mod base58_32 {
    use super::*;

    pub fn serialize<S>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&bs58::encode(bytes).into_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = bs58::decode(&s)
            .into_vec()
            .map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 32 bytes"))
    }
}

/// Serialize/deserialize u64 as a decimal string
pub mod u64_string {
    use super::*;

    pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Some endpoints return bare numbers, others strings
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(s) => s.parse().map_err(serde::de::Error::custom),
            serde_json::Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| serde::de::Error::custom("expected unsigned integer")),
            other => Err(serde::de::Error::custom(format!(
                "expected u64 string, got {}",
                other
            ))),
        }
    }
}

/// Serialize/deserialize i128 as a decimal string (balance deltas can be negative)
pub mod i128_string {
    use super::*;

    pub fn serialize<S>(value: &i128, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i128, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Sample {
        #[serde(with = "super::u64_string")]
        version: u64,
        #[serde(with = "super::base58_32")]
        digest: [u8; 32],
        #[serde(with = "super::i128_string")]
        amount: i128,
    }

    #[test]
    fn test_decodes_rpc_shapes() {
        let json = r#"{"version":"42","digest":"11111111111111111111111111111111","amount":"-1000"}"#;
        let sample: Sample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.version, 42);
        assert_eq!(sample.digest, [0u8; 32]);
        assert_eq!(sample.amount, -1000);
    }

    #[test]
    fn test_u64_accepts_bare_number() {
        #[derive(Deserialize)]
        struct Bare {
            #[serde(with = "super::u64_string")]
            v: u64,
        }
        let bare: Bare = serde_json::from_str(r#"{"v":7}"#).unwrap();
        assert_eq!(bare.v, 7);
    }
}
