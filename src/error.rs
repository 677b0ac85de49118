//! Unified error types for the PTB toolkit
//!
//! All errors flow through this module so the CLI can report them
//! consistently (plain text or JSON).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for all toolkit operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PtbError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl PtbError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, msg)
    }

    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidAddress, msg)
    }

    pub fn invalid_private_key(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidPrivateKey, msg)
    }

    pub fn invalid_transaction(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidTransaction, msg)
    }

    pub fn network_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::NetworkError, msg)
    }

    pub fn crypto_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::CryptoError, msg)
    }

    pub fn insufficient_funds(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientFunds, msg)
    }

    pub fn broadcast_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::BroadcastFailed, msg)
    }

    pub fn transaction_rejected(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::TransactionRejected, msg)
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, msg)
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }
}

impl fmt::Display for PtbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for PtbError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Input errors
    InvalidInput,
    InvalidAddress,
    InvalidPrivateKey,
    InvalidTransaction,
    ConfigError,

    // Network errors
    NetworkError,
    Timeout,

    // Transaction errors
    InsufficientFunds,
    BroadcastFailed,
    TransactionRejected,

    // Crypto errors
    CryptoError,
    VerificationFailed,

    // Parse errors
    ParseError,
    JsonError,
    HexError,
    EncodingError,

    // Internal
    Internal,
}

/// Result type alias for toolkit operations
pub type PtbResult<T> = Result<T, PtbError>;

// Conversions from common error types

impl From<serde_json::Error> for PtbError {
    fn from(e: serde_json::Error) -> Self {
        PtbError::new(ErrorCode::JsonError, e.to_string())
    }
}

impl From<hex::FromHexError> for PtbError {
    fn from(e: hex::FromHexError) -> Self {
        PtbError::new(ErrorCode::HexError, e.to_string())
    }
}

impl From<base64::DecodeError> for PtbError {
    fn from(e: base64::DecodeError) -> Self {
        PtbError::new(ErrorCode::EncodingError, format!("Base64 error: {}", e))
    }
}

impl From<bs58::decode::Error> for PtbError {
    fn from(e: bs58::decode::Error) -> Self {
        PtbError::new(ErrorCode::EncodingError, format!("Base58 error: {}", e))
    }
}

impl From<bech32::Error> for PtbError {
    fn from(e: bech32::Error) -> Self {
        PtbError::new(ErrorCode::InvalidPrivateKey, format!("Bech32 error: {}", e))
    }
}

impl From<ed25519_dalek::SignatureError> for PtbError {
    fn from(e: ed25519_dalek::SignatureError) -> Self {
        PtbError::new(ErrorCode::CryptoError, format!("Ed25519 error: {}", e))
    }
}

impl From<url::ParseError> for PtbError {
    fn from(e: url::ParseError) -> Self {
        PtbError::new(ErrorCode::ConfigError, format!("Invalid URL: {}", e))
    }
}

impl From<std::io::Error> for PtbError {
    fn from(e: std::io::Error) -> Self {
        PtbError::new(ErrorCode::Internal, e.to_string())
    }
}

impl From<reqwest::Error> for PtbError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PtbError::new(ErrorCode::Timeout, "Request timed out")
        } else if e.is_connect() {
            PtbError::new(ErrorCode::NetworkError, "Connection failed")
        } else {
            PtbError::new(ErrorCode::NetworkError, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = PtbError::insufficient_funds("Not enough SUI for gas")
            .with_details("Required: 100000000 MIST, Available: 5000 MIST");

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("insufficient_funds"));
        assert!(json.contains("Not enough SUI"));
    }

    #[test]
    fn test_display_includes_details() {
        let err = PtbError::broadcast_failed("rejected").with_details("code -32002");
        assert_eq!(err.to_string(), "[BroadcastFailed] rejected (code -32002)");
    }
}
