//! Test-network faucet

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::error::{ErrorCode, PtbError, PtbResult};
use crate::log_info;
use crate::types::SuiAddress;

/// Coin sent by the faucet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaucetCoin {
    pub amount: u64,
    pub id: String,
    pub transfer_tx_digest: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaucetResponse {
    #[serde(default)]
    pub transferred_gas_objects: Vec<FaucetCoin>,
    #[serde(default)]
    pub error: Option<String>,
}

impl FaucetResponse {
    pub fn total_amount(&self) -> u64 {
        self.transferred_gas_objects.iter().map(|c| c.amount).sum()
    }
}

/// Ask the faucet at `faucet_url` to send gas coins to `recipient`
pub fn request_faucet_gas(
    faucet_url: &str,
    recipient: &SuiAddress,
    timeout: Duration,
) -> PtbResult<FaucetResponse> {
    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| PtbError::network_error(format!("Failed to create HTTP client: {}", e)))?;

    let url = format!("{}/gas", faucet_url.trim_end_matches('/'));
    let payload = json!({
        "FixedAmountRequest": {
            "recipient": recipient.to_string()
        }
    });

    let response = client
        .post(&url)
        .json(&payload)
        .send()
        .map_err(|e| PtbError::network_error(format!("Faucet request failed: {}", e)))?;

    let status = response.status();
    if status.as_u16() == 429 {
        return Err(PtbError::new(
            ErrorCode::NetworkError,
            "Faucet rate limit reached, try again later",
        ));
    }
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(PtbError::network_error(format!("Faucet returned HTTP {}", status)).with_details(body));
    }

    let body: FaucetResponse = response
        .json()
        .map_err(|e| PtbError::parse_error(format!("Invalid faucet response: {}", e)))?;

    if let Some(error) = &body.error {
        return Err(PtbError::network_error(format!("Faucet error: {}", error)));
    }

    log_info!(
        "faucet",
        "Gas received",
        recipient = recipient,
        coins = body.transferred_gas_objects.len(),
        amount = body.total_amount(),
    );
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faucet_response_parses() {
        let response: FaucetResponse = serde_json::from_value(json!({
            "transferredGasObjects": [
                {"amount": 1000000000, "id": "0xabc", "transferTxDigest": "Aa1"},
                {"amount": 1000000000, "id": "0xdef", "transferTxDigest": "Aa1"}
            ],
            "error": null
        }))
        .unwrap();
        assert_eq!(response.total_amount(), 2_000_000_000);
        assert!(response.error.is_none());
    }

    #[test]
    fn test_request_honours_timeout() {
        // accepts connections into the backlog but never answers
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let started = std::time::Instant::now();
        let err = request_faucet_gas(&url, &SuiAddress::ZERO, Duration::from_millis(300)).unwrap_err();
        assert_eq!(err.code, ErrorCode::NetworkError);
        assert!(started.elapsed() < Duration::from_secs(10));
        drop(listener);
    }
}
