//! Blocking JSON-RPC 2.0 client over reqwest

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::types::*;
use super::SuiRpc;
use crate::error::{ErrorCode, PtbError, PtbResult};
use crate::types::{SuiAddress, SUI_COIN_TYPE};
use crate::{log_debug, log_warn};

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Fullnode client
pub struct JsonRpcClient {
    url: String,
    client: Client,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>) -> PtbResult<Self> {
        Self::with_timeout(url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> PtbResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sui-ptb/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PtbError::network_error(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one JSON-RPC call and decode its `result`
    pub fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> PtbResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        log_debug!("rpc", "Sending request", method = method, id = id);

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .map_err(|e| {
                let code = if e.is_timeout() { ErrorCode::Timeout } else { ErrorCode::NetworkError };
                PtbError::new(code, format!("{} request failed: {}", method, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            log_warn!("rpc", "HTTP error", method = method, status = status.as_u16());
            return Err(PtbError::network_error(format!("{} returned HTTP {}", method, status))
                .with_details(body));
        }

        let body: RpcResponse<T> = response
            .json()
            .map_err(|e| PtbError::parse_error(format!("Invalid {} response: {}", method, e)))?;

        if let Some(err) = body.error {
            log_warn!("rpc", "RPC error", method = method, code = err.code);
            return Err(rpc_error(method, err));
        }

        body.result
            .ok_or_else(|| PtbError::parse_error(format!("{} response has no result", method)))
    }
}

/// Map a JSON-RPC error object onto the crate error codes
fn rpc_error(method: &str, err: RpcErrorObject) -> PtbError {
    let code = match method {
        "sui_executeTransactionBlock" => ErrorCode::TransactionRejected,
        "sui_dryRunTransactionBlock" => ErrorCode::InvalidTransaction,
        _ => ErrorCode::NetworkError,
    };
    let error = PtbError::new(code, format!("{} failed ({}): {}", method, err.code, err.message));
    match err.data {
        Some(data) => error.with_details(data.to_string()),
        None => error,
    }
}

impl SuiRpc for JsonRpcClient {
    fn get_coins(
        &self,
        owner: &SuiAddress,
        coin_type: Option<&str>,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> PtbResult<CoinPage> {
        let coin_type = coin_type.unwrap_or(SUI_COIN_TYPE);
        self.call("suix_getCoins", json!([owner.to_string(), coin_type, cursor, limit]))
    }

    fn get_reference_gas_price(&self) -> PtbResult<u64> {
        // returned as a decimal string
        let value: Value = self.call("suix_getReferenceGasPrice", json!([]))?;
        match &value {
            Value::String(s) => s
                .parse()
                .map_err(|_| PtbError::parse_error(format!("Invalid gas price: {}", s))),
            Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| PtbError::parse_error(format!("Invalid gas price: {}", n))),
            other => Err(PtbError::parse_error(format!("Invalid gas price: {}", other))),
        }
    }

    fn dry_run_transaction_block(&self, tx_bytes: &[u8]) -> PtbResult<DryRunResponse> {
        self.call("sui_dryRunTransactionBlock", json!([STANDARD.encode(tx_bytes)]))
    }

    fn execute_transaction_block(
        &self,
        tx_bytes: &[u8],
        signatures: &[Vec<u8>],
        options: &ExecuteOptions,
        request_type: Option<RequestType>,
    ) -> PtbResult<ExecutionResponse> {
        if signatures.is_empty() {
            return Err(PtbError::invalid_input("At least one signature is required"));
        }

        let signatures: Vec<String> = signatures.iter().map(|s| STANDARD.encode(s)).collect();
        let params = json!([
            STANDARD.encode(tx_bytes),
            signatures,
            options,
            request_type.map(|r| r.as_str()),
        ]);

        let response: ExecutionResponse = self
            .call("sui_executeTransactionBlock", params)
            .map_err(|e| match e.code {
                ErrorCode::NetworkError | ErrorCode::Timeout => PtbError {
                    code: ErrorCode::BroadcastFailed,
                    ..e
                },
                _ => e,
            })?;

        if !response.errors.is_empty() {
            return Err(PtbError::transaction_rejected(response.errors.join("; ")));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_object_mapping() {
        let err = rpc_error(
            "sui_executeTransactionBlock",
            RpcErrorObject {
                code: -32002,
                message: "Invalid user signature".to_string(),
                data: None,
            },
        );
        assert_eq!(err.code, ErrorCode::TransactionRejected);
        assert!(err.message.contains("-32002"));

        let err = rpc_error(
            "suix_getCoins",
            RpcErrorObject {
                code: -32602,
                message: "Invalid params".to_string(),
                data: Some(json!({"field": "owner"})),
            },
        );
        assert_eq!(err.code, ErrorCode::NetworkError);
        assert!(err.details.unwrap().contains("owner"));
    }

    #[test]
    fn test_response_envelope_decodes() {
        let ok: RpcResponse<String> =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": 1, "result": "750"})).unwrap();
        assert_eq!(ok.result.as_deref(), Some("750"));
        assert!(ok.error.is_none());

        let failed: RpcResponse<String> = serde_json::from_value(
            json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32000, "message": "boom"}}),
        )
        .unwrap();
        assert!(failed.result.is_none());
        assert_eq!(failed.error.unwrap().message, "boom");
    }

    #[test]
    fn test_execute_requires_signature() {
        let client = JsonRpcClient::new("http://127.0.0.1:9000").unwrap();
        let err = client
            .execute_transaction_block(&[0], &[], &ExecuteOptions::default(), None)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }
}
