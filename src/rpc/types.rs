//! JSON-RPC request options and response models

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PtbResult;
use crate::tx::TransactionDigest;
use crate::types::{ObjectDigest, ObjectId, ObjectRef, SuiAddress};

// =============================================================================
// Coins
// =============================================================================

/// A coin object as returned by `suix_getCoins`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    pub coin_type: String,
    pub coin_object_id: ObjectId,
    #[serde(with = "crate::serde_bytes::u64_string")]
    pub version: u64,
    pub digest: ObjectDigest,
    #[serde(with = "crate::serde_bytes::u64_string")]
    pub balance: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_transaction: Option<String>,
}

impl Coin {
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef::new(self.coin_object_id, self.version, self.digest)
    }
}

/// One page of coins
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinPage {
    pub data: Vec<Coin>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
}

// =============================================================================
// Execution
// =============================================================================

/// Which parts of the executed transaction the node should return
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteOptions {
    pub show_input: bool,
    pub show_raw_input: bool,
    pub show_effects: bool,
    pub show_events: bool,
    pub show_object_changes: bool,
    pub show_balance_changes: bool,
}

impl ExecuteOptions {
    /// Everything except the raw input bytes
    pub fn full() -> Self {
        Self {
            show_input: true,
            show_raw_input: false,
            show_effects: true,
            show_events: true,
            show_object_changes: true,
            show_balance_changes: true,
        }
    }

    pub fn balance_changes_only() -> Self {
        Self {
            show_balance_changes: true,
            ..Self::default()
        }
    }
}

/// How long the node waits before answering an execute request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    /// Return once the effects certificate exists
    WaitForEffectsCert,
    /// Also wait until the node has executed the transaction locally
    WaitForLocalExecution,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::WaitForEffectsCert => "WaitForEffectsCert",
            RequestType::WaitForLocalExecution => "WaitForLocalExecution",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceChange {
    pub owner: Value,
    pub coin_type: String,
    #[serde(with = "crate::serde_bytes::i128_string")]
    pub amount: i128,
}

/// Response of `sui_executeTransactionBlock`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResponse {
    pub digest: TransactionDigest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_transaction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_changes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_changes: Option<Vec<BalanceChange>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_local_execution: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ExecutionResponse {
    /// Status reported in the effects, when effects were requested
    pub fn status(&self) -> Option<ExecutionStatus> {
        self.effects
            .as_ref()
            .and_then(|e| e.get("status"))
            .and_then(|s| serde_json::from_value(s.clone()).ok())
    }

    /// Net balance change of `owner` in `coin_type`
    pub fn balance_change_for(&self, owner: &SuiAddress, coin_type: &str) -> Option<i128> {
        let owner = owner.to_string();
        self.balance_changes.as_ref().map(|changes| {
            changes
                .iter()
                .filter(|c| c.coin_type == coin_type && owner_address(&c.owner) == Some(owner.as_str()))
                .map(|c| c.amount)
                .sum()
        })
    }
}

/// `{"AddressOwner": "0x.."}` -> `"0x.."`
fn owner_address(owner: &Value) -> Option<&str> {
    owner.get("AddressOwner").and_then(Value::as_str)
}

// =============================================================================
// Dry run
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionStatus {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasCostSummary {
    #[serde(with = "crate::serde_bytes::u64_string")]
    pub computation_cost: u64,
    #[serde(with = "crate::serde_bytes::u64_string")]
    pub storage_cost: u64,
    #[serde(with = "crate::serde_bytes::u64_string")]
    pub storage_rebate: u64,
    #[serde(default, with = "crate::serde_bytes::u64_string")]
    pub non_refundable_storage_fee: u64,
}

impl GasCostSummary {
    /// Computation plus storage, net of rebate, never below computation
    pub fn net_gas_usage(&self) -> u64 {
        let storage = self.storage_cost.saturating_sub(self.storage_rebate);
        self.computation_cost.saturating_add(storage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DryRunEffects {
    pub status: ExecutionStatus,
    pub gas_used: GasCostSummary,
}

/// Response of `sui_dryRunTransactionBlock`; only the fields gas
/// estimation reads are typed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DryRunResponse {
    pub effects: DryRunEffects,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_changes: Option<Vec<BalanceChange>>,
}

impl DryRunResponse {
    pub fn from_value(value: Value) -> PtbResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}
