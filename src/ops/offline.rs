//! Offline transaction construction
//!
//! Gas data is fixed up front so the bytes can be built and signed without
//! talking to a fullnode; only the coin references and the final submission
//! need the network.

use serde::Serialize;

use super::transfer::build_pay_sui;
use crate::context::ClientContext;
use crate::crypto::assemble_signature;
use crate::error::PtbResult;
use crate::rpc::{ExecuteOptions, ExecutionResponse, RequestType, SuiRpc};
use crate::tx::{transaction_digest, TransactionDigest};
use crate::types::{ObjectRef, SuiAddress};
use crate::{log_info, log_warn};

/// Gas budget for offline transfers, in MIST
pub const OFFLINE_GAS_BUDGET: u64 = 100_000_000;

/// Gas price for offline transfers, in MIST per unit
pub const OFFLINE_GAS_PRICE: u64 = 1000;

/// Transfer bytes with all gas data supplied by the caller
///
/// `coin_refs` pay for gas and fund the transfer; the sender owns the gas.
pub fn build_offline_transfer(
    coin_refs: Vec<ObjectRef>,
    amount: u64,
    recipient: SuiAddress,
    sender: SuiAddress,
) -> PtbResult<Vec<u8>> {
    let mut tx = build_pay_sui(recipient, amount);
    tx.set_gas_payment(coin_refs)
        .set_gas_budget(OFFLINE_GAS_BUDGET)
        .set_gas_owner(sender)
        .set_gas_price(OFFLINE_GAS_PRICE)
        .set_sender(sender);
    tx.build()
}

/// Submit pre-signed bytes, waiting for local execution
pub fn execute(rpc: &dyn SuiRpc, tx_bytes: &[u8], signature: Vec<u8>) -> PtbResult<ExecutionResponse> {
    let options = ExecuteOptions {
        show_balance_changes: true,
        show_object_changes: true,
        ..ExecuteOptions::default()
    };
    rpc.execute_transaction_block(
        tx_bytes,
        &[signature],
        &options,
        Some(RequestType::WaitForLocalExecution),
    )
}

/// Outcome of an offline transfer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineTransferReport {
    /// Digest computed before submission
    pub local_digest: TransactionDigest,
    pub response: ExecutionResponse,
    pub digest_matches: bool,
}

/// Fetch coin references, build and sign locally, submit, and check that
/// the network reports the digest computed up front
pub fn offline_transfer(
    ctx: &ClientContext,
    rpc: &dyn SuiRpc,
    recipient: SuiAddress,
    amount: u64,
) -> PtbResult<OfflineTransferReport> {
    let sender = ctx.user_address();
    let coin_refs: Vec<ObjectRef> = rpc
        .get_all_coins(&sender, None)?
        .iter()
        .map(|coin| coin.object_ref())
        .collect();

    let tx_bytes = build_offline_transfer(coin_refs, amount, recipient, sender)?;
    let user = ctx.user();
    let signature = assemble_signature(&tx_bytes, user, user.scheme().flag())?;

    let local_digest = transaction_digest(&tx_bytes);
    log_info!("offline", "Transaction digest computed", tx_hash = local_digest);

    let response = execute(rpc, &tx_bytes, signature)?;
    let digest_matches = response.digest == local_digest;
    if digest_matches {
        log_info!("offline", "Returned digest matches", tx_hash = response.digest);
    } else {
        log_warn!(
            "offline",
            "Returned digest differs",
            local_hash = local_digest,
            remote_hash = response.digest,
        );
    }

    Ok(OfflineTransferReport {
        local_digest,
        response,
        digest_matches,
    })
}
