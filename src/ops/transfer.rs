//! SUI transfers paid from the gas coin

use super::sign_and_execute;
use crate::context::ClientContext;
use crate::error::{PtbError, PtbResult};
use crate::log_info;
use crate::rpc::{ExecuteOptions, ExecutionResponse, RequestType, SuiRpc};
use crate::tx::TransactionBuilder;
use crate::types::SuiAddress;

/// Options for the multi-coin transfer flows: everything but object changes
fn transfer_options() -> ExecuteOptions {
    ExecuteOptions {
        show_object_changes: false,
        ..ExecuteOptions::full()
    }
}

/// Split `amount` MIST off the gas coin and send it to `recipient`
pub fn build_pay_sui(recipient: SuiAddress, amount: u64) -> TransactionBuilder {
    let mut tx = TransactionBuilder::new();
    let amount = tx.pure_u64(amount);
    let coins = tx.split_coins(tx.gas(), vec![amount]);
    let recipient = tx.pure_address(recipient);
    tx.transfer_objects(coins, recipient);
    tx
}

/// Send the gas coin itself, i.e. the whole balance minus fees
pub fn build_pay_all_sui(recipient: SuiAddress) -> TransactionBuilder {
    let mut tx = TransactionBuilder::new();
    let recipient = tx.pure_address(recipient);
    tx.transfer_objects(vec![tx.gas()], recipient);
    tx
}

/// One split producing a coin per amount, then one transfer per recipient
pub fn build_pay_multiple_sui(recipients: &[SuiAddress], amounts: &[u64]) -> PtbResult<TransactionBuilder> {
    if recipients.is_empty() {
        return Err(PtbError::invalid_input("At least one recipient is required"));
    }
    if recipients.len() != amounts.len() {
        return Err(PtbError::invalid_input(format!(
            "Got {} recipients but {} amounts",
            recipients.len(),
            amounts.len()
        )));
    }
    let mut tx = TransactionBuilder::new();
    let amount_args = amounts.iter().map(|&a| tx.pure_u64(a)).collect();
    let coins = tx.split_coins(tx.gas(), amount_args);
    for (coin, recipient) in coins.into_iter().zip(recipients) {
        let recipient = tx.pure_address(*recipient);
        tx.transfer_objects(vec![coin], recipient);
    }
    Ok(tx)
}

pub fn pay_sui(
    ctx: &ClientContext,
    rpc: &dyn SuiRpc,
    recipient: SuiAddress,
    amount: u64,
) -> PtbResult<ExecutionResponse> {
    log_info!("transfer", "Paying SUI", recipient = recipient, amount = amount);
    let tx = build_pay_sui(recipient, amount);
    sign_and_execute(
        ctx,
        rpc,
        tx,
        &ExecuteOptions::full(),
        Some(RequestType::WaitForLocalExecution),
    )
}

pub fn pay_all_sui(ctx: &ClientContext, rpc: &dyn SuiRpc, recipient: SuiAddress) -> PtbResult<ExecutionResponse> {
    log_info!("transfer", "Paying entire SUI balance", recipient = recipient);
    sign_and_execute(
        ctx,
        rpc,
        build_pay_all_sui(recipient),
        &transfer_options(),
        Some(RequestType::WaitForLocalExecution),
    )
}

pub fn pay_multiple_sui(
    ctx: &ClientContext,
    rpc: &dyn SuiRpc,
    recipients: &[SuiAddress],
    amounts: &[u64],
) -> PtbResult<ExecutionResponse> {
    let tx = build_pay_multiple_sui(recipients, amounts)?;
    log_info!(
        "transfer",
        "Paying SUI to multiple recipients",
        count = recipients.len(),
        total = amounts.iter().sum::<u64>(),
    );
    sign_and_execute(
        ctx,
        rpc,
        tx,
        &transfer_options(),
        Some(RequestType::WaitForLocalExecution),
    )
}
