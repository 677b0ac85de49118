//! Transaction flows
//!
//! Each flow builds a programmable transaction, fills in whatever gas data
//! the caller left open, signs with the context's key pairs and submits.
//! Everything runs sequentially against a `SuiRpc` implementation.

mod offline;
mod sponsored;
mod transfer;

pub use offline::*;
pub use sponsored::*;
pub use transfer::*;

use crate::context::ClientContext;
use crate::crypto::{assemble_signature, KeyPair};
use crate::error::{PtbError, PtbResult};
use crate::rpc::{ExecuteOptions, ExecutionResponse, RequestType, SuiRpc};
use crate::tx::{transaction_digest, TransactionBuilder};
use crate::types::{ObjectId, ObjectRef, SuiAddress};
use crate::{log_debug, log_info};

/// Budget used for the estimation dry run
pub const DRY_RUN_GAS_BUDGET: u64 = 50_000_000_000;

/// Gas units added on top of the dry-run cost, multiplied by the gas price
pub const GAS_SAFE_OVERHEAD: u64 = 1000;

// =============================================================================
// Gas resolution
// =============================================================================

/// Configured gas price, or the network's reference price
pub fn resolve_gas_price(ctx: &ClientContext, rpc: &dyn SuiRpc) -> PtbResult<u64> {
    match ctx.gas.price {
        Some(price) => Ok(price),
        None => {
            let price = rpc.get_reference_gas_price()?;
            log_debug!("ops", "Reference gas price", price = price);
            Ok(price)
        }
    }
}

/// Every SUI coin of `owner` that is not already a transaction input
pub fn select_gas_coins(
    rpc: &dyn SuiRpc,
    owner: &SuiAddress,
    exclude: &[ObjectId],
) -> PtbResult<Vec<ObjectRef>> {
    let coins: Vec<ObjectRef> = rpc
        .get_all_coins(owner, None)?
        .into_iter()
        .filter(|coin| !exclude.contains(&coin.coin_object_id))
        .map(|coin| coin.object_ref())
        .collect();

    if coins.is_empty() {
        return Err(PtbError::insufficient_funds(format!(
            "No SUI coins available for gas at {}",
            owner
        )));
    }
    Ok(coins)
}

/// Dry-run the transaction and derive a budget from the gas it used
///
/// `budget = computation + overhead + storage - rebate`, never less than
/// `computation + overhead`, where `overhead = GAS_SAFE_OVERHEAD * price`.
pub fn estimate_gas_budget(rpc: &dyn SuiRpc, builder: &TransactionBuilder, price: u64) -> PtbResult<u64> {
    let mut probe = builder.clone();
    probe
        .set_gas_price(price)
        .set_gas_budget(DRY_RUN_GAS_BUDGET)
        .set_gas_payment(Vec::new());

    let dry_run = rpc.dry_run_transaction_block(&probe.build()?)?;
    let status = &dry_run.effects.status;
    if !status.is_success() {
        return Err(PtbError::invalid_transaction(format!(
            "Dry run failed: {}",
            status.error.as_deref().unwrap_or(&status.status)
        )));
    }

    let gas = dry_run.effects.gas_used;
    let overhead = GAS_SAFE_OVERHEAD.saturating_mul(price);
    let budget = gas.net_gas_usage().saturating_add(overhead);

    log_debug!(
        "ops",
        "Estimated gas budget",
        computation = gas.computation_cost,
        storage = gas.storage_cost,
        rebate = gas.storage_rebate,
        budget = budget,
    );
    Ok(budget)
}

/// Fill price, payment and budget where the builder leaves them unset
///
/// Gas coins come from the builder's gas owner (the sender unless a sponsor
/// was set) and never include objects the transaction already uses.
pub fn resolve_gas(ctx: &ClientContext, rpc: &dyn SuiRpc, builder: &mut TransactionBuilder) -> PtbResult<()> {
    let owner = builder
        .gas_owner()
        .ok_or_else(|| PtbError::invalid_transaction("Sender must be set before gas"))?;

    let price = match builder.gas_price() {
        Some(price) => price,
        None => resolve_gas_price(ctx, rpc)?,
    };
    builder.set_gas_price(price);

    if builder.gas_budget().is_none() {
        let budget = match ctx.gas.budget {
            Some(budget) => budget,
            None => estimate_gas_budget(rpc, builder, price)?,
        };
        builder.set_gas_budget(budget);
    }

    if builder.gas_payment().is_none() {
        let coins = select_gas_coins(rpc, &owner, &builder.input_object_ids())?;
        builder.set_gas_payment(coins);
    }
    Ok(())
}

// =============================================================================
// Signing and submission
// =============================================================================

/// Serialized signature blob of `key_pair` over `tx_bytes`
pub fn sign_bytes(tx_bytes: &[u8], key_pair: &dyn KeyPair) -> PtbResult<Vec<u8>> {
    assemble_signature(tx_bytes, key_pair, key_pair.scheme().flag())
}

/// Set the user as sender, complete gas data, sign and execute
pub fn sign_and_execute(
    ctx: &ClientContext,
    rpc: &dyn SuiRpc,
    mut builder: TransactionBuilder,
    options: &ExecuteOptions,
    request_type: Option<RequestType>,
) -> PtbResult<ExecutionResponse> {
    let sender = ctx.user_address();
    builder.set_sender(sender);
    resolve_gas(ctx, rpc, &mut builder)?;

    let tx_bytes = builder.build()?;
    let signature = sign_bytes(&tx_bytes, ctx.user())?;

    log_debug!(
        "ops",
        "Submitting transaction",
        sender = sender,
        tx_hash = transaction_digest(&tx_bytes),
        commands = builder.commands().len(),
    );

    let response = rpc.execute_transaction_block(&tx_bytes, &[signature], options, request_type)?;
    log_info!("ops", "Transaction executed", tx_hash = response.digest);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{GasConfig, Network, NetworkConfig};
    use crate::crypto::Ed25519KeyPair;
    use crate::rpc::{CoinPage, DryRunResponse};
    use std::cell::Cell;

    /// Answers only what gas resolution asks for
    struct GasOnlyRpc {
        dry_runs: Cell<usize>,
        status: &'static str,
    }

    impl SuiRpc for GasOnlyRpc {
        fn get_coins(
            &self,
            owner: &SuiAddress,
            _coin_type: Option<&str>,
            _cursor: Option<&str>,
            _limit: Option<usize>,
        ) -> PtbResult<CoinPage> {
            Ok(serde_json::from_value(serde_json::json!({
                "data": [{
                    "coinType": "0x2::sui::SUI",
                    "coinObjectId": owner.to_string(),
                    "version": "7",
                    "digest": "11111111111111111111111111111111",
                    "balance": "5000000000"
                }],
                "nextCursor": null,
                "hasNextPage": false
            }))?)
        }

        fn get_reference_gas_price(&self) -> PtbResult<u64> {
            Ok(750)
        }

        fn dry_run_transaction_block(&self, _tx_bytes: &[u8]) -> PtbResult<DryRunResponse> {
            self.dry_runs.set(self.dry_runs.get() + 1);
            DryRunResponse::from_value(serde_json::json!({
                "effects": {
                    "status": {"status": self.status, "error": "MoveAbort"},
                    "gasUsed": {
                        "computationCost": "1000000",
                        "storageCost": "1976000",
                        "storageRebate": "978120",
                        "nonRefundableStorageFee": "9880"
                    }
                }
            }))
        }

        fn execute_transaction_block(
            &self,
            _tx_bytes: &[u8],
            _signatures: &[Vec<u8>],
            _options: &ExecuteOptions,
            _request_type: Option<RequestType>,
        ) -> PtbResult<ExecutionResponse> {
            Err(PtbError::internal("not used"))
        }
    }

    fn context(gas: GasConfig) -> ClientContext {
        let network = NetworkConfig::new(Network::Localnet, None, None).unwrap();
        ClientContext::new(network, Box::new(Ed25519KeyPair::from_seed(&[3; 32]))).with_gas(gas)
    }

    fn transfer(ctx: &ClientContext) -> TransactionBuilder {
        let mut tx = TransactionBuilder::new();
        let amount = tx.pure_u64(10);
        let coins = tx.split_coins(tx.gas(), vec![amount]);
        let recipient = tx.pure_address(SuiAddress::from_string("0x99").unwrap());
        tx.transfer_objects(coins, recipient);
        tx.set_sender(ctx.user_address());
        tx
    }

    #[test]
    fn test_budget_from_dry_run() {
        let rpc = GasOnlyRpc { dry_runs: Cell::new(0), status: "success" };
        let ctx = context(GasConfig::default());
        let budget = estimate_gas_budget(&rpc, &transfer(&ctx), 750).unwrap();
        assert_eq!(budget, 1_000_000 + 750_000 + 1_976_000 - 978_120);
    }

    #[test]
    fn test_failed_dry_run_is_an_error() {
        let rpc = GasOnlyRpc { dry_runs: Cell::new(0), status: "failure" };
        let ctx = context(GasConfig::default());
        let err = estimate_gas_budget(&rpc, &transfer(&ctx), 1000).unwrap_err();
        assert!(err.message.contains("MoveAbort"));
    }

    #[test]
    fn test_configured_gas_skips_network() {
        let rpc = GasOnlyRpc { dry_runs: Cell::new(0), status: "success" };
        let ctx = context(GasConfig { budget: Some(20_000_000), price: Some(1000) });
        let mut tx = transfer(&ctx);
        resolve_gas(&ctx, &rpc, &mut tx).unwrap();

        assert_eq!(rpc.dry_runs.get(), 0);
        assert_eq!(tx.gas_price(), Some(1000));
        assert_eq!(tx.gas_budget(), Some(20_000_000));
        assert_eq!(tx.gas_payment().unwrap().len(), 1);
    }

    #[test]
    fn test_resolved_gas_uses_reference_price() {
        let rpc = GasOnlyRpc { dry_runs: Cell::new(0), status: "success" };
        let ctx = context(GasConfig::default());
        let mut tx = transfer(&ctx);
        resolve_gas(&ctx, &rpc, &mut tx).unwrap();

        assert_eq!(rpc.dry_runs.get(), 1);
        assert_eq!(tx.gas_price(), Some(750));
        tx.build().unwrap();
    }

    #[test]
    fn test_input_coins_excluded_from_gas() {
        let rpc = GasOnlyRpc { dry_runs: Cell::new(0), status: "success" };
        let owner = SuiAddress::from_string("0x5").unwrap();
        let err = select_gas_coins(&rpc, &owner, &[owner]).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InsufficientFunds);
    }
}
