//! Gas-sponsored transactions
//!
//! The user builds only the transaction kind (no sender, no gas) and hands
//! it to the sponsor. The sponsor sets itself as gas owner, pays with its
//! own coins and signs. The user then signs the same bytes and submits
//! both signatures.

use serde::{Deserialize, Serialize};

use super::{resolve_gas, sign_bytes};
use crate::context::ClientContext;
use crate::error::{PtbError, PtbResult};
use crate::rpc::{ExecuteOptions, ExecutionResponse, SuiRpc};
use crate::tx::TransactionBuilder;
use crate::types::{ObjectRef, SuiAddress};
use crate::{log_debug, log_info};

/// Transaction completed and signed by the sponsor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsoredTransaction {
    pub tx_bytes: Vec<u8>,
    pub sponsor_signature: Vec<u8>,
}

/// Kind bytes splitting `amount` off `coin` (not the gas coin) for `recipient`
pub fn build_sponsored_kind(coin: ObjectRef, recipient: SuiAddress, amount: u64) -> PtbResult<Vec<u8>> {
    let mut tx = TransactionBuilder::new();
    let coin = tx.object(coin);
    let amount = tx.pure_u64(amount);
    let split = tx.split_coins(coin, vec![amount]);
    let recipient = tx.pure_address(recipient);
    tx.transfer_objects(split, recipient);
    tx.build_kind()
}

/// Sponsor side: complete `kind_bytes` for `sender` with the sponsor's gas
pub fn sponsor_transaction(
    ctx: &ClientContext,
    rpc: &dyn SuiRpc,
    kind_bytes: &[u8],
    sender: SuiAddress,
) -> PtbResult<SponsoredTransaction> {
    let sponsor = ctx.sponsor()?;
    let sponsor_address = sponsor.address();

    let mut tx = TransactionBuilder::from_kind(kind_bytes)?;
    tx.set_sender(sender).set_gas_owner(sponsor_address);
    resolve_gas(ctx, rpc, &mut tx)?;

    let tx_bytes = tx.build()?;
    let sponsor_signature = sign_bytes(&tx_bytes, sponsor)?;

    log_debug!(
        "sponsor",
        "Sponsored transaction",
        sender = sender,
        gas_owner = sponsor_address,
        budget = tx.gas_budget().unwrap_or_default(),
    );
    Ok(SponsoredTransaction {
        tx_bytes,
        sponsor_signature,
    })
}

/// User side: send `amount` from the user's first coin, gas paid by the sponsor
pub fn sponsored_transaction(
    ctx: &ClientContext,
    rpc: &dyn SuiRpc,
    recipient: SuiAddress,
    amount: u64,
) -> PtbResult<ExecutionResponse> {
    let sender = ctx.user_address();
    let coins = rpc.get_coins(&sender, None, None, None)?;
    let coin = coins
        .data
        .first()
        .ok_or_else(|| PtbError::insufficient_funds(format!("No SUI coins owned by {}", sender)))?;

    log_info!(
        "sponsor",
        "Building sponsored transfer",
        sender = sender,
        recipient = recipient,
        amount = amount,
    );

    let kind_bytes = build_sponsored_kind(coin.object_ref(), recipient, amount)?;
    let sponsored = sponsor_transaction(ctx, rpc, &kind_bytes, sender)?;

    // the user signs exactly what the sponsor signed
    let user_signature = sign_bytes(&sponsored.tx_bytes, ctx.user())?;

    let response = rpc.execute_transaction_block(
        &sponsored.tx_bytes,
        &[user_signature, sponsored.sponsor_signature],
        &ExecuteOptions::balance_changes_only(),
        None,
    )?;
    log_info!("sponsor", "Sponsored transaction executed", tx_hash = response.digest);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::{Argument, CallArg, Command, ObjectArg};
    use crate::types::ObjectDigest;

    #[test]
    fn test_kind_splits_owned_coin() {
        let coin = ObjectRef::new(SuiAddress::from_string("0xc0").unwrap(), 4, ObjectDigest::new([9; 32]));
        let kind = build_sponsored_kind(coin, SuiAddress::from_string("0x9").unwrap(), 500).unwrap();
        let tx = TransactionBuilder::from_kind(&kind).unwrap();

        assert_eq!(tx.inputs()[0], CallArg::Object(ObjectArg::ImmOrOwnedObject(coin)));
        assert_eq!(
            tx.commands()[0],
            Command::SplitCoins(Argument::Input(0), vec![Argument::Input(1)])
        );
        assert!(tx.sender().is_none());
    }

    #[test]
    fn test_kind_allows_zero_amount() {
        let coin = ObjectRef::new(SuiAddress::from_string("0xc0").unwrap(), 4, ObjectDigest::new([9; 32]));
        let kind = build_sponsored_kind(coin, SuiAddress::from_string("0x9").unwrap(), 0).unwrap();
        let tx = TransactionBuilder::from_kind(&kind).unwrap();
        assert_eq!(tx.commands().len(), 2);
    }
}
