//! Sui JSON-RPC Module
//!
//! The handful of fullnode methods the transaction flows need:
//! - `suix_getCoins` (paginated)
//! - `suix_getReferenceGasPrice`
//! - `sui_dryRunTransactionBlock`
//! - `sui_executeTransactionBlock`
//!
//! plus faucet gas requests for test networks.

mod client;
mod faucet;
pub mod types;

pub use client::*;
pub use faucet::*;
pub use types::*;

use crate::error::PtbResult;
use crate::tx::MAX_GAS_PAYMENT_OBJECTS;
use crate::types::SuiAddress;

/// Page size used when walking every coin of an owner
const COIN_PAGE_LIMIT: usize = 50;

/// Fullnode operations used by the transaction flows
pub trait SuiRpc {
    /// One page of coins owned by `owner`; `coin_type` defaults to SUI
    fn get_coins(
        &self,
        owner: &SuiAddress,
        coin_type: Option<&str>,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> PtbResult<CoinPage>;

    /// Reference gas price of the current epoch, in MIST
    fn get_reference_gas_price(&self) -> PtbResult<u64>;

    /// Execute without committing, returning effects and gas usage
    fn dry_run_transaction_block(&self, tx_bytes: &[u8]) -> PtbResult<DryRunResponse>;

    /// Submit signed transaction bytes
    ///
    /// `signatures` are serialized signature blobs, one per required signer.
    fn execute_transaction_block(
        &self,
        tx_bytes: &[u8],
        signatures: &[Vec<u8>],
        options: &ExecuteOptions,
        request_type: Option<RequestType>,
    ) -> PtbResult<ExecutionResponse>;

    /// Follow `nextCursor` until every coin is collected, stopping at the
    /// gas payment limit
    fn get_all_coins(&self, owner: &SuiAddress, coin_type: Option<&str>) -> PtbResult<Vec<Coin>> {
        let mut coins = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.get_coins(owner, coin_type, cursor.as_deref(), Some(COIN_PAGE_LIMIT))?;
            coins.extend(page.data);

            if !page.has_next_page || page.next_cursor.is_none() || coins.len() >= MAX_GAS_PAYMENT_OBJECTS {
                break;
            }
            cursor = page.next_cursor;
        }

        coins.truncate(MAX_GAS_PAYMENT_OBJECTS);
        Ok(coins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PtbError;
    use crate::types::ObjectDigest;
    use std::cell::RefCell;

    /// Serves `pages` pages of `per_page` coins, cursor = index of next page
    struct PagedRpc {
        pages: usize,
        per_page: usize,
        cursors_seen: RefCell<Vec<Option<String>>>,
    }

    impl PagedRpc {
        fn new(pages: usize, per_page: usize) -> Self {
            Self {
                pages,
                per_page,
                cursors_seen: RefCell::new(Vec::new()),
            }
        }

        fn coin(index: usize) -> Coin {
            let mut id = [0u8; 32];
            id[24..].copy_from_slice(&(index as u64).to_be_bytes());
            Coin {
                coin_type: "0x2::sui::SUI".to_string(),
                coin_object_id: SuiAddress::new(id),
                version: 1,
                digest: ObjectDigest::new([1; 32]),
                balance: 1_000,
                previous_transaction: None,
            }
        }
    }

    impl SuiRpc for PagedRpc {
        fn get_coins(
            &self,
            _owner: &SuiAddress,
            _coin_type: Option<&str>,
            cursor: Option<&str>,
            limit: Option<usize>,
        ) -> PtbResult<CoinPage> {
            self.cursors_seen.borrow_mut().push(cursor.map(str::to_string));
            assert_eq!(limit, Some(COIN_PAGE_LIMIT));

            let page = match cursor {
                None => 0,
                Some(c) => c.parse::<usize>().map_err(|_| PtbError::invalid_input("bad cursor"))?,
            };
            let start = page * self.per_page;
            let data = (start..start + self.per_page).map(Self::coin).collect();
            let has_next_page = page + 1 < self.pages;
            Ok(CoinPage {
                data,
                next_cursor: has_next_page.then(|| (page + 1).to_string()),
                has_next_page,
            })
        }

        fn get_reference_gas_price(&self) -> PtbResult<u64> {
            Err(PtbError::internal("unused"))
        }

        fn dry_run_transaction_block(&self, _tx_bytes: &[u8]) -> PtbResult<DryRunResponse> {
            Err(PtbError::internal("unused"))
        }

        fn execute_transaction_block(
            &self,
            _tx_bytes: &[u8],
            _signatures: &[Vec<u8>],
            _options: &ExecuteOptions,
            _request_type: Option<RequestType>,
        ) -> PtbResult<ExecutionResponse> {
            Err(PtbError::internal("unused"))
        }
    }

    #[test]
    fn test_get_all_coins_follows_cursor_until_last_page() {
        let rpc = PagedRpc::new(3, 50);
        let coins = rpc.get_all_coins(&SuiAddress::ZERO, None).unwrap();

        assert_eq!(coins.len(), 150);
        assert_eq!(coins[149].coin_object_id, PagedRpc::coin(149).coin_object_id);
        assert_eq!(
            *rpc.cursors_seen.borrow(),
            vec![None, Some("1".to_string()), Some("2".to_string())]
        );
    }

    #[test]
    fn test_get_all_coins_caps_at_gas_payment_limit() {
        let rpc = PagedRpc::new(10, 50);
        let coins = rpc.get_all_coins(&SuiAddress::ZERO, None).unwrap();

        assert_eq!(coins.len(), MAX_GAS_PAYMENT_OBJECTS);
        // 6 pages reach 300 coins, past the limit
        assert_eq!(rpc.cursors_seen.borrow().len(), 6);
        assert_eq!(coins.last().unwrap().coin_object_id, PagedRpc::coin(255).coin_object_id);
    }

    #[test]
    fn test_get_all_coins_single_page() {
        let rpc = PagedRpc::new(1, 3);
        let coins = rpc.get_all_coins(&SuiAddress::ZERO, None).unwrap();
        assert_eq!(coins.len(), 3);
        assert_eq!(rpc.cursors_seen.borrow().len(), 1);
    }
}
