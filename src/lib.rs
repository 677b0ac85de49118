//! Sui Programmable Transaction Toolkit
//!
//! Build, sign and submit Sui programmable transaction blocks.
//!
//! # Architecture
//!
//! - **crypto**: key pairs, intent signing and the signature blob layout
//! - **tx**: BCS transaction model, builder and digests
//! - **rpc**: blocking JSON-RPC client for the fullnode and faucet
//! - **context**: endpoints, keys and gas defaults for one session
//! - **ops**: transfer, sponsored and offline transaction flows
//!
//! # Example
//!
//! ```rust,ignore
//! use sui_ptb::{assemble_signature, Ed25519KeyPair, KeyPair};
//!
//! let key = Ed25519KeyPair::from_base64("16/DxkhBCdKkCBOEXsWonMeEM/g8E+IjFZx6EUMlCng=")?;
//! let blob = assemble_signature(&tx_bytes, &key, key.scheme().flag())?;
//! ```

pub mod context;
pub mod crypto;
pub mod error;
pub mod ops;
pub mod rpc;
pub mod serde_bytes;
pub mod tx;
pub mod types;
pub mod utils;

pub use context::{ClientContext, GasConfig, Network, NetworkConfig};
pub use crypto::{
    assemble_signature, sign_transaction, Ed25519KeyPair, KeyPair, SerializedSignature, SignatureScheme,
};
pub use error::{ErrorCode, PtbError, PtbResult};
pub use rpc::{JsonRpcClient, SuiRpc};
pub use tx::{transaction_digest, TransactionBuilder, TransactionDigest};
pub use types::*;
