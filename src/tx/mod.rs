//! Transaction Module
//!
//! Programmable transaction construction and serialization:
//! - `bcs`: canonical binary encoding
//! - `types`: the `TransactionData` model
//! - `builder`: PTB builder (inputs, commands, gas)
//! - `digest`: locally computed transaction digests

pub mod bcs;
mod builder;
mod digest;
pub mod types;

pub use builder::*;
pub use digest::*;
pub use types::*;
