//! Programmable Transaction Builder
//!
//! Collects inputs and commands, then serializes either the full
//! `TransactionData` (sender and gas included) or only the
//! `TransactionKind` for a sponsor to complete.

use super::bcs::{BcsDecode, BcsEncode};
use super::types::*;
use crate::error::{PtbError, PtbResult};
use crate::types::{ObjectId, ObjectRef, SuiAddress};

/// Protocol limit on commands per programmable transaction
pub const MAX_PROGRAMMABLE_TX_COMMANDS: usize = 1024;

/// Protocol limit on transaction inputs
pub const MAX_INPUT_OBJECTS: usize = 2048;

/// Protocol limit on coins used to pay for gas
pub const MAX_GAS_PAYMENT_OBJECTS: usize = 256;

/// Builder for programmable transaction blocks
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    inputs: Vec<CallArg>,
    commands: Vec<Command>,
    sender: Option<SuiAddress>,
    gas_owner: Option<SuiAddress>,
    gas_payment: Option<Vec<ObjectRef>>,
    gas_price: Option<u64>,
    gas_budget: Option<u64>,
    expiration: TransactionExpiration,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from kind bytes produced by another party's `build_kind`
    pub fn from_kind(kind_bytes: &[u8]) -> PtbResult<Self> {
        let TransactionKind::ProgrammableTransaction(pt) = TransactionKind::from_bcs(kind_bytes)?;
        Ok(Self {
            inputs: pt.inputs,
            commands: pt.commands,
            ..Self::default()
        })
    }

    /// Start from complete transaction bytes, keeping sender and gas data
    pub fn from_transaction_bytes(tx_bytes: &[u8]) -> PtbResult<Self> {
        let data = TransactionData::from_bcs(tx_bytes)?;
        let TransactionKind::ProgrammableTransaction(pt) = data.kind;
        Ok(Self {
            inputs: pt.inputs,
            commands: pt.commands,
            sender: Some(data.sender),
            gas_owner: Some(data.gas_data.owner),
            gas_payment: Some(data.gas_data.payment),
            gas_price: Some(data.gas_data.price),
            gas_budget: Some(data.gas_data.budget),
            expiration: data.expiration,
        })
    }

    // -------------------------------------------------------------------------
    // Inputs
    // -------------------------------------------------------------------------

    /// The gas coin
    pub fn gas(&self) -> Argument {
        Argument::GasCoin
    }

    fn push_input(&mut self, arg: CallArg) -> Argument {
        self.inputs.push(arg);
        Argument::Input((self.inputs.len() - 1) as u16)
    }

    /// Pure input from already BCS-encoded bytes
    pub fn pure_bytes(&mut self, bcs_bytes: Vec<u8>) -> Argument {
        self.push_input(CallArg::Pure(bcs_bytes))
    }

    pub fn pure_u64(&mut self, value: u64) -> Argument {
        self.pure_bytes(value.to_le_bytes().to_vec())
    }

    pub fn pure_bool(&mut self, value: bool) -> Argument {
        self.pure_bytes(vec![value as u8])
    }

    pub fn pure_address(&mut self, address: SuiAddress) -> Argument {
        self.pure_bytes(address.to_bcs())
    }

    pub fn pure_string(&mut self, value: &str) -> Argument {
        let mut w = super::bcs::BcsWriter::new();
        w.write_str(value);
        self.pure_bytes(w.into_bytes())
    }

    /// Owned or immutable object input; repeated objects share one input
    pub fn object(&mut self, object_ref: ObjectRef) -> Argument {
        self.object_arg(ObjectArg::ImmOrOwnedObject(object_ref))
    }

    pub fn shared_object(
        &mut self,
        id: ObjectId,
        initial_shared_version: u64,
        mutable: bool,
    ) -> Argument {
        self.object_arg(ObjectArg::SharedObject {
            id,
            initial_shared_version,
            mutable,
        })
    }

    fn object_arg(&mut self, arg: ObjectArg) -> Argument {
        let id = arg.id();
        let existing = self.inputs.iter().position(|input| match input {
            CallArg::Object(obj) => obj.id() == id,
            CallArg::Pure(_) => false,
        });

        match existing {
            Some(index) => {
                // a shared object used mutably anywhere is mutable everywhere
                if let (
                    CallArg::Object(ObjectArg::SharedObject { mutable, .. }),
                    ObjectArg::SharedObject { mutable: true, .. },
                ) = (&mut self.inputs[index], &arg)
                {
                    *mutable = true;
                }
                Argument::Input(index as u16)
            }
            None => self.push_input(CallArg::Object(arg)),
        }
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    fn push_command(&mut self, command: Command) -> u16 {
        self.commands.push(command);
        (self.commands.len() - 1) as u16
    }

    /// Split `amounts` off `coin`; one result per amount
    pub fn split_coins(&mut self, coin: Argument, amounts: Vec<Argument>) -> Vec<Argument> {
        let count = amounts.len();
        let index = self.push_command(Command::SplitCoins(coin, amounts));
        (0..count)
            .map(|i| Argument::NestedResult(index, i as u16))
            .collect()
    }

    pub fn merge_coins(&mut self, destination: Argument, sources: Vec<Argument>) {
        self.push_command(Command::MergeCoins(destination, sources));
    }

    pub fn transfer_objects(&mut self, objects: Vec<Argument>, recipient: Argument) {
        self.push_command(Command::TransferObjects(objects, recipient));
    }

    pub fn move_call(
        &mut self,
        package: ObjectId,
        module: &str,
        function: &str,
        type_arguments: Vec<TypeTag>,
        arguments: Vec<Argument>,
    ) -> Argument {
        let index = self.push_command(Command::MoveCall(Box::new(ProgrammableMoveCall {
            package,
            module: module.to_string(),
            function: function.to_string(),
            type_arguments,
            arguments,
        })));
        Argument::Result(index)
    }

    pub fn make_move_vec(&mut self, element_type: Option<TypeTag>, elements: Vec<Argument>) -> Argument {
        let index = self.push_command(Command::MakeMoveVec(element_type, elements));
        Argument::Result(index)
    }

    // -------------------------------------------------------------------------
    // Sender, gas and expiration
    // -------------------------------------------------------------------------

    pub fn set_sender(&mut self, sender: SuiAddress) -> &mut Self {
        self.sender = Some(sender);
        self
    }

    pub fn set_gas_owner(&mut self, owner: SuiAddress) -> &mut Self {
        self.gas_owner = Some(owner);
        self
    }

    pub fn set_gas_payment(&mut self, payment: Vec<ObjectRef>) -> &mut Self {
        self.gas_payment = Some(payment);
        self
    }

    pub fn set_gas_price(&mut self, price: u64) -> &mut Self {
        self.gas_price = Some(price);
        self
    }

    pub fn set_gas_budget(&mut self, budget: u64) -> &mut Self {
        self.gas_budget = Some(budget);
        self
    }

    pub fn set_expiration(&mut self, expiration: TransactionExpiration) -> &mut Self {
        self.expiration = expiration;
        self
    }

    pub fn sender(&self) -> Option<SuiAddress> {
        self.sender
    }

    /// Gas owner, falling back to the sender
    pub fn gas_owner(&self) -> Option<SuiAddress> {
        self.gas_owner.or(self.sender)
    }

    pub fn gas_payment(&self) -> Option<&[ObjectRef]> {
        self.gas_payment.as_deref()
    }

    pub fn gas_price(&self) -> Option<u64> {
        self.gas_price
    }

    pub fn gas_budget(&self) -> Option<u64> {
        self.gas_budget
    }

    pub fn inputs(&self) -> &[CallArg] {
        &self.inputs
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Object ids used as inputs; these may not double as gas coins
    pub fn input_object_ids(&self) -> Vec<ObjectId> {
        self.inputs
            .iter()
            .filter_map(|input| match input {
                CallArg::Object(obj) => Some(obj.id()),
                CallArg::Pure(_) => None,
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Build
    // -------------------------------------------------------------------------

    /// Check protocol limits and that every argument points somewhere real
    pub fn validate(&self) -> PtbResult<()> {
        if self.commands.is_empty() {
            return Err(PtbError::invalid_transaction("Transaction has no commands"));
        }
        if self.commands.len() > MAX_PROGRAMMABLE_TX_COMMANDS {
            return Err(PtbError::invalid_transaction(format!(
                "Too many commands: {} (max {})",
                self.commands.len(),
                MAX_PROGRAMMABLE_TX_COMMANDS
            )));
        }
        if self.inputs.len() > MAX_INPUT_OBJECTS {
            return Err(PtbError::invalid_transaction(format!(
                "Too many inputs: {} (max {})",
                self.inputs.len(),
                MAX_INPUT_OBJECTS
            )));
        }

        for (index, command) in self.commands.iter().enumerate() {
            for arg in command.arguments() {
                let valid = match arg {
                    Argument::GasCoin => true,
                    Argument::Input(i) => (i as usize) < self.inputs.len(),
                    Argument::Result(r) | Argument::NestedResult(r, _) => (r as usize) < index,
                };
                if !valid {
                    return Err(PtbError::invalid_transaction(format!(
                        "Command {} ({}) references unknown argument {:?}",
                        index,
                        command.name(),
                        arg
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn programmable_transaction(&self) -> ProgrammableTransaction {
        ProgrammableTransaction {
            inputs: self.inputs.clone(),
            commands: self.commands.clone(),
        }
    }

    /// BCS `TransactionKind` only: no sender, no gas
    pub fn build_kind(&self) -> PtbResult<Vec<u8>> {
        self.validate()?;
        Ok(TransactionKind::ProgrammableTransaction(self.programmable_transaction()).to_bcs())
    }

    /// Assemble `TransactionData`, requiring sender and complete gas data
    pub fn transaction_data(&self) -> PtbResult<TransactionData> {
        self.validate()?;

        let sender = self
            .sender
            .ok_or_else(|| PtbError::invalid_transaction("Missing transaction sender"))?;
        let payment = self
            .gas_payment
            .clone()
            .ok_or_else(|| PtbError::invalid_transaction("Missing gas payment"))?;
        let price = self
            .gas_price
            .ok_or_else(|| PtbError::invalid_transaction("Missing gas price"))?;
        let budget = self
            .gas_budget
            .ok_or_else(|| PtbError::invalid_transaction("Missing gas budget"))?;

        if payment.len() > MAX_GAS_PAYMENT_OBJECTS {
            return Err(PtbError::invalid_transaction(format!(
                "Too many gas payment objects: {} (max {})",
                payment.len(),
                MAX_GAS_PAYMENT_OBJECTS
            )));
        }

        let inputs = self.input_object_ids();
        if let Some(clash) = payment.iter().find(|r| inputs.contains(&r.object_id)) {
            return Err(PtbError::invalid_transaction(format!(
                "Gas coin {} is also a transaction input",
                clash.object_id
            )));
        }

        Ok(TransactionData {
            kind: TransactionKind::ProgrammableTransaction(self.programmable_transaction()),
            sender,
            gas_data: GasData {
                payment,
                owner: self.gas_owner.unwrap_or(sender),
                price,
                budget,
            },
            expiration: self.expiration,
        })
    }

    /// Serialized `TransactionData` ready for signing
    pub fn build(&self) -> PtbResult<Vec<u8>> {
        Ok(self.transaction_data()?.to_bcs())
    }
}
