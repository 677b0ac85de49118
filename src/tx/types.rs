//! Programmable transaction data model
//!
//! Mirrors the on-chain `TransactionData` layout so that BCS bytes built
//! here are accepted by a fullnode as-is.

use std::fmt;
use std::str::FromStr;

use super::bcs::{BcsDecode, BcsEncode, BcsError, BcsReader, BcsWriter};
use crate::error::{PtbError, PtbResult};
use crate::types::{ObjectDigest, ObjectId, ObjectRef, SuiAddress};

/// Deepest `vector<...>` / struct parameter nesting accepted in a type tag
pub const MAX_TYPE_TAG_DEPTH: usize = 16;

// =============================================================================
// Primitive encodings
// =============================================================================

impl BcsEncode for SuiAddress {
    fn encode(&self, w: &mut BcsWriter) {
        w.write_fixed(&self.bytes);
    }
}

impl BcsDecode for SuiAddress {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, BcsError> {
        Ok(SuiAddress::new(r.read_fixed::<32>()?))
    }
}

impl BcsEncode for ObjectDigest {
    fn encode(&self, w: &mut BcsWriter) {
        // digests travel as vector<u8>, not a fixed array
        w.write_bytes(&self.0);
    }
}

impl BcsDecode for ObjectDigest {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, BcsError> {
        let bytes = r.read_bytes()?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| BcsError::InvalidLength {
                expected: 32,
                actual: v.len(),
            })?;
        Ok(ObjectDigest::new(arr))
    }
}

impl BcsEncode for ObjectRef {
    fn encode(&self, w: &mut BcsWriter) {
        self.object_id.encode(w);
        w.write_u64(self.version);
        self.digest.encode(w);
    }
}

impl BcsDecode for ObjectRef {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, BcsError> {
        Ok(ObjectRef {
            object_id: ObjectId::decode(r)?,
            version: r.read_u64()?,
            digest: ObjectDigest::decode(r)?,
        })
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// Object input of a programmable transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectArg {
    /// Owned or immutable object, referenced by exact version
    ImmOrOwnedObject(ObjectRef),
    /// Shared object; the version is assigned by consensus
    SharedObject {
        id: ObjectId,
        initial_shared_version: u64,
        mutable: bool,
    },
    /// Object sent to another object, received in this transaction
    Receiving(ObjectRef),
}

impl ObjectArg {
    pub fn id(&self) -> ObjectId {
        match self {
            Self::ImmOrOwnedObject(r) | Self::Receiving(r) => r.object_id,
            Self::SharedObject { id, .. } => *id,
        }
    }
}

impl BcsEncode for ObjectArg {
    fn encode(&self, w: &mut BcsWriter) {
        match self {
            Self::ImmOrOwnedObject(r) => {
                w.write_uleb128(0);
                r.encode(w);
            }
            Self::SharedObject {
                id,
                initial_shared_version,
                mutable,
            } => {
                w.write_uleb128(1);
                id.encode(w);
                w.write_u64(*initial_shared_version);
                w.write_bool(*mutable);
            }
            Self::Receiving(r) => {
                w.write_uleb128(2);
                r.encode(w);
            }
        }
    }
}

impl BcsDecode for ObjectArg {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, BcsError> {
        match r.read_uleb128()? {
            0 => Ok(Self::ImmOrOwnedObject(ObjectRef::decode(r)?)),
            1 => Ok(Self::SharedObject {
                id: ObjectId::decode(r)?,
                initial_shared_version: r.read_u64()?,
                mutable: r.read_bool()?,
            }),
            2 => Ok(Self::Receiving(ObjectRef::decode(r)?)),
            tag => Err(BcsError::UnknownVariant {
                type_name: "ObjectArg",
                tag,
            }),
        }
    }
}

/// Transaction input: BCS-encoded pure value or object
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    Pure(Vec<u8>),
    Object(ObjectArg),
}

impl BcsEncode for CallArg {
    fn encode(&self, w: &mut BcsWriter) {
        match self {
            Self::Pure(bytes) => {
                w.write_uleb128(0);
                w.write_bytes(bytes);
            }
            Self::Object(obj) => {
                w.write_uleb128(1);
                obj.encode(w);
            }
        }
    }
}

impl BcsDecode for CallArg {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, BcsError> {
        match r.read_uleb128()? {
            0 => Ok(Self::Pure(r.read_bytes()?)),
            1 => Ok(Self::Object(ObjectArg::decode(r)?)),
            tag => Err(BcsError::UnknownVariant {
                type_name: "CallArg",
                tag,
            }),
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Reference to a value inside a programmable transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Argument {
    /// The gas coin (after gas payment coins are merged)
    GasCoin,
    /// Transaction input by index
    Input(u16),
    /// Result of a previous command
    Result(u16),
    /// One element of a previous command's multi-value result
    NestedResult(u16, u16),
}

impl BcsEncode for Argument {
    fn encode(&self, w: &mut BcsWriter) {
        match self {
            Self::GasCoin => w.write_uleb128(0),
            Self::Input(i) => {
                w.write_uleb128(1);
                w.write_u16(*i);
            }
            Self::Result(i) => {
                w.write_uleb128(2);
                w.write_u16(*i);
            }
            Self::NestedResult(i, j) => {
                w.write_uleb128(3);
                w.write_u16(*i);
                w.write_u16(*j);
            }
        }
    }
}

impl BcsDecode for Argument {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, BcsError> {
        match r.read_uleb128()? {
            0 => Ok(Self::GasCoin),
            1 => Ok(Self::Input(r.read_u16()?)),
            2 => Ok(Self::Result(r.read_u16()?)),
            3 => Ok(Self::NestedResult(r.read_u16()?, r.read_u16()?)),
            tag => Err(BcsError::UnknownVariant {
                type_name: "Argument",
                tag,
            }),
        }
    }
}

/// Move function call inside a PTB
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgrammableMoveCall {
    pub package: ObjectId,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<Argument>,
}

impl BcsEncode for ProgrammableMoveCall {
    fn encode(&self, w: &mut BcsWriter) {
        self.package.encode(w);
        w.write_str(&self.module);
        w.write_str(&self.function);
        w.write_seq(&self.type_arguments);
        w.write_seq(&self.arguments);
    }
}

impl BcsDecode for ProgrammableMoveCall {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, BcsError> {
        Ok(Self {
            package: ObjectId::decode(r)?,
            module: r.read_string()?,
            function: r.read_string()?,
            type_arguments: r.read_seq()?,
            arguments: r.read_seq()?,
        })
    }
}

/// Commands supported by the builder
///
/// Package publish (tag 4) and upgrade (tag 6) are not modelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveCall(Box<ProgrammableMoveCall>),
    TransferObjects(Vec<Argument>, Argument),
    SplitCoins(Argument, Vec<Argument>),
    MergeCoins(Argument, Vec<Argument>),
    MakeMoveVec(Option<TypeTag>, Vec<Argument>),
}

impl Command {
    /// Every argument this command reads
    pub fn arguments(&self) -> Vec<Argument> {
        match self {
            Self::MoveCall(call) => call.arguments.clone(),
            Self::TransferObjects(objects, recipient) => {
                let mut args = objects.clone();
                args.push(*recipient);
                args
            }
            Self::SplitCoins(coin, amounts) => {
                let mut args = vec![*coin];
                args.extend_from_slice(amounts);
                args
            }
            Self::MergeCoins(dest, sources) => {
                let mut args = vec![*dest];
                args.extend_from_slice(sources);
                args
            }
            Self::MakeMoveVec(_, elements) => elements.clone(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::MoveCall(_) => "MoveCall",
            Self::TransferObjects(..) => "TransferObjects",
            Self::SplitCoins(..) => "SplitCoins",
            Self::MergeCoins(..) => "MergeCoins",
            Self::MakeMoveVec(..) => "MakeMoveVec",
        }
    }
}

impl BcsEncode for Command {
    fn encode(&self, w: &mut BcsWriter) {
        match self {
            Self::MoveCall(call) => {
                w.write_uleb128(0);
                call.encode(w);
            }
            Self::TransferObjects(objects, recipient) => {
                w.write_uleb128(1);
                w.write_seq(objects);
                recipient.encode(w);
            }
            Self::SplitCoins(coin, amounts) => {
                w.write_uleb128(2);
                coin.encode(w);
                w.write_seq(amounts);
            }
            Self::MergeCoins(dest, sources) => {
                w.write_uleb128(3);
                dest.encode(w);
                w.write_seq(sources);
            }
            Self::MakeMoveVec(type_tag, elements) => {
                w.write_uleb128(5);
                w.write_option(type_tag.as_ref());
                w.write_seq(elements);
            }
        }
    }
}

impl BcsDecode for Command {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, BcsError> {
        match r.read_uleb128()? {
            0 => Ok(Self::MoveCall(Box::new(ProgrammableMoveCall::decode(r)?))),
            1 => {
                let objects = r.read_seq()?;
                Ok(Self::TransferObjects(objects, Argument::decode(r)?))
            }
            2 => {
                let coin = Argument::decode(r)?;
                Ok(Self::SplitCoins(coin, r.read_seq()?))
            }
            3 => {
                let dest = Argument::decode(r)?;
                Ok(Self::MergeCoins(dest, r.read_seq()?))
            }
            5 => {
                let type_tag = r.read_option()?;
                Ok(Self::MakeMoveVec(type_tag, r.read_seq()?))
            }
            tag @ (4 | 6) => Err(BcsError::UnsupportedVariant {
                type_name: "Command",
                tag,
            }),
            tag => Err(BcsError::UnknownVariant {
                type_name: "Command",
                tag,
            }),
        }
    }
}

/// Inputs plus commands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgrammableTransaction {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

impl BcsEncode for ProgrammableTransaction {
    fn encode(&self, w: &mut BcsWriter) {
        w.write_seq(&self.inputs);
        w.write_seq(&self.commands);
    }
}

impl BcsDecode for ProgrammableTransaction {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, BcsError> {
        Ok(Self {
            inputs: r.read_seq()?,
            commands: r.read_seq()?,
        })
    }
}

/// Transaction kind; only user-submittable programmable transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionKind {
    ProgrammableTransaction(ProgrammableTransaction),
}

impl BcsEncode for TransactionKind {
    fn encode(&self, w: &mut BcsWriter) {
        match self {
            Self::ProgrammableTransaction(pt) => {
                w.write_uleb128(0);
                pt.encode(w);
            }
        }
    }
}

impl BcsDecode for TransactionKind {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, BcsError> {
        match r.read_uleb128()? {
            0 => Ok(Self::ProgrammableTransaction(ProgrammableTransaction::decode(r)?)),
            // system transactions (epoch change, genesis, consensus prologue, ...)
            tag => Err(BcsError::UnsupportedVariant {
                type_name: "TransactionKind",
                tag,
            }),
        }
    }
}

// =============================================================================
// Gas and envelope
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasData {
    pub payment: Vec<ObjectRef>,
    pub owner: SuiAddress,
    pub price: u64,
    pub budget: u64,
}

impl BcsEncode for GasData {
    fn encode(&self, w: &mut BcsWriter) {
        w.write_seq(&self.payment);
        self.owner.encode(w);
        w.write_u64(self.price);
        w.write_u64(self.budget);
    }
}

impl BcsDecode for GasData {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, BcsError> {
        Ok(Self {
            payment: r.read_seq()?,
            owner: SuiAddress::decode(r)?,
            price: r.read_u64()?,
            budget: r.read_u64()?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionExpiration {
    #[default]
    None,
    Epoch(u64),
}

impl BcsEncode for TransactionExpiration {
    fn encode(&self, w: &mut BcsWriter) {
        match self {
            Self::None => w.write_uleb128(0),
            Self::Epoch(epoch) => {
                w.write_uleb128(1);
                w.write_u64(*epoch);
            }
        }
    }
}

impl BcsDecode for TransactionExpiration {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, BcsError> {
        match r.read_uleb128()? {
            0 => Ok(Self::None),
            1 => Ok(Self::Epoch(r.read_u64()?)),
            tag => Err(BcsError::UnknownVariant {
                type_name: "TransactionExpiration",
                tag,
            }),
        }
    }
}

/// `TransactionData::V1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionData {
    pub kind: TransactionKind,
    pub sender: SuiAddress,
    pub gas_data: GasData,
    pub expiration: TransactionExpiration,
}

impl BcsEncode for TransactionData {
    fn encode(&self, w: &mut BcsWriter) {
        // version tag: V1
        w.write_uleb128(0);
        self.kind.encode(w);
        self.sender.encode(w);
        self.gas_data.encode(w);
        self.expiration.encode(w);
    }
}

impl BcsDecode for TransactionData {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, BcsError> {
        match r.read_uleb128()? {
            0 => Ok(Self {
                kind: TransactionKind::decode(r)?,
                sender: SuiAddress::decode(r)?,
                gas_data: GasData::decode(r)?,
                expiration: TransactionExpiration::decode(r)?,
            }),
            tag => Err(BcsError::UnknownVariant {
                type_name: "TransactionData",
                tag,
            }),
        }
    }
}

// =============================================================================
// Move type tags
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructTag {
    pub address: SuiAddress,
    pub module: String,
    pub name: String,
    pub type_params: Vec<TypeTag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
}

impl BcsEncode for StructTag {
    fn encode(&self, w: &mut BcsWriter) {
        self.address.encode(w);
        w.write_str(&self.module);
        w.write_str(&self.name);
        w.write_seq(&self.type_params);
    }
}

impl BcsDecode for StructTag {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, BcsError> {
        Ok(Self {
            address: SuiAddress::decode(r)?,
            module: r.read_string()?,
            name: r.read_string()?,
            type_params: r.read_seq()?,
        })
    }
}

impl BcsEncode for TypeTag {
    fn encode(&self, w: &mut BcsWriter) {
        match self {
            Self::Bool => w.write_uleb128(0),
            Self::U8 => w.write_uleb128(1),
            Self::U64 => w.write_uleb128(2),
            Self::U128 => w.write_uleb128(3),
            Self::Address => w.write_uleb128(4),
            Self::Signer => w.write_uleb128(5),
            Self::Vector(inner) => {
                w.write_uleb128(6);
                inner.encode(w);
            }
            Self::Struct(tag) => {
                w.write_uleb128(7);
                tag.encode(w);
            }
            Self::U16 => w.write_uleb128(8),
            Self::U32 => w.write_uleb128(9),
            Self::U256 => w.write_uleb128(10),
        }
    }
}

impl BcsDecode for TypeTag {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, BcsError> {
        r.enter(MAX_TYPE_TAG_DEPTH)?;
        let tag = Self::decode_variant(r);
        r.leave();
        tag
    }
}

impl TypeTag {
    fn decode_variant(r: &mut BcsReader<'_>) -> Result<Self, BcsError> {
        match r.read_uleb128()? {
            0 => Ok(Self::Bool),
            1 => Ok(Self::U8),
            2 => Ok(Self::U64),
            3 => Ok(Self::U128),
            4 => Ok(Self::Address),
            5 => Ok(Self::Signer),
            6 => Ok(Self::Vector(Box::new(TypeTag::decode(r)?))),
            7 => Ok(Self::Struct(Box::new(StructTag::decode(r)?))),
            8 => Ok(Self::U16),
            9 => Ok(Self::U32),
            10 => Ok(Self::U256),
            tag => Err(BcsError::UnknownVariant {
                type_name: "TypeTag",
                tag,
            }),
        }
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.name)?;
        if !self.type_params.is_empty() {
            let params: Vec<String> = self.type_params.iter().map(|t| t.to_string()).collect();
            write!(f, "<{}>", params.join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::U8 => write!(f, "u8"),
            Self::U16 => write!(f, "u16"),
            Self::U32 => write!(f, "u32"),
            Self::U64 => write!(f, "u64"),
            Self::U128 => write!(f, "u128"),
            Self::U256 => write!(f, "u256"),
            Self::Address => write!(f, "address"),
            Self::Signer => write!(f, "signer"),
            Self::Vector(inner) => write!(f, "vector<{}>", inner),
            Self::Struct(tag) => write!(f, "{}", tag),
        }
    }
}

impl FromStr for TypeTag {
    type Err = PtbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = TypeTagParser::new(s);
        let tag = parser.parse_type()?;
        parser.skip_ws();
        if !parser.rest().is_empty() {
            return Err(PtbError::parse_error(format!(
                "Unexpected trailing input in type tag: {}",
                parser.rest()
            )));
        }
        Ok(tag)
    }
}

/// Recursive-descent parser for `0x2::coin::Coin<0x2::sui::SUI>` style tags
struct TypeTagParser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> TypeTagParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> PtbResult<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(PtbError::parse_error(format!(
                "Expected '{}' in type tag at: {}",
                token,
                self.rest()
            )))
        }
    }

    fn ident(&mut self) -> PtbResult<&'a str> {
        self.skip_ws();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(PtbError::parse_error(format!(
                "Expected identifier in type tag at: {}",
                rest
            )));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn parse_type(&mut self) -> PtbResult<TypeTag> {
        if self.depth >= MAX_TYPE_TAG_DEPTH {
            return Err(PtbError::parse_error(format!(
                "Type tag nested deeper than {} levels",
                MAX_TYPE_TAG_DEPTH
            )));
        }
        self.depth += 1;
        let tag = self.parse_type_inner();
        self.depth -= 1;
        tag
    }

    fn parse_type_inner(&mut self) -> PtbResult<TypeTag> {
        let head = self.ident()?;
        let tag = match head {
            "bool" => TypeTag::Bool,
            "u8" => TypeTag::U8,
            "u16" => TypeTag::U16,
            "u32" => TypeTag::U32,
            "u64" => TypeTag::U64,
            "u128" => TypeTag::U128,
            "u256" => TypeTag::U256,
            "address" => TypeTag::Address,
            "signer" => TypeTag::Signer,
            "vector" => {
                self.expect("<")?;
                let inner = self.parse_type()?;
                self.expect(">")?;
                TypeTag::Vector(Box::new(inner))
            }
            addr => {
                let address = SuiAddress::from_string(addr)?;
                self.expect("::")?;
                let module = self.ident()?.to_string();
                self.expect("::")?;
                let name = self.ident()?.to_string();
                let mut type_params = Vec::new();
                if self.eat("<") {
                    loop {
                        type_params.push(self.parse_type()?);
                        if self.eat(",") {
                            continue;
                        }
                        self.expect(">")?;
                        break;
                    }
                }
                TypeTag::Struct(Box::new(StructTag {
                    address,
                    module,
                    name,
                    type_params,
                }))
            }
        };
        Ok(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sui_coin_type() {
        let tag: TypeTag = "0x2::coin::Coin<0x2::sui::SUI>".parse().unwrap();
        match &tag {
            TypeTag::Struct(s) => {
                assert_eq!(s.address, SuiAddress::from_string("0x2").unwrap());
                assert_eq!(s.module, "coin");
                assert_eq!(s.name, "Coin");
                assert_eq!(s.type_params.len(), 1);
            }
            other => panic!("unexpected tag {:?}", other),
        }
        let rendered = tag.to_string();
        assert!(rendered.ends_with("::coin::Coin<0x0000000000000000000000000000000000000000000000000000000000000002::sui::SUI>"));
        assert_eq!(rendered.parse::<TypeTag>().unwrap(), tag);
    }

    #[test]
    fn test_parse_nested_and_primitive() {
        let tag: TypeTag = "vector<vector<u8>>".parse().unwrap();
        assert_eq!(
            tag,
            TypeTag::Vector(Box::new(TypeTag::Vector(Box::new(TypeTag::U8))))
        );

        let pair: TypeTag = "0x1::pair::Pair<u64, address>".parse().unwrap();
        if let TypeTag::Struct(s) = pair {
            assert_eq!(s.type_params, vec![TypeTag::U64, TypeTag::Address]);
        } else {
            panic!("expected struct");
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!("vector<u8".parse::<TypeTag>().is_err());
        assert!("0x2::coin".parse::<TypeTag>().is_err());
        assert!("u64 extra".parse::<TypeTag>().is_err());
    }

    #[test]
    fn test_type_tag_bcs_tags() {
        assert_eq!(TypeTag::U64.to_bcs(), vec![2]);
        assert_eq!(TypeTag::U16.to_bcs(), vec![8]);
        assert_eq!(TypeTag::Vector(Box::new(TypeTag::U8)).to_bcs(), vec![6, 1]);
    }

    #[test]
    fn test_object_ref_encoding_layout() {
        let r = ObjectRef::new(
            SuiAddress::from_string("0x6").unwrap(),
            5,
            ObjectDigest::new([0xab; 32]),
        );
        let bytes = r.to_bcs();
        // 32 id + 8 version + 1 length + 32 digest
        assert_eq!(bytes.len(), 73);
        assert_eq!(bytes[31], 0x06);
        assert_eq!(&bytes[32..40], &5u64.to_le_bytes());
        assert_eq!(bytes[40], 32);
        assert_eq!(ObjectRef::from_bcs(&bytes).unwrap(), r);
    }

    #[test]
    fn test_argument_encoding() {
        assert_eq!(Argument::GasCoin.to_bcs(), vec![0]);
        assert_eq!(Argument::Input(1).to_bcs(), vec![1, 1, 0]);
        assert_eq!(Argument::NestedResult(0, 2).to_bcs(), vec![3, 0, 0, 2, 0]);
    }

    #[test]
    fn test_publish_command_unsupported() {
        assert_eq!(
            Command::from_bcs(&[4, 0, 0]),
            Err(BcsError::UnsupportedVariant {
                type_name: "Command",
                tag: 4
            })
        );
    }

    #[test]
    fn test_deep_type_tag_bytes_rejected() {
        let mut bytes = vec![6u8; 100_000];
        bytes.push(1);
        assert_eq!(
            TypeTag::from_bcs(&bytes),
            Err(BcsError::DepthExceeded(MAX_TYPE_TAG_DEPTH))
        );

        // the limit itself still decodes
        let mut bytes = vec![6u8; MAX_TYPE_TAG_DEPTH - 1];
        bytes.push(1);
        assert!(TypeTag::from_bcs(&bytes).is_ok());
    }

    #[test]
    fn test_deep_type_tag_string_rejected() {
        let deep = format!("{}u8{}", "vector<".repeat(200_000), ">".repeat(200_000));
        assert!(deep.parse::<TypeTag>().is_err());

        let nested_params = format!("{}u8{}", "0x2::m::S<".repeat(50_000), ">".repeat(50_000));
        assert!(nested_params.parse::<TypeTag>().is_err());

        let at_limit = format!(
            "{}u8{}",
            "vector<".repeat(MAX_TYPE_TAG_DEPTH - 1),
            ">".repeat(MAX_TYPE_TAG_DEPTH - 1)
        );
        assert!(at_limit.parse::<TypeTag>().is_ok());
    }
}
