use crate::amount::CompressedAmount;
use crate::bindings::commitments::OutputCommitment;
use crate::codec::{Canonical, HeaderWidth, Packed, Reader, Tagged, Writer, decode_tagged, encode_tagged};
use crate::error::{Error, Result};
use alloy::{
    primitives::{Address, B256, Bytes, U256, keccak256},
    sol_types::SolValue,
};

const MAX_COMPRESSED_ID_BYTES: usize = 20;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    Transfer = 0,
    Withdraw = 1,
    Htlc = 2,
    Return = 3,
}

impl TryFrom<u8> for OutputType {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(OutputType::Transfer),
            1 => Ok(OutputType::Withdraw),
            2 => Ok(OutputType::Htlc),
            3 => Ok(OutputType::Return),
            tag => Err(Error::UnknownType { kind: "Output", tag }),
        }
    }
}

/// A token id or owner in compressed form: either a full 20-byte address or the
/// big-endian bytes of an id registered with the verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedId(Vec<u8>);

impl CompressedId {
    pub fn from_address(address: Address) -> Self {
        Self(address.to_vec())
    }

    pub fn from_id(id: u64) -> Self {
        let be = id.to_be_bytes();
        let first = be.iter().position(|byte| *byte != 0).unwrap_or(be.len() - 1);
        Self(be[first..].to_vec())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() || bytes.len() > MAX_COMPRESSED_ID_BYTES {
            return Err(Error::InvalidFieldLength {
                field: "CompressedId",
                length: bytes.len(),
            });
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Left-padded to a word, the form owners take in canonical hashes.
    pub fn to_b256(&self) -> B256 {
        B256::left_padding_from(&self.0)
    }

    pub fn to_u256(&self) -> U256 {
        U256::from_be_slice(&self.0)
    }

    fn encode(&self, writer: &mut Writer, field: &'static str) -> Result<()> {
        writer.write_variable(HeaderWidth::U8, &self.0, field)
    }

    fn decode(reader: &mut Reader<'_>, field: &'static str) -> Result<Self> {
        let bytes = reader.read_variable(HeaderWidth::U8, field)?;
        if bytes.is_empty() || bytes.len() > MAX_COMPRESSED_ID_BYTES {
            return Err(Error::InvalidFieldLength {
                field,
                length: bytes.len(),
            });
        }
        Ok(Self(bytes.to_vec()))
    }
}

impl From<Address> for CompressedId {
    fn from(address: Address) -> Self {
        Self::from_address(address)
    }
}

/// Token, amount and owner shared by every value-carrying output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputValue {
    pub token: CompressedId,
    pub amount: CompressedAmount,
    pub owner: CompressedId,
}

impl OutputValue {
    pub fn new(token: CompressedId, amount: CompressedAmount, owner: CompressedId) -> Self {
        Self {
            token,
            amount,
            owner,
        }
    }

    fn encode(&self, writer: &mut Writer) -> Result<()> {
        self.token.encode(writer, "Output::token")?;
        self.amount.encode(writer)?;
        self.owner.encode(writer, "Output::owner")
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            token: CompressedId::decode(reader, "Output::token")?,
            amount: CompressedAmount::decode(reader)?,
            owner: CompressedId::decode(reader, "Output::owner")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Transfer(OutputValue),
    Withdraw(OutputValue),
    Htlc {
        value: OutputValue,
        digest: B256,
        expiry: u32,
        return_owner: CompressedId,
    },
    Return {
        data: Bytes,
    },
}

impl Output {
    pub fn output_type(&self) -> OutputType {
        match self {
            Output::Transfer(_) => OutputType::Transfer,
            Output::Withdraw(_) => OutputType::Withdraw,
            Output::Htlc { .. } => OutputType::Htlc,
            Output::Return { .. } => OutputType::Return,
        }
    }

    /// Token, amount and owner; `None` for return outputs.
    pub fn value(&self) -> Option<&OutputValue> {
        match self {
            Output::Transfer(value) | Output::Withdraw(value) | Output::Htlc { value, .. } => {
                Some(value)
            }
            Output::Return { .. } => None,
        }
    }

    /// Decompressed amount; zero for return outputs.
    pub fn amount(&self) -> U256 {
        self.value()
            .map(|value| value.amount.value())
            .unwrap_or_default()
    }

    pub(crate) fn commitment(&self) -> OutputCommitment {
        let (digest, expiry, return_owner) = match self {
            Output::Htlc {
                digest,
                expiry,
                return_owner,
                ..
            } => (*digest, *expiry, return_owner.to_b256()),
            _ => (B256::ZERO, 0, B256::ZERO),
        };
        let (token, amount, owner) = match self.value() {
            Some(value) => (
                value.token.to_u256(),
                value.amount.value(),
                value.owner.to_b256(),
            ),
            None => (U256::ZERO, U256::ZERO, B256::ZERO),
        };
        OutputCommitment {
            outputType: self.output_type() as u8,
            token,
            amount,
            owner,
            digest,
            expiry,
            returnOwner: return_owner,
        }
    }
}

impl Canonical for Output {
    fn hash_canonical(&self) -> B256 {
        match self {
            Output::Return { data } => {
                keccak256((U256::from(self.output_type() as u8), keccak256(data)).abi_encode())
            }
            _ => keccak256(self.commitment().abi_encode()),
        }
    }
}

impl Tagged for Output {
    const KIND: &'static str = "Output";

    fn tag(&self) -> u8 {
        self.output_type() as u8
    }

    fn encode_body(&self, writer: &mut Writer) -> Result<()> {
        match self {
            Output::Transfer(value) | Output::Withdraw(value) => value.encode(writer),
            Output::Htlc {
                value,
                digest,
                expiry,
                return_owner,
            } => {
                value.encode(writer)?;
                writer.write_b256(digest);
                writer.write_u32(*expiry);
                return_owner.encode(writer, "OutputHTLC::returnOwner")
            }
            Output::Return { data } => {
                writer.write_variable(HeaderWidth::U16, data, "OutputReturn::data")
            }
        }
    }

    fn decode_body(tag: u8, reader: &mut Reader<'_>) -> Result<Self> {
        Ok(match OutputType::try_from(tag)? {
            OutputType::Transfer => Output::Transfer(OutputValue::decode(reader)?),
            OutputType::Withdraw => Output::Withdraw(OutputValue::decode(reader)?),
            OutputType::Htlc => Output::Htlc {
                value: OutputValue::decode(reader)?,
                digest: reader.read_b256("OutputHTLC::digest")?,
                expiry: reader.read_u32("OutputHTLC::expiry")?,
                return_owner: CompressedId::decode(reader, "OutputHTLC::returnOwner")?,
            },
            OutputType::Return => Output::Return {
                data: Bytes::copy_from_slice(
                    reader.read_variable(HeaderWidth::U16, "OutputReturn::data")?,
                ),
            },
        })
    }
}

impl Packed for Output {
    fn encode_packed(&self, writer: &mut Writer) -> Result<()> {
        encode_tagged(self, writer)
    }

    fn decode_packed(reader: &mut Reader<'_>) -> Result<Self> {
        decode_tagged(reader)
    }
}
