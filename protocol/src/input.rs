use crate::codec::{Packed, Reader, Tagged, Writer, decode_tagged, encode_tagged};
use crate::error::{Error, Result};
use alloy::primitives::{Address, B256};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Transfer = 0,
    Deposit = 1,
    Htlc = 2,
    Root = 3,
}

impl TryFrom<u8> for InputType {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(InputType::Transfer),
            1 => Ok(InputType::Deposit),
            2 => Ok(InputType::Htlc),
            3 => Ok(InputType::Root),
            tag => Err(Error::UnknownType { kind: "Input", tag }),
        }
    }
}

/// Reference to the UTXO, deposit or root being spent.
///
/// `witness_reference` is the index of the witness authorising the spend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Transfer { witness_reference: u8 },
    Deposit { witness_reference: u8, owner: Address },
    Htlc { witness_reference: u8, pre_image: B256 },
    Root { witness_reference: u8 },
}

impl Input {
    pub fn input_type(&self) -> InputType {
        match self {
            Input::Transfer { .. } => InputType::Transfer,
            Input::Deposit { .. } => InputType::Deposit,
            Input::Htlc { .. } => InputType::Htlc,
            Input::Root { .. } => InputType::Root,
        }
    }

    pub fn witness_reference(&self) -> u8 {
        match self {
            Input::Transfer { witness_reference }
            | Input::Deposit {
                witness_reference, ..
            }
            | Input::Htlc {
                witness_reference, ..
            }
            | Input::Root { witness_reference } => *witness_reference,
        }
    }

    pub fn is_deposit(&self) -> bool {
        matches!(self, Input::Deposit { .. })
    }
}

impl Tagged for Input {
    const KIND: &'static str = "Input";

    fn tag(&self) -> u8 {
        self.input_type() as u8
    }

    fn encode_body(&self, writer: &mut Writer) -> Result<()> {
        writer.write_u8(self.witness_reference());
        match self {
            Input::Deposit { owner, .. } => writer.write_address(owner),
            Input::Htlc { pre_image, .. } => writer.write_b256(pre_image),
            Input::Transfer { .. } | Input::Root { .. } => {}
        }
        Ok(())
    }

    fn decode_body(tag: u8, reader: &mut Reader<'_>) -> Result<Self> {
        let input_type = InputType::try_from(tag)?;
        let witness_reference = reader.read_u8("Input::witnessReference")?;
        Ok(match input_type {
            InputType::Transfer => Input::Transfer { witness_reference },
            InputType::Deposit => Input::Deposit {
                witness_reference,
                owner: reader.read_address("InputDeposit::owner")?,
            },
            InputType::Htlc => Input::Htlc {
                witness_reference,
                pre_image: reader.read_b256("InputHTLC::preImage")?,
            },
            InputType::Root => Input::Root { witness_reference },
        })
    }
}

impl Packed for Input {
    fn encode_packed(&self, writer: &mut Writer) -> Result<()> {
        encode_tagged(self, writer)
    }

    fn decode_packed(reader: &mut Reader<'_>) -> Result<Self> {
        decode_tagged(reader)
    }
}
