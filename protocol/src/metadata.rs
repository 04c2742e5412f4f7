//! Input metadata.
//!
//! Metadata records are 8 bytes with no tag. The layout of each record is chosen by the
//! input at the same position: deposit inputs pair with [`Metadata::Deposit`], every other
//! input with [`Metadata::Pointer`].

use crate::codec::{Reader, Writer};
use crate::error::{Error, Result};
use crate::input::Input;

pub const METADATA_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metadata {
    /// Location of the output being spent.
    Pointer {
        block_height: u32,
        root_index: u8,
        transaction_index: u16,
        output_index: u8,
    },
    /// Token id and L1 block of the deposit being spent.
    Deposit { token: u32, block_number: u32 },
}

impl Metadata {
    pub fn encode(&self, writer: &mut Writer) {
        match self {
            Metadata::Pointer {
                block_height,
                root_index,
                transaction_index,
                output_index,
            } => {
                writer.write_u32(*block_height);
                writer.write_u8(*root_index);
                writer.write_u16(*transaction_index);
                writer.write_u8(*output_index);
            }
            Metadata::Deposit {
                token,
                block_number,
            } => {
                writer.write_u32(*token);
                writer.write_u32(*block_number);
            }
        }
    }

    pub fn decode_pointer(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Metadata::Pointer {
            block_height: reader.read_u32("Metadata::blockHeight")?,
            root_index: reader.read_u8("Metadata::rootIndex")?,
            transaction_index: reader.read_u16("Metadata::transactionIndex")?,
            output_index: reader.read_u8("Metadata::outputIndex")?,
        })
    }

    pub fn decode_deposit(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Metadata::Deposit {
            token: reader.read_u32("MetadataDeposit::token")?,
            block_number: reader.read_u32("MetadataDeposit::blockNumber")?,
        })
    }

    /// Decodes `bytes` as consecutive metadata records shaped by `inputs`.
    ///
    /// Positions past the end of `inputs` are read as pointers.
    pub fn decode_list(bytes: &[u8], inputs: &[Input]) -> Result<Vec<Metadata>> {
        if bytes.len() % METADATA_SIZE != 0 {
            return Err(Error::InvalidFieldLength {
                field: "Transaction::metadata",
                length: bytes.len(),
            });
        }
        let mut reader = Reader::new(bytes);
        let mut metadata = Vec::with_capacity(bytes.len() / METADATA_SIZE);
        let mut position = 0;
        while !reader.is_empty() {
            let is_deposit = inputs.get(position).is_some_and(Input::is_deposit);
            metadata.push(if is_deposit {
                Self::decode_deposit(&mut reader)?
            } else {
                Self::decode_pointer(&mut reader)?
            });
            position += 1;
        }
        Ok(metadata)
    }

    pub fn encode_list(metadata: &[Metadata], writer: &mut Writer) {
        metadata.iter().for_each(|item| item.encode(writer));
    }
}
