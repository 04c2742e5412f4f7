use crate::codec::{Packed, Reader, Tagged, Writer, decode_tagged, encode_tagged};
use crate::error::{Error, Result};
use alloy::primitives::{Address, B256, Signature, U256};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WitnessType {
    Signature = 0,
    Caller = 1,
    Producer = 2,
}

impl TryFrom<u8> for WitnessType {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(WitnessType::Signature),
            1 => Ok(WitnessType::Caller),
            2 => Ok(WitnessType::Producer),
            tag => Err(Error::UnknownType {
                kind: "Witness",
                tag,
            }),
        }
    }
}

/// Authorisation attached to a transaction.
///
/// Only `Signature` is cryptographic. `Caller` defers to whoever calls the verifier entry
/// point, `Producer` to the producer of the current block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Witness {
    Signature { r: B256, s: B256, v: u8 },
    Caller { owner: Address, block_number: u32 },
    Producer { hash: B256 },
}

impl Witness {
    pub fn witness_type(&self) -> WitnessType {
        match self {
            Witness::Signature { .. } => WitnessType::Signature,
            Witness::Caller { .. } => WitnessType::Caller,
            Witness::Producer { .. } => WitnessType::Producer,
        }
    }

    /// Converts an ECDSA signature, storing `v` in the 27/28 form the verifier expects.
    pub fn from_signature(signature: &Signature) -> Self {
        Witness::Signature {
            r: B256::from(signature.r()),
            s: B256::from(signature.s()),
            v: u8::from(signature.v()) + 27,
        }
    }

    /// The ECDSA signature held by this witness, if it is a well formed signature witness.
    pub fn to_signature(&self) -> Option<Signature> {
        match self {
            Witness::Signature { r, s, v } => {
                let y_parity = match v {
                    0 | 27 => false,
                    1 | 28 => true,
                    _ => return None,
                };
                Some(Signature::new(
                    U256::from_be_bytes(r.0),
                    U256::from_be_bytes(s.0),
                    y_parity,
                ))
            }
            _ => None,
        }
    }
}

impl Tagged for Witness {
    const KIND: &'static str = "Witness";

    fn tag(&self) -> u8 {
        self.witness_type() as u8
    }

    fn encode_body(&self, writer: &mut Writer) -> Result<()> {
        match self {
            Witness::Signature { r, s, v } => {
                writer.write_b256(r);
                writer.write_b256(s);
                writer.write_u8(*v);
            }
            Witness::Caller {
                owner,
                block_number,
            } => {
                writer.write_address(owner);
                writer.write_u32(*block_number);
            }
            Witness::Producer { hash } => writer.write_b256(hash),
        }
        Ok(())
    }

    fn decode_body(tag: u8, reader: &mut Reader<'_>) -> Result<Self> {
        Ok(match WitnessType::try_from(tag)? {
            WitnessType::Signature => Witness::Signature {
                r: reader.read_b256("Signature::r")?,
                s: reader.read_b256("Signature::s")?,
                v: reader.read_u8("Signature::v")?,
            },
            WitnessType::Caller => Witness::Caller {
                owner: reader.read_address("Caller::owner")?,
                block_number: reader.read_u32("Caller::blockNumber")?,
            },
            WitnessType::Producer => Witness::Producer {
                hash: reader.read_b256("Producer::hash")?,
            },
        })
    }
}

impl Packed for Witness {
    fn encode_packed(&self, writer: &mut Writer) -> Result<()> {
        encode_tagged(self, writer)
    }

    fn decode_packed(reader: &mut Reader<'_>) -> Result<Self> {
        decode_tagged(reader)
    }
}
