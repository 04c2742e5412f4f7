//! Amount compression.
//!
//! An amount is stored as a big-endian mantissa plus a bit `shift`. Compression drops the
//! trailing zero bytes of the amount and records them in the shift, so `shift` is always a
//! multiple of 8. Encodings are not required to be minimal: any `(shift, bytes)` pair that
//! satisfies the invariants is accepted, which is why canonical hashes always work on
//! [`CompressedAmount::value`].

use crate::codec::{HeaderWidth, Reader, Writer};
use crate::error::{Error, Result};
use alloy::primitives::U256;

const MAX_AMOUNT_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedAmount {
    shift: u8,
    bytes: Vec<u8>,
}

impl CompressedAmount {
    /// Builds an amount from an explicit mantissa and shift, without normalising.
    pub fn new(mantissa: U256, shift: u8) -> Result<Self> {
        Self::from_parts(shift, minimal_be_bytes(mantissa))
    }

    pub fn from_parts(shift: u8, bytes: Vec<u8>) -> Result<Self> {
        validate(shift, &bytes)?;
        Ok(Self { shift, bytes })
    }

    pub fn shift(&self) -> u8 {
        self.shift
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The decompressed amount.
    pub fn value(&self) -> U256 {
        U256::from_be_slice(&self.bytes) << usize::from(self.shift)
    }

    pub fn encode(&self, writer: &mut Writer) -> Result<()> {
        writer.write_u8(self.shift);
        writer.write_variable(HeaderWidth::U8, &self.bytes, "Output::amount")
    }

    pub fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        let shift = reader.read_u8("Output::amountShift")?;
        let bytes = reader.read_variable(HeaderWidth::U8, "Output::amount")?;
        Self::from_parts(shift, bytes.to_vec())
    }
}

/// Drops the trailing zero bytes of `amount`. Zero compresses to `shift = 0, bytes = [0x00]`.
pub fn compress(amount: U256) -> CompressedAmount {
    let be = amount.to_be_bytes::<32>();
    let trailing_zeros = be.iter().rev().take_while(|byte| **byte == 0).count();
    if trailing_zeros == MAX_AMOUNT_BYTES {
        return CompressedAmount {
            shift: 0,
            bytes: vec![0],
        };
    }
    let leading_zeros = be.iter().take_while(|byte| **byte == 0).count();
    // At most 31 trailing zero bytes remain here, so the shift fits in a byte.
    let shift = u8::try_from(trailing_zeros * 8).unwrap_or(u8::MAX);
    CompressedAmount {
        shift,
        bytes: be[leading_zeros..MAX_AMOUNT_BYTES - trailing_zeros].to_vec(),
    }
}

pub fn decompress(shift: u8, bytes: &[u8]) -> Result<U256> {
    validate(shift, bytes)?;
    Ok(U256::from_be_slice(bytes) << usize::from(shift))
}

fn validate(shift: u8, bytes: &[u8]) -> Result<()> {
    if shift % 8 != 0 {
        return Err(Error::ShiftNotByteAligned(shift));
    }
    if bytes.is_empty() {
        return Err(Error::InvalidFieldLength {
            field: "Output::amount",
            length: 0,
        });
    }
    if bytes.len() + usize::from(shift / 8) > MAX_AMOUNT_BYTES {
        return Err(Error::AmountOverflow {
            length: bytes.len(),
            shift,
        });
    }
    Ok(())
}

fn minimal_be_bytes(value: U256) -> Vec<u8> {
    let be = value.to_be_bytes::<32>();
    match be.iter().position(|byte| *byte != 0) {
        Some(first) => be[first..].to_vec(),
        None => vec![0],
    }
}
